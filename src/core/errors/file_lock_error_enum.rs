// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library
use thiserror::Error;

// From standard library

// From this library

/// [`FileLock`](crate::core::lock::FileLock) runtime errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FileLockError {
    /// Error while creating a new [`FileLock`](crate::core::lock::FileLock) instance.
    #[error("{0}")]
    Creation(String),

    /// Error while configuring signal blocking on a [`FileLock`](crate::core::lock::FileLock).
    #[error("{0}")]
    Config(String),

    /// Error while acquiring the lock itself (as opposed to setting it up).
    #[error("{0}")]
    Lock(String),

    /// The lock could not be acquired before its deadline.
    #[error("timed out waiting for lock on {0:?}")]
    StaleLock(std::path::PathBuf),

    /// A filesystem call underlying the lock protocol failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
