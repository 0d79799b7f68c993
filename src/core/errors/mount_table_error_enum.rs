// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library
use thiserror::Error;

// From standard library

// From this library

/// [`MountTable`](crate::core::table::MountTable) runtime errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MountTableError {
    /// Error while opening or reading a table file.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The error callback returned a negative value, aborting the parse.
    #[error("parser aborted at {0:?}:{1}")]
    ParseAborted(std::path::PathBuf, u32),
}
