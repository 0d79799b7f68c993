// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library
use thiserror::Error;

// From standard library

// From this library

/// [`optstring`](crate::core::optstring) runtime errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OptionStringError {
    /// An item in the option list was empty, or a comma fell inside an unterminated quoted
    /// value.
    #[error("{0}")]
    Malformed(String),
}
