// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Library-level error module.

// From dependency library
use thiserror::Error;

// From standard library

// From this library
use crate::core::entry::MountEntryBuilderError;
use crate::core::errors::CacheError;
use crate::core::errors::FileLockError;
use crate::core::errors::MountEntryError;
use crate::core::errors::MountTableError;
use crate::core::errors::OptionStringError;
use crate::core::errors::ParserError;

/// A specialized [`Result`](std::result::Result) type for `mnttab`.
///
/// This typedef is generally used at the program-level to avoid writing out [`Error`] directly,
/// and is, otherwise, a direct mapping to [`Result`](std::result::Result).
pub type Result<T> = std::result::Result<T, Error>;

/// Library-level runtime errors.
///
/// This enum includes all variants of error types susceptible to occur in the library. Other,
/// more granular error types, are automatically converted to `Error` when needed.
///
/// # Examples
/// ----
///
/// ```
/// fn main() -> mnttab::Result<()> {
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    FileLock(#[from] FileLockError),

    #[error(transparent)]
    MountEntry(#[from] MountEntryError),

    #[error(transparent)]
    MountEntryBuilder(#[from] MountEntryBuilderError),

    #[error(transparent)]
    MountTable(#[from] MountTableError),

    #[error(transparent)]
    OptionString(#[from] OptionStringError),

    #[error(transparent)]
    Parser(#[from] ParserError),
}
