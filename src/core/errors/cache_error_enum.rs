// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library
use thiserror::Error;

// From standard library

// From this library

/// [`Cache`](crate::core::cache::Cache) runtime error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CacheError {
    /// Error while canonicalizing a path.
    #[error("failed to canonicalize path: {0}")]
    Canonicalize(#[from] std::io::Error),

    /// Error while resolving a tag to a device path.
    #[error("{0}")]
    TagResolution(String),
}
