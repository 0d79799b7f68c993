// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library
use thiserror::Error;

// From standard library

// From this library

/// [`MountEntry`](crate::core::entry::MountEntry) runtime errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MountEntryError {
    /// `parent_id` was set equal to `id` on the same entry.
    #[error("a mount entry cannot be its own parent (id == parent_id == {0})")]
    SelfParented(i32),

    /// The source string looked like `NAME=VALUE` but `NAME` is not a recognized tag name.
    #[error("unrecognized tag name: {0:?}")]
    UnrecognizedTag(String),
}
