// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library
use thiserror::Error;

// From standard library

// From this library

/// Mount table line-parser runtime errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParserError {
    /// A classic-format line did not have the minimum required number of fields.
    #[error("{0}")]
    ClassicLine(String),

    /// A kernel mount-information line was missing the `-` optional-fields separator, or one of
    /// its fixed fields.
    #[error("{0}")]
    KernelInfoLine(String),

    /// A `freq`/`pass_no`/`id`/`parent`/`maj:min` field did not parse as a decimal integer.
    #[error("invalid integer field {0:?}: {1}")]
    InvalidInteger(String, std::num::ParseIntError),

    /// Source field looked like a `NAME=VALUE` tag but `NAME` is not a recognized tag name.
    #[error("unrecognized tag name: {0:?}")]
    UnrecognizedTag(String),
}
