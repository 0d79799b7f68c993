// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library

// From this library

/// Used to tell a parser whether it should exit early, ignore a parsing error or go on as usual.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParserFlow {
    Abort,
    Continue,
    Ignore,
}
