// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `mnttab` low-level API.

// From dependency library

// From standard library

// From this library
pub mod cache;
pub mod codec;
pub mod entry;
pub mod errors;
pub mod lock;
pub mod optmap;
pub mod optstring;
pub mod table;
