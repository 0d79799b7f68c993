// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Table of Contents
//! 1. [Description](#description)
//! 2. [Examples](#examples)
//! 3. [API structure](#api-structure)
//!
//! ## Description
//!
//! `mnttab` is a userspace library for reading and manipulating Linux mount tables: the classic
//! `/etc/fstab`/`/etc/mtab` line format, and the kernel's `/proc/self/mountinfo` format.
//!
//! `mnttab` lets callers:
//! - parse either format into an ordered, in-memory [`MountTable`](crate::core::table::MountTable),
//! - look up entries by target, source, device tag, or a `(source, target)` pair, the same way
//!   `mount(8)` does,
//! - read and rewrite an entry's option string through a small parse/merge/split engine,
//! - walk a `mountinfo` table's parent/child hierarchy,
//! - hold a cross-process lock on a mount table file using the traditional `/etc/mtab~`
//!   hard-link protocol, or a plain `flock(2)` for private files.
//!
//! ## Examples
//!
//! ```no_run
//! use mnttab::core::table::{Direction, MountTable};
//!
//! fn main() -> mnttab::Result<()> {
//!     let table = MountTable::new_from_file("/etc/fstab")?;
//!
//!     if let Some(entry) = table.find_target("/home", Direction::Forward) {
//!         println!("{entry}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API structure
//!
//! - [`core`]: entries, tables, the option-string engine, the option classification map, the
//!   path/tag resolver cache trait, the mount-table lock, and the octal-escape codec.
//! - [`debug`]: a finer-grained diagnostic switch layered on top of the [`log`] facade.
//! - [`error`]: the crate-wide [`Error`] and [`Result`] types.

pub mod core;
pub mod debug;

pub use error::*;

mod error;
