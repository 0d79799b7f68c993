// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An ordered collection of mount entries, parsed from a classic `fstab`-style file or a kernel
//! `mountinfo` file, with `mount(8)`-compatible lookups.

// From dependency library

// From standard library

// From this library
pub use direction_enum::Direction;
pub use mount_table_struct::MountTable;
pub use parser_flow_enum::ParserFlow;
pub use table_format_enum::TableFormat;
pub use table_iter_struct::TableIter;

mod direction_enum;
mod mount_table_struct;
mod parser_flow_enum;
mod table_format_enum;
mod table_iter_struct;
