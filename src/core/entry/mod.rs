// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One parsed record from a mount table.

// From dependency library

// From standard library

// From this library
pub use mount_entry_builder_struct::MountEntryBuilder;
pub use mount_entry_builder_struct::MountEntryBuilderError;
pub use mount_entry_struct::MountEntry;
pub use mount_flags_struct::MountEntryFlags;
pub use tag_name_enum::TagName;

mod mount_entry_builder_struct;
mod mount_entry_struct;
mod mount_flags_struct;
mod tag_name_enum;
