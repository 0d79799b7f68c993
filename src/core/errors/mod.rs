// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime errors.

// From dependency library

// From standard library

// From this library
pub use cache_error_enum::CacheError;
pub use file_lock_error_enum::FileLockError;
pub use mount_entry_error_enum::MountEntryError;
pub use mount_table_error_enum::MountTableError;
pub use option_string_error_enum::OptionStringError;
pub use parser_error_enum::ParserError;

mod cache_error_enum;
mod file_lock_error_enum;
mod mount_entry_error_enum;
mod mount_table_error_enum;
mod option_string_error_enum;
mod parser_error_enum;
