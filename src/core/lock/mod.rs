// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-process locking for a mount table file, compatible with the traditional `/etc/mtab~`
//! hard-link protocol.

// From dependency library

// From standard library

// From this library
pub use file_lock_struct::FileLock;
pub use lock_mode_enum::LockMode;

mod file_lock_struct;
mod lock_mode_enum;
