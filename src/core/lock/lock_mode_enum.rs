// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library

// From this library

/// Which locking protocol a [`FileLock`](super::FileLock) speaks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LockMode {
    /// The traditional `/etc/mtab~` hard-link-then-`fcntl`-lock protocol, compatible with other
    /// tools that lock the same file the same way.
    #[default]
    HardLink,
    /// A plain `flock(2)` on a dedicated `<file>.lock`, for private files no other tool needs to
    /// cooperate on.
    Simple,
}
