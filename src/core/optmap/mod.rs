// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classification tables for mount option names.
//!
//! Two built-in maps back [`split`](crate::core::optstring::split_options): one for options the
//! VFS layer understands (`ro`, `noexec`, `bind`, ...), one for userspace-only options that never
//! reach the kernel (`user`, `users`, `_netdev`, ...). An option not found in either map is
//! classified as filesystem-specific: it is opaque to this library and is simply passed through.

use once_cell::sync::Lazy;

bitflags::bitflags! {
    /// Classification bits attached to a recognized option name.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct OptFlags: u32 {
        /// Option takes a `NAME=VALUE` form.
        const PREFIX = 1 << 0;
        /// Option is meaningful only to the kernel and should never be copied into the userspace
        /// mount table.
        const NO_MTAB = 1 << 1;
        /// Setting the option implies its logical inverse is cleared (e.g. `rw` clears `ro`).
        const INVERT = 1 << 2;
    }
}

/// One row of an option map: a recognized name, a non-zero classification id, and a mask of
/// [`OptFlags`].
///
/// An `id` of zero is the "comment/undefined" sentinel: [`split`] drops options that resolve to
/// it instead of bucketing them.
#[derive(Clone, Copy, Debug)]
pub struct OptMapEntry {
    pub name: &'static str,
    pub id: u32,
    pub flags: OptFlags,
}

macro_rules! opt {
    ($name:expr, $id:expr) => {
        OptMapEntry {
            name: $name,
            id: $id,
            flags: OptFlags::empty(),
        }
    };
    ($name:expr, $id:expr, $flags:expr) => {
        OptMapEntry {
            name: $name,
            id: $id,
            flags: $flags,
        }
    };
}

/// Options the kernel VFS layer interprets directly.
pub static VFS_MAP: Lazy<Vec<OptMapEntry>> = Lazy::new(|| {
    vec![
        opt!("defaults", 1),
        opt!("ro", 2, OptFlags::INVERT),
        opt!("rw", 3, OptFlags::INVERT),
        opt!("exec", 4, OptFlags::INVERT),
        opt!("noexec", 5, OptFlags::INVERT),
        opt!("suid", 6, OptFlags::INVERT),
        opt!("nosuid", 7, OptFlags::INVERT),
        opt!("dev", 8, OptFlags::INVERT),
        opt!("nodev", 9, OptFlags::INVERT),
        opt!("sync", 10, OptFlags::INVERT),
        opt!("async", 11, OptFlags::INVERT),
        opt!("dirsync", 12),
        opt!("atime", 13, OptFlags::INVERT),
        opt!("noatime", 14, OptFlags::INVERT),
        opt!("diratime", 15, OptFlags::INVERT),
        opt!("nodiratime", 16, OptFlags::INVERT),
        opt!("relatime", 17, OptFlags::INVERT),
        opt!("norelatime", 18, OptFlags::INVERT),
        opt!("strictatime", 19, OptFlags::INVERT),
        opt!("lazytime", 20, OptFlags::INVERT),
        opt!("nolazytime", 21, OptFlags::INVERT),
        opt!("mand", 22, OptFlags::INVERT),
        opt!("nomand", 23, OptFlags::INVERT),
        opt!("remount", 24, OptFlags::NO_MTAB),
        opt!("bind", 25, OptFlags::NO_MTAB),
        opt!("rbind", 26, OptFlags::NO_MTAB),
        opt!("move", 27, OptFlags::NO_MTAB),
        opt!("silent", 28),
        opt!("loud", 29),
        // "noauto" and comment-only markers are recognized but classified as noise.
        opt!("comment", 0, OptFlags::PREFIX),
    ]
});

/// Options meaningful only to userspace mount helpers, never passed to the kernel.
pub static USERSPACE_MAP: Lazy<Vec<OptMapEntry>> = Lazy::new(|| {
    vec![
        opt!("user", 100, OptFlags::PREFIX),
        opt!("nouser", 101),
        opt!("users", 102),
        opt!("owner", 103),
        opt!("group", 104),
        opt!("auto", 105, OptFlags::INVERT),
        opt!("noauto", 106, OptFlags::INVERT),
        opt!("_netdev", 107),
        opt!("loop", 108, OptFlags::PREFIX),
        opt!("offset", 109, OptFlags::PREFIX),
        opt!("encryption", 110, OptFlags::PREFIX),
        opt!("x-", 111, OptFlags::PREFIX),
        opt!("comment", 0, OptFlags::PREFIX),
    ]
});

/// Looks up `name` in `map`, returning the first matching entry.
///
/// Matching a prefix-style entry such as `x-` only requires `name` to start with that prefix;
/// every other entry requires an exact match.
pub fn lookup<'a>(map: &'a [OptMapEntry], name: &str) -> Option<&'a OptMapEntry> {
    map.iter().find(|entry| {
        if entry.flags.contains(OptFlags::PREFIX) && entry.name.ends_with('-') {
            name.starts_with(entry.name)
        } else {
            entry.name == name
        }
    })
}

/// Classification bucket produced by [`classify`](crate::core::optstring::split_options).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OptionClass {
    Vfs,
    Userspace,
    FileSystem,
}

/// Classifies `name` against the built-in maps, in VFS-then-userspace order.
///
/// Returns `None` when `name` resolves to the comment/undefined sentinel (`id == 0`) and must be
/// dropped silently rather than bucketed.
pub fn classify(name: &str) -> Option<OptionClass> {
    if let Some(entry) = lookup(&VFS_MAP, name) {
        return if entry.id == 0 {
            None
        } else {
            Some(OptionClass::Vfs)
        };
    }
    if let Some(entry) = lookup(&USERSPACE_MAP, name) {
        return if entry.id == 0 {
            None
        } else {
            Some(OptionClass::Userspace)
        };
    }
    Some(OptionClass::FileSystem)
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn classify_recognizes_vfs_options() {
        assert_eq!(classify("noexec"), Some(OptionClass::Vfs));
        assert_eq!(classify("rw"), Some(OptionClass::Vfs));
    }

    #[test]
    fn classify_recognizes_userspace_options() {
        assert_eq!(classify("users"), Some(OptionClass::Userspace));
        assert_eq!(classify("_netdev"), Some(OptionClass::Userspace));
    }

    #[test]
    fn classify_falls_back_to_filesystem_specific() {
        assert_eq!(classify("data=ordered"), Some(OptionClass::FileSystem));
    }

    #[test]
    fn classify_drops_the_comment_sentinel() {
        assert_eq!(classify("comment"), None);
    }

    #[test]
    fn lookup_matches_a_prefix_entry() {
        let entry = lookup(&USERSPACE_MAP, "x-systemd.automount").unwrap();
        assert_eq!(entry.name, "x-");
    }
}
