// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library
use bitflags::bitflags;

// From standard library

// From this library

bitflags! {
    /// Classification bits attached to a [`MountEntry`](super::MountEntry), derived from its
    /// filesystem type rather than stored verbatim in a mount table line.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
    pub struct MountEntryFlags: u32 {
        /// A pseudo filesystem (`proc`, `sysfs`, `tmpfs`, `cgroup2`, ...): it has no real device
        /// backing it, so [`MountEntry::target_equals`](super::MountEntry::target_equals) requires
        /// an exact string match instead of trailing-slash-insensitive comparison.
        const PSEUDO = 1 << 0;
        /// A network filesystem (`nfs`, `nfs4`, `cifs`, `smbfs`, ...).
        const NETWORK = 1 << 1;
        /// A swap entry, recognized from an `fs_type` of `swap` in a classic-format line.
        const SWAP = 1 << 2;
    }
}

const PSEUDO_FS_TYPES: &[&str] = &[
    "proc",
    "sysfs",
    "devpts",
    "devtmpfs",
    "tmpfs",
    "cgroup",
    "cgroup2",
    "pstore",
    "securityfs",
    "debugfs",
    "configfs",
    "fusectl",
    "mqueue",
    "hugetlbfs",
    "autofs",
    "binfmt_misc",
    "rpc_pipefs",
    "selinuxfs",
    "tracefs",
    "bpf",
];

const NETWORK_FS_TYPES: &[&str] = &["nfs", "nfs4", "nfsd", "cifs", "smbfs", "smb3", "afs"];

/// Derives the classification flags for a filesystem type, the way a parser stamps them onto a
/// freshly built [`MountEntry`](super::MountEntry).
pub(crate) fn classify_fs_type(fs_type: &str) -> MountEntryFlags {
    let mut flags = MountEntryFlags::empty();

    if PSEUDO_FS_TYPES.contains(&fs_type) {
        flags |= MountEntryFlags::PSEUDO;
    }
    if NETWORK_FS_TYPES.contains(&fs_type) {
        flags |= MountEntryFlags::NETWORK;
    }
    if fs_type == "swap" {
        flags |= MountEntryFlags::SWAP;
    }

    flags
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn classify_fs_type_recognizes_pseudo_filesystems() {
        assert_eq!(classify_fs_type("proc"), MountEntryFlags::PSEUDO);
        assert_eq!(classify_fs_type("tmpfs"), MountEntryFlags::PSEUDO);
    }

    #[test]
    fn classify_fs_type_recognizes_network_filesystems() {
        assert_eq!(classify_fs_type("nfs4"), MountEntryFlags::NETWORK);
    }

    #[test]
    fn classify_fs_type_recognizes_swap() {
        assert_eq!(classify_fs_type("swap"), MountEntryFlags::SWAP);
    }

    #[test]
    fn classify_fs_type_returns_empty_for_an_ordinary_filesystem() {
        assert_eq!(classify_fs_type("ext4"), MountEntryFlags::empty());
    }
}
