// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library
use std::fmt;

// From this library
use crate::core::entry::mount_flags_struct::classify_fs_type;
use crate::core::entry::{MountEntryFlags, TagName};
use crate::core::errors::MountEntryError;
use crate::core::optstring;

/// One mount entry: a filesystem and where (and how) it is, or should be, mounted.
///
/// `MountEntry` is deliberately the same shape whether it came from a classic `fstab`-style line
/// (`source target fs_type options freq pass_no`) or a kernel `mountinfo` line (which adds `id`,
/// `parent_id`, `device_number`, `root`, an optional bind `source` path, and a three-way option
/// split). Fields the originating format does not carry are left at their default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountEntry {
    id: Option<i32>,
    parent_id: Option<i32>,
    device_number: Option<(u32, u32)>,
    bind_source: Option<String>,
    source: Option<String>,
    tag_name: Option<String>,
    tag_value: Option<String>,
    root: Option<String>,
    target: Option<String>,
    fs_type: Option<String>,
    vfs_options: Option<String>,
    fs_options: Option<String>,
    user_options: Option<String>,
    attributes: Option<String>,
    freq: i32,
    pass_no: i32,
    flags: MountEntryFlags,
    comment: Option<String>,
}

impl MountEntry {
    /// Creates an empty entry with every field at its default.
    pub fn new() -> MountEntry {
        log::debug!("MountEntry::new creating a new empty `MountEntry`");

        Self::default()
    }

    // -- id / parent_id / device_number ------------------------------------------------------

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }

    pub fn parent_id(&self) -> Option<i32> {
        self.parent_id
    }

    /// Sets this entry's parent id. Fails if `parent_id` equals this entry's own `id`: a mount
    /// entry cannot be its own parent.
    pub fn set_parent_id(&mut self, parent_id: i32) -> Result<(), MountEntryError> {
        if self.id == Some(parent_id) {
            return Err(MountEntryError::SelfParented(parent_id));
        }

        self.parent_id = Some(parent_id);

        Ok(())
    }

    pub fn device_number(&self) -> Option<(u32, u32)> {
        self.device_number
    }

    pub fn set_device_number(&mut self, major: u32, minor: u32) {
        self.device_number = Some((major, minor));
    }

    // -- source -------------------------------------------------------------------------------

    /// The raw `source` field, exactly as written (a device path, `TAG=value` pair, or remote
    /// export spec such as `server:/export`).
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Sets the `source` field, detecting and splitting out a `TAG=value` pair so
    /// [`source_tag`](Self::source_tag) and [`source_tag_value`](Self::source_tag_value) can read
    /// it back without re-parsing.
    pub fn set_source<T: AsRef<str>>(&mut self, source: T) {
        let source = source.as_ref();
        log::debug!("MountEntry::set_source setting source to {:?}", source);

        match optstring::parse_tag(source) {
            Some((name, value)) => {
                self.tag_name = Some(name.to_owned());
                self.tag_value = Some(value.to_owned());
                self.source = None;
            }
            None => {
                self.tag_name = None;
                self.tag_value = None;
                self.source = if source == "none" {
                    None
                } else {
                    Some(source.to_owned())
                };
            }
        }
    }

    /// The tag name half of a `TAG=value` source (e.g. `"UUID"`), or `None` if `source` is a
    /// plain path or this entry's source was never set.
    pub fn source_tag(&self) -> Option<&str> {
        self.tag_name.as_deref()
    }

    /// The well-known [`TagName`] this entry's source names, if any and if recognized.
    pub fn source_tag_name(&self) -> Option<TagName> {
        self.tag_name.as_deref().and_then(|n| n.parse().ok())
    }

    pub fn source_tag_value(&self) -> Option<&str> {
        self.tag_value.as_deref()
    }

    /// The real path to mount, when `source` is a bind-mount source resolved by the kernel (a
    /// `mountinfo` concept; classic `fstab` entries never populate this).
    pub fn bind_source(&self) -> Option<&str> {
        self.bind_source.as_deref()
    }

    pub fn set_bind_source<T: AsRef<str>>(&mut self, source: T) {
        self.bind_source = Some(source.as_ref().to_owned());
    }

    // -- root / target --------------------------------------------------------------------------

    /// The root of the bind mount within the filesystem (`mountinfo` only; `"/"` for a whole
    /// filesystem mount).
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn set_root<T: AsRef<str>>(&mut self, root: T) {
        self.root = Some(root.as_ref().to_owned());
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn set_target<T: AsRef<str>>(&mut self, target: T) {
        self.target = Some(target.as_ref().to_owned());
    }

    /// Compares `path` against this entry's target, ignoring a single trailing `/` on either
    /// side, except that pseudo filesystems ([`MountEntryFlags::PSEUDO`]) require an exact match:
    /// `/proc` and `/proc/` both match a `proc` entry's target `/proc`, but `/` never matches a
    /// target of `/run` just because of slash normalization creeping in from elsewhere.
    pub fn target_equals(&self, path: &str) -> bool {
        match self.target.as_deref() {
            Some(target) => {
                if self.flags.contains(MountEntryFlags::PSEUDO) {
                    target == path
                } else {
                    trim_trailing_slash(target) == trim_trailing_slash(path)
                }
            }
            None => false,
        }
    }

    /// Compares `path` against this entry's source, ignoring a single trailing `/` on either
    /// side, except that pseudo filesystems ([`MountEntryFlags::PSEUDO`]) require an exact match.
    pub fn source_equals(&self, path: &str) -> bool {
        match self.source.as_deref() {
            Some(source) => {
                if self.flags.contains(MountEntryFlags::PSEUDO) {
                    source == path
                } else {
                    trim_trailing_slash(source) == trim_trailing_slash(path)
                }
            }
            None => false,
        }
    }

    // -- fs_type ------------------------------------------------------------------------------

    pub fn fs_type(&self) -> Option<&str> {
        self.fs_type.as_deref()
    }

    pub fn set_fs_type<T: AsRef<str>>(&mut self, fs_type: T) {
        let fs_type = fs_type.as_ref();
        self.flags = classify_fs_type(fs_type);
        self.fs_type = if fs_type == "none" {
            None
        } else {
            Some(fs_type.to_owned())
        };
    }

    pub fn is_pseudo_fs(&self) -> bool {
        self.flags.contains(MountEntryFlags::PSEUDO)
    }

    pub fn is_net_fs(&self) -> bool {
        self.flags.contains(MountEntryFlags::NETWORK)
    }

    pub fn is_swap(&self) -> bool {
        self.flags.contains(MountEntryFlags::SWAP)
    }

    // -- options --------------------------------------------------------------------------------

    pub fn vfs_options(&self) -> Option<&str> {
        self.vfs_options.as_deref()
    }

    pub fn set_vfs_options<T: AsRef<str>>(&mut self, options: T) {
        self.vfs_options = Some(options.as_ref().to_owned());
    }

    pub fn fs_options(&self) -> Option<&str> {
        self.fs_options.as_deref()
    }

    pub fn set_fs_options<T: AsRef<str>>(&mut self, options: T) {
        self.fs_options = Some(options.as_ref().to_owned());
    }

    pub fn user_options(&self) -> Option<&str> {
        self.user_options.as_deref()
    }

    pub fn set_user_options<T: AsRef<str>>(&mut self, options: T) {
        self.user_options = Some(options.as_ref().to_owned());
    }

    /// Every option string this entry carries (`fs`, then `vfs`, then `user`), merged
    /// comma-separated into one list, the way a classic `fstab` line's single `options` field
    /// reads.
    pub fn options(&self) -> String {
        let parts = [
            self.fs_options.as_deref(),
            self.vfs_options.as_deref(),
            self.user_options.as_deref(),
        ];

        parts
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Splits `options` across the `fs`, `vfs`, and `user` buckets and stores each independently,
    /// the way a `mountinfo` line's three separate option fields are represented internally even
    /// though a classic `fstab` line only ever supplies one combined string.
    pub fn set_options<T: AsRef<str>>(
        &mut self,
        options: T,
    ) -> Result<(), crate::core::errors::OptionStringError> {
        let split = optstring::split_options(
            options.as_ref(),
            crate::core::optmap::OptFlags::empty(),
            crate::core::optmap::OptFlags::empty(),
        )?;
        self.fs_options = non_empty(split.file_system);
        self.vfs_options = non_empty(split.vfs);
        self.user_options = non_empty(split.userspace);

        Ok(())
    }

    /// Looks up `name` across the `fs`, `vfs`, and `user` option buckets in that order, returning
    /// the first match: `Some(Some(value))` for a `name=value` item, `Some(None)` for a bare
    /// `name` item, `None` if no bucket has it.
    pub fn get_option(&self, name: &str) -> Option<Option<String>> {
        for options in [&self.fs_options, &self.vfs_options, &self.user_options] {
            if let Some(options) = options {
                if let Some(value) = optstring::option_value(options, name) {
                    return Some(value.map(str::to_owned));
                }
            }
        }

        None
    }

    // -- attributes -----------------------------------------------------------------------------

    pub fn attributes(&self) -> Option<&str> {
        self.attributes.as_deref()
    }

    pub fn set_attributes<T: AsRef<str>>(&mut self, attributes: T) {
        self.attributes = Some(attributes.as_ref().to_owned());
    }

    pub fn get_attribute(&self, name: &str) -> Option<Option<String>> {
        self.attributes
            .as_deref()
            .and_then(|a| optstring::option_value(a, name))
            .map(|v| v.map(str::to_owned))
    }

    // -- freq / pass_no -------------------------------------------------------------------------

    pub fn dump_frequency(&self) -> i32 {
        self.freq
    }

    pub fn set_dump_frequency(&mut self, freq: i32) {
        self.freq = freq;
    }

    pub fn fsck_checking_order(&self) -> i32 {
        self.pass_no
    }

    pub fn set_fsck_checking_order(&mut self, pass_no: i32) {
        self.pass_no = pass_no;
    }

    // -- comment --------------------------------------------------------------------------------

    /// A leading `#`-comment line this entry was parsed from, preserved so a table can be
    /// rewritten without losing it. `None` for entries built programmatically.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment<T: AsRef<str>>(&mut self, comment: T) {
        self.comment = Some(comment.as_ref().to_owned());
    }
}

fn trim_trailing_slash(s: &str) -> &str {
    if s.len() > 1 {
        s.trim_end_matches('/')
    } else {
        s
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl fmt::Display for MountEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.source.as_deref().unwrap_or("none"),
            self.target.as_deref().unwrap_or("none"),
            self.fs_type.as_deref().unwrap_or("none"),
            {
                let options = self.options();
                if options.is_empty() {
                    "defaults".to_owned()
                } else {
                    options
                }
            },
            self.freq,
            self.pass_no,
        )
    }
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn set_source_splits_out_a_tag() {
        let mut entry = MountEntry::new();
        entry.set_source("UUID=1234-5678");
        assert_eq!(entry.source_tag(), Some("UUID"));
        assert_eq!(entry.source_tag_value(), Some("1234-5678"));
        assert_eq!(entry.source_tag_name(), Some(TagName::Uuid));
    }

    #[test]
    fn set_source_with_a_plain_path_clears_any_previous_tag() {
        let mut entry = MountEntry::new();
        entry.set_source("LABEL=root");
        entry.set_source("/dev/sda1");
        assert_eq!(entry.source_tag(), None);
    }

    #[test]
    fn set_source_with_the_literal_none_parses_to_a_null_source() {
        let mut entry = MountEntry::new();
        entry.set_source("/dev/sda1");
        entry.set_source("none");
        assert_eq!(entry.source(), None);
        assert_eq!(entry.source_tag(), None);
    }

    #[test]
    fn set_source_with_a_tag_clears_the_raw_source_field() {
        let mut entry = MountEntry::new();
        entry.set_source("UUID=1234-5678");
        assert_eq!(entry.source(), None);
    }

    #[test]
    fn set_fs_type_with_the_literal_none_parses_to_a_null_fs_type() {
        let mut entry = MountEntry::new();
        entry.set_fs_type("ext4");
        entry.set_fs_type("none");
        assert_eq!(entry.fs_type(), None);
    }

    #[test]
    fn source_equals_is_exact_for_pseudo_filesystems() {
        let mut entry = MountEntry::new();
        entry.set_fs_type("proc");
        entry.set_source("proc");
        assert!(entry.source_equals("proc"));
        assert!(!entry.source_equals("proc/"));
    }

    #[test]
    fn set_parent_id_rejects_self_parenting() {
        let mut entry = MountEntry::new();
        entry.set_id(20);
        assert!(entry.set_parent_id(20).is_err());
        assert!(entry.set_parent_id(15).is_ok());
    }

    #[test]
    fn target_equals_ignores_one_trailing_slash() {
        let mut entry = MountEntry::new();
        entry.set_target("/home");
        assert!(entry.target_equals("/home/"));
        assert!(entry.target_equals("/home"));
        assert!(!entry.target_equals("/home2"));
    }

    #[test]
    fn target_equals_is_exact_for_pseudo_filesystems() {
        let mut entry = MountEntry::new();
        entry.set_fs_type("proc");
        entry.set_target("/proc");
        assert!(entry.target_equals("/proc"));
        assert!(!entry.target_equals("/proc/"));
    }

    #[test]
    fn set_options_buckets_by_classification() -> Result<(), crate::core::errors::OptionStringError> {
        let mut entry = MountEntry::new();
        entry.set_options("rw,noexec,user,x-custom=1")?;
        assert_eq!(entry.vfs_options(), Some("rw,noexec"));
        assert_eq!(entry.user_options(), Some("user"));
        assert_eq!(entry.fs_options(), Some("x-custom=1"));
        Ok(())
    }

    #[test]
    fn get_option_searches_fs_then_vfs_then_user() -> Result<(), crate::core::errors::OptionStringError> {
        let mut entry = MountEntry::new();
        entry.set_options("rw,noauto")?;
        assert_eq!(entry.get_option("rw"), Some(None));
        assert_eq!(entry.get_option("noauto"), Some(None));
        assert_eq!(entry.get_option("missing"), None);
        Ok(())
    }

    #[test]
    fn is_swap_is_derived_from_fs_type() {
        let mut entry = MountEntry::new();
        entry.set_fs_type("swap");
        assert!(entry.is_swap());
    }
}
