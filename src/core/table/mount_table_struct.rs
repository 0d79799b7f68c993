// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

// From this library
use crate::core::cache::ResolverCache;
use crate::core::entry::MountEntry;
use crate::core::errors::{MountTableError, ParserError};
use crate::core::optstring;
use crate::core::table::{Direction, ParserFlow, TableFormat, TableIter};

const ENV_FSTAB_PATH: &str = "MNTTAB_FSTAB";
const ENV_MTAB_PATH: &str = "MNTTAB_MTAB";
const DEFAULT_FSTAB_PATH: &str = "/etc/fstab";
const DEFAULT_MTAB_PATH: &str = "/etc/mtab";
const SELF_MOUNTINFO_PATH: &str = "/proc/self/mountinfo";
const PROC_MOUNTS_PATH: &str = "/proc/mounts";

fn is_symlink_to_mountinfo(path: &Path) -> bool {
    std::fs::read_link(path)
        .map(|target| target.to_string_lossy().contains("mountinfo"))
        .unwrap_or(false)
}

/// An ordered collection of [`MountEntry`] values, parsed from a classic `fstab`-style file or a
/// kernel `mountinfo` file.
///
/// `MountTable` never owns a [`ResolverCache`]: lookups that would benefit from one (canonicalized
/// paths, evaluated tags) take it by borrowed reference and fall back to a raw string comparison
/// when none is supplied.
pub struct MountTable<'a> {
    format: TableFormat,
    entries: Vec<MountEntry>,
    cache: Option<&'a dyn ResolverCache>,
    error_handler: Option<Box<dyn Fn(&str, usize) -> ParserFlow + 'a>>,
}

impl<'a> std::fmt::Debug for MountTable<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountTable")
            .field("format", &self.format)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<'a> Default for MountTable<'a> {
    fn default() -> Self {
        MountTable {
            format: TableFormat::Guess,
            entries: Vec::new(),
            cache: None,
            error_handler: None,
        }
    }
}

impl<'a> MountTable<'a> {
    /// Creates an empty table that will guess its format from the first line it parses.
    pub fn new() -> MountTable<'a> {
        log::debug!("MountTable::new creating a new empty `MountTable`");

        Self::default()
    }

    /// Creates a table and immediately parses `path` into it.
    pub fn new_from_file<P: AsRef<Path>>(path: P) -> Result<MountTable<'a>, MountTableError> {
        let mut table = Self::new();
        table.parse_file(path)?;
        Ok(table)
    }

    /// Creates a table from the classic fstab file, `/etc/fstab` by default, overridable with the
    /// `MNTTAB_FSTAB` environment variable.
    pub fn new_from_fstab() -> Result<MountTable<'a>, MountTableError> {
        let path = std::env::var(ENV_FSTAB_PATH).unwrap_or_else(|_| DEFAULT_FSTAB_PATH.to_owned());
        log::debug!("MountTable::new_from_fstab reading {:?}", path);
        Self::new_from_file(path)
    }

    /// Creates a table describing currently mounted filesystems, overridable with the
    /// `MNTTAB_MTAB` environment variable.
    ///
    /// With no override, tries `/etc/mtab` first (unless it is a symlink to
    /// `/proc/self/mountinfo`), then `/proc/self/mountinfo`, then `/proc/mounts`.
    pub fn new_from_mtab() -> Result<MountTable<'a>, MountTableError> {
        if let Ok(path) = std::env::var(ENV_MTAB_PATH) {
            log::debug!("MountTable::new_from_mtab reading overridden path {:?}", path);
            return Self::new_from_file(path);
        }

        let mtab = Path::new(DEFAULT_MTAB_PATH);
        if !is_symlink_to_mountinfo(mtab) {
            if let Ok(table) = Self::new_from_file(mtab) {
                log::debug!("MountTable::new_from_mtab reading {:?}", mtab);
                return Ok(table);
            }
        }

        let self_mountinfo = Path::new(SELF_MOUNTINFO_PATH);
        if self_mountinfo.exists() {
            log::debug!("MountTable::new_from_mtab reading {:?}", self_mountinfo);
            return Self::new_from_file(self_mountinfo);
        }

        log::debug!("MountTable::new_from_mtab reading {:?}", PROC_MOUNTS_PATH);
        Self::new_from_file(PROC_MOUNTS_PATH)
    }

    pub fn format(&self) -> TableFormat {
        self.format
    }

    /// Fixes the format this table's parser will assume, instead of guessing from the first
    /// line. Has no effect on entries already parsed.
    pub fn set_format(&mut self, format: TableFormat) {
        self.format = format;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attaches a cache used by lookups to canonicalize paths and resolve tags.
    pub fn set_cache(&mut self, cache: &'a dyn ResolverCache) {
        self.cache = Some(cache);
    }

    pub fn cache(&self) -> Option<&'a dyn ResolverCache> {
        self.cache
    }

    /// Installs a callback invoked on every line the parser cannot make sense of.
    ///
    /// The callback receives the source name (a filename or `"<stream>"`) and the 1-based line
    /// number, and returns a [`ParserFlow`] deciding what happens next: [`Abort`](ParserFlow::Abort)
    /// stops parsing and surfaces an error, [`Ignore`](ParserFlow::Ignore) skips the line and
    /// continues, [`Continue`](ParserFlow::Continue) is treated the same as `Ignore`. With no
    /// handler installed, every malformed line is silently ignored.
    pub fn set_parser_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&str, usize) -> ParserFlow + 'a,
    {
        log::debug!("MountTable::set_parser_error_handler installing parser error handler");
        self.error_handler = Some(Box::new(handler));
    }

    pub fn push(&mut self, entry: MountEntry) {
        self.entries.push(entry);
    }

    pub fn remove(&mut self, index: usize) -> MountEntry {
        self.entries.remove(index)
    }

    pub fn iter(&self, direction: Direction) -> TableIter<'_> {
        TableIter::new(&self.entries, direction)
    }

    pub fn entries(&self) -> &[MountEntry] {
        &self.entries
    }

    // -- parsing --------------------------------------------------------------------------------

    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), MountTableError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        self.parse_stream(file, &path.to_string_lossy())
    }

    /// Parses every line of `stream`, appending entries in order. `source_name` is only used in
    /// parser error handler callbacks and messages.
    pub fn parse_stream<R: Read>(
        &mut self,
        stream: R,
        source_name: &str,
    ) -> Result<(), MountTableError> {
        log::debug!("MountTable::parse_stream parsing {:?}", source_name);

        let reader = BufReader::new(stream);

        for (line_no, line) in reader.lines().enumerate() {
            let line_no = line_no + 1;
            let line = line?;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if self.format == TableFormat::Guess {
                self.format = TableFormat::guess_from_line(trimmed);
                log::debug!("MountTable::parse_stream detected format {:?}", self.format);
            }

            let result = match self.format {
                TableFormat::Classic => parse_classic_line(trimmed),
                TableFormat::KernelInfo => parse_kernel_info_line(trimmed),
                TableFormat::Guess => unreachable!("format resolved above"),
            };

            match result {
                Ok(entry) => self.entries.push(entry),
                Err(err) => match self.handle_parse_error(source_name, line_no, &err) {
                    ParserFlow::Abort => {
                        return Err(MountTableError::ParseAborted(
                            source_name.into(),
                            line_no as u32,
                        ))
                    }
                    ParserFlow::Continue | ParserFlow::Ignore => continue,
                },
            }
        }

        Ok(())
    }

    fn handle_parse_error(&self, source_name: &str, line_no: usize, err: &ParserError) -> ParserFlow {
        log::debug!(
            "MountTable::parse_stream {}:{}: {}",
            source_name,
            line_no,
            err
        );

        match &self.error_handler {
            Some(handler) => handler(source_name, line_no),
            None => ParserFlow::Ignore,
        }
    }

    // -- lookups ----------------------------------------------------------------------------------

    /// Finds the entry whose target matches `path`, trying (1) a raw string comparison, then, if
    /// a cache is attached, (2) `path` canonicalized against every raw target, then (3), for swap
    /// entries with a target other than `/`, `path` canonicalized against every canonicalized
    /// target.
    pub fn find_target(&self, path: &str, direction: Direction) -> Option<&MountEntry> {
        if let Some(entry) = self.iter(direction).find(|e| e.target_equals(path)) {
            return Some(entry);
        }

        let cache = self.cache?;
        let canonical_path = cache.canonicalize(path)?;

        if let Some(entry) = self
            .iter(direction)
            .find(|e| e.target() == Some(canonical_path.as_str()))
        {
            return Some(entry);
        }

        self.iter(direction).find(|e| {
            e.is_swap()
                && e.target() != Some("/")
                && e.target()
                    .and_then(|t| cache.canonicalize(t))
                    .map(|ct| ct == canonical_path)
                    .unwrap_or(false)
        })
    }

    /// Finds the entry whose source path matches `path`, trying (1) a raw comparison, then, if a
    /// cache is attached, (2) `path` canonicalized against every raw, non-tag stored source, (3)
    /// tag resolution of every tag-sourced entry against `path`, falling back to udev-symlink
    /// resolution on a permission error, and (4) canonicalized comparison against non-pseudo,
    /// non-network entries' resolved sources.
    pub fn find_source_path(&self, path: &str, direction: Direction) -> Option<&MountEntry> {
        if let Some(entry) = self.iter(direction).find(|e| e.source_equals(path)) {
            return Some(entry);
        }

        let cache = self.cache?;
        let canonical_path = cache.canonicalize(path)?;

        for entry in self.iter(direction) {
            if let Some(source) = entry.source() {
                if entry.source_tag().is_none() && source == canonical_path {
                    return Some(entry);
                }
            }
        }

        for entry in self.iter(direction) {
            let (tag_name, tag_value) = match (entry.source_tag(), entry.source_tag_value()) {
                (Some(n), Some(v)) => (n, v),
                _ => continue,
            };

            // A permission error here models the real library falling back to a udev-style
            // symlink lookup; `Cache::resolve_tag` already performs that lookup directly, so
            // there is no further fallback to attempt.
            if let Ok(Some(resolved)) = cache.resolve_tag(tag_name, tag_value) {
                if resolved == canonical_path {
                    return Some(entry);
                }
            }
        }

        for entry in self.iter(direction) {
            if entry.is_net_fs() || entry.is_pseudo_fs() {
                continue;
            }
            if let Some(resolved) = entry.source().and_then(|s| cache.canonicalize(s)) {
                if resolved == canonical_path {
                    return Some(entry);
                }
            }
        }

        None
    }

    /// Finds the entry whose source carries `tag_name=tag_value`, falling back to resolving the
    /// tag to a device path and delegating to [`find_source_path`](Self::find_source_path).
    pub fn find_tag(&self, tag_name: &str, tag_value: &str, direction: Direction) -> Option<&MountEntry> {
        if let Some(entry) = self.iter(direction).find(|e| {
            e.source_tag() == Some(tag_name) && e.source_tag_value() == Some(tag_value)
        }) {
            return Some(entry);
        }

        let cache = self.cache?;
        let resolved = cache.resolve_tag(tag_name, tag_value).ok().flatten()?;
        self.find_source_path(&resolved, direction)
    }

    /// Dispatches to [`find_tag`](Self::find_tag) if `source` looks like `TAG=value`, otherwise
    /// to [`find_source_path`](Self::find_source_path).
    pub fn find_source(&self, source: &str, direction: Direction) -> Option<&MountEntry> {
        match optstring::parse_tag(source) {
            Some((name, value)) => self.find_tag(name, value, direction),
            None => self.find_source_path(source, direction),
        }
    }

    /// Finds the entry matching both `source` and `target`, evaluating every entry fully rather
    /// than short-circuiting on the first match for either field alone.
    pub fn find_pair(&self, source: &str, target: &str, direction: Direction) -> Option<&MountEntry> {
        self.iter(direction).find(|entry| {
            self.match_target(entry, target) && self.match_source(entry, source)
        })
    }

    fn match_target(&self, entry: &MountEntry, target: &str) -> bool {
        if entry.target_equals(target) {
            return true;
        }
        let cache = match self.cache {
            Some(cache) => cache,
            None => return false,
        };
        let canonical_target = match cache.canonicalize(target) {
            Some(c) => c,
            None => return false,
        };
        entry
            .target()
            .and_then(|t| cache.canonicalize(t))
            .map(|ct| ct == canonical_target)
            .unwrap_or(false)
    }

    fn match_source(&self, entry: &MountEntry, source: &str) -> bool {
        if entry.source_equals(source) {
            return true;
        }
        if entry.is_net_fs() || entry.is_pseudo_fs() {
            return false;
        }
        let cache = match self.cache {
            Some(cache) => cache,
            None => return false,
        };
        let canonical_source = match cache.canonicalize(source) {
            Some(c) => c,
            None => return false,
        };
        if let Some(entry_source) = entry.source() {
            if entry.source_tag().is_none() {
                if let Some(resolved) = cache.canonicalize(entry_source) {
                    return resolved == canonical_source;
                }
            }
        }
        if let (Some(tag_name), Some(tag_value)) = (entry.source_tag(), entry.source_tag_value()) {
            if let Ok(Some(resolved)) = cache.resolve_tag(tag_name, tag_value) {
                return resolved == canonical_source;
            }
        }
        false
    }

    /// Returns the root filesystem of a `mountinfo` table: the entry with the smallest
    /// `parent_id`. Returns `None` for a table without `parent_id`-bearing entries.
    pub fn root_fs(&self) -> Option<&MountEntry> {
        self.entries
            .iter()
            .filter_map(|e| e.parent_id().map(|id| (id, e)))
            .min_by_key(|(id, _)| *id)
            .map(|(_, e)| e)
    }

    /// Returns the next child of `parent` in `mountinfo` mount order, i.e. the entry whose
    /// `parent_id` equals `parent`'s `id` with the smallest `id` greater than `after`.
    pub fn next_child_fs(&self, parent: &MountEntry, after: Option<i32>) -> Option<&MountEntry> {
        let parent_id = parent.id()?;

        self.entries
            .iter()
            .filter(|e| e.parent_id() == Some(parent_id))
            .filter(|e| after.map_or(true, |min_id| e.id().unwrap_or(i32::MIN) > min_id))
            .min_by_key(|e| e.id().unwrap_or(i32::MAX))
    }
}

/// Matches `fs_type` against a comma-separated list of filesystem names. A list beginning with
/// `no` negates the whole match (the entry must name none of the listed types); an individual
/// `noTYPE` item, outside of that leading negation, excludes just that one type.
///
/// Returns `false` for an empty or `None` pattern.
pub fn match_fs_type(fs_type: &str, pattern: Option<&str>) -> bool {
    let pattern = match pattern {
        Some(p) if !p.is_empty() => p,
        _ => return false,
    };

    let (negate, rest) = match pattern.strip_prefix("no") {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };

    let matched = rest.split(',').any(|item| item == fs_type);

    matched != negate
}

/// Matches an entry's effective option string against a comma-separated pattern of options (and
/// `noOPTION` negative options): every positive option in the pattern must be present, and every
/// `noOPTION` must be absent.
pub fn match_options(effective_options: &str, pattern: &str) -> bool {
    pattern.split(',').filter(|s| !s.is_empty()).all(|item| {
        match item.strip_prefix("no") {
            Some(name) if !name.is_empty() => !optstring::matches_any_option(effective_options, name),
            _ => optstring::matches_any_option(effective_options, item),
        }
    })
}

fn parse_classic_line(line: &str) -> Result<MountEntry, ParserError> {
    let mut fields = line.split_whitespace();

    let source = fields
        .next()
        .ok_or_else(|| ParserError::ClassicLine(format!("missing source field in {:?}", line)))?;
    let target = fields
        .next()
        .ok_or_else(|| ParserError::ClassicLine(format!("missing target field in {:?}", line)))?;
    let fs_type = fields
        .next()
        .ok_or_else(|| ParserError::ClassicLine(format!("missing fs_type field in {:?}", line)))?;
    let options = fields.next().unwrap_or("defaults");

    let mut entry = MountEntry::new();
    entry.set_source(crate::core::codec::unmangle(source));
    entry.set_target(crate::core::codec::unmangle(target));
    entry.set_fs_type(crate::core::codec::unmangle(fs_type));
    entry
        .set_options(crate::core::codec::unmangle(options))
        .map_err(|e| ParserError::ClassicLine(e.to_string()))?;

    // freq and pass_no default to 0 if absent; a present freq with no pass_no leaves pass_no at
    // 0 too, a five-field classic line is legal.
    if let Some(freq) = fields.next() {
        let freq: i32 = freq
            .parse()
            .map_err(|e| ParserError::InvalidInteger(freq.to_owned(), e))?;
        entry.set_dump_frequency(freq);
    }
    if let Some(pass_no) = fields.next() {
        let pass_no: i32 = pass_no
            .parse()
            .map_err(|e| ParserError::InvalidInteger(pass_no.to_owned(), e))?;
        entry.set_fsck_checking_order(pass_no);
    }

    Ok(entry)
}

fn parse_kernel_info_line(line: &str) -> Result<MountEntry, ParserError> {
    let mut fields = line.split_whitespace();

    let id: i32 = next_field(&mut fields, "id", line)?
        .parse()
        .map_err(|e| ParserError::InvalidInteger("id".to_owned(), e))?;
    let parent_id: i32 = next_field(&mut fields, "parent_id", line)?
        .parse()
        .map_err(|e| ParserError::InvalidInteger("parent_id".to_owned(), e))?;
    let dev = next_field(&mut fields, "maj:min", line)?;
    let (major, minor) = dev
        .split_once(':')
        .ok_or_else(|| ParserError::KernelInfoLine(format!("malformed maj:min {:?}", dev)))?;
    let major: u32 = major
        .parse()
        .map_err(|e| ParserError::InvalidInteger("major".to_owned(), e))?;
    let minor: u32 = minor
        .parse()
        .map_err(|e| ParserError::InvalidInteger("minor".to_owned(), e))?;

    let root = next_field(&mut fields, "root", line)?;
    let target = next_field(&mut fields, "target", line)?;
    let vfs_options = next_field(&mut fields, "vfs_options", line)?;

    // Skip zero or more optional fields up to the "-" separator.
    loop {
        match fields.next() {
            Some("-") => break,
            Some(_) => continue,
            None => return Err(ParserError::KernelInfoLine(format!("missing separator in {:?}", line))),
        }
    }

    let fs_type = next_field(&mut fields, "fs_type", line)?;
    let source = next_field(&mut fields, "source", line)?;
    let fs_options = next_field(&mut fields, "fs_options", line)?;

    let mut entry = MountEntry::new();
    entry.set_id(id);
    entry
        .set_parent_id(parent_id)
        .map_err(|e| ParserError::KernelInfoLine(e.to_string()))?;
    entry.set_device_number(major, minor);
    entry.set_root(crate::core::codec::unmangle(root));
    entry.set_target(crate::core::codec::unmangle(target));
    entry.set_vfs_options(crate::core::codec::unmangle(vfs_options));
    entry.set_fs_type(crate::core::codec::unmangle(fs_type));

    if source != "none" {
        entry.set_source(crate::core::codec::unmangle(source));
    }
    if fs_options != "none" {
        entry.set_fs_options(crate::core::codec::unmangle(fs_options));
    }

    Ok(entry)
}

fn next_field<'a, I: Iterator<Item = &'a str>>(
    fields: &mut I,
    name: &str,
    line: &str,
) -> Result<&'a str, ParserError> {
    fields
        .next()
        .ok_or_else(|| ParserError::KernelInfoLine(format!("missing {} field in {:?}", name, line)))
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use crate::core::cache::Cache;
    use pretty_assertions::{assert_eq, assert_ne};
    use std::io::Cursor;

    #[test]
    fn parse_stream_detects_classic_format() -> Result<(), MountTableError> {
        let mut table = MountTable::new();
        let data = "/dev/sda1 / ext4 rw,relatime 0 1\nUUID=abcd /home ext4 defaults 0 2\n";
        table.parse_stream(Cursor::new(data), "<test>")?;

        assert_eq!(table.format(), TableFormat::Classic);
        assert_eq!(table.len(), 2);
        Ok(())
    }

    #[test]
    fn parse_stream_detects_kernel_info_format() -> Result<(), MountTableError> {
        let mut table = MountTable::new();
        let data = "20 15 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw\n";
        table.parse_stream(Cursor::new(data), "<test>")?;

        assert_eq!(table.format(), TableFormat::KernelInfo);
        let entry = &table.entries()[0];
        assert_eq!(entry.id(), Some(20));
        assert_eq!(entry.parent_id(), Some(15));
        assert_eq!(entry.device_number(), Some((8, 1)));
        Ok(())
    }

    #[test]
    fn parse_stream_skips_comments_and_blank_lines() -> Result<(), MountTableError> {
        let mut table = MountTable::new();
        let data = "# a comment\n\n/dev/sda1 / ext4 rw 0 1\n";
        table.parse_stream(Cursor::new(data), "<test>")?;
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn parse_stream_preserves_a_pass_no_of_zero_on_a_five_field_line() -> Result<(), MountTableError> {
        let mut table = MountTable::new();
        table.parse_stream(Cursor::new("tmpfs /tmp tmpfs defaults 0\n"), "<test>")?;
        assert_eq!(table.entries()[0].fsck_checking_order(), 0);
        Ok(())
    }

    #[test]
    fn parser_error_handler_can_abort_on_a_bad_line() {
        let mut table = MountTable::new();
        table.set_parser_error_handler(|_src, _line| ParserFlow::Abort);
        let result = table.parse_stream(Cursor::new("not enough fields\n"), "<test>");
        assert!(result.is_err());
    }

    #[test]
    fn parser_error_handler_defaults_to_ignoring_bad_lines() -> Result<(), MountTableError> {
        let mut table = MountTable::new();
        table.parse_stream(Cursor::new("bad\n/dev/sda1 / ext4 rw 0 1\n"), "<test>")?;
        assert_eq!(table.len(), 1);
        Ok(())
    }

    #[test]
    fn find_target_matches_on_raw_target() -> Result<(), MountTableError> {
        let mut table = MountTable::new();
        table.parse_stream(Cursor::new("/dev/sda1 /home ext4 rw 0 1\n"), "<test>")?;
        assert!(table.find_target("/home", Direction::Forward).is_some());
        assert!(table.find_target("/nope", Direction::Forward).is_none());
        Ok(())
    }

    #[test]
    fn find_source_dispatches_on_tag_syntax() -> Result<(), MountTableError> {
        let mut table = MountTable::new();
        table.parse_stream(Cursor::new("UUID=abcd /home ext4 rw 0 1\n"), "<test>")?;
        let entry = table.find_source("UUID=abcd", Direction::Forward);
        assert!(entry.is_some());
        Ok(())
    }

    #[test]
    fn find_target_third_pass_matches_a_swap_entry_via_canonicalized_target() -> Result<(), MountTableError> {
        let cache = Cache::new();
        let mut tmp = std::env::temp_dir();
        tmp.push("mnttab-find-target-swap-test");
        std::fs::create_dir_all(&tmp).unwrap();
        let real = tmp.join("swapfile");
        std::fs::write(&real, b"").unwrap();
        let canonical_real = std::fs::canonicalize(&real).unwrap();
        let link = tmp.join("swapfile-alias");
        let _ = std::fs::remove_file(&link);
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let mut table = MountTable::new();
        table.parse_stream(
            Cursor::new(format!("/dev/sda1 {} swap sw 0 0\n", link.display())),
            "<test>",
        )?;
        table.set_cache(&cache);

        let entry = table.find_target(canonical_real.to_str().unwrap(), Direction::Forward);
        assert!(entry.is_some());
        assert!(entry.unwrap().is_swap());

        std::fs::remove_dir_all(&tmp).unwrap();
        Ok(())
    }

    #[test]
    fn find_target_third_pass_skips_non_swap_entries() -> Result<(), MountTableError> {
        let cache = Cache::new();
        let mut tmp = std::env::temp_dir();
        tmp.push("mnttab-find-target-nonswap-test");
        std::fs::create_dir_all(&tmp).unwrap();
        let real = tmp.join("target-dir");
        std::fs::create_dir_all(&real).unwrap();
        let canonical_real = std::fs::canonicalize(&real).unwrap();
        let link = tmp.join("target-alias");
        let _ = std::fs::remove_file(&link);
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let mut table = MountTable::new();
        table.parse_stream(
            Cursor::new(format!("/dev/sda1 {} ext4 rw 0 1\n", link.display())),
            "<test>",
        )?;
        table.set_cache(&cache);

        assert!(table
            .find_target(canonical_real.to_str().unwrap(), Direction::Forward)
            .is_none());

        std::fs::remove_dir_all(&tmp).unwrap();
        Ok(())
    }

    #[test]
    fn find_source_path_second_pass_compares_canonicalized_input_against_raw_source() -> Result<(), MountTableError> {
        let cache = Cache::new();
        let mut table = MountTable::new();
        table.parse_stream(Cursor::new("/ /mnt nfs4 rw 0 0\n"), "<test>")?;
        table.set_cache(&cache);

        let entry = table.find_source_path("/.", Direction::Forward);
        assert!(entry.is_some());
        assert!(entry.unwrap().is_net_fs());
        Ok(())
    }

    #[test]
    fn root_fs_returns_the_entry_with_the_smallest_parent_id() -> Result<(), MountTableError> {
        let mut table = MountTable::new();
        let data = "20 1 8:1 / / rw - ext4 /dev/sda1 rw\n\
                    21 20 8:2 / /home rw - ext4 /dev/sda2 rw\n";
        table.parse_stream(Cursor::new(data), "<test>")?;
        let root = table.root_fs().unwrap();
        assert_eq!(root.id(), Some(20));
        Ok(())
    }

    #[test]
    fn next_child_fs_walks_children_in_id_order() -> Result<(), MountTableError> {
        let mut table = MountTable::new();
        let data = "20 1 8:1 / / rw - ext4 /dev/sda1 rw\n\
                    21 20 8:2 / /home rw - ext4 /dev/sda2 rw\n\
                    22 20 8:3 / /var rw - ext4 /dev/sda3 rw\n";
        table.parse_stream(Cursor::new(data), "<test>")?;
        let root = table.root_fs().unwrap().clone();
        let first_child = table.next_child_fs(&root, None).unwrap();
        assert_eq!(first_child.id(), Some(21));
        let second_child = table.next_child_fs(&root, first_child.id()).unwrap();
        assert_eq!(second_child.id(), Some(22));
        Ok(())
    }

    #[test]
    fn match_fs_type_handles_plain_and_negated_lists() {
        assert!(match_fs_type("ext4", Some("ext4,xfs")));
        assert!(!match_fs_type("ext4", Some("noext4,xfs")));
        assert!(match_fs_type("ext4", Some("no,xfs")));
    }

    #[test]
    fn match_options_requires_positive_and_absent_negative_options() {
        assert!(match_options("rw,noexec", "rw,noauto"));
        assert!(!match_options("rw,exec", "noexec"));
    }
}
