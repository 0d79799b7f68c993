// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Low-level functions to manipulate mount option strings.
//!
//! An option string is a comma-separated list of `NAME` or `NAME=VALUE` items. A value may
//! contain commas if it is wrapped in double quotes; quote state toggles on every `"` met while
//! scanning, so values are never escaped, only quoted.

// From dependency library

// From standard library

// From this library
use crate::core::errors::OptionStringError;
use crate::core::optmap;
pub use mount_option_struct::MountOption;
pub use option_iter_struct::OptionIter;

mod mount_option_struct;
mod option_iter_struct;

/// Splits `options_list` into its first item and the remainder following the separating comma.
///
/// Returns `Ok(None)` at end of string. Fails with [`OptionStringError::Malformed`] if the first
/// item is empty (two consecutive commas, or a leading/trailing comma) or if a comma appears
/// inside an unterminated quoted value.
pub(crate) fn parse_next(options_list: &str) -> Result<Option<(&str, &str)>, OptionStringError> {
    if options_list.is_empty() {
        return Ok(None);
    }

    let mut in_quotes = false;
    let mut split_at = None;

    for (i, ch) in options_list.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                split_at = Some(i);
                break;
            }
            _ => {}
        }
    }

    if in_quotes {
        let err_msg = format!("unterminated quote in option list {:?}", options_list);
        return Err(OptionStringError::Malformed(err_msg));
    }

    let (item, rest) = match split_at {
        Some(i) => (&options_list[..i], &options_list[i + 1..]),
        None => (options_list, ""),
    };

    if item.is_empty() {
        let err_msg = format!("empty item in option list {:?}", options_list);
        return Err(OptionStringError::Malformed(err_msg));
    }

    Ok(Some((item, rest)))
}

/// Returns an iterator over the items of `options_list`.
///
/// # Examples
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use mnttab::core::optstring;
///
/// fn main() -> mnttab::Result<()> {
///     let options_list = "noatime,ro=recursive";
///     let mut iterator = optstring::iter_options(options_list)?;
///
///     assert_eq!(iterator.next().unwrap().name(), "noatime");
///     assert_eq!(iterator.next().unwrap().value(), Some("recursive"));
///     assert_eq!(iterator.next(), None);
///
///     Ok(())
/// }
/// ```
pub fn iter_options(options_list: &str) -> Result<OptionIter<'_>, OptionStringError> {
    log::debug!(
        "core::optstring::iter_options creating iterator over {:?}",
        options_list
    );

    OptionIter::new(options_list)
}

/// Returns the byte range of the first item named `option_name` in `options_list`, or `None`.
fn locate_option(options_list: &str, option_name: &str) -> Option<std::ops::Range<usize>> {
    let mut cursor = options_list;
    let mut offset = 0;

    while let Ok(Some((item, rest))) = parse_next(cursor) {
        let name = item.split_once('=').map_or(item, |(n, _)| n);
        if name == option_name {
            return Some(offset..offset + item.len());
        }
        offset += item.len() + 1;
        cursor = rest;
    }

    None
}

/// Returns the value of `option_name` in `options_list`.
///
/// Returns `Some(None)` when the option is present without a value, and `None` when the option
/// is absent altogether.
///
/// # Examples
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use mnttab::core::optstring;
///
/// let options_list = "noatime,ro=recursive";
/// assert_eq!(optstring::option_value(options_list, "ro"), Some(Some("recursive")));
/// assert_eq!(optstring::option_value(options_list, "noatime"), Some(None));
/// assert_eq!(optstring::option_value(options_list, "missing"), None);
/// ```
pub fn option_value<'a>(options_list: &'a str, option_name: &str) -> Option<Option<&'a str>> {
    log::debug!(
        "core::optstring::option_value looking up option {:?} in {:?}",
        option_name,
        options_list
    );

    let range = locate_option(options_list, option_name)?;
    let item = &options_list[range];
    Some(item.split_once('=').map(|(_, v)| v))
}

/// Returns `true` if `options_list` contains an item named `option_name`, with any value.
pub fn matches_any_option(options_list: &str, option_name: &str) -> bool {
    locate_option(options_list, option_name).is_some()
}

/// Appends `option_name` (optionally `=option_value`) to the back of `options_list`.
///
/// The result never starts or ends with a comma and never contains two consecutive commas.
///
/// # Examples
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use mnttab::core::optstring;
///
/// assert_eq!(optstring::append_option("", "ro", None), "ro");
/// assert_eq!(optstring::append_option("noatime", "ro", Some("recursive")), "noatime,ro=recursive");
/// ```
pub fn append_option(options_list: &str, option_name: &str, option_value: Option<&str>) -> String {
    log::debug!(
        "core::optstring::append_option appending {:?}={:?} to {:?}",
        option_name,
        option_value,
        options_list
    );

    let item = render_item(option_name, option_value);
    if options_list.is_empty() {
        item
    } else {
        format!("{options_list},{item}")
    }
}

/// Prepends `option_name` (optionally `=option_value`) to the front of `options_list`.
///
/// # Examples
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use mnttab::core::optstring;
///
/// assert_eq!(optstring::prepend_option("user=", "ro", Some("recursive")), "ro=recursive,user=");
/// ```
pub fn prepend_option(options_list: &str, option_name: &str, option_value: Option<&str>) -> String {
    log::debug!(
        "core::optstring::prepend_option prepending {:?}={:?} to {:?}",
        option_name,
        option_value,
        options_list
    );

    let item = render_item(option_name, option_value);
    if options_list.is_empty() {
        item
    } else {
        format!("{item},{options_list}")
    }
}

fn render_item(option_name: &str, option_value: Option<&str>) -> String {
    match option_value {
        Some(value) => format!("{option_name}={value}"),
        None => option_name.to_owned(),
    }
}

/// Removes the first item named `option_name` from `options_list`, collapsing the now-adjacent
/// commas.
///
/// Returns the unchanged string if `option_name` is not present.
///
/// # Examples
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use mnttab::core::optstring;
///
/// assert_eq!(optstring::remove_option("ro,noexec,rw", "noexec"), "ro,rw");
/// assert_eq!(optstring::remove_option("ro", "ro"), "");
/// ```
pub fn remove_option(options_list: &str, option_name: &str) -> String {
    log::debug!(
        "core::optstring::remove_option removing {:?} from {:?}",
        option_name,
        options_list
    );

    match locate_option(options_list, option_name) {
        None => options_list.to_owned(),
        Some(range) => {
            let before = &options_list[..range.start];
            let after_start = (range.end + 1).min(options_list.len());
            let after = if range.end < options_list.len() {
                &options_list[after_start..]
            } else {
                ""
            };

            match (before.is_empty(), after.is_empty()) {
                (true, _) => after.to_owned(),
                (false, true) => before.trim_end_matches(',').to_owned(),
                (false, false) => format!("{}{}", before.trim_end_matches(','), after),
            }
        }
    }
}

/// Sets or replaces the value of `option_name` in `options_list`.
///
/// If `option_name` is already present, its item is replaced in place (keeping its position);
/// otherwise the item is appended. A `None` value adds a bare `NAME`.
///
/// # Examples
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use mnttab::core::optstring;
///
/// assert_eq!(optstring::set_option_value("ro,noexec", "ro", Some("recursive")), "ro=recursive,noexec");
/// assert_eq!(optstring::set_option_value("noexec", "ro", None), "noexec,ro");
/// ```
pub fn set_option_value(options_list: &str, option_name: &str, option_value: Option<&str>) -> String {
    log::debug!(
        "core::optstring::set_option_value setting {:?}={:?} in {:?}",
        option_name,
        option_value,
        options_list
    );

    match locate_option(options_list, option_name) {
        None => append_option(options_list, option_name, option_value),
        Some(range) => {
            let item = render_item(option_name, option_value);
            format!(
                "{}{}{}",
                &options_list[..range.start],
                item,
                &options_list[range.end..]
            )
        }
    }
}

/// Three independent option-string buckets produced by [`split_options`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SplitOptions {
    pub vfs: String,
    pub userspace: String,
    pub file_system: String,
}

/// Walks `options_list` once, appending each item to the bucket its name classifies into.
///
/// Items that classify to the comment/undefined sentinel are dropped silently, as are items
/// whose [`optmap::OptFlags`] intersect the ignore mask of the bucket they would otherwise land
/// in: `ignore_vfs` for VFS options, `ignore_userspace` for userspace-only options. Passing
/// [`optmap::OptFlags::NO_MTAB`] as `ignore_vfs` drops options such as `bind`/`remount`/`move`
/// that are meaningful to the kernel but must never be copied into a persisted mount table. On a
/// malformed item the whole operation fails and no partial buckets are returned.
///
/// # Examples
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use mnttab::core::optmap::OptFlags;
/// use mnttab::core::optstring;
///
/// fn main() -> mnttab::Result<()> {
///     let split = optstring::split_options(
///         "rw,noexec,data=ordered,users",
///         OptFlags::empty(),
///         OptFlags::empty(),
///     )?;
///     assert_eq!(split.vfs, "rw,noexec");
///     assert_eq!(split.file_system, "data=ordered");
///     assert_eq!(split.userspace, "users");
///     Ok(())
/// }
/// ```
pub fn split_options(
    options_list: &str,
    ignore_vfs: optmap::OptFlags,
    ignore_userspace: optmap::OptFlags,
) -> Result<SplitOptions, OptionStringError> {
    log::debug!(
        "core::optstring::split_options classifying options in {:?}",
        options_list
    );

    let mut split = SplitOptions::default();
    let mut cursor = options_list;

    while let Some((item, rest)) = parse_next(cursor)? {
        let name = item.split_once('=').map_or(item, |(n, _)| n);

        if let Some(entry) = optmap::lookup(&optmap::VFS_MAP, name) {
            if entry.id != 0 && !entry.flags.intersects(ignore_vfs) {
                split.vfs = append_raw(&split.vfs, item);
            }
        } else if let Some(entry) = optmap::lookup(&optmap::USERSPACE_MAP, name) {
            if entry.id != 0 && !entry.flags.intersects(ignore_userspace) {
                split.userspace = append_raw(&split.userspace, item);
            }
        } else {
            split.file_system = append_raw(&split.file_system, item);
        }

        cursor = rest;
    }

    Ok(split)
}

fn append_raw(options_list: &str, item: &str) -> String {
    if options_list.is_empty() {
        item.to_owned()
    } else {
        format!("{options_list},{item}")
    }
}

/// Merges a VFS option string and a filesystem-specific option string into one, prefixed with a
/// single `rw,` or `ro,` token.
///
/// The merged string is read-only unless *both* inputs contain `rw`; any `rw`/`ro` tokens already
/// present in either input are stripped before concatenation.
///
/// # Examples
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use mnttab::core::optstring;
///
/// assert_eq!(optstring::merge_options(Some("rw,noexec"), Some("ro,journal=update")), "ro,noexec,journal=update");
/// assert_eq!(optstring::merge_options(Some("rw,noexec"), Some("rw,journal=update")), "rw,noexec,journal=update");
/// ```
pub fn merge_options(vfs: Option<&str>, fs: Option<&str>) -> String {
    log::debug!("core::optstring::merge_options merging {:?} and {:?}", vfs, fs);

    let (vfs, fs) = match (vfs, fs) {
        (None, None) => return String::new(),
        (Some(vfs), None) => return vfs.to_owned(),
        (None, Some(fs)) => return fs.to_owned(),
        (Some(vfs), Some(fs)) if vfs == fs => return vfs.to_owned(),
        (Some(vfs), Some(fs)) => (vfs, fs),
    };

    let mut combined = format!("{vfs},{fs}");

    // Remove up to one "rw" from each side; two removals means both were writable.
    let mut rw_count = 0;
    if matches_any_option(&combined, "rw") {
        combined = remove_option(&combined, "rw");
        rw_count += 1;
    }
    if matches_any_option(&combined, "rw") {
        combined = remove_option(&combined, "rw");
        rw_count += 1;
    }

    let mut ro_count = 0;
    if rw_count != 2 {
        if matches_any_option(&combined, "ro") {
            combined = remove_option(&combined, "ro");
            ro_count += 1;
        }
        if ro_count + rw_count < 2 && matches_any_option(&combined, "ro") {
            combined = remove_option(&combined, "ro");
            ro_count += 1;
        }
    }

    let prefix = if ro_count > 0 { "ro" } else { "rw" };
    if combined.is_empty() {
        prefix.to_owned()
    } else {
        format!("{prefix},{combined}")
    }
}

/// Splits a `TAG=value` source string into its tag name and value, e.g. `"UUID=abcd"` into
/// `("UUID", "abcd")`. Returns `None` for anything else, including a plain path or a remote
/// export spec such as `server:/export` (no `=` before the first `:` or `/`).
pub(crate) fn parse_tag(source: &str) -> Option<(&str, &str)> {
    let (name, value) = source.split_once('=')?;

    let is_tag_name = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_');

    if is_tag_name && !value.is_empty() {
        Some((name, value))
    } else {
        None
    }
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn parse_tag_splits_a_recognized_tag() {
        assert_eq!(parse_tag("UUID=1234-5678"), Some(("UUID", "1234-5678")));
    }

    #[test]
    fn parse_tag_rejects_a_plain_path() {
        assert_eq!(parse_tag("/dev/sda1"), None);
    }

    #[test]
    fn parse_tag_rejects_a_lowercase_name() {
        assert_eq!(parse_tag("server:/export=x"), None);
    }

    #[test]
    fn parse_next_splits_one_item_from_the_remainder() -> Result<(), OptionStringError> {
        let (item, rest) = parse_next("ro,noexec")?.unwrap();
        assert_eq!(item, "ro");
        assert_eq!(rest, "noexec");
        Ok(())
    }

    #[test]
    fn parse_next_honors_quoted_commas() -> Result<(), OptionStringError> {
        let list = r#"context="a,b",ro"#;
        let (item, rest) = parse_next(list)?.unwrap();
        assert_eq!(item, r#"context="a,b""#);
        assert_eq!(rest, "ro");
        Ok(())
    }

    #[test]
    fn parse_next_rejects_an_unterminated_quote() {
        let list = r#"context="a,b"#;
        assert!(parse_next(list).is_err());
    }

    #[test]
    fn parse_next_rejects_an_empty_item() {
        assert!(parse_next(",ro").is_err());
    }

    #[test]
    fn parse_next_returns_none_at_end_of_string() -> Result<(), OptionStringError> {
        assert_eq!(parse_next("")?, None);
        Ok(())
    }

    #[test]
    fn append_then_remove_round_trips_to_the_original() {
        let original = "noatime,ro";
        let appended = append_option(original, "user", Some("nick"));
        let restored = remove_option(&appended, "user");
        assert_eq!(restored, original);
    }

    #[test]
    fn split_options_buckets_items_by_classification() -> Result<(), OptionStringError> {
        let split = split_options(
            "rw,noexec,data=ordered,users",
            optmap::OptFlags::empty(),
            optmap::OptFlags::empty(),
        )?;
        assert_eq!(split.vfs, "rw,noexec");
        assert_eq!(split.file_system, "data=ordered");
        assert_eq!(split.userspace, "users");
        Ok(())
    }

    #[test]
    fn split_options_drops_no_mtab_options_when_ignored() -> Result<(), OptionStringError> {
        let split = split_options(
            "rw,bind,noexec",
            optmap::OptFlags::NO_MTAB,
            optmap::OptFlags::empty(),
        )?;
        assert_eq!(split.vfs, "rw,noexec");
        Ok(())
    }

    #[test]
    fn merge_options_prefers_read_only_unless_both_are_writable() {
        let actual = merge_options(Some("rw,noexec"), Some("ro,journal=update"));
        assert_eq!(actual, "ro,noexec,journal=update");

        let actual = merge_options(Some("rw,noexec"), Some("rw,journal=update"));
        assert_eq!(actual, "rw,noexec,journal=update");
    }

    #[test]
    fn merge_options_handles_one_sided_input() {
        assert_eq!(merge_options(Some("noexec"), None), "noexec");
        assert_eq!(merge_options(None, Some("noexec")), "noexec");
        assert_eq!(merge_options(None, None), "");
    }
}
