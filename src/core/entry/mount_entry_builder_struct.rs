// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library
use typed_builder::TypedBuilder;

// From standard library

// From this library
use crate::core::entry::MountEntry;
use crate::core::errors::{MountEntryError, OptionStringError};

/// Fluent constructor for [`MountEntry`], mirroring the fields of a classic `fstab` line plus the
/// handful of `mountinfo`-only fields ([`id`](Self::id), [`parent_id`](Self::parent_id), ...).
///
/// Every setter here is optional; omitted fields are left at [`MountEntry::new`]'s defaults.
/// `source`, `fs_type`, and `options` run through the same validation as the equivalent
/// [`MountEntry`] setter, so [`build`](MountEntryBuilder::build) can fail.
#[derive(Debug, TypedBuilder)]
#[builder(build_method(vis = "", name = __make))]
pub struct MountEntryBuilder {
    #[builder(default, setter(strip_option))]
    id: Option<i32>,

    #[builder(default, setter(strip_option))]
    parent_id: Option<i32>,

    #[builder(default, setter(strip_option))]
    source: Option<String>,

    #[builder(default, setter(strip_option))]
    bind_source: Option<String>,

    #[builder(default, setter(strip_option))]
    root: Option<String>,

    #[builder(default, setter(strip_option))]
    target: Option<String>,

    #[builder(default, setter(strip_option))]
    fs_type: Option<String>,

    #[builder(default, setter(strip_option))]
    options: Option<String>,

    #[builder(default, setter(strip_option))]
    attributes: Option<String>,

    #[builder(default)]
    dump_frequency: i32,

    #[builder(default)]
    fsck_checking_order: i32,
}

#[allow(non_camel_case_types)]
impl<
        __id: typed_builder::Optional<Option<i32>>,
        __parent_id: typed_builder::Optional<Option<i32>>,
        __source: typed_builder::Optional<Option<String>>,
        __bind_source: typed_builder::Optional<Option<String>>,
        __root: typed_builder::Optional<Option<String>>,
        __target: typed_builder::Optional<Option<String>>,
        __fs_type: typed_builder::Optional<Option<String>>,
        __options: typed_builder::Optional<Option<String>>,
        __attributes: typed_builder::Optional<Option<String>>,
        __dump_frequency: typed_builder::Optional<i32>,
        __fsck_checking_order: typed_builder::Optional<i32>,
    >
    MountEntryBuilderBuilder<(
        __id,
        __parent_id,
        __source,
        __bind_source,
        __root,
        __target,
        __fs_type,
        __options,
        __attributes,
        __dump_frequency,
        __fsck_checking_order,
    )>
{
    /// Builds the configured [`MountEntry`], applying `source`, `fs_type`, and `options` through
    /// their validating setters in that order.
    pub fn build(self) -> Result<MountEntry, MountEntryBuilderError> {
        let params = self.__make();
        let mut entry = MountEntry::new();

        if let Some(id) = params.id {
            entry.set_id(id);
        }
        if let Some(source) = params.source {
            entry.set_source(source);
        }
        if let Some(bind_source) = params.bind_source {
            entry.set_bind_source(bind_source);
        }
        if let Some(root) = params.root {
            entry.set_root(root);
        }
        if let Some(target) = params.target {
            entry.set_target(target);
        }
        if let Some(fs_type) = params.fs_type {
            entry.set_fs_type(fs_type);
        }
        if let Some(options) = params.options {
            entry.set_options(options)?;
        }
        if let Some(attributes) = params.attributes {
            entry.set_attributes(attributes);
        }
        entry.set_dump_frequency(params.dump_frequency);
        entry.set_fsck_checking_order(params.fsck_checking_order);

        // `parent_id` is validated against `id`, which must already be set on `entry`.
        if let Some(parent_id) = params.parent_id {
            entry.set_parent_id(parent_id)?;
        }

        Ok(entry)
    }
}

/// Fallible step of [`MountEntryBuilder::build`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MountEntryBuilderError {
    #[error(transparent)]
    Options(#[from] OptionStringError),
    #[error(transparent)]
    Entry(#[from] MountEntryError),
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn builder_constructs_a_fully_populated_entry() -> Result<(), MountEntryBuilderError> {
        let entry = MountEntryBuilder::builder()
            .source("/dev/sda1".to_string())
            .target("/home".to_string())
            .fs_type("ext4".to_string())
            .options("rw,noexec".to_string())
            .dump_frequency(0)
            .fsck_checking_order(2)
            .build()?;

        assert_eq!(entry.source(), Some("/dev/sda1"));
        assert_eq!(entry.target(), Some("/home"));
        assert_eq!(entry.fs_type(), Some("ext4"));
        assert_eq!(entry.fsck_checking_order(), 2);
        Ok(())
    }

    #[test]
    fn builder_rejects_a_self_parented_entry() {
        let result = MountEntryBuilder::builder().id(5).parent_id(5).build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_propagates_a_malformed_option_string() {
        let result = MountEntryBuilder::builder().options(",bad".to_string()).build();
        assert!(result.is_err());
    }
}
