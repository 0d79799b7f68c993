// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library

// From this library

/// External collaborator that canonicalizes paths and resolves tags to device paths.
///
/// [`MountTable`](crate::core::table::MountTable) holds at most a borrowed `&dyn ResolverCache`:
/// the cache is never owned by the table, and every lookup that would consult it must work
/// correctly, by falling back to a raw comparison, when no cache is supplied. Implementations are
/// explicitly not required to be safe for concurrent use; a caller sharing one across threads
/// must synchronize access itself.
pub trait ResolverCache {
    /// Returns the canonical form of `path`, or `None` if it cannot be resolved (the path does
    /// not exist, a component is not readable, ...).
    fn canonicalize(&self, path: &str) -> Option<String>;

    /// Resolves a `(tag_name, tag_value)` pair (e.g. `("LABEL", "root")`) to a device path.
    ///
    /// Returns `None` if the tag is unknown. `permission_denied` implementations may instead
    /// return `Err(())` to signal a permission failure, letting
    /// [`MountTable`](crate::core::table::MountTable) fall back to a udev-style symlink lookup
    /// as the original library does.
    fn resolve_tag(&self, tag_name: &str, tag_value: &str) -> Result<Option<String>, ()>;
}
