// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// From this library
use crate::core::cache::ResolverCache;
use crate::core::errors::CacheError;

/// Canonicalizes paths and resolves `LABEL`/`UUID`/`PARTLABEL`/`PARTUUID` tags to device paths,
/// memoizing both kinds of lookup.
///
/// `Cache` is the library's own [`ResolverCache`] implementation. Reads real filesystem state
/// (`std::fs::canonicalize`, and the `/dev/disk/by-*` udev symlink farms), so results reflect the
/// machine this process runs on; tests that need deterministic behavior should implement
/// [`ResolverCache`] directly instead.
#[derive(Debug, Default)]
pub struct Cache {
    paths: Mutex<HashMap<String, Option<String>>>,
    tags: Mutex<HashMap<(String, String), Option<String>>>,
}

impl Cache {
    /// Creates a new, empty `Cache`.
    pub fn new() -> Cache {
        log::debug!("Cache::new creating a new `Cache` instance");

        Self::default()
    }

    /// Canonicalizes `path`, consulting (and updating) the memoization table, and surfacing a
    /// genuine I/O failure (anything other than "not found") as [`CacheError::Canonicalize`]
    /// instead of folding it into `None`.
    pub fn canonicalize_and_cache<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Option<String>, CacheError> {
        let path = path.as_ref().to_string_lossy().into_owned();
        log::debug!("Cache::canonicalize_and_cache resolving {:?}", path);

        if let Some(cached) = self.paths.lock().unwrap().get(&path) {
            return Ok(cached.clone());
        }

        let resolved = Self::canonicalize_uncached(&path)?;
        self.paths.lock().unwrap().insert(path, resolved.clone());

        Ok(resolved)
    }

    fn canonicalize_uncached(path: &str) -> Result<Option<String>, CacheError> {
        match std::fs::canonicalize(path) {
            Ok(p) => Ok(Some(p.to_string_lossy().into_owned())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(CacheError::Canonicalize(err)),
        }
    }

    /// Resolves `tag_name=tag_value` to a device path via `/dev/disk/by-<tag_name>/<tag_value>`,
    /// consulting (and updating) the memoization table.
    pub fn find_and_cache_first_device_with_tag(
        &self,
        tag_name: &str,
        tag_value: &str,
    ) -> Result<Option<String>, CacheError> {
        log::debug!(
            "Cache::find_and_cache_first_device_with_tag resolving {}={:?}",
            tag_name,
            tag_value
        );

        let key = (tag_name.to_owned(), tag_value.to_owned());
        if let Some(cached) = self.tags.lock().unwrap().get(&key) {
            return Ok(cached.clone());
        }

        let resolved = Self::resolve_tag_uncached(tag_name, tag_value)?;
        self.tags.lock().unwrap().insert(key, resolved.clone());

        Ok(resolved)
    }

    fn resolve_tag_uncached(tag_name: &str, tag_value: &str) -> Result<Option<String>, CacheError> {
        let dir_name = match tag_name {
            "LABEL" => "by-label",
            "UUID" => "by-uuid",
            "PARTLABEL" => "by-partlabel",
            "PARTUUID" => "by-partuuid",
            _ => return Ok(None),
        };

        let link = PathBuf::from("/dev/disk").join(dir_name).join(tag_value);
        match std::fs::canonicalize(&link) {
            Ok(device) => Ok(Some(device.to_string_lossy().into_owned())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => Err(
                CacheError::TagResolution(format!(
                    "permission denied resolving {tag_name}={tag_value} via {}",
                    link.display()
                )),
            ),
            Err(err) => Err(CacheError::Canonicalize(err)),
        }
    }
}

impl ResolverCache for Cache {
    fn canonicalize(&self, path: &str) -> Option<String> {
        self.canonicalize_and_cache(path).ok().flatten()
    }

    fn resolve_tag(&self, tag_name: &str, tag_value: &str) -> Result<Option<String>, ()> {
        self.find_and_cache_first_device_with_tag(tag_name, tag_value)
            .map_err(|_| ())
    }
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn cache_canonicalizes_an_existing_path() -> Result<(), CacheError> {
        let cache = Cache::new();
        let actual = cache.canonicalize_and_cache("/")?;
        assert_eq!(actual, Some("/".to_owned()));
        Ok(())
    }

    #[test]
    fn cache_returns_none_for_a_path_that_does_not_exist() -> Result<(), CacheError> {
        let cache = Cache::new();
        let actual = cache.canonicalize_and_cache("/does/not/exist/at/all")?;
        assert_eq!(actual, None);
        Ok(())
    }

    #[test]
    fn cache_memoizes_path_resolution() -> Result<(), CacheError> {
        let cache = Cache::new();
        let first = cache.canonicalize_and_cache("/")?;
        let second = cache.canonicalize_and_cache("/")?;
        assert_eq!(first, second);
        assert_eq!(cache.paths.lock().unwrap().len(), 1);
        Ok(())
    }

    #[test]
    fn cache_resolves_an_unknown_tag_name_to_none() -> Result<(), CacheError> {
        let cache = Cache::new();
        let actual = cache.find_and_cache_first_device_with_tag("NOTATAG", "x")?;
        assert_eq!(actual, None);
        Ok(())
    }
}
