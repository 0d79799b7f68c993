// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path and tag resolution, used by [`MountTable`](crate::core::table::MountTable) lookups.

// From dependency library

// From standard library

// From this library
pub use cache_struct::Cache;
pub use resolver_cache_trait::ResolverCache;

mod cache_struct;
mod resolver_cache_trait;
