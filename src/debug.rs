// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Activate debug message output.
//!
//! `mnttab` provides a facility to log debug messages through the
//! [log](https://crates.io/crates/log) lightweight logging *facade*.
//!
//! From the package's README, you need to provide a logger implementation compatible with the
//! *facade*:
//!
//! > In order to produce log output, executables have to use a logger implementation compatible with the facade.
//! > There are many available implementations to choose from, here are some options:
//! >
//! > * Simple minimal loggers:
//! >     * [`env_logger`](https://docs.rs/env_logger/*/env_logger/)
//! >     * [`simple_logger`](https://docs.rs/simple_logger/*/simple_logger/)
//! >     * [`simplelog`](https://docs.rs/simplelog/*/simplelog/)
//! >     * [`pretty_env_logger`](https://docs.rs/pretty_env_logger/*/pretty_env_logger/)
//! > * Complex configurable frameworks:
//! >     * [`log4rs`](https://docs.rs/log4rs/*/log4rs/)
//! >     * [`fern`](https://docs.rs/fern/*/fern/)
//! >
//! > Executables should choose a logger implementation and initialize it early in the
//! > runtime of the program. Logger implementations will typically include a
//! > function to do this. Any log messages generated before the logger is
//! > initialized will be ignored.
//!
//! This module exposes a second, finer-grained diagnostic switch on top of `log`, read from the
//! `MNTTAB_DEBUG` environment variable: a numeric bitmask, or a comma-separated list of category
//! names.
//!
//! ```text
//! $ MNTTAB_DEBUG="cache,locks" ./main
//! $ MNTTAB_DEBUG=all ./main
//! ```
//!
//! Debugging categories can not be changed after the first call to [`init_debug`] or
//! [`debug_mask`]: the mask is read once and memoized, matching the upstream library's behavior
//! of fixing the debug mode for the lifetime of the process.

// From dependency library
use once_cell::sync::OnceCell;

// From standard library

// From this library

bitflags::bitflags! {
    /// Diagnostic categories, mirroring this crate's component layout.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
    pub struct DebugFlags: u32 {
        /// Library initialization.
        const INIT = 1 << 0;
        /// Path/tag resolver cache.
        const CACHE = 1 << 1;
        /// Mount option parsing.
        const OPTIONS = 1 << 2;
        /// Mtab/utab locking.
        const LOCKS = 1 << 3;
        /// fstab, mtab, mountinfo routines.
        const TAB = 1 << 4;
        /// Mount entry accessors and invariants.
        const FS = 1 << 5;
        /// Miscellaneous utilities.
        const UTILS = 1 << 6;
    }
}

const ENV_VAR: &str = "MNTTAB_DEBUG";

static DEBUG_MASK: OnceCell<DebugFlags> = OnceCell::new();

fn parse_mask(raw: &str) -> DebugFlags {
    let raw = raw.trim();

    if let Ok(bits) = raw.parse::<u32>() {
        return DebugFlags::from_bits_truncate(bits);
    }

    raw.split(',')
        .map(str::trim)
        .fold(DebugFlags::empty(), |acc, token| {
            acc | match token {
                "all" => DebugFlags::all(),
                "init" => DebugFlags::INIT,
                "cache" => DebugFlags::CACHE,
                "options" => DebugFlags::OPTIONS,
                "locks" => DebugFlags::LOCKS,
                "tab" => DebugFlags::TAB,
                "fs" => DebugFlags::FS,
                "utils" => DebugFlags::UTILS,
                _ => DebugFlags::empty(),
            }
        })
}

/// Activates diagnostic categories given explicitly, ORed with whatever `MNTTAB_DEBUG` requests.
/// Has no effect once the mask has already been set by a prior call to this function or to
/// [`debug_mask`].
pub fn init_debug(flags: DebugFlags) {
    let _ = DEBUG_MASK.get_or_init(|| flags | mask_from_env());
}

/// Returns the active debug mask, initializing it from `MNTTAB_DEBUG` on first use if
/// [`init_debug`] was never called.
pub fn debug_mask() -> DebugFlags {
    *DEBUG_MASK.get_or_init(mask_from_env)
}

fn mask_from_env() -> DebugFlags {
    std::env::var(ENV_VAR)
        .map(|raw| parse_mask(&raw))
        .unwrap_or_default()
}

/// Whether the given category is active in the current debug mask.
pub fn is_enabled(flag: DebugFlags) -> bool {
    debug_mask().contains(flag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_mask_accepts_a_numeric_literal() {
        assert_eq!(parse_mask("3"), DebugFlags::INIT | DebugFlags::CACHE);
    }

    #[test]
    fn parse_mask_accepts_a_comma_separated_list_of_names() {
        assert_eq!(
            parse_mask("cache, locks"),
            DebugFlags::CACHE | DebugFlags::LOCKS
        );
    }

    #[test]
    fn parse_mask_all_enables_every_category() {
        assert_eq!(parse_mask("all"), DebugFlags::all());
    }

    #[test]
    fn parse_mask_ignores_unknown_tokens() {
        assert_eq!(parse_mask("bogus"), DebugFlags::empty());
    }
}
