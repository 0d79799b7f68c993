// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library

// From this library

/// Which way a [`MountTable`](super::MountTable) lookup walks its entries.
///
/// Entries are appended in parse order, so [`Forward`](Self::Forward) favors the first matching
/// line and [`Backward`](Self::Backward) favors the last — the usual way to prefer whichever
/// fstab/mtab line shadows an earlier one for the same mountpoint.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}
