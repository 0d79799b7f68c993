// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library

// From this library

/// The line format a [`MountTable`](super::MountTable) parses, or is still guessing at.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TableFormat {
    /// Inspect the first non-blank, non-comment line to decide. Once decided for a given parse,
    /// the choice sticks for the rest of that stream.
    #[default]
    Guess,
    /// Classic six-field `fstab`/`mtab` lines.
    Classic,
    /// Kernel `/proc/self/mountinfo` lines.
    KernelInfo,
}

impl TableFormat {
    /// Looks at a single line's shape and decides [`Classic`](Self::Classic) or
    /// [`KernelInfo`](Self::KernelInfo): a `mountinfo` line starts with two whitespace-separated
    /// decimal numbers (`id` and `parent_id`); a classic line never does, because its first field
    /// is a source path or tag.
    pub(crate) fn guess_from_line(line: &str) -> TableFormat {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(a), Some(b)) if a.parse::<u32>().is_ok() && b.parse::<u32>().is_ok() => {
                TableFormat::KernelInfo
            }
            _ => TableFormat::Classic,
        }
    }
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn guess_from_line_recognizes_kernel_info_lines() {
        let line = "20 15 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw";
        assert_eq!(TableFormat::guess_from_line(line), TableFormat::KernelInfo);
    }

    #[test]
    fn guess_from_line_recognizes_classic_lines() {
        let line = "/dev/sda1 / ext4 rw,relatime 0 1";
        assert_eq!(TableFormat::guess_from_line(line), TableFormat::Classic);
    }

    #[test]
    fn guess_from_line_treats_a_tag_source_as_classic() {
        let line = "UUID=1234 /home ext4 defaults 0 2";
        assert_eq!(TableFormat::guess_from_line(line), TableFormat::Classic);
    }
}
