// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library

// From this library
use crate::core::entry::MountEntry;
use crate::core::table::Direction;

/// Walks a slice of [`MountEntry`] values in either [`Direction`], by index rather than by
/// pointer: a plain `Vec` backs [`MountTable`](super::MountTable), so there is no linked-list
/// cursor to maintain and nothing to invalidate beyond Rust's own borrow rules.
pub struct TableIter<'a> {
    entries: &'a [MountEntry],
    direction: Direction,
    front: usize,
    back: usize,
}

impl<'a> TableIter<'a> {
    pub(crate) fn new(entries: &'a [MountEntry], direction: Direction) -> TableIter<'a> {
        TableIter {
            entries,
            direction,
            front: 0,
            back: entries.len(),
        }
    }

    /// Locates `entry` by identity within the borrowed slice and parks the iterator immediately
    /// past it, so the next call to [`next`](Iterator::next) resumes scanning from the entry
    /// following `entry` in this iterator's [`Direction`]. Returns `false`, leaving the iterator
    /// untouched, if `entry` is not part of the borrowed slice.
    pub fn set_iter(&mut self, entry: &MountEntry) -> bool {
        let position = self.entries.iter().position(|e| std::ptr::eq(e, entry));

        match position {
            Some(index) => {
                match self.direction {
                    Direction::Forward => self.front = index + 1,
                    Direction::Backward => self.back = index,
                }
                true
            }
            None => false,
        }
    }
}

impl<'a> Iterator for TableIter<'a> {
    type Item = &'a MountEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        match self.direction {
            Direction::Forward => {
                let item = &self.entries[self.front];
                self.front += 1;
                Some(item)
            }
            Direction::Backward => {
                self.back -= 1;
                Some(&self.entries[self.back])
            }
        }
    }
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    fn sample() -> Vec<MountEntry> {
        let mut a = MountEntry::new();
        a.set_target("/a");
        let mut b = MountEntry::new();
        b.set_target("/b");
        vec![a, b]
    }

    #[test]
    fn forward_iteration_preserves_order() {
        let entries = sample();
        let targets: Vec<_> = TableIter::new(&entries, Direction::Forward)
            .map(|e| e.target().unwrap())
            .collect();
        assert_eq!(targets, vec!["/a", "/b"]);
    }

    #[test]
    fn backward_iteration_reverses_order() {
        let entries = sample();
        let targets: Vec<_> = TableIter::new(&entries, Direction::Backward)
            .map(|e| e.target().unwrap())
            .collect();
        assert_eq!(targets, vec!["/b", "/a"]);
    }

    #[test]
    fn set_iter_resumes_immediately_past_a_known_entry_when_going_forward() {
        let entries = sample();
        let mut iter = TableIter::new(&entries, Direction::Forward);
        assert!(iter.set_iter(&entries[0]));
        let targets: Vec<_> = iter.map(|e| e.target().unwrap()).collect();
        assert_eq!(targets, vec!["/b"]);
    }

    #[test]
    fn set_iter_resumes_immediately_past_a_known_entry_when_going_backward() {
        let entries = sample();
        let mut iter = TableIter::new(&entries, Direction::Backward);
        assert!(iter.set_iter(&entries[1]));
        let targets: Vec<_> = iter.map(|e| e.target().unwrap()).collect();
        assert_eq!(targets, vec!["/a"]);
    }

    #[test]
    fn set_iter_returns_false_for_an_entry_outside_the_slice() {
        let entries = sample();
        let other = {
            let mut e = MountEntry::new();
            e.set_target("/other");
            e
        };
        let mut iter = TableIter::new(&entries, Direction::Forward);
        assert!(!iter.set_iter(&other));
    }
}
