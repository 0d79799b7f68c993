// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library

// From this library
use crate::core::errors::OptionStringError;
use crate::core::optstring::mount_option_struct::MountOption;
use crate::core::optstring::parse_next;

/// An iterator over the items of a mount option string.
#[derive(Debug)]
pub struct OptionIter<'a> {
    cursor: &'a str,
    done: bool,
}

impl<'a> OptionIter<'a> {
    #[doc(hidden)]
    pub(crate) fn new(options_list: &'a str) -> Result<OptionIter<'a>, OptionStringError> {
        log::debug!("OptionIter::new creating a new `OptionIter` instance");

        Ok(Self {
            cursor: options_list,
            done: false,
        })
    }
}

impl<'a> Iterator for OptionIter<'a> {
    type Item = MountOption;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match parse_next(self.cursor) {
            Ok(Some((item, rest))) => {
                self.cursor = rest;
                item.parse().ok()
            }
            Ok(None) => {
                log::debug!("OptionIter::next reached the end of the option list");
                self.done = true;
                None
            }
            Err(err) => {
                log::debug!("OptionIter::next stopping on malformed option list: {:?}", err);
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn option_iter_can_iterate_over_an_empty_options_list() -> crate::Result<()> {
        let mut iterator = OptionIter::new("")?;
        assert_eq!(iterator.next(), None);
        Ok(())
    }

    #[test]
    fn option_iter_can_iterate_over_an_options_list_with_one_element() -> crate::Result<()> {
        let mut iterator = OptionIter::new("noatime")?;

        let actual = iterator.next();
        let expected: Option<MountOption> = Some("noatime".parse()?);
        assert_eq!(actual, expected);

        assert_eq!(iterator.next(), None);
        Ok(())
    }

    #[test]
    fn option_iter_can_iterate_over_an_options_list_with_more_than_one_element() -> crate::Result<()>
    {
        let mut iterator = OptionIter::new("noatime,ro=recursive")?;

        let actual = iterator.next();
        let expected: Option<MountOption> = Some("noatime".parse()?);
        assert_eq!(actual, expected);

        let actual = iterator.next();
        let expected: Option<MountOption> = Some("ro=recursive".parse()?);
        assert_eq!(actual, expected);

        assert_eq!(iterator.next(), None);
        Ok(())
    }
}
