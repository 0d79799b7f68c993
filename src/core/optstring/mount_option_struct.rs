// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library
use std::fmt;
use std::str::FromStr;

// From this library
use crate::core::errors::OptionStringError;

/// A single mount option, either a bare flag or a `NAME=VALUE` pair.
///
/// # Examples
///
/// ```
/// # use pretty_assertions::assert_eq;
/// use mnttab::core::optstring::MountOption;
///
/// fn main() -> mnttab::Result<()> {
///     let option: MountOption = "ro".parse()?;
///     assert_eq!(option.name(), "ro");
///     assert_eq!(option.value(), None);
///
///     let option: MountOption = "data=ordered".parse()?;
///     assert_eq!(option.name(), "data");
///     assert_eq!(option.value(), Some("ordered"));
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct MountOption {
    name: String,
    value: Option<String>,
}

impl MountOption {
    #[doc(hidden)]
    pub(crate) fn new(name: &str) -> MountOption {
        Self {
            name: name.trim().to_owned(),
            value: None,
        }
    }

    #[doc(hidden)]
    pub(crate) fn new_with_value(name: &str, value: &str) -> MountOption {
        Self {
            name: name.trim().to_owned(),
            value: Some(value.trim().to_owned()),
        }
    }

    /// Returns this option's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns this option's value, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl AsRef<MountOption> for MountOption {
    #[inline]
    fn as_ref(&self) -> &MountOption {
        self
    }
}

impl FromStr for MountOption {
    type Err = OptionStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) => {
                let name = name.trim();
                let value = value.trim();

                let value = if let Some(inner) = value.strip_prefix('"') {
                    inner.strip_suffix('"').ok_or_else(|| {
                        OptionStringError::Malformed(format!(
                            "missing closing double-quote in option value: {:?}",
                            value
                        ))
                    })?
                } else if let Some(inner) = value.strip_prefix('\'') {
                    inner.strip_suffix('\'').ok_or_else(|| {
                        OptionStringError::Malformed(format!(
                            "missing closing quote in option value: {:?}",
                            value
                        ))
                    })?
                } else {
                    value
                };

                Ok(Self::new_with_value(name, value))
            }
            None => Ok(Self::new(s)),
        }
    }
}

impl fmt::Display for MountOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(value) if value.chars().any(|c| c.is_whitespace() || c == ',') => {
                write!(f, "{}=\"{}\"", self.name(), value)
            }
            Some(value) => write!(f, "{}={}", self.name(), value),
            None => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn mount_option_parses_a_bare_flag() -> crate::Result<()> {
        let option: MountOption = "ro".parse()?;
        assert_eq!(option.name(), "ro");
        assert_eq!(option.value(), None);
        Ok(())
    }

    #[test]
    fn mount_option_parses_a_name_value_pair() -> crate::Result<()> {
        let option: MountOption = "data=ordered".parse()?;
        assert_eq!(option.name(), "data");
        assert_eq!(option.value(), Some("ordered"));
        Ok(())
    }

    #[test]
    fn mount_option_rejects_an_unclosed_double_quote() {
        let result: Result<MountOption, _> = r#"context="foo"#.parse();
        assert!(result.is_err());
    }

    #[test]
    fn mount_option_displays_a_value_with_special_characters_quoted() {
        let option = MountOption::new_with_value("context", "a,b");
        assert_eq!(option.to_string(), r#"context="a,b""#);
    }
}
