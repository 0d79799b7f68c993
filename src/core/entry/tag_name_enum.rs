// Copyright (c) 2023 Nick Piaddo
// SPDX-License-Identifier: Apache-2.0 OR MIT

// From dependency library

// From standard library
use std::fmt;
use std::str::FromStr;

// From this library

/// The well-known device tags a mount entry's `source` field can carry instead of a path.
///
/// A source string that does not match one of these names (e.g. `server:/export` for an NFS
/// mount) is not a tag at all; [`MountEntry::source_tag`](super::MountEntry::source_tag) returns
/// `None` for it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TagName {
    Label,
    Uuid,
    PartLabel,
    PartUuid,
    Id,
}

impl TagName {
    /// Returns the literal tag name as it appears in a `TAG=value` source string (e.g. `"UUID"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "LABEL",
            Self::Uuid => "UUID",
            Self::PartLabel => "PARTLABEL",
            Self::PartUuid => "PARTUUID",
            Self::Id => "ID",
        }
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TagName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LABEL" => Ok(Self::Label),
            "UUID" => Ok(Self::Uuid),
            "PARTLABEL" => Ok(Self::PartLabel),
            "PARTUUID" => Ok(Self::PartUuid),
            "ID" => Ok(Self::Id),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn tag_name_round_trips_through_its_string_form() {
        for tag in [
            TagName::Label,
            TagName::Uuid,
            TagName::PartLabel,
            TagName::PartUuid,
            TagName::Id,
        ] {
            let parsed: TagName = tag.as_str().parse().unwrap();
            assert_eq!(parsed, tag);
        }
    }

    #[test]
    fn tag_name_rejects_an_unknown_name() {
        assert!("SERIAL".parse::<TagName>().is_err());
    }
}
