// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric parameter identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValueError;

/// Identifier of a single controller parameter (for example `710` for the
/// comfort setpoint of heating circuit 1).
///
/// The device addresses parameters by number but transmits them as JSON
/// strings; this type keeps them numeric and only converts at the wire
/// boundary.
///
/// # Examples
///
/// ```
/// use bsblan_lib::types::ParameterId;
///
/// let id: ParameterId = "710".parse().unwrap();
/// assert_eq!(id, ParameterId::new(710));
/// assert_eq!(id.offset(300).to_string(), "1010");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParameterId(u32);

impl ParameterId {
    /// Creates a parameter ID from its number.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns this ID shifted by `delta`.
    #[must_use]
    pub const fn offset(self, delta: u32) -> Self {
        Self(self.0 + delta)
    }

    /// Joins IDs the way the query endpoint expects them: `700,710,8000`.
    #[must_use]
    pub fn join(ids: &[Self]) -> String {
        ids.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ParameterId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValueError::EmptyParameterId);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValueError::InvalidParameterId(s.to_string()));
        }
        trimmed
            .parse()
            .map(Self)
            .map_err(|_| ValueError::InvalidParameterId(s.to_string()))
    }
}

impl From<u32> for ParameterId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Serialize for ParameterId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ParameterId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(" 8740 ".parse::<ParameterId>(), Ok(ParameterId::new(8740)));
    }

    #[test]
    fn parse_empty_is_rejected() {
        assert_eq!("".parse::<ParameterId>(), Err(ValueError::EmptyParameterId));
        assert_eq!("  ".parse::<ParameterId>(), Err(ValueError::EmptyParameterId));
    }

    #[test]
    fn parse_non_numeric_is_rejected() {
        assert!(matches!(
            "87a0".parse::<ParameterId>(),
            Err(ValueError::InvalidParameterId(_))
        ));
        assert!("-1".parse::<ParameterId>().is_err());
    }

    #[test]
    fn join_uses_commas() {
        let ids = [ParameterId::new(700), ParameterId::new(710)];
        assert_eq!(ParameterId::join(&ids), "700,710");
        assert_eq!(ParameterId::join(&[]), "");
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&ParameterId::new(1610)).unwrap();
        assert_eq!(json, "\"1610\"");
        let back: ParameterId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), 1610);
    }
}
