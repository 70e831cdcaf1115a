// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Firmware version resolution.
//!
//! BSB-LAN firmware versions map onto a small number of parameter schema
//! generations:
//!
//! | Firmware            | Generation |
//! |---------------------|------------|
//! | `< 1.2.0`           | `v1`       |
//! | `1.2.0 ..= 3.0.0`   | unsupported|
//! | `> 3.0.0`           | `v3`       |
//!
//! # Examples
//!
//! ```
//! use bsblan_lib::ApiVersion;
//!
//! assert_eq!(ApiVersion::from_firmware("1.0.38-20200730234859").unwrap(), ApiVersion::V1);
//! assert_eq!(ApiVersion::from_firmware("5.0.16").unwrap(), ApiVersion::V3);
//! assert!(ApiVersion::from_firmware("2.1.0").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::VersionError;

/// A parsed `major.minor.patch` firmware version.
///
/// Build suffixes (`1.0.38-20200730234859`) and missing components
/// (`3.1` → `3.1.0`) are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirmwareVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl FirmwareVersion {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Major component.
    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    /// Minor component.
    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// Patch component.
    #[must_use]
    pub const fn patch(&self) -> u32 {
        self.patch
    }
}

impl FromStr for FirmwareVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::Invalid(s.to_string());
        let core = s.trim().split(['-', '+', ' ']).next().unwrap_or_default();
        if core.is_empty() {
            return Err(invalid());
        }

        let mut parts = [0u32; 3];
        let mut count = 0;
        for part in core.split('.') {
            if count == parts.len() {
                return Err(invalid());
            }
            parts[count] = part.parse().map_err(|_| invalid())?;
            count += 1;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Firmware below this version speaks the v1 schema.
const V1_UPPER_BOUND: FirmwareVersion = FirmwareVersion::new(1, 2, 0);

/// Firmware above this version speaks the v3 schema.
const UNSUPPORTED_UPPER_BOUND: FirmwareVersion = FirmwareVersion::new(3, 0, 0);

/// Parameter schema generation spoken by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// Firmware before 1.2.0.
    V1,
    /// Firmware after 3.0.0, including all 4.x and 5.x releases.
    V3,
}

impl ApiVersion {
    /// Resolves the schema generation for a firmware version string.
    ///
    /// # Errors
    ///
    /// Returns `VersionError::Invalid` if the string is not a version and
    /// `VersionError::Unsupported` for firmware in the 1.2.0-3.0.0 range.
    pub fn from_firmware(firmware: &str) -> Result<Self, VersionError> {
        let version: FirmwareVersion = firmware.parse()?;
        Self::from_version(version)
            .ok_or_else(|| VersionError::Unsupported(firmware.trim().to_string()))
    }

    /// Resolves the schema generation for a parsed version, `None` when unsupported.
    #[must_use]
    pub fn from_version(version: FirmwareVersion) -> Option<Self> {
        if version < V1_UPPER_BOUND {
            Some(Self::V1)
        } else if version <= UNSUPPORTED_UPPER_BOUND {
            None
        } else {
            Some(Self::V3)
        }
    }

    /// Returns the generation tag (`"v1"` or `"v3"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V3 => "v3",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
