// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller date and time.
//!
//! The controller clock (parameter 0) is read and written as
//! `DD.MM.YYYY HH:MM:SS` without timezone information.
//!
//! # Examples
//!
//! ```
//! use bsblan_lib::types::DeviceDateTime;
//!
//! let dt: DeviceDateTime = "01.01.2024 12:30:45".parse().unwrap();
//! assert_eq!(dt.naive().format("%Y-%m-%d").to_string(), "2024-01-01");
//! assert_eq!(dt.to_string(), "01.01.2024 12:30:45");
//!
//! assert!("2024-01-01 12:30:45".parse::<DeviceDateTime>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};

use crate::error::ValueError;

/// Wire format of the controller clock.
const DEVICE_DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Earliest year the controller accepts.
const MIN_YEAR: i32 = 1900;

/// Latest year the controller accepts.
const MAX_YEAR: i32 = 2100;

/// A validated controller date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceDateTime {
    naive: NaiveDateTime,
}

impl DeviceDateTime {
    /// Wraps a naive datetime.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidDateTime` if the year is outside 1900-2100.
    pub fn new(naive: NaiveDateTime) -> Result<Self, ValueError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&naive.year()) {
            return Err(ValueError::InvalidDateTime(
                naive.format(DEVICE_DATETIME_FORMAT).to_string(),
            ));
        }
        Ok(Self { naive })
    }

    /// Parses a `DD.MM.YYYY HH:MM:SS` string, returning `None` when invalid.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Returns the naive datetime.
    #[must_use]
    pub fn naive(&self) -> NaiveDateTime {
        self.naive
    }
}

impl FromStr for DeviceDateTime {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let naive = NaiveDateTime::parse_from_str(s.trim(), DEVICE_DATETIME_FORMAT)
            .map_err(|_| ValueError::InvalidDateTime(s.to_string()))?;
        Self::new(naive).map_err(|_| ValueError::InvalidDateTime(s.to_string()))
    }
}

impl fmt::Display for DeviceDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.naive.format(DEVICE_DATETIME_FORMAT))
    }
}

impl From<DeviceDateTime> for NaiveDateTime {
    fn from(dt: DeviceDateTime) -> Self {
        dt.naive
    }
}
