// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate control value types: operating modes, temperature units and
//! setpoint ranges.

use std::fmt;

use crate::error::ValueError;

// =============================================================================
// HvacMode
// =============================================================================

/// Operating mode of a heating circuit (parameter 700 on circuit 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacMode {
    /// Protection mode.
    Off,
    /// Follows the time program.
    Auto,
    /// Reduced setpoint.
    Eco,
    /// Comfort setpoint.
    Heat,
}

impl HvacMode {
    /// Returns the enum value the controller uses for this mode.
    #[must_use]
    pub fn as_raw(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Auto => 1,
            Self::Eco => 2,
            Self::Heat => 3,
        }
    }

    /// Returns the mode name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Auto => "auto",
            Self::Eco => "eco",
            Self::Heat => "heat",
        }
    }

    /// Parses a mode name.
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "auto" => Some(Self::Auto),
            "eco" => Some(Self::Eco),
            "heat" => Some(Self::Heat),
            _ => None,
        }
    }
}

impl TryFrom<u8> for HvacMode {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::Auto),
            2 => Ok(Self::Eco),
            3 => Ok(Self::Heat),
            other => Err(ValueError::InvalidHvacMode(other)),
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TemperatureUnit
// =============================================================================

/// Temperature unit reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemperatureUnit {
    /// Degrees Celsius.
    #[default]
    Celsius,
    /// Degrees Fahrenheit.
    Fahrenheit,
}

impl TemperatureUnit {
    /// Detects the unit from a raw unit string as sent by the device.
    ///
    /// The device may HTML-encode the degree sign (`&deg;C`, `&#176;C`).
    /// Anything that is not recognisably Fahrenheit is treated as Celsius.
    #[must_use]
    pub fn from_unit(unit: &str) -> Self {
        if normalize_unit(unit) == "°F" {
            Self::Fahrenheit
        } else {
            Self::Celsius
        }
    }

    /// Returns the unit symbol.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Plausible room temperature bounds for values pushed to the controller.
    #[must_use]
    pub fn room_temperature_range(self) -> TemperatureRange {
        match self {
            Self::Celsius => TemperatureRange::new(-10.0, 50.0),
            Self::Fahrenheit => TemperatureRange::new(14.0, 122.0),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replaces the HTML-encoded degree signs the device sometimes sends.
#[must_use]
pub(crate) fn normalize_unit(unit: &str) -> String {
    unit.trim().replace("&deg;", "°").replace("&#176;", "°")
}

// =============================================================================
// TemperatureRange
// =============================================================================

/// Inclusive temperature bounds, e.g. the allowed setpoint range of a circuit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    min: f64,
    max: f64,
}

impl TemperatureRange {
    /// Creates a range from its bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Checks that `value` is a finite number within the bounds.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidTemperature` for NaN or infinite values and
    /// `ValueError::TemperatureOutOfRange` when outside the bounds.
    pub fn check(&self, value: f64) -> Result<(), ValueError> {
        if !value.is_finite() {
            return Err(ValueError::InvalidTemperature(value.to_string()));
        }
        if value < self.min || value > self.max {
            return Err(ValueError::TemperatureOutOfRange {
                min: self.min,
                max: self.max,
                actual: value,
            });
        }
        Ok(())
    }
}

/// Formats a decimal the way the controller expects it: always with a
/// fractional part (`20.0`, `20.5`).
#[must_use]
pub(crate) fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hvac_mode_raw_roundtrip() {
        for raw in 0..=3 {
            assert_eq!(HvacMode::try_from(raw).unwrap().as_raw(), raw);
        }
        assert_eq!(HvacMode::try_from(4), Err(ValueError::InvalidHvacMode(4)));
    }

    #[test]
    fn hvac_mode_names() {
        assert_eq!(HvacMode::from_name("eco"), Some(HvacMode::Eco));
        assert_eq!(HvacMode::from_name("cool"), None);
        assert_eq!(HvacMode::Heat.to_string(), "heat");
    }

    #[test]
    fn unit_detection() {
        assert_eq!(TemperatureUnit::from_unit("°C"), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::from_unit("&deg;C"), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::from_unit("&#176;F"), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::from_unit("°F"), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::from_unit(""), TemperatureUnit::Celsius);
    }

    #[test]
    fn range_check() {
        let range = TemperatureRange::new(8.0, 30.0);
        assert!(range.check(8.0).is_ok());
        assert!(range.check(30.0).is_ok());
        assert!(matches!(
            range.check(35.0),
            Err(ValueError::TemperatureOutOfRange { .. })
        ));
        assert!(matches!(
            range.check(f64::NAN),
            Err(ValueError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn room_temperature_bounds() {
        let celsius = TemperatureUnit::Celsius.room_temperature_range();
        assert!(celsius.check(-10.0).is_ok());
        assert!(celsius.check(51.0).is_err());
        let fahrenheit = TemperatureUnit::Fahrenheit.room_temperature_range();
        assert!(fahrenheit.check(122.0).is_ok());
        assert!(fahrenheit.check(13.0).is_err());
    }

    #[test]
    fn decimal_formatting() {
        assert_eq!(format_decimal(60.0), "60.0");
        assert_eq!(format_decimal(20.5), "20.5");
        assert_eq!(format_decimal(-10.0), "-10.0");
    }
}
