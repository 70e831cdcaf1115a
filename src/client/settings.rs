// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Write requests for the heating circuit and the hot water system.
//!
//! The controller accepts one parameter per write. Both settings types
//! collect what the caller set and are rejected by the client unless exactly
//! one value is present.

use chrono::{NaiveTime, Weekday};

use crate::error::ConfigurationError;
use crate::protocol::SetParameter;
use crate::types::{DaySchedule, HvacMode, ParameterId, format_decimal};

/// A thermostat change for one heating circuit.
///
/// # Examples
///
/// ```
/// use bsblan_lib::{HvacMode, ThermostatSettings};
///
/// let settings = ThermostatSettings::new().with_target_temperature(20.5);
/// let settings = ThermostatSettings::new().with_hvac_mode(HvacMode::Eco);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThermostatSettings {
    target_temperature: Option<f64>,
    hvac_mode: Option<HvacMode>,
}

impl ThermostatSettings {
    /// Creates empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the comfort setpoint.
    #[must_use]
    pub fn with_target_temperature(mut self, temperature: f64) -> Self {
        self.target_temperature = Some(temperature);
        self
    }

    /// Sets the operating mode.
    #[must_use]
    pub fn with_hvac_mode(mut self, mode: HvacMode) -> Self {
        self.hvac_mode = Some(mode);
        self
    }

    /// Returns the comfort setpoint, if set.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.target_temperature
    }

    /// Returns the operating mode, if set.
    #[must_use]
    pub fn hvac_mode(&self) -> Option<HvacMode> {
        self.hvac_mode
    }

    pub(crate) fn ensure_single(&self) -> Result<(), ConfigurationError> {
        match (self.target_temperature, self.hvac_mode) {
            (None, None) => Err(ConfigurationError::NoState),
            (Some(_), Some(_)) => Err(ConfigurationError::MultiParameter),
            _ => Ok(()),
        }
    }
}

/// A hot water change.
///
/// # Examples
///
/// ```
/// use bsblan_lib::HotWaterSettings;
///
/// let settings = HotWaterSettings::new().nominal_setpoint(55.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotWaterSettings {
    writes: Vec<SetParameter>,
}

impl HotWaterSettings {
    /// Creates empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, write: SetParameter) -> Self {
        self.writes.retain(|w| w.parameter() != write.parameter());
        self.writes.push(write);
        self
    }

    fn number(self, id: u32, value: f64) -> Self {
        self.with(SetParameter::value(ParameterId::new(id), format_decimal(value)))
    }

    fn choice(self, id: u32, value: u8) -> Self {
        self.with(SetParameter::enum_value(
            ParameterId::new(id),
            value.to_string(),
        ))
    }

    /// Operating mode (1600).
    #[must_use]
    pub fn operating_mode(self, mode: u8) -> Self {
        self.choice(1600, mode)
    }

    /// Eco mode selection (1601).
    #[must_use]
    pub fn eco_mode_selection(self, selection: u8) -> Self {
        self.choice(1601, selection)
    }

    /// Nominal setpoint (1610).
    #[must_use]
    pub fn nominal_setpoint(self, temperature: f64) -> Self {
        self.number(1610, temperature)
    }

    /// Reduced setpoint (1612).
    #[must_use]
    pub fn reduced_setpoint(self, temperature: f64) -> Self {
        self.number(1612, temperature)
    }

    /// Maximum nominal setpoint (1614).
    #[must_use]
    pub fn nominal_setpoint_max(self, temperature: f64) -> Self {
        self.number(1614, temperature)
    }

    /// Release (1620).
    #[must_use]
    pub fn release(self, release: u8) -> Self {
        self.choice(1620, release)
    }

    /// Charging priority (1630).
    #[must_use]
    pub fn dhw_charging_priority(self, priority: u8) -> Self {
        self.choice(1630, priority)
    }

    /// Legionella function (1640).
    #[must_use]
    pub fn legionella_function(self, function: u8) -> Self {
        self.choice(1640, function)
    }

    /// Legionella periodicity in days (1641).
    #[must_use]
    pub fn legionella_function_periodicity(self, days: u8) -> Self {
        self.choice(1641, days)
    }

    /// Legionella weekday (1642).
    #[must_use]
    pub fn legionella_function_day(self, day: u8) -> Self {
        self.choice(1642, day)
    }

    /// Legionella start time (1644).
    #[must_use]
    pub fn legionella_function_time(self, time: NaiveTime) -> Self {
        self.with(SetParameter::value(
            ParameterId::new(1644),
            time.format("%H:%M").to_string(),
        ))
    }

    /// Legionella setpoint (1645).
    #[must_use]
    pub fn legionella_function_setpoint(self, temperature: f64) -> Self {
        self.number(1645, temperature)
    }

    /// Legionella dwelling time in minutes (1646).
    #[must_use]
    pub fn legionella_function_dwelling_time(self, minutes: u16) -> Self {
        self.with(SetParameter::value(
            ParameterId::new(1646),
            minutes.to_string(),
        ))
    }

    /// Circulation pump during legionella function (1647).
    #[must_use]
    pub fn legionella_circulation_pump(self, mode: u8) -> Self {
        self.choice(1647, mode)
    }

    /// Circulation temperature differential for legionella function (1648).
    #[must_use]
    pub fn legionella_circulation_temp_diff(self, kelvin: f64) -> Self {
        self.number(1648, kelvin)
    }

    /// Circulation pump release (1660).
    #[must_use]
    pub fn dhw_circulation_pump_release(self, release: u8) -> Self {
        self.choice(1660, release)
    }

    /// Circulation pump cycling (1661).
    #[must_use]
    pub fn dhw_circulation_pump_cycling(self, cycling: u8) -> Self {
        self.choice(1661, cycling)
    }

    /// Circulation setpoint (1663).
    #[must_use]
    pub fn dhw_circulation_setpoint(self, temperature: f64) -> Self {
        self.number(1663, temperature)
    }

    /// Operating mode changeover (1680).
    #[must_use]
    pub fn operating_mode_changeover(self, mode: u8) -> Self {
        self.choice(1680, mode)
    }

    /// Time program of one weekday (561-567).
    #[must_use]
    pub fn dhw_time_program(self, weekday: Weekday, schedule: &DaySchedule) -> Self {
        self.with(SetParameter::value(
            dhw_time_program_id(weekday),
            schedule.to_string(),
        ))
    }

    /// Restores the default time program (576).
    #[must_use]
    pub fn dhw_time_program_standard_values(self) -> Self {
        self.choice(576, 1)
    }

    /// Returns the single write, failing when none or several were set.
    pub(crate) fn into_single(mut self) -> Result<SetParameter, ConfigurationError> {
        match self.writes.len() {
            0 => Err(ConfigurationError::NoState),
            1 => self.writes.pop().ok_or(ConfigurationError::NoState),
            _ => Err(ConfigurationError::MultiParameter),
        }
    }
}

/// Parameter holding the hot water time program of `weekday`.
pub(crate) fn dhw_time_program_id(weekday: Weekday) -> ParameterId {
    crate::schema::DHW_TIME_PROGRAM_MONDAY.offset(weekday.num_days_from_monday())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thermostat_requires_exactly_one_value() {
        assert_eq!(
            ThermostatSettings::new().ensure_single(),
            Err(ConfigurationError::NoState)
        );
        assert_eq!(
            ThermostatSettings::new()
                .with_target_temperature(20.0)
                .with_hvac_mode(HvacMode::Heat)
                .ensure_single(),
            Err(ConfigurationError::MultiParameter)
        );
        assert!(
            ThermostatSettings::new()
                .with_hvac_mode(HvacMode::Off)
                .ensure_single()
                .is_ok()
        );
    }

    #[test]
    fn hot_water_single_write() {
        let write = HotWaterSettings::new()
            .nominal_setpoint(55.0)
            .into_single()
            .unwrap();
        assert_eq!(
            write,
            SetParameter::value(ParameterId::new(1610), "55.0")
        );
    }

    #[test]
    fn hot_water_rejects_multiple_writes() {
        let result = HotWaterSettings::new()
            .nominal_setpoint(55.0)
            .reduced_setpoint(40.0)
            .into_single();
        assert_eq!(result, Err(ConfigurationError::MultiParameter));
    }

    #[test]
    fn hot_water_rejects_empty() {
        assert_eq!(
            HotWaterSettings::new().into_single(),
            Err(ConfigurationError::NoState)
        );
    }

    #[test]
    fn same_parameter_twice_keeps_last() {
        let write = HotWaterSettings::new()
            .operating_mode(0)
            .operating_mode(1)
            .into_single()
            .unwrap();
        assert_eq!(write, SetParameter::enum_value(ParameterId::new(1600), "1"));
    }

    #[test]
    fn legionella_time_uses_hour_minute() {
        let write = HotWaterSettings::new()
            .legionella_function_time(NaiveTime::from_hms_opt(12, 5, 0).unwrap())
            .into_single()
            .unwrap();
        assert_eq!(write, SetParameter::value(ParameterId::new(1644), "12:05"));
    }

    #[test]
    fn time_program_ids_follow_weekday() {
        assert_eq!(dhw_time_program_id(Weekday::Mon), ParameterId::new(561));
        assert_eq!(dhw_time_program_id(Weekday::Sun), ParameterId::new(567));
    }
}
