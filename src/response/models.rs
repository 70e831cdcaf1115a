// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed views over parameter groups.

use chrono::Weekday;
use serde::Deserialize;

use crate::response::{EntityInfo, FromParameters};
use crate::types::{DaySchedule, DeviceDateTime, HvacMode, TemperatureRange, TemperatureUnit};

/// Declares a model whose fields are optional entities keyed by attribute name.
macro_rules! parameter_model {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$field_meta:meta])* $field:ident),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $($(#[$field_meta])* pub $field: Option<EntityInfo>,)*
        }

        impl FromParameters for $name {
            fn assign(&mut self, name: &str, entity: EntityInfo) {
                match name {
                    $(stringify!($field) => self.$field = Some(entity),)*
                    _ => {}
                }
            }
        }
    };
}

parameter_model! {
    /// Heating circuit state.
    State {
        /// Operating mode (700).
        hvac_mode,
        /// Comfort setpoint (710).
        target_temperature,
        /// Operating level (900).
        hvac_mode2,
        /// Circuit status (8000).
        hvac_action,
        /// Room temperature actual value (8740).
        current_temperature,
        /// Room thermostat state (8749).
        room1_thermostat_mode,
        /// Comfort setpoint boost (770).
        room1_temp_setpoint_boost,
    }
}

impl State {
    /// Returns the operating mode, if reported and known.
    #[must_use]
    pub fn hvac_mode_value(&self) -> Option<HvacMode> {
        let raw = self.hvac_mode.as_ref()?.as_i64()?;
        HvacMode::try_from(u8::try_from(raw).ok()?).ok()
    }
}

parameter_model! {
    /// Outdoor and room sensors.
    Sensor {
        outside_temperature,
        current_temperature,
    }
}

parameter_model! {
    /// Setpoint limits of a heating circuit.
    StaticState {
        /// Lower comfort setpoint limit.
        min_temp,
        /// Upper comfort setpoint limit.
        max_temp,
    }
}

impl StaticState {
    /// Returns the setpoint range when both limits carry a number.
    #[must_use]
    pub fn temperature_range(&self) -> Option<TemperatureRange> {
        let min = self.min_temp.as_ref()?.as_f64()?;
        let max = self.max_temp.as_ref()?.as_f64()?;
        Some(TemperatureRange::new(min, max))
    }

    /// Returns the temperature unit reported for the lower limit.
    #[must_use]
    pub fn temperature_unit(&self) -> TemperatureUnit {
        self.min_temp
            .as_ref()
            .map(|entity| TemperatureUnit::from_unit(&entity.unit))
            .unwrap_or_default()
    }
}

parameter_model! {
    /// Controller identification.
    Info {
        device_identification,
        controller_family,
        controller_variant,
    }
}

parameter_model! {
    /// Hot water state: the parameters needed to show and drive the water heater.
    HotWaterState {
        operating_mode,
        nominal_setpoint,
        release,
        dhw_actual_value_top_temperature,
        state_dhw_pump,
    }
}

parameter_model! {
    /// Hot water configuration.
    HotWaterConfig {
        eco_mode_selection,
        reduced_setpoint,
        nominal_setpoint_max,
        dhw_charging_priority,
        legionella_function,
        legionella_function_periodicity,
        legionella_function_day,
        legionella_function_time,
        legionella_function_setpoint,
        legionella_function_dwelling_time,
        legionella_circulation_pump,
        legionella_circulation_temp_diff,
        dhw_circulation_pump_release,
        dhw_circulation_pump_cycling,
        dhw_circulation_setpoint,
        operating_mode_changeover,
    }
}

parameter_model! {
    /// Hot water time program.
    HotWaterSchedule {
        dhw_time_program_monday,
        dhw_time_program_tuesday,
        dhw_time_program_wednesday,
        dhw_time_program_thursday,
        dhw_time_program_friday,
        dhw_time_program_saturday,
        dhw_time_program_sunday,
        dhw_time_program_standard_values,
    }
}

impl HotWaterSchedule {
    /// Parses the program of `weekday`. `None` if not reported or unparseable.
    #[must_use]
    pub fn day(&self, weekday: Weekday) -> Option<DaySchedule> {
        let entity = match weekday {
            Weekday::Mon => &self.dhw_time_program_monday,
            Weekday::Tue => &self.dhw_time_program_tuesday,
            Weekday::Wed => &self.dhw_time_program_wednesday,
            Weekday::Thu => &self.dhw_time_program_thursday,
            Weekday::Fri => &self.dhw_time_program_friday,
            Weekday::Sat => &self.dhw_time_program_saturday,
            Weekday::Sun => &self.dhw_time_program_sunday,
        };
        entity.as_ref()?.raw_value()?.parse().ok()
    }
}

parameter_model! {
    /// Controller clock.
    DeviceTime {
        time,
    }
}

impl DeviceTime {
    /// Parses the clock value.
    #[must_use]
    pub fn date_time(&self) -> Option<DeviceDateTime> {
        DeviceDateTime::parse(self.time.as_ref()?.raw_value()?)
    }
}

/// Firmware identification as returned by the `/JI` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    /// Device name.
    pub name: String,
    /// Firmware version string.
    pub version: String,
    /// MAC address.
    #[serde(rename = "MAC", default)]
    pub mac: String,
    /// Uptime in seconds.
    #[serde(default)]
    pub uptime: u64,
}
