// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parameter schema registry.
//!
//! Maps logical attribute names onto controller parameter IDs, grouped into
//! [`Section`]s. Each schema generation shares a common base set and diverges
//! in a few IDs (for example `max_temp` is 730 on v1 firmware and 716 on v3).
//!
//! [`build_api_config`] returns a fresh, independently owned [`ApiConfig`] on
//! every call. Validation removes unsupported parameters from that copy, so a
//! snapshot is never shared between clients.
//!
//! # Examples
//!
//! ```
//! use bsblan_lib::schema::{build_api_config, Section};
//! use bsblan_lib::types::ParameterId;
//!
//! let config = build_api_config("v3");
//! let heating = config.section(Section::HeatingCircuit2).unwrap();
//! assert_eq!(heating.get(&ParameterId::new(1010)), Some(&"target_temperature"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;
use crate::types::{Circuit, ParameterId};
use crate::version::ApiVersion;

/// Parameters of one section: ID → logical attribute name.
pub type ParamMap = BTreeMap<ParameterId, &'static str>;

// =============================================================================
// Section
// =============================================================================

/// A named group of parameters that is validated as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// Heating circuit 1 state.
    Heating,
    /// Heating circuit 2 state.
    HeatingCircuit2,
    /// Heating circuit 3 state.
    HeatingCircuit3,
    /// Heating circuit 1 setpoint limits.
    StaticValues,
    /// Heating circuit 2 setpoint limits.
    StaticValuesCircuit2,
    /// Heating circuit 3 setpoint limits.
    StaticValuesCircuit3,
    /// Controller identification.
    Device,
    /// Outdoor and room sensors.
    Sensor,
    /// Domestic hot water.
    HotWater,
}

impl Section {
    /// All sections, in lookup order.
    pub const ALL: [Self; 9] = [
        Self::Heating,
        Self::HeatingCircuit2,
        Self::HeatingCircuit3,
        Self::StaticValues,
        Self::StaticValuesCircuit2,
        Self::StaticValuesCircuit3,
        Self::Device,
        Self::Sensor,
        Self::HotWater,
    ];

    /// Returns the section name used in logs and errors.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heating => "heating",
            Self::HeatingCircuit2 => "heating_circuit2",
            Self::HeatingCircuit3 => "heating_circuit3",
            Self::StaticValues => "staticValues",
            Self::StaticValuesCircuit2 => "staticValues_circuit2",
            Self::StaticValuesCircuit3 => "staticValues_circuit3",
            Self::Device => "device",
            Self::Sensor => "sensor",
            Self::HotWater => "hot_water",
        }
    }

    /// The heating section of `circuit`.
    #[must_use]
    pub fn heating(circuit: Circuit) -> Self {
        match circuit.number() {
            2 => Self::HeatingCircuit2,
            3 => Self::HeatingCircuit3,
            _ => Self::Heating,
        }
    }

    /// The setpoint-limit section of `circuit`.
    #[must_use]
    pub fn static_values(circuit: Circuit) -> Self {
        match circuit.number() {
            2 => Self::StaticValuesCircuit2,
            3 => Self::StaticValuesCircuit3,
            _ => Self::StaticValues,
        }
    }

    /// Returns the circuit a circuit-bound section belongs to.
    #[must_use]
    pub fn circuit(self) -> Option<Circuit> {
        match self {
            Self::Heating | Self::StaticValues => Some(Circuit::ONE),
            Self::HeatingCircuit2 | Self::StaticValuesCircuit2 => Some(Circuit::TWO),
            Self::HeatingCircuit3 | Self::StaticValuesCircuit3 => Some(Circuit::THREE),
            Self::Device | Self::Sensor | Self::HotWater => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ConfigurationError::SectionNotFound(s.to_string()))
    }
}

// =============================================================================
// Hot water groups
// =============================================================================

/// Subdivision of the hot water section, each validated on its own so that
/// reading the state does not pay for the configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HotWaterGroup {
    /// Operating mode, setpoint and live temperatures.
    Essential,
    /// Setpoint limits, legionella and circulation settings.
    Config,
    /// Weekly time program.
    Schedule,
}

impl HotWaterGroup {
    /// All groups.
    pub const ALL: [Self; 3] = [Self::Essential, Self::Config, Self::Schedule];

    /// Returns the group name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Essential => "essential",
            Self::Config => "config",
            Self::Schedule => "schedule",
        }
    }

    /// Returns true if the attribute `name` belongs to this group.
    #[must_use]
    pub fn contains(self, name: &str) -> bool {
        HOT_WATER
            .iter()
            .any(|(_, n, group)| *group == self && *n == name)
    }

    /// The error raised when the group has no parameter left.
    #[must_use]
    pub fn empty_error(self) -> ConfigurationError {
        match self {
            Self::Essential => ConfigurationError::NoEssentialHotWater,
            Self::Config => ConfigurationError::NoHotWaterConfig,
            Self::Schedule => ConfigurationError::NoHotWaterSchedule,
        }
    }
}

impl fmt::Display for HotWaterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Parameter tables
// =============================================================================

/// How a circuit-bound parameter is addressed on each circuit.
#[derive(Debug, Clone, Copy)]
enum CircuitIds {
    /// Circuit 1 ID; the others follow by the circuit offset.
    Offset(u32),
    /// Explicit ID per circuit.
    PerCircuit([u32; 3]),
    /// Exists on circuit 1 only.
    PrimaryOnly(u32),
}

impl CircuitIds {
    fn resolve(self, circuit: Circuit) -> Option<ParameterId> {
        match self {
            Self::Offset(id) => Some(ParameterId::new(id).offset(circuit.id_offset())),
            Self::PerCircuit(ids) => Some(ParameterId::new(ids[usize::from(circuit.number() - 1)])),
            Self::PrimaryOnly(id) => circuit.is_primary().then_some(ParameterId::new(id)),
        }
    }
}

const HEATING_BASE: &[(&str, CircuitIds)] = &[
    ("hvac_mode", CircuitIds::Offset(700)),
    ("target_temperature", CircuitIds::Offset(710)),
    ("hvac_mode2", CircuitIds::Offset(900)),
    ("hvac_action", CircuitIds::PerCircuit([8000, 8001, 8002])),
    ("current_temperature", CircuitIds::PerCircuit([8740, 8770, 8800])),
    ("room1_thermostat_mode", CircuitIds::PrimaryOnly(8749)),
];

const HEATING_V3: &[(&str, CircuitIds)] = &[(
    "room1_temp_setpoint_boost",
    CircuitIds::PrimaryOnly(770),
)];

const STATIC_BASE: &[(&str, CircuitIds)] = &[("min_temp", CircuitIds::Offset(714))];

const STATIC_V1: &[(&str, CircuitIds)] = &[("max_temp", CircuitIds::Offset(730))];

const STATIC_V3: &[(&str, CircuitIds)] = &[("max_temp", CircuitIds::Offset(716))];

const DEVICE: &[(u32, &str)] = &[
    (6224, "device_identification"),
    (6225, "controller_family"),
    (6226, "controller_variant"),
];

const SENSOR: &[(u32, &str)] = &[(8700, "outside_temperature"), (8740, "current_temperature")];

const HOT_WATER: &[(u32, &str, HotWaterGroup)] = &[
    (1600, "operating_mode", HotWaterGroup::Essential),
    (1610, "nominal_setpoint", HotWaterGroup::Essential),
    (1620, "release", HotWaterGroup::Essential),
    (8830, "dhw_actual_value_top_temperature", HotWaterGroup::Essential),
    (8820, "state_dhw_pump", HotWaterGroup::Essential),
    (1601, "eco_mode_selection", HotWaterGroup::Config),
    (1612, "reduced_setpoint", HotWaterGroup::Config),
    (1614, "nominal_setpoint_max", HotWaterGroup::Config),
    (1630, "dhw_charging_priority", HotWaterGroup::Config),
    (1640, "legionella_function", HotWaterGroup::Config),
    (1641, "legionella_function_periodicity", HotWaterGroup::Config),
    (1642, "legionella_function_day", HotWaterGroup::Config),
    (1644, "legionella_function_time", HotWaterGroup::Config),
    (1645, "legionella_function_setpoint", HotWaterGroup::Config),
    (1646, "legionella_function_dwelling_time", HotWaterGroup::Config),
    (1647, "legionella_circulation_pump", HotWaterGroup::Config),
    (1648, "legionella_circulation_temp_diff", HotWaterGroup::Config),
    (1660, "dhw_circulation_pump_release", HotWaterGroup::Config),
    (1661, "dhw_circulation_pump_cycling", HotWaterGroup::Config),
    (1663, "dhw_circulation_setpoint", HotWaterGroup::Config),
    (1680, "operating_mode_changeover", HotWaterGroup::Config),
    (561, "dhw_time_program_monday", HotWaterGroup::Schedule),
    (562, "dhw_time_program_tuesday", HotWaterGroup::Schedule),
    (563, "dhw_time_program_wednesday", HotWaterGroup::Schedule),
    (564, "dhw_time_program_thursday", HotWaterGroup::Schedule),
    (565, "dhw_time_program_friday", HotWaterGroup::Schedule),
    (566, "dhw_time_program_saturday", HotWaterGroup::Schedule),
    (567, "dhw_time_program_sunday", HotWaterGroup::Schedule),
    (576, "dhw_time_program_standard_values", HotWaterGroup::Schedule),
];

/// Parameter carrying the controller date and time.
pub const TIME_PARAMETER: ParameterId = ParameterId::new(0);

/// Parameter carrying the first weekday (Monday) of the hot water time program.
pub const DHW_TIME_PROGRAM_MONDAY: ParameterId = ParameterId::new(561);

/// Returns the parameter that identifies whether `circuit` exists (its
/// operating mode).
#[must_use]
pub fn circuit_probe_parameter(circuit: Circuit) -> ParameterId {
    ParameterId::new(700).offset(circuit.id_offset())
}

/// Returns the ID of a circuit-bound heating or setpoint-limit parameter.
///
/// `None` if `name` is unknown or does not exist on `circuit`.
#[must_use]
pub fn circuit_parameter_id(name: &str, circuit: Circuit) -> Option<ParameterId> {
    [HEATING_BASE, HEATING_V3, STATIC_BASE, STATIC_V1, STATIC_V3]
        .into_iter()
        .flatten()
        .find(|(n, _)| *n == name)
        .and_then(|(_, ids)| ids.resolve(circuit))
}

/// Names of every parameter declared for `section` by any generation.
///
/// Circuit sections only list names that exist on their circuit.
#[must_use]
pub fn declared_names(section: Section) -> Vec<&'static str> {
    let circuit = section.circuit().unwrap_or_default();
    let circuit_names = |tables: &[&[(&'static str, CircuitIds)]]| -> Vec<&'static str> {
        tables
            .iter()
            .flat_map(|t| t.iter())
            .filter(|(_, ids)| ids.resolve(circuit).is_some())
            .map(|(n, _)| *n)
            .collect()
    };
    match section {
        Section::Heating | Section::HeatingCircuit2 | Section::HeatingCircuit3 => {
            circuit_names(&[HEATING_BASE, HEATING_V3])
        }
        Section::StaticValues | Section::StaticValuesCircuit2 | Section::StaticValuesCircuit3 => {
            circuit_names(&[STATIC_BASE, STATIC_V1])
        }
        Section::Device => DEVICE.iter().map(|(_, n)| *n).collect(),
        Section::Sensor => SENSOR.iter().map(|(_, n)| *n).collect(),
        Section::HotWater => HOT_WATER.iter().map(|(_, n, _)| *n).collect(),
    }
}

// =============================================================================
// ApiConfig
// =============================================================================

/// A per-client schema snapshot: section → (parameter ID → attribute name).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiConfig {
    sections: BTreeMap<Section, ParamMap>,
}

impl ApiConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a section.
    #[must_use]
    pub fn with_section(mut self, section: Section, params: ParamMap) -> Self {
        self.sections.insert(section, params);
        self
    }

    /// Returns the parameters of `section`.
    #[must_use]
    pub fn section(&self, section: Section) -> Option<&ParamMap> {
        self.sections.get(&section)
    }

    /// Returns the parameters of `section`, failing when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::SectionNotFound` if the section is absent.
    pub fn require_section(&self, section: Section) -> Result<&ParamMap, ConfigurationError> {
        self.section(section)
            .ok_or_else(|| ConfigurationError::SectionNotFound(section.to_string()))
    }

    /// Returns true if `section` exists.
    #[must_use]
    pub fn contains_section(&self, section: Section) -> bool {
        self.sections.contains_key(&section)
    }

    /// Iterates over all sections.
    pub fn sections(&self) -> impl Iterator<Item = (Section, &ParamMap)> {
        self.sections.iter().map(|(section, params)| (*section, params))
    }

    /// Removes parameters from a section. Returns how many were removed.
    pub(crate) fn remove_parameters(&mut self, section: Section, ids: &[ParameterId]) -> usize {
        let Some(params) = self.sections.get_mut(&section) else {
            return 0;
        };
        ids.iter().filter(|id| params.remove(id).is_some()).count()
    }

    /// Finds the ID of the first parameter called `name`, searching sections
    /// in [`Section::ALL`] order.
    #[must_use]
    pub fn find_parameter_id(&self, name: &str) -> Option<ParameterId> {
        Section::ALL.into_iter().find_map(|section| {
            self.section(section)?
                .iter()
                .find(|(_, n)| **n == name)
                .map(|(id, _)| *id)
        })
    }

    /// Returns the hot water parameters split into their groups.
    #[must_use]
    pub fn hot_water_cache(&self) -> HotWaterParameterCache {
        self.section(Section::HotWater)
            .map(HotWaterParameterCache::from_params)
            .unwrap_or_default()
    }
}

impl From<ApiVersion> for ApiConfig {
    fn from(version: ApiVersion) -> Self {
        build_api_config(version.as_str())
    }
}

/// Builds the schema snapshot for a generation tag (`"v1"`, `"v3"`).
///
/// Unknown tags yield the base parameter set only.
#[must_use]
pub fn build_api_config(generation: &str) -> ApiConfig {
    type Table = &'static [(&'static str, CircuitIds)];
    let (heating_extra, static_extra): (Table, Table) = match generation {
        "v1" => (&[], STATIC_V1),
        "v3" => (HEATING_V3, STATIC_V3),
        _ => (&[], &[]),
    };

    let mut config = ApiConfig::new();
    for circuit in Circuit::ALL {
        config.sections.insert(
            Section::heating(circuit),
            circuit_params(&[HEATING_BASE, heating_extra], circuit),
        );
        config.sections.insert(
            Section::static_values(circuit),
            circuit_params(&[STATIC_BASE, static_extra], circuit),
        );
    }
    config.sections.insert(Section::Device, flat_params(DEVICE));
    config.sections.insert(Section::Sensor, flat_params(SENSOR));
    config.sections.insert(
        Section::HotWater,
        HOT_WATER
            .iter()
            .map(|(id, name, _)| (ParameterId::new(*id), *name))
            .collect(),
    );
    config
}

fn circuit_params(tables: &[&[(&'static str, CircuitIds)]], circuit: Circuit) -> ParamMap {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .filter_map(|(name, ids)| ids.resolve(circuit).map(|id| (id, *name)))
        .collect()
}

fn flat_params(table: &[(u32, &'static str)]) -> ParamMap {
    table
        .iter()
        .map(|(id, name)| (ParameterId::new(*id), *name))
        .collect()
}

// =============================================================================
// HotWaterParameterCache
// =============================================================================

/// The hot water section split into disjoint groups.
///
/// Every parameter of the section lands in exactly one group; names not
/// declared in any group are treated as configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotWaterParameterCache {
    essential: ParamMap,
    config: ParamMap,
    schedule: ParamMap,
}

impl HotWaterParameterCache {
    /// Splits a hot water parameter map into groups.
    #[must_use]
    pub fn from_params(params: &ParamMap) -> Self {
        let mut cache = Self::default();
        for (id, name) in params {
            let target = if HotWaterGroup::Essential.contains(name) {
                &mut cache.essential
            } else if HotWaterGroup::Schedule.contains(name) {
                &mut cache.schedule
            } else {
                &mut cache.config
            };
            target.insert(*id, *name);
        }
        cache
    }

    /// Returns the parameters of `group`.
    #[must_use]
    pub fn group(&self, group: HotWaterGroup) -> &ParamMap {
        match group {
            HotWaterGroup::Essential => &self.essential,
            HotWaterGroup::Config => &self.config,
            HotWaterGroup::Schedule => &self.schedule,
        }
    }

    /// Returns the union of all groups.
    #[must_use]
    pub fn all(&self) -> ParamMap {
        let mut all = self.essential.clone();
        all.extend(self.config.iter());
        all.extend(self.schedule.iter());
        all
    }

    /// Returns true when no group has any parameter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.essential.is_empty() && self.config.is_empty() && self.schedule.is_empty()
    }
}
