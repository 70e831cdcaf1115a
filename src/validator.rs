// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lazy parameter validation.
//!
//! The schema declares what a controller generation *may* support; the
//! [`ApiValidator`] narrows it down to what a specific device *does* support
//! by judging one live response per validation scope. A parameter is removed
//! when it is missing from the response or reports no value.
//!
//! Each scope moves through [`SectionState`]:
//!
//! ```text
//! Unvalidated --mark_validating--> Validating --validate_*--> Validated
//!      ^                               |                          |
//!      +--------mark_unvalidated-------+<--------reset------------+
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::response::ParameterResponse;
use crate::schema::{ApiConfig, HotWaterGroup, ParamMap, Section};
use crate::types::ParameterId;

/// A unit of validation: a schema section, or one group of the hot water
/// section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    /// A whole section.
    Section(Section),
    /// One hot water group.
    HotWater(HotWaterGroup),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section(section) => write!(f, "{section}"),
            Self::HotWater(group) => write!(f, "hot_water/{group}"),
        }
    }
}

impl From<Section> for Scope {
    fn from(section: Section) -> Self {
        Self::Section(section)
    }
}

impl From<HotWaterGroup> for Scope {
    fn from(group: HotWaterGroup) -> Self {
        Self::HotWater(group)
    }
}

/// Validation progress of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionState {
    /// Not yet judged against the device.
    #[default]
    Unvalidated,
    /// A validation round-trip is in flight.
    Validating,
    /// Judged; the surviving parameters are known to be supported.
    Validated,
}

/// Owns a schema snapshot and narrows it against live responses.
#[derive(Debug, Clone)]
pub struct ApiValidator {
    config: ApiConfig,
    states: HashMap<Scope, SectionState>,
}

impl ApiValidator {
    /// Creates a validator over an owned schema snapshot.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
        }
    }

    /// Returns the (possibly narrowed) schema snapshot.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Returns the current state of `scope`.
    #[must_use]
    pub fn state(&self, scope: impl Into<Scope>) -> SectionState {
        self.states
            .get(&scope.into())
            .copied()
            .unwrap_or_default()
    }

    /// Returns true once `scope` has been validated.
    #[must_use]
    pub fn is_validated(&self, scope: impl Into<Scope>) -> bool {
        self.state(scope) == SectionState::Validated
    }

    /// Returns true once `section` has been validated.
    #[must_use]
    pub fn is_section_validated(&self, section: Section) -> bool {
        self.is_validated(section)
    }

    /// Returns the current parameters of `section`.
    #[must_use]
    pub fn get_section_params(&self, section: Section) -> Option<&ParamMap> {
        self.config.section(section)
    }

    /// Returns the current parameters of a hot water group.
    #[must_use]
    pub fn hot_water_group_params(&self, group: HotWaterGroup) -> ParamMap {
        self.config.hot_water_cache().group(group).clone()
    }

    /// Returns the parameters a scope covers.
    #[must_use]
    pub fn scope_params(&self, scope: Scope) -> Option<ParamMap> {
        match scope {
            Scope::Section(section) => self.get_section_params(section).cloned(),
            Scope::HotWater(group) => self
                .config
                .contains_section(Section::HotWater)
                .then(|| self.hot_water_group_params(group)),
        }
    }

    /// Records that a validation round-trip for `scope` has started.
    pub fn mark_validating(&mut self, scope: impl Into<Scope>) {
        self.states.insert(scope.into(), SectionState::Validating);
    }

    /// Returns `scope` to the unvalidated state, e.g. after a failed
    /// round-trip.
    pub fn mark_unvalidated(&mut self, scope: impl Into<Scope>) {
        self.states.remove(&scope.into());
    }

    /// Judges `section` against a live response.
    ///
    /// With an `include` filter only the named parameters are judged; the
    /// others stay declared. Returns the removed IDs. Unknown and already
    /// validated sections are left untouched.
    pub fn validate_section(
        &mut self,
        section: Section,
        response: &ParameterResponse,
        include: Option<&[&str]>,
    ) -> Vec<ParameterId> {
        if !self.config.contains_section(section) {
            tracing::warn!(section = %section, "Unknown section");
            return Vec::new();
        }
        self.judge(Scope::Section(section), section, |_| true, response, include)
    }

    /// Judges one hot water group against a live response.
    ///
    /// Behaves like [`ApiValidator::validate_section`] restricted to the
    /// parameters of `group`.
    pub fn validate_hot_water_group(
        &mut self,
        group: HotWaterGroup,
        response: &ParameterResponse,
        include: Option<&[&str]>,
    ) -> Vec<ParameterId> {
        if !self.config.contains_section(Section::HotWater) {
            tracing::warn!(section = %Section::HotWater, "Unknown section");
            return Vec::new();
        }
        let cache = self.config.hot_water_cache();
        let members = cache.group(group);
        self.judge(
            Scope::HotWater(group),
            Section::HotWater,
            |id| members.contains_key(&id),
            response,
            include,
        )
    }

    fn judge(
        &mut self,
        scope: Scope,
        section: Section,
        in_scope: impl Fn(ParameterId) -> bool,
        response: &ParameterResponse,
        include: Option<&[&str]>,
    ) -> Vec<ParameterId> {
        if self.is_validated(scope) {
            tracing::debug!(scope = %scope, "Section already validated");
            return Vec::new();
        }

        let Some(params) = self.config.section(section) else {
            return Vec::new();
        };

        let mut unsupported = Vec::new();
        for (id, name) in params {
            if !in_scope(*id) {
                continue;
            }
            if include.is_some_and(|names| !names.contains(name)) {
                continue;
            }
            match response.get(*id) {
                None => {
                    tracing::info!(
                        parameter = %id,
                        name = %name,
                        "Parameter not found in device response"
                    );
                    unsupported.push(*id);
                }
                Some(entity) if !entity.has_value() => {
                    tracing::info!(
                        parameter = %id,
                        name = %name,
                        "Parameter returned invalid value"
                    );
                    unsupported.push(*id);
                }
                Some(_) => {}
            }
        }

        let removed = self.config.remove_parameters(section, &unsupported);
        self.states.insert(scope, SectionState::Validated);
        tracing::debug!(
            "Validated section '{}': removed {} unsupported parameters",
            scope,
            removed
        );
        unsupported
    }

    /// Clears the validation state of `scope`.
    ///
    /// Parameters removed by an earlier validation stay removed.
    pub fn reset_validation(&mut self, scope: impl Into<Scope>) {
        self.mark_unvalidated(scope);
    }

    /// Clears the validation state of every scope.
    pub fn reset_all(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build_api_config;
    use serde_json::json;

    fn response(value: serde_json::Value) -> ParameterResponse {
        ParameterResponse::from_json(&value).unwrap()
    }

    fn ids(params: &ParamMap) -> Vec<u32> {
        params.keys().map(|id| id.value()).collect()
    }

    fn heating_response_without_700() -> ParameterResponse {
        response(json!({
            "710": {"name": "Comfort setpoint", "value": "20.0", "dataType": 0},
            "900": {"name": "Operating level", "value": "---", "dataType": 1},
            "8000": {"name": "Status", "value": "114", "dataType": 1},
            "8740": {"name": "Room temp", "value": "19.5", "dataType": 0},
            "8749": {"name": "Thermostat", "value": "0", "dataType": 1}
        }))
    }

    #[test]
    fn removes_missing_and_no_data_parameters() {
        let mut validator = ApiValidator::new(build_api_config("v1"));
        let removed =
            validator.validate_section(Section::Heating, &heating_response_without_700(), None);

        assert_eq!(removed, vec![ParameterId::new(700), ParameterId::new(900)]);
        assert_eq!(
            ids(validator.get_section_params(Section::Heating).unwrap()),
            vec![710, 8000, 8740, 8749]
        );
        assert!(validator.is_section_validated(Section::Heating));
    }

    #[test]
    fn validation_is_idempotent() {
        let mut validator = ApiValidator::new(build_api_config("v1"));
        validator.validate_section(Section::Heating, &heating_response_without_700(), None);
        let snapshot = validator.config().clone();

        let removed = validator.validate_section(Section::Heating, &response(json!({})), None);
        assert!(removed.is_empty());
        assert_eq!(validator.config(), &snapshot);
    }

    #[test]
    fn surviving_set_is_subset_of_declared() {
        let declared = build_api_config("v3");
        let mut validator = ApiValidator::new(declared.clone());
        validator.validate_section(Section::Heating, &heating_response_without_700(), None);

        let before = declared.section(Section::Heating).unwrap();
        let after = validator.get_section_params(Section::Heating).unwrap();
        assert!(after.keys().all(|id| before.contains_key(id)));
        for id in before.keys() {
            let kept = after.contains_key(id);
            assert_eq!(kept, heating_response_without_700().has_value(*id), "{id}");
        }
    }

    #[test]
    fn include_filter_judges_only_named_parameters() {
        let mut validator = ApiValidator::new(build_api_config("v1"));
        let removed = validator.validate_section(
            Section::Heating,
            &response(json!({
                "710": {"name": "Comfort setpoint", "value": "20.0", "dataType": 0}
            })),
            Some(&["target_temperature", "hvac_mode"]),
        );

        assert_eq!(removed, vec![ParameterId::new(700)]);
        let params = validator.get_section_params(Section::Heating).unwrap();
        assert!(params.contains_key(&ParameterId::new(900)));
        assert!(params.contains_key(&ParameterId::new(8000)));
        assert!(validator.is_section_validated(Section::Heating));
    }

    #[test]
    fn unknown_section_is_a_no_op() {
        let mut validator = ApiValidator::new(ApiConfig::new());
        let removed = validator.validate_section(Section::Sensor, &response(json!({})), None);
        assert!(removed.is_empty());
        assert!(!validator.is_section_validated(Section::Sensor));
    }

    #[test]
    fn reset_keeps_removed_parameters_removed() {
        let mut validator = ApiValidator::new(build_api_config("v1"));
        validator.validate_section(Section::Heating, &heating_response_without_700(), None);
        validator.reset_validation(Section::Heating);

        assert_eq!(validator.state(Section::Heating), SectionState::Unvalidated);
        assert!(
            !validator
                .get_section_params(Section::Heating)
                .unwrap()
                .contains_key(&ParameterId::new(700))
        );
    }

    #[test]
    fn state_transitions() {
        let mut validator = ApiValidator::new(build_api_config("v3"));
        assert_eq!(validator.state(Section::Sensor), SectionState::Unvalidated);
        validator.mark_validating(Section::Sensor);
        assert_eq!(validator.state(Section::Sensor), SectionState::Validating);
        validator.mark_unvalidated(Section::Sensor);
        assert_eq!(validator.state(Section::Sensor), SectionState::Unvalidated);
    }

    #[test]
    fn hot_water_groups_validate_independently() {
        let mut validator = ApiValidator::new(build_api_config("v3"));
        let removed = validator.validate_hot_water_group(
            HotWaterGroup::Essential,
            &response(json!({
                "1600": {"name": "Operating mode", "value": "1", "dataType": 1},
                "1610": {"name": "Nominal setpoint", "value": "50.0", "dataType": 0},
                "1620": {"name": "Release", "value": "2", "dataType": 1},
                "8830": {"name": "DHW temp", "value": "48.5", "dataType": 0}
            })),
            None,
        );

        assert_eq!(removed, vec![ParameterId::new(8820)]);
        assert!(validator.is_validated(HotWaterGroup::Essential));
        assert!(!validator.is_validated(HotWaterGroup::Config));
        assert_eq!(
            validator.hot_water_group_params(HotWaterGroup::Essential).len(),
            4
        );
        assert_eq!(validator.hot_water_group_params(HotWaterGroup::Config).len(), 16);
        assert_eq!(
            validator.hot_water_group_params(HotWaterGroup::Schedule).len(),
            8
        );
    }

    #[test]
    fn reset_all_clears_every_scope() {
        let mut validator = ApiValidator::new(build_api_config("v3"));
        validator.validate_section(Section::Sensor, &response(json!({})), None);
        validator.validate_hot_water_group(HotWaterGroup::Schedule, &response(json!({})), None);
        validator.reset_all();
        assert!(!validator.is_section_validated(Section::Sensor));
        assert!(!validator.is_validated(HotWaterGroup::Schedule));
    }
}
