// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level client for BSB-LAN controllers.
//!
//! [`Bsblan`] resolves the firmware generation on first use and validates
//! each parameter group lazily: the first read of a group issues one
//! validation round-trip that drops the parameters the device does not
//! support, every later read only fetches the surviving parameters.
//!
//! ```no_run
//! use bsblan_lib::Bsblan;
//!
//! # async fn example() -> bsblan_lib::Result<()> {
//! let client = Bsblan::http("192.168.1.100")
//!     .with_passkey("1234")
//!     .build()
//!     .await?;
//!
//! let state = client.state(1, None).await?;
//! if let Some(mode) = state.hvac_mode_value() {
//!     println!("circuit 1 is in {mode} mode");
//! }
//!
//! // Only fetch what is needed
//! let state = client.state(2, Some(&["target_temperature"])).await?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "http")]
mod http_builder;
mod ranges;
mod settings;

#[cfg(feature = "http")]
pub use http_builder::BsblanBuilder;
pub use settings::{HotWaterSettings, ThermostatSettings};

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{Mutex, OnceCell};

use crate::error::{ConfigurationError, Error, ParseError, ValueError};
use crate::protocol::{Protocol, Request, SetParameter};
use crate::response::{
    Device, DeviceTime, EntityInfo, FromParameters, HotWaterConfig, HotWaterSchedule,
    HotWaterState, Info, ParameterResponse, Sensor, State, StaticState,
};
use crate::schema::{
    ApiConfig, HotWaterGroup, ParamMap, Section, TIME_PARAMETER, circuit_parameter_id,
    circuit_probe_parameter, declared_names,
};
use crate::types::{
    Circuit, DeviceDateTime, DhwSchedule, ParameterId, TemperatureUnit, format_decimal,
};
use crate::validator::{ApiValidator, Scope, SectionState};
use crate::version::ApiVersion;

use ranges::TemperatureRanges;
use settings::dhw_time_program_id;

/// Firmware, generation and validated schema, resolved once per client.
#[derive(Debug)]
struct ApiContext {
    firmware: String,
    version: ApiVersion,
    validator: RwLock<ApiValidator>,
}

/// Returns the scope to `Unvalidated` unless disarmed, so that a failed or
/// cancelled validation round-trip leaves no partial state behind.
struct ValidationGuard<'a> {
    validator: &'a RwLock<ApiValidator>,
    scope: Scope,
    armed: bool,
}

impl ValidationGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ValidationGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!(scope = %self.scope, "Validation did not complete, resetting state");
            self.validator.write().mark_unvalidated(self.scope);
        }
    }
}

/// A BSB-LAN controller.
///
/// Cheap operations such as [`Bsblan::get_parameter_id`] never touch the
/// network. Read operations initialize the client on first use. The type
/// parameter selects the transport; [`crate::protocol::HttpClient`] is the
/// default one.
#[derive(Debug)]
pub struct Bsblan<P: Protocol> {
    protocol: Arc<P>,
    context: OnceCell<ApiContext>,
    scope_locks: HashMap<Scope, Mutex<()>>,
    ranges: RwLock<TemperatureRanges>,
    temperature_unit: RwLock<Option<TemperatureUnit>>,
}

impl<P: Protocol> Bsblan<P> {
    /// Creates a client over an existing transport. Nothing is requested
    /// until the first operation.
    #[must_use]
    pub fn new(protocol: P) -> Self {
        let scope_locks = Section::ALL
            .into_iter()
            .map(Scope::Section)
            .chain(HotWaterGroup::ALL.into_iter().map(Scope::HotWater))
            .map(|scope| (scope, Mutex::new(())))
            .collect();

        Self {
            protocol: Arc::new(protocol),
            context: OnceCell::new(),
            scope_locks,
            ranges: RwLock::new(TemperatureRanges::default()),
            temperature_unit: RwLock::new(None),
        }
    }

    // ========== Initialization ==========

    /// Fetches the firmware version and builds the schema snapshot.
    ///
    /// Runs at most once per client; concurrent callers share the same
    /// attempt. A failed attempt is retried by the next caller.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the device cannot be reached and
    /// `VersionError` if its firmware has no supported schema.
    pub async fn initialize(&self) -> Result<(), Error> {
        self.context().await.map(|_| ())
    }

    async fn context(&self) -> Result<&ApiContext, Error> {
        self.context
            .get_or_try_init(|| async {
                let device = self.device().await?;
                let version = ApiVersion::from_firmware(&device.version)?;
                tracing::debug!(
                    firmware = %device.version,
                    api_version = %version,
                    "Resolved API version"
                );
                Ok::<_, Error>(ApiContext {
                    firmware: device.version,
                    version,
                    validator: RwLock::new(ApiValidator::new(ApiConfig::from(version))),
                })
            })
            .await
    }

    fn initialized_context(&self) -> Result<&ApiContext, ConfigurationError> {
        self.context
            .get()
            .ok_or(ConfigurationError::ApiDataNotInitialized)
    }

    /// Returns the firmware version once initialized.
    #[must_use]
    pub fn firmware_version(&self) -> Option<&str> {
        self.context.get().map(|ctx| ctx.firmware.as_str())
    }

    /// Returns the schema generation once initialized.
    #[must_use]
    pub fn api_version(&self) -> Option<ApiVersion> {
        self.context.get().map(|ctx| ctx.version)
    }

    /// Returns a copy of the current schema snapshot once initialized.
    #[must_use]
    pub fn api_config(&self) -> Option<ApiConfig> {
        self.context
            .get()
            .map(|ctx| ctx.validator.read().config().clone())
    }

    /// Returns the validation state of a section or hot water group.
    #[must_use]
    pub fn validation_state(&self, scope: impl Into<Scope>) -> SectionState {
        self.context
            .get()
            .map(|ctx| ctx.validator.read().state(scope))
            .unwrap_or_default()
    }

    // ========== Lazy validation ==========

    /// Validates `scope` unless already done, issuing at most one request.
    ///
    /// Callers arriving while a validation of the same scope is in flight
    /// wait for it instead of starting their own.
    async fn ensure_validated(
        &self,
        ctx: &ApiContext,
        scope: Scope,
        include: Option<&[&str]>,
    ) -> Result<(), Error> {
        if ctx.validator.read().is_validated(scope) {
            return Ok(());
        }

        let _lock = match self.scope_locks.get(&scope) {
            Some(lock) => lock.lock().await,
            None => return Err(ConfigurationError::SectionNotFound(scope.to_string()).into()),
        };

        if ctx.validator.read().is_validated(scope) {
            return Ok(());
        }

        let ids: Vec<ParameterId> = {
            let validator = ctx.validator.read();
            let params = validator
                .scope_params(scope)
                .ok_or_else(|| ConfigurationError::SectionNotFound(scope.to_string()))?;
            filter_include(&params, include).into_keys().collect()
        };

        ctx.validator.write().mark_validating(scope);
        let guard = ValidationGuard {
            validator: &ctx.validator,
            scope,
            armed: true,
        };

        let response = if ids.is_empty() {
            ParameterResponse::default()
        } else {
            self.query(&ids).await?
        };

        {
            let mut validator = ctx.validator.write();
            match scope {
                Scope::Section(section) => {
                    validator.validate_section(section, &response, include);
                }
                Scope::HotWater(group) => {
                    validator.validate_hot_water_group(group, &response, include);
                }
            }
        }
        guard.disarm();
        Ok(())
    }

    /// Reads a validated scope into a model.
    async fn read_scope<M: FromParameters>(
        &self,
        scope: Scope,
        include: Option<&[&str]>,
    ) -> Result<M, Error> {
        check_include_declared(scope, include)?;
        let ctx = self.context().await?;

        if include.is_some() {
            let validator = ctx.validator.read();
            let params = validator
                .scope_params(scope)
                .ok_or_else(|| ConfigurationError::SectionNotFound(scope.to_string()))?;
            if filter_include(&params, include).is_empty() {
                return Err(ConfigurationError::InvalidIncludeParams.into());
            }
        }

        self.ensure_validated(ctx, scope, include).await?;

        let params = {
            let validator = ctx.validator.read();
            let params = validator
                .scope_params(scope)
                .ok_or_else(|| ConfigurationError::SectionNotFound(scope.to_string()))?;
            filter_include(&params, include)
        };
        if params.is_empty() {
            return Err(match (scope, include) {
                (_, Some(_)) => ConfigurationError::InvalidIncludeParams,
                (Scope::Section(section), None) => {
                    ConfigurationError::NoValidParameters(section.to_string())
                }
                (Scope::HotWater(group), None) => group.empty_error(),
            }
            .into());
        }

        let ids: Vec<ParameterId> = params.keys().copied().collect();
        let response = self.query(&ids).await?;
        Ok(M::from_parameters(&params, &response))
    }

    async fn query(&self, ids: &[ParameterId]) -> Result<ParameterResponse, Error> {
        let body = self.protocol.request(&Request::query(ids)).await?;
        Ok(ParameterResponse::from_json(&body)?)
    }

    async fn write(&self, parameter: &SetParameter) -> Result<(), Error> {
        let response = self.protocol.request(&Request::set(parameter)).await?;
        tracing::debug!(
            parameter = %parameter.parameter(),
            response = %response,
            "Parameter written"
        );
        Ok(())
    }

    // ========== Reads ==========

    /// Reads the firmware identification block.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response is malformed.
    pub async fn device(&self) -> Result<Device, Error> {
        let body = self.protocol.request(&Request::device_info()).await?;
        serde_json::from_value(body).map_err(|err| ParseError::Json(err).into())
    }

    /// Reads the controller identification parameters.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, no parameter is supported or the
    /// include filter is empty or matches nothing.
    pub async fn info(&self, include: Option<&[&str]>) -> Result<Info, Error> {
        self.read_scope(Scope::Section(Section::Device), include)
            .await
    }

    /// Reads the state of a heating circuit (1-3).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidCircuit` for other circuit numbers before
    /// any request, and the errors of [`Bsblan::info`].
    pub async fn state(&self, circuit: u8, include: Option<&[&str]>) -> Result<State, Error> {
        let circuit = Circuit::new(circuit)?;
        self.read_scope(Scope::Section(Section::heating(circuit)), include)
            .await
    }

    /// Reads the outdoor and room sensors.
    ///
    /// # Errors
    ///
    /// Same as [`Bsblan::info`].
    pub async fn sensor(&self, include: Option<&[&str]>) -> Result<Sensor, Error> {
        self.read_scope(Scope::Section(Section::Sensor), include)
            .await
    }

    /// Reads the setpoint limits of a heating circuit (1-3) and remembers
    /// them for later setpoint checks.
    ///
    /// # Errors
    ///
    /// Same as [`Bsblan::state`].
    pub async fn static_values(
        &self,
        circuit: u8,
        include: Option<&[&str]>,
    ) -> Result<StaticState, Error> {
        let circuit = Circuit::new(circuit)?;
        let values: StaticState = self
            .read_scope(Scope::Section(Section::static_values(circuit)), include)
            .await?;

        let min = values.min_temp.as_ref().and_then(EntityInfo::as_f64);
        let max = values.max_temp.as_ref().and_then(EntityInfo::as_f64);
        self.ranges.write().store(circuit, min, max);
        if circuit.is_primary() && values.min_temp.is_some() {
            *self.temperature_unit.write() = Some(values.temperature_unit());
        }
        tracing::debug!(circuit = %circuit, min = ?min, max = ?max, "Stored temperature range");

        Ok(values)
    }

    /// Reads the essential hot water parameters.
    ///
    /// # Errors
    ///
    /// Returns "No essential hot water parameters available" when the device
    /// supports none of them, and the errors of [`Bsblan::info`].
    pub async fn hot_water_state(&self, include: Option<&[&str]>) -> Result<HotWaterState, Error> {
        self.read_scope(Scope::HotWater(HotWaterGroup::Essential), include)
            .await
    }

    /// Reads the hot water configuration.
    ///
    /// # Errors
    ///
    /// Returns "No hot water configuration parameters available" when the
    /// device supports none of them, and the errors of [`Bsblan::info`].
    pub async fn hot_water_config(
        &self,
        include: Option<&[&str]>,
    ) -> Result<HotWaterConfig, Error> {
        self.read_scope(Scope::HotWater(HotWaterGroup::Config), include)
            .await
    }

    /// Reads the hot water time program.
    ///
    /// # Errors
    ///
    /// Returns "No hot water schedule parameters available" when the device
    /// supports none of them, and the errors of [`Bsblan::info`].
    pub async fn hot_water_schedule(
        &self,
        include: Option<&[&str]>,
    ) -> Result<HotWaterSchedule, Error> {
        self.read_scope(Scope::HotWater(HotWaterGroup::Schedule), include)
            .await
    }

    /// Reads the controller clock.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn time(&self) -> Result<DeviceTime, Error> {
        let params: ParamMap = [(TIME_PARAMETER, "time")].into_iter().collect();
        let response = self.query(&[TIME_PARAMETER]).await?;
        Ok(DeviceTime::from_parameters(&params, &response))
    }

    /// Returns the temperature unit of the device, reading the static values
    /// of circuit 1 if it is not known yet. Defaults to Celsius.
    ///
    /// # Errors
    ///
    /// Returns error if the static values cannot be read.
    pub async fn temperature_unit(&self) -> Result<TemperatureUnit, Error> {
        let known = *self.temperature_unit.read();
        if let Some(unit) = known {
            return Ok(unit);
        }
        self.static_values(Circuit::ONE.number(), None).await?;
        Ok(self.temperature_unit.read().unwrap_or_default())
    }

    /// Probes heating circuits 1-3 and returns the numbers of those present.
    ///
    /// Each circuit is probed with one request for its operating mode. A
    /// failed probe only excludes that circuit.
    pub async fn get_available_circuits(&self) -> Vec<u8> {
        let mut available = Vec::new();
        for circuit in Circuit::ALL {
            let probe = circuit_probe_parameter(circuit);
            match self.query(&[probe]).await {
                Ok(response) => {
                    let present = response.get(probe).is_some_and(|entity| {
                        entity.has_value()
                            && entity.raw_value().is_some_and(|v| !v.trim().is_empty())
                    });
                    if present {
                        available.push(circuit.number());
                    } else {
                        tracing::debug!(circuit = %circuit, "Heating circuit not available");
                    }
                }
                Err(err) => {
                    tracing::debug!(circuit = %circuit, error = %err, "Heating circuit probe failed");
                }
            }
        }
        available
    }

    // ========== Arbitrary parameters ==========

    /// Reads a single parameter by ID.
    ///
    /// Returns `None` if the device does not report a value for it.
    ///
    /// # Errors
    ///
    /// Returns "Parameter ID cannot be empty" for a blank ID, a
    /// `ValueError` for a non-numeric one, and transport errors.
    pub async fn read_parameter(&self, id: &str) -> Result<Option<EntityInfo>, Error> {
        let id: ParameterId = id.parse()?;
        Ok(self.read_parameters_by_id(&[id]).await?.remove(&id))
    }

    /// Reads several parameters by ID. Parameters without a value are left
    /// out of the result.
    ///
    /// # Errors
    ///
    /// Returns "No parameter IDs provided" for an empty list, and the errors
    /// of [`Bsblan::read_parameter`].
    pub async fn read_parameters(
        &self,
        ids: &[&str],
    ) -> Result<BTreeMap<ParameterId, EntityInfo>, Error> {
        if ids.is_empty() {
            return Err(ConfigurationError::NoParameterIds.into());
        }
        let ids = ids
            .iter()
            .map(|id| id.parse())
            .collect::<Result<Vec<ParameterId>, ValueError>>()?;
        self.read_parameters_by_id(&ids).await
    }

    async fn read_parameters_by_id(
        &self,
        ids: &[ParameterId],
    ) -> Result<BTreeMap<ParameterId, EntityInfo>, Error> {
        let response = self.query(ids).await?;
        Ok(response
            .into_entries()
            .into_iter()
            .filter(|(id, entity)| ids.contains(id) && entity.has_value())
            .collect())
    }

    /// Reads a parameter by its attribute name (`"hvac_mode"`).
    ///
    /// # Errors
    ///
    /// Returns "API data not initialized" before the client is initialized,
    /// "Could not resolve any parameter names" for unknown names, and
    /// transport errors.
    pub async fn read_parameter_by_name(&self, name: &str) -> Result<Option<EntityInfo>, Error> {
        if name.trim().is_empty() {
            return Err(ValueError::EmptyParameterName.into());
        }
        let id = self
            .resolve_names(&[name])?
            .into_values()
            .next()
            .ok_or_else(|| ValueError::UnresolvedNames(vec![name.to_string()]))?;
        Ok(self.read_parameters_by_id(&[id]).await?.remove(&id))
    }

    /// Reads several parameters by attribute name, keyed by name. Names that
    /// cannot be resolved are skipped as long as at least one resolves.
    ///
    /// # Errors
    ///
    /// Returns "No parameter names provided" for an empty list and the
    /// errors of [`Bsblan::read_parameter_by_name`].
    pub async fn read_parameters_by_name(
        &self,
        names: &[&str],
    ) -> Result<BTreeMap<String, EntityInfo>, Error> {
        if names.is_empty() {
            return Err(ConfigurationError::NoParameterNames.into());
        }
        let resolved = self.resolve_names(names)?;
        if resolved.is_empty() {
            return Err(ValueError::UnresolvedNames(
                names.iter().map(ToString::to_string).collect(),
            )
            .into());
        }
        for name in names.iter().filter(|name| !resolved.contains_key(**name)) {
            tracing::warn!(name = %name, "Could not resolve parameter name");
        }

        let ids: Vec<ParameterId> = resolved.values().copied().collect();
        let mut values = self.read_parameters_by_id(&ids).await?;
        Ok(resolved
            .into_iter()
            .filter_map(|(name, id)| values.remove(&id).map(|entity| (name, entity)))
            .collect())
    }

    fn resolve_names(&self, names: &[&str]) -> Result<BTreeMap<String, ParameterId>, Error> {
        let ctx = self.initialized_context()?;
        let validator = ctx.validator.read();
        Ok(names
            .iter()
            .filter_map(|name| {
                validator
                    .config()
                    .find_parameter_id(name)
                    .map(|id| ((*name).to_string(), id))
            })
            .collect())
    }

    /// Looks up the ID of an attribute name in the schema snapshot.
    ///
    /// `None` if unknown or if the client is not initialized.
    #[must_use]
    pub fn get_parameter_id(&self, name: &str) -> Option<ParameterId> {
        self.resolve_names(&[name]).ok()?.into_values().next()
    }

    /// Looks up several attribute names; unknown names are left out.
    #[must_use]
    pub fn get_parameter_ids(&self, names: &[&str]) -> BTreeMap<String, ParameterId> {
        self.resolve_names(names).unwrap_or_default()
    }

    // ========== Writes ==========

    /// Changes the comfort setpoint or the operating mode of a circuit (1-3).
    ///
    /// A setpoint is checked against the circuit's limits, which are read
    /// from the device on first use.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidCircuit`, "No state provided" or "Only one
    /// parameter can be set at a time" before any request,
    /// "Temperature range not initialized" if the limits are unknown and
    /// `ValueError::TemperatureOutOfRange` for setpoints outside them.
    pub async fn thermostat(&self, settings: ThermostatSettings, circuit: u8) -> Result<(), Error> {
        let circuit = Circuit::new(circuit)?;
        settings.ensure_single()?;

        let write = if let Some(temperature) = settings.target_temperature() {
            self.check_setpoint(circuit, temperature).await?;
            SetParameter::value(
                heating_parameter("target_temperature", circuit)?,
                format_decimal(temperature),
            )
        } else if let Some(mode) = settings.hvac_mode() {
            SetParameter::enum_value(
                heating_parameter("hvac_mode", circuit)?,
                mode.as_raw().to_string(),
            )
        } else {
            return Err(ConfigurationError::NoState.into());
        };

        self.write(&write).await
    }

    async fn check_setpoint(&self, circuit: Circuit, temperature: f64) -> Result<(), Error> {
        if !temperature.is_finite() {
            return Err(ValueError::InvalidTemperature(temperature.to_string()).into());
        }
        let initialized = self.ranges.read().is_initialized(circuit);
        if !initialized {
            self.static_values(circuit.number(), None).await?;
        }
        let range = self
            .ranges
            .read()
            .get(circuit)
            .ok_or(ConfigurationError::TemperatureRangeNotInitialized(
                circuit.number(),
            ))?;
        range.check(temperature)?;
        Ok(())
    }

    /// Writes one hot water parameter.
    ///
    /// # Errors
    ///
    /// Returns "No state provided" or "Only one parameter can be set at a
    /// time" before any request, and transport errors.
    pub async fn set_hot_water(&self, settings: HotWaterSettings) -> Result<(), Error> {
        let write = settings.into_single()?;
        self.write(&write).await
    }

    /// Writes the hot water time program, one request per provided day.
    ///
    /// # Errors
    ///
    /// Returns "No schedule provided" if no day is set, and transport errors.
    pub async fn set_hot_water_schedule(&self, schedule: &DhwSchedule) -> Result<(), Error> {
        if !schedule.has_any_schedule() {
            return Err(ConfigurationError::NoSchedule.into());
        }
        for (weekday, day) in schedule.days() {
            let write = SetParameter::value(dhw_time_program_id(weekday), day.to_string());
            self.write(&write).await?;
        }
        Ok(())
    }

    /// Sets the controller clock from a `DD.MM.YYYY HH:MM:SS` string.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidDateTime` for malformed values or years
    /// outside 1900-2100, before any request.
    pub async fn set_time(&self, time: &str) -> Result<(), Error> {
        let time: DeviceDateTime = time.parse()?;
        self.write(&SetParameter::value(TIME_PARAMETER, time.to_string()))
            .await
    }

    /// Sends a room temperature measurement to the controller.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` for values outside -10..=50 °C (14..=122 °F).
    pub async fn push_temperature(&self, temperature: f64) -> Result<(), Error> {
        let unit = self.temperature_unit().await?;
        unit.room_temperature_range().check(temperature)?;
        let response = self
            .protocol
            .request(&Request::push_room_temperature(temperature))
            .await?;
        tracing::debug!(response = %response, "Room temperature pushed");
        Ok(())
    }

    // ========== Validation control ==========

    /// Forgets that `section` was validated; the next read validates again.
    ///
    /// `Section::HotWater` resets all three hot water groups.
    pub fn reset_validation(&self, section: Section) {
        if section == Section::HotWater {
            for group in HotWaterGroup::ALL {
                self.reset_scope(Scope::HotWater(group));
            }
        } else {
            self.reset_scope(Scope::Section(section));
        }
    }

    /// Forgets that a hot water group was validated.
    pub fn reset_hot_water_validation(&self, group: HotWaterGroup) {
        self.reset_scope(Scope::HotWater(group));
    }

    /// Forgets every validation.
    pub fn reset_all_validation(&self) {
        if let Some(ctx) = self.context.get() {
            ctx.validator.write().reset_all();
        }
    }

    fn reset_scope(&self, scope: Scope) {
        if let Some(ctx) = self.context.get() {
            ctx.validator.write().reset_validation(scope);
        }
    }
}

/// Fails before any request when an include filter is empty or names no
/// parameter the scope could ever declare.
fn check_include_declared(scope: Scope, include: Option<&[&str]>) -> Result<(), ConfigurationError> {
    let Some(names) = include else {
        return Ok(());
    };
    if names.is_empty() {
        return Err(ConfigurationError::EmptyIncludeList);
    }
    let known = match scope {
        Scope::Section(section) => {
            let declared = declared_names(section);
            names.iter().any(|name| declared.contains(name))
        }
        Scope::HotWater(group) => names.iter().any(|name| group.contains(name)),
    };
    if known {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidIncludeParams)
    }
}

fn filter_include(params: &ParamMap, include: Option<&[&str]>) -> ParamMap {
    match include {
        None => params.clone(),
        Some(names) => params
            .iter()
            .filter(|(_, name)| names.contains(name))
            .map(|(id, name)| (*id, *name))
            .collect(),
    }
}

fn heating_parameter(name: &str, circuit: Circuit) -> Result<ParameterId, ConfigurationError> {
    circuit_parameter_id(name, circuit)
        .ok_or_else(|| ConfigurationError::SectionNotFound(Section::heating(circuit).to_string()))
}
