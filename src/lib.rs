// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `BSB-LAN` Lib - A Rust library to read and control heating controllers
//! through a BSB-LAN adapter.
//!
//! The adapter exposes the controller's numbered parameters over a JSON HTTP
//! API. This library maps them to typed models and takes care of the
//! differences between firmware generations.
//!
//! # Supported Features
//!
//! - **Heating circuits**: State, setpoint limits and thermostat writes for
//!   circuits 1-3
//! - **Hot water**: State, configuration, time program and writes
//! - **Sensors**: Outdoor and room temperatures, pushed room temperature
//! - **Device**: Firmware identification, controller clock
//! - **Raw access**: Any parameter by ID or by attribute name
//!
//! # Lazy Validation
//!
//! Controllers support different subsets of parameters. The first read of a
//! section asks the device for every parameter the section declares and drops
//! those it does not answer; all later reads only request the survivors.
//! Concurrent first reads share a single validation request.
//!
//! # Quick Start
//!
//! ```no_run
//! use bsblan_lib::{Bsblan, HvacMode, ThermostatSettings};
//!
//! #[tokio::main]
//! async fn main() -> bsblan_lib::Result<()> {
//!     let client = Bsblan::http("192.168.1.100")
//!         .with_passkey("1234")
//!         .build()
//!         .await?;
//!
//!     let state = client.state(1, None).await?;
//!     if let Some(temp) = state.current_temperature.as_ref().and_then(|e| e.as_f64()) {
//!         println!("room: {temp}");
//!     }
//!
//!     client
//!         .thermostat(ThermostatSettings::new().with_hvac_mode(HvacMode::Eco), 1)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Transport
//!
//! ```ignore
//! use bsblan_lib::{Bsblan, protocol::{Protocol, Request}};
//!
//! struct Recorded;
//!
//! impl Protocol for Recorded {
//!     async fn request(&self, request: &Request) -> bsblan_lib::Result<serde_json::Value> {
//!         todo!()
//!     }
//! }
//!
//! let client = Bsblan::new(Recorded);
//! ```

mod client;
pub mod error;
pub mod protocol;
pub mod response;
pub mod schema;
pub mod types;
pub mod validator;
pub mod version;

#[cfg(feature = "http")]
pub use client::BsblanBuilder;
pub use client::{Bsblan, HotWaterSettings, ThermostatSettings};
pub use error::{
    ConfigurationError, Error, ParseError, ProtocolError, Result, ValueError, VersionError,
};
#[cfg(feature = "http")]
pub use protocol::{HttpConfig, RetryPolicy};
pub use response::{
    Device, DeviceTime, EntityInfo, HotWaterConfig, HotWaterSchedule, HotWaterState, Info, Sensor,
    State, StaticState,
};
pub use schema::{HotWaterGroup, Section};
pub use types::{
    Circuit, DaySchedule, DeviceDateTime, DhwSchedule, HvacMode, ParameterId, TemperatureRange,
    TemperatureUnit, TimeSlot,
};
pub use validator::{Scope, SectionState};
pub use version::ApiVersion;
