// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for BSB-LAN JSON responses.
//!
//! The query endpoint answers with an object keyed by parameter number. Each
//! entry is decoded into an [`EntityInfo`]; the `"---"` no-data marker becomes
//! an absent value at this boundary. Typed models such as [`State`] are then
//! assembled from the entries by attribute name through [`FromParameters`].

mod entity;
mod models;
mod parameters;

pub use entity::{DataType, EntityInfo, EntityValue};
pub use models::{
    Device, DeviceTime, HotWaterConfig, HotWaterSchedule, HotWaterState, Info, Sensor, State,
    StaticState,
};
pub use parameters::{FromParameters, ParameterResponse};
