// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for BSB-LAN parameters.
//!
//! Each type validates its value at construction time, so an invalid value
//! is rejected locally before any request reaches the controller.
//!
//! # Types
//!
//! - [`ParameterId`] - Numeric parameter identifier
//! - [`Circuit`] - Heating circuit (1-3)
//! - [`HvacMode`] - Heating circuit operating mode
//! - [`TemperatureUnit`] / [`TemperatureRange`] - Setpoint bounds
//! - [`DeviceDateTime`] - Controller clock value
//! - [`TimeSlot`] / [`DaySchedule`] / [`DhwSchedule`] - Hot water time program

mod circuit;
mod climate;
mod datetime;
mod parameter_id;
mod schedule;

pub use circuit::Circuit;
pub(crate) use climate::{format_decimal, normalize_unit};
pub use climate::{HvacMode, TemperatureRange, TemperatureUnit};
pub use datetime::DeviceDateTime;
pub use parameter_id::ParameterId;
pub use schedule::{DaySchedule, DhwSchedule, MAX_SLOTS_PER_DAY, TimeSlot};
