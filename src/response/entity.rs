// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A single parameter as returned by the query endpoint.

use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::Value;

use crate::types::normalize_unit;

/// Marker the controller sends for "not supported / no data".
pub(crate) const NO_DATA: &str = "---";

/// Kind of value a parameter carries (`dataType` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// Plain number.
    #[default]
    Plain,
    /// Enumeration: numeric value plus text in `desc`.
    Enum,
    /// Bit field.
    Bits,
    /// Day of week.
    Weekday,
    /// `HH:MM`.
    HourMinute,
    /// Date and time.
    DateTime,
    /// Day and month.
    DayMonth,
    /// Free text.
    String,
    /// Time program entry of a PPS interface.
    PpsTime,
    /// Any other type code.
    Other(i64),
}

impl DataType {
    /// Maps the numeric wire code.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Plain,
            1 => Self::Enum,
            2 => Self::Bits,
            3 => Self::Weekday,
            4 => Self::HourMinute,
            5 => Self::DateTime,
            6 => Self::DayMonth,
            7 => Self::String,
            8 => Self::PpsTime,
            other => Self::Other(other),
        }
    }

    /// Returns the numeric wire code.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Plain => 0,
            Self::Enum => 1,
            Self::Bits => 2,
            Self::Weekday => 3,
            Self::HourMinute => 4,
            Self::DateTime => 5,
            Self::DayMonth => 6,
            Self::String => 7,
            Self::PpsTime => 8,
            Self::Other(code) => code,
        }
    }
}

/// A parameter value converted according to its [`DataType`].
#[derive(Debug, Clone, PartialEq)]
pub enum EntityValue {
    /// Plain numbers.
    Number(f64),
    /// Enumeration and weekday codes.
    Integer(i64),
    /// `HH:MM` values.
    Time(NaiveTime),
    /// Everything else, and values that failed conversion.
    Text(String),
}

impl EntityValue {
    fn convert(raw: &str, data_type: DataType) -> Self {
        let text = || Self::Text(raw.to_string());
        let converted = match data_type {
            DataType::Plain => raw.trim().parse().map(Self::Number).ok(),
            DataType::Enum | DataType::Weekday => raw.trim().parse().map(Self::Integer).ok(),
            DataType::HourMinute => NaiveTime::parse_from_str(raw.trim(), "%H:%M")
                .map(Self::Time)
                .ok(),
            _ => return text(),
        };
        converted.unwrap_or_else(|| {
            tracing::warn!(
                value = raw,
                data_type = data_type.code(),
                "Failed to convert parameter value"
            );
            text()
        })
    }
}

/// Information about one controller parameter.
///
/// `value` is `None` when the controller reports no data (`"---"` or `null`);
/// the unconverted text stays available through [`EntityInfo::raw_value`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawEntity")]
pub struct EntityInfo {
    /// Parameter name as shown by the controller.
    pub name: String,
    /// Unit, possibly HTML-encoded (`&deg;C`).
    pub unit: String,
    /// Description; the enum text for enumerations.
    pub desc: String,
    /// Converted value.
    pub value: Option<EntityValue>,
    /// Value as sent by the controller.
    pub raw_value: Option<String>,
    /// Kind of value.
    pub data_type: DataType,
    /// Error code, 0 on success.
    pub error: i64,
    /// Whether the parameter is read-only.
    pub readonly: bool,
    /// Whether the parameter is writable.
    pub readwrite: bool,
    /// Number of decimals, if reported.
    pub precision: Option<f64>,
    /// Data type name (`VALS`, `ENUM`...).
    pub data_type_name: String,
    /// Data type family.
    pub data_type_family: String,
}

impl EntityInfo {
    /// Returns true if the parameter carries a value.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the value as a float (numbers and integer codes).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.value.as_ref()? {
            EntityValue::Number(n) => Some(*n),
            #[allow(clippy::cast_precision_loss)]
            EntityValue::Integer(i) => Some(*i as f64),
            EntityValue::Time(_) | EntityValue::Text(_) => None,
        }
    }

    /// Returns the value as an integer code.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.value.as_ref()? {
            EntityValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a time of day.
    #[must_use]
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self.value.as_ref()? {
            EntityValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns the raw value text.
    #[must_use]
    pub fn raw_value(&self) -> Option<&str> {
        self.raw_value.as_deref()
    }

    /// Returns the unit with HTML-encoded degree signs replaced.
    #[must_use]
    pub fn normalized_unit(&self) -> String {
        normalize_unit(&self.unit)
    }

    /// Returns the human-readable text of an enumeration value.
    #[must_use]
    pub fn enum_description(&self) -> Option<&str> {
        (self.data_type == DataType::Enum && !self.desc.is_empty()).then_some(self.desc.as_str())
    }

    /// Suggests a home automation device class from the unit.
    #[must_use]
    pub fn suggested_device_class(&self) -> Option<&'static str> {
        if self.data_type == DataType::Enum {
            return None;
        }
        match self.normalized_unit().as_str() {
            "°C" | "°F" => Some("temperature"),
            "kWh" | "Wh" | "MWh" => Some("energy"),
            "kW" | "W" => Some("power"),
            "bar" => Some("pressure"),
            "V" => Some("voltage"),
            "A" => Some("current"),
            "Hz" => Some("frequency"),
            "l/min" => Some("volume_flow_rate"),
            "h" => Some("duration"),
            "%" => Some("power_factor"),
            _ => None,
        }
    }

    /// Suggests a home automation state class from the unit.
    #[must_use]
    pub fn suggested_state_class(&self) -> Option<&'static str> {
        match self.suggested_device_class()? {
            "energy" => Some("total_increasing"),
            _ => Some("measurement"),
        }
    }
}

#[derive(Deserialize)]
struct RawEntity {
    #[serde(default)]
    name: String,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    value: Value,
    #[serde(default, rename = "dataType")]
    data_type: i64,
    #[serde(default)]
    error: i64,
    #[serde(default)]
    readonly: Value,
    #[serde(default)]
    readwrite: Value,
    #[serde(default)]
    precision: Option<f64>,
    #[serde(default, rename = "dataType_name")]
    data_type_name: String,
    #[serde(default, rename = "dataType_family")]
    data_type_family: String,
}

fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

impl From<RawEntity> for EntityInfo {
    fn from(raw: RawEntity) -> Self {
        let data_type = DataType::from_code(raw.data_type);
        let raw_value = match raw.value {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        };
        let value = raw_value
            .as_deref()
            .filter(|v| v.trim() != NO_DATA)
            .map(|v| EntityValue::convert(v, data_type));

        Self {
            name: raw.name,
            unit: raw.unit,
            desc: raw.desc,
            value,
            raw_value,
            data_type,
            error: raw.error,
            readonly: flag(&raw.readonly),
            readwrite: flag(&raw.readwrite),
            precision: raw.precision,
            data_type_name: raw.data_type_name,
            data_type_family: raw.data_type_family,
        }
    }
}
