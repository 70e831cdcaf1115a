// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer for the BSB-LAN JSON API.
//!
//! The client talks to the controller through the [`Protocol`] trait, which
//! takes a [`Request`] and returns the decoded JSON body. [`HttpClient`] is
//! the `reqwest` implementation; tests substitute their own.
//!
//! # Endpoints
//!
//! | Request                              | Wire                          |
//! |--------------------------------------|-------------------------------|
//! | [`Request::query`]                   | `POST /JQ?Parameter=700,710`  |
//! | [`Request::set`]                     | `POST /JS` with a JSON body   |
//! | [`Request::device_info`]             | `POST /JI`                    |
//! | [`Request::push_room_temperature`]   | `GET /I10000=19.5`            |

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig, RetryPolicy};

use serde_json::{Value, json};

use crate::types::{ParameterId, format_decimal};

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// A request to the controller, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
}

impl Request {
    /// Reads the given parameters.
    #[must_use]
    pub fn query(ids: &[ParameterId]) -> Self {
        Self {
            method: Method::Post,
            path: "/JQ".to_string(),
            query: vec![("Parameter", ParameterId::join(ids))],
            body: None,
        }
    }

    /// Writes a single parameter.
    #[must_use]
    pub fn set(parameter: &SetParameter) -> Self {
        Self {
            method: Method::Post,
            path: "/JS".to_string(),
            query: Vec::new(),
            body: Some(parameter.to_json()),
        }
    }

    /// Reads the firmware identification block.
    #[must_use]
    pub fn device_info() -> Self {
        Self {
            method: Method::Post,
            path: "/JI".to_string(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Pushes a room temperature measurement to the controller.
    #[must_use]
    pub fn push_room_temperature(value: f64) -> Self {
        Self {
            method: Method::Get,
            path: format!("/I10000={}", format_decimal(value)),
            query: Vec::new(),
            body: None,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the path, without passkey prefix.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query parameters. Values contain only digits and commas
    /// and are sent verbatim.
    #[must_use]
    pub fn query_params(&self) -> &[(&'static str, String)] {
        &self.query
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns the comma-joined parameter list of a query request.
    #[must_use]
    pub fn parameter_list(&self) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == "Parameter")
            .map(|(_, value)| value.as_str())
    }
}

/// How a written value is tagged in the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SetValue {
    Value(String),
    Enum(String),
}

/// A single-parameter write.
///
/// # Examples
///
/// ```
/// use bsblan_lib::protocol::SetParameter;
/// use bsblan_lib::types::ParameterId;
///
/// let write = SetParameter::enum_value(ParameterId::new(700), "1");
/// assert_eq!(write.parameter(), ParameterId::new(700));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetParameter {
    parameter: ParameterId,
    value: SetValue,
}

impl SetParameter {
    /// Writes a plain value (numbers, times, schedules).
    #[must_use]
    pub fn value(parameter: ParameterId, value: impl Into<String>) -> Self {
        Self {
            parameter,
            value: SetValue::Value(value.into()),
        }
    }

    /// Writes an enumeration value.
    #[must_use]
    pub fn enum_value(parameter: ParameterId, value: impl Into<String>) -> Self {
        Self {
            parameter,
            value: SetValue::Enum(value.into()),
        }
    }

    /// Returns the target parameter.
    #[must_use]
    pub fn parameter(&self) -> ParameterId {
        self.parameter
    }

    fn to_json(&self) -> Value {
        let parameter = self.parameter.to_string();
        match &self.value {
            SetValue::Value(value) => json!({
                "Parameter": parameter,
                "Value": value,
                "Type": "1",
            }),
            SetValue::Enum(value) => json!({
                "Parameter": parameter,
                "EnumValue": value,
                "Type": "1",
            }),
        }
    }
}

/// Trait for transports that can carry BSB-LAN requests.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Sends a request and returns the decoded JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport failures and `ParseError` when the
    /// body is not JSON.
    async fn request(&self, request: &Request) -> crate::Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_request_joins_ids() {
        let request = Request::query(&[ParameterId::new(700), ParameterId::new(8740)]);
        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.path(), "/JQ");
        assert_eq!(request.parameter_list(), Some("700,8740"));
        assert!(request.body().is_none());
    }

    #[test]
    fn set_request_value_body() {
        let request = Request::set(&SetParameter::value(ParameterId::new(710), "20.5"));
        assert_eq!(request.path(), "/JS");
        assert_eq!(
            request.body(),
            Some(&json!({"Parameter": "710", "Value": "20.5", "Type": "1"}))
        );
        assert_eq!(request.parameter_list(), None);
    }

    #[test]
    fn set_request_enum_body() {
        let request = Request::set(&SetParameter::enum_value(ParameterId::new(1600), "1"));
        assert_eq!(
            request.body(),
            Some(&json!({"Parameter": "1600", "EnumValue": "1", "Type": "1"}))
        );
    }

    #[test]
    fn push_room_temperature_path() {
        let request = Request::push_room_temperature(19.0);
        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.path(), "/I10000=19.0");
        assert_eq!(Request::push_room_temperature(21.5).path(), "/I10000=21.5");
    }

    #[test]
    fn device_info_request() {
        let request = Request::device_info();
        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.path(), "/JI");
    }
}
