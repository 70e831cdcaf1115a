// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `bsblan_lib` library.
//!
//! Failures are grouped by where they originate: firmware version checks,
//! transport communication, caller-supplied values, client configuration and
//! response parsing. Local checks (values, configuration) never issue a
//! request; transport errors always propagate to the caller.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The device firmware maps to no supported API generation.
    #[error("version error: {0}")]
    Version(#[from] VersionError),

    /// Error occurred during communication with the device.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A caller-supplied value failed local validation.
    #[error("invalid parameter: {0}")]
    Value(#[from] ValueError),

    /// The client is not in a state that allows the operation.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Returns true if the error is transient and the operation may succeed
    /// when repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Protocol(err) if err.is_retryable())
    }
}

/// Errors related to firmware version resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The firmware version falls into a range without a known schema.
    #[error("unsupported firmware version: {0}")]
    Unsupported(String),

    /// The firmware version string could not be parsed.
    #[error("invalid firmware version: {0}")]
    Invalid(String),
}

/// Errors related to protocol communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The device answered with an unexpected HTTP status.
    #[error("HTTP {status} - {reason}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The canonical reason phrase.
        reason: String,
    },
}

impl ProtocolError {
    /// Returns true for failures worth another attempt: timeouts, refused
    /// connections and server-side 5xx errors.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            Self::Http(err) => err.is_timeout() || err.is_connect(),
            Self::ConnectionFailed(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => matches!(status, 500 | 502 | 503 | 504),
            Self::InvalidAddress(_) | Self::AuthenticationFailed => false,
        }
    }
}

/// Errors raised when a caller-supplied value is invalid.
///
/// These are always detected locally, before any request is sent.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// Circuit number outside 1..=3.
    #[error("Invalid circuit: {0} (must be 1, 2 or 3)")]
    InvalidCircuit(u8),

    /// A temperature is outside the allowed range.
    #[error("temperature {actual} is out of range [{min}, {max}]")]
    TemperatureOutOfRange {
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
        /// The value that was provided.
        actual: f64,
    },

    /// A temperature is not a finite number.
    #[error("invalid temperature value: {0}")]
    InvalidTemperature(String),

    /// Unknown HVAC mode value.
    #[error("invalid HVAC mode: {0}")]
    InvalidHvacMode(u8),

    /// A date/time string is not in `DD.MM.YYYY HH:MM:SS` form.
    #[error("invalid date/time: {0}")]
    InvalidDateTime(String),

    /// A time slot string is not in `HH:MM-HH:MM` form.
    #[error("Invalid time slot format: {0}")]
    InvalidTimeSlot(String),

    /// A time slot ends before it starts.
    #[error("Start time {start} must be before end time {end}")]
    TimeSlotOrder {
        /// Slot start, `HH:MM`.
        start: String,
        /// Slot end, `HH:MM`.
        end: String,
    },

    /// A day schedule holds more slots than the controller supports.
    #[error("{0} slots given, maximum 3 time slots per day")]
    TooManySlots(usize),

    /// A parameter ID is empty.
    #[error("Parameter ID cannot be empty")]
    EmptyParameterId,

    /// A parameter ID is not a decimal number.
    #[error("invalid parameter ID: {0}")]
    InvalidParameterId(String),

    /// A parameter name is empty.
    #[error("Parameter name cannot be empty")]
    EmptyParameterName,

    /// None of the requested parameter names exist in the schema.
    #[error("Could not resolve any parameter names: {}", .0.join(", "))]
    UnresolvedNames(Vec<String>),
}

/// Errors raised when the client cannot serve a request in its current state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The schema snapshot has not been built yet.
    #[error("API data not initialized")]
    ApiDataNotInitialized,

    /// The requested section does not exist in the schema snapshot.
    #[error("Section '{0}' not found in API data")]
    SectionNotFound(String),

    /// No temperature bounds are known for the circuit.
    #[error("Temperature range not initialized for circuit {0}")]
    TemperatureRangeNotInitialized(u8),

    /// The include filter matched none of the section's parameters.
    #[error("None of the requested parameters are valid for this section")]
    InvalidIncludeParams,

    /// The include filter was given but empty.
    #[error("Include list cannot be empty")]
    EmptyIncludeList,

    /// A write operation needs exactly one parameter.
    #[error("Only one parameter can be set at a time")]
    MultiParameter,

    /// A write operation carried no parameter.
    #[error("No state provided")]
    NoState,

    /// Every parameter of the section was removed by validation.
    #[error("No valid parameters found for section '{0}'")]
    NoValidParameters(String),

    /// The essential hot-water group is empty.
    #[error("No essential hot water parameters available")]
    NoEssentialHotWater,

    /// The hot-water configuration group is empty.
    #[error("No hot water configuration parameters available")]
    NoHotWaterConfig,

    /// The hot-water schedule group is empty.
    #[error("No hot water schedule parameters available")]
    NoHotWaterSchedule,

    /// A schedule write carried no day.
    #[error("No schedule provided")]
    NoSchedule,

    /// A bulk read was called with no parameter IDs.
    #[error("No parameter IDs provided")]
    NoParameterIds,

    /// A bulk read by name was called with no names.
    #[error("No parameter names provided")]
    NoParameterNames,
}

/// Errors related to parsing device responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::TemperatureOutOfRange {
            min: 8.0,
            max: 30.0,
            actual: 35.5,
        };
        assert_eq!(err.to_string(), "temperature 35.5 is out of range [8, 30]");
    }

    #[test]
    fn invalid_circuit_message() {
        let err: Error = ValueError::InvalidCircuit(4).into();
        assert!(err.to_string().contains("Invalid circuit"));
        assert!(matches!(err, Error::Value(ValueError::InvalidCircuit(4))));
    }

    #[test]
    fn unresolved_names_lists_all_names() {
        let err = ValueError::UnresolvedNames(vec!["fake".into(), "other".into()]);
        assert_eq!(
            err.to_string(),
            "Could not resolve any parameter names: fake, other"
        );
    }

    #[test]
    fn configuration_error_display_is_unprefixed() {
        let err: Error = ConfigurationError::NoEssentialHotWater.into();
        assert_eq!(err.to_string(), "No essential hot water parameters available");
    }

    #[test]
    fn section_not_found_names_section() {
        let err = ConfigurationError::SectionNotFound("bogus".into());
        assert_eq!(err.to_string(), "Section 'bogus' not found in API data");
    }

    #[test]
    fn retryable_statuses() {
        let server = ProtocolError::Status {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        let missing = ProtocolError::Status {
            status: 404,
            reason: "Not Found".into(),
        };
        assert!(server.is_retryable());
        assert!(!missing.is_retryable());
        assert!(!ProtocolError::AuthenticationFailed.is_retryable());
        assert!(ProtocolError::Timeout(10_000).is_retryable());
    }

    #[test]
    fn local_errors_are_not_retryable() {
        let err: Error = ConfigurationError::MultiParameter.into();
        assert!(!err.is_retryable());
        let err: Error = VersionError::Unsupported("2.0.0".into()).into();
        assert!(!err.is_retryable());
    }
}
