// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport and client using wiremock.

use std::time::Duration;

use bsblan_lib::protocol::{HttpClient, HttpConfig, Protocol, Request, RetryPolicy};
use bsblan_lib::types::ParameterId;
use bsblan_lib::{
    ApiVersion, Bsblan, ConfigurationError, Error, HotWaterSettings, HvacMode, ProtocolError,
    Section, SectionState, ThermostatSettings,
};
use serde_json::{Value, json};
use wiremock::matchers::{
    basic_auth, body_json, header, header_exists, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIRMWARE_V3: &str = "5.0.16-20250101";
const FIRMWARE_V1: &str = "1.0.38-20200730234859";

fn entity(value: &str, unit: &str, data_type: i64) -> Value {
    json!({
        "name": "",
        "error": 0,
        "value": value,
        "desc": "",
        "dataType": data_type,
        "readonly": 0,
        "unit": unit,
    })
}

fn no_retry(server: &MockServer) -> HttpConfig {
    HttpConfig::new(server.uri()).with_retry(RetryPolicy::disabled())
}

async fn mount_device(server: &MockServer, firmware: &str) {
    Mock::given(method("POST"))
        .and(path("/JI"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "BSB-LAN",
            "version": firmware,
            "MAC": "00:80:41:19:69:90",
            "uptime": 969_402,
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// HttpClient Tests
// ============================================================================

mod http_client {
    use super::*;

    #[tokio::test]
    async fn query_sends_parameter_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/JQ"))
            .and(query_param("Parameter", "700,710"))
            .and(header(
                "user-agent",
                concat!("bsblan-rs/", env!("CARGO_PKG_VERSION")),
            ))
            .and(header_exists("accept"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "700": entity("1", "", 1),
                "710": entity("20.5", "&deg;C", 0),
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = no_retry(&server).into_client().unwrap();
        let request = Request::query(&[ParameterId::new(700), ParameterId::new(710)]);
        let body = client.request(&request).await.unwrap();
        assert_eq!(body["710"]["value"], "20.5");
    }

    #[tokio::test]
    async fn passkey_prefixes_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1234/JI"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "3.1.0"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = no_retry(&server)
            .with_passkey("1234")
            .into_client()
            .unwrap();
        client.request(&Request::device_info()).await.unwrap();
    }

    #[tokio::test]
    async fn credentials_use_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/JI"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "3.1.0"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = no_retry(&server)
            .with_credentials("admin", "secret")
            .into_client()
            .unwrap();
        client.request(&Request::device_info()).await.unwrap();
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri()).unwrap();
        let err = client.request(&Request::device_info()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::AuthenticationFailed)
        ));
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "3.1.0"})))
            .expect(1)
            .mount(&server)
            .await;

        let retry = RetryPolicy::new()
            .with_max_attempts(3)
            .with_initial_delay(Duration::from_millis(5));
        let client = HttpConfig::new(server.uri())
            .with_retry(retry)
            .into_client()
            .unwrap();
        let body = client.request(&Request::device_info()).await.unwrap();
        assert_eq!(body["version"], "3.1.0");
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let retry = RetryPolicy::new().with_initial_delay(Duration::from_millis(5));
        let client = HttpConfig::new(server.uri())
            .with_retry(retry)
            .into_client()
            .unwrap();
        let err = client.request(&Request::device_info()).await.unwrap_err();
        assert_eq!(err.to_string(), "protocol error: HTTP 404 - Not Found");
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = no_retry(&server).into_client().unwrap();
        let err = client.request(&Request::device_info()).await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_connection_error() {
        let client = HttpConfig::new("http://127.0.0.1:1")
            .with_retry(RetryPolicy::disabled())
            .into_client()
            .unwrap();
        let err = client.request(&Request::device_info()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::ConnectionFailed(_))
        ));
    }
}

// ============================================================================
// Bsblan Tests
// ============================================================================

mod client {
    use super::*;

    async fn heating_server(firmware: &str) -> MockServer {
        let server = MockServer::start().await;
        mount_device(&server, firmware).await;
        server
    }

    #[tokio::test]
    async fn build_resolves_firmware() {
        let server = heating_server(FIRMWARE_V3).await;
        let client = Bsblan::http_config(no_retry(&server)).build().await.unwrap();

        assert_eq!(client.api_version(), Some(ApiVersion::V3));
        assert_eq!(client.firmware_version(), Some(FIRMWARE_V3));
    }

    #[tokio::test]
    async fn state_validates_once() {
        let server = heating_server(FIRMWARE_V3).await;
        Mock::given(method("POST"))
            .and(path("/JQ"))
            .and(query_param("Parameter", "700,710,770,900,8000,8740,8749"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "700": entity("1", "", 1),
                "710": entity("20.0", "&deg;C", 0),
                "900": entity("2", "", 1),
                "8000": entity("114", "", 1),
                "8740": entity("21.3", "&deg;C", 0),
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/JQ"))
            .and(query_param("Parameter", "700,710,900,8000,8740"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "700": entity("3", "", 1),
                "710": entity("20.0", "&deg;C", 0),
                "900": entity("2", "", 1),
                "8000": entity("114", "", 1),
                "8740": entity("21.3", "&deg;C", 0),
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = Bsblan::http_config(no_retry(&server))
            .build_without_probe()
            .unwrap();
        let first = client.state(1, None).await.unwrap();
        let second = client.state(1, None).await.unwrap();

        assert_eq!(first.hvac_mode_value(), Some(HvacMode::Heat));
        assert_eq!(second.target_temperature.unwrap().as_f64(), Some(20.0));
        assert!(second.room1_thermostat_mode.is_none());
        assert_eq!(
            client.validation_state(Section::Heating),
            SectionState::Validated
        );
    }

    #[tokio::test]
    async fn v1_static_values_use_v1_ids() {
        let server = heating_server(FIRMWARE_V1).await;
        Mock::given(method("POST"))
            .and(path("/JQ"))
            .and(query_param("Parameter", "714,730"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "714": entity("8.0", "&deg;C", 0),
                "730": entity("28.0", "&deg;C", 0),
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = Bsblan::http_config(no_retry(&server))
            .build_without_probe()
            .unwrap();
        let limits = client.static_values(1, None).await.unwrap();
        assert_eq!(limits.max_temp.unwrap().as_f64(), Some(28.0));
        assert_eq!(client.api_version(), Some(ApiVersion::V1));
    }

    #[tokio::test]
    async fn include_errors_send_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let client = Bsblan::http_config(no_retry(&server))
            .build_without_probe()
            .unwrap();
        let err = client.sensor(Some(&[])).await.unwrap_err();
        assert_eq!(err.to_string(), "Include list cannot be empty");
        let err = client.hot_water_state(Some(&["nope"])).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::InvalidIncludeParams)
        ));
        let err = client
            .state(2, Some(&["room1_thermostat_mode"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::InvalidIncludeParams)
        ));
    }

    #[tokio::test]
    async fn thermostat_write_on_second_circuit() {
        let server = heating_server(FIRMWARE_V3).await;
        Mock::given(method("POST"))
            .and(path("/JQ"))
            .and(query_param("Parameter", "1014,1016"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "1014": entity("10.0", "&deg;C", 0),
                "1016": entity("26.0", "&deg;C", 0),
            })))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/JS"))
            .and(body_json(json!({"Parameter": "1010", "Value": "22.0", "Type": "1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"1010": {"status": 1}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = Bsblan::http_config(no_retry(&server))
            .build_without_probe()
            .unwrap();
        client
            .thermostat(ThermostatSettings::new().with_target_temperature(22.0), 2)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn hot_water_enum_write() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/JS"))
            .and(body_json(json!({"Parameter": "1600", "EnumValue": "1", "Type": "1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"1600": {"status": 1}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = Bsblan::http_config(no_retry(&server))
            .build_without_probe()
            .unwrap();
        client
            .set_hot_water(HotWaterSettings::new().operating_mode(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn available_circuits() {
        let server = MockServer::start().await;
        for (id, value) in [("700", "1"), ("1000", "0"), ("1300", "---")] {
            let mut body = serde_json::Map::new();
            body.insert(id.to_string(), entity(value, "", 1));
            Mock::given(method("POST"))
                .and(path("/JQ"))
                .and(query_param("Parameter", id))
                .respond_with(ResponseTemplate::new(200).set_body_json(Value::Object(body)))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = Bsblan::http_config(no_retry(&server))
            .build_without_probe()
            .unwrap();
        assert_eq!(client.get_available_circuits().await, vec![1, 2]);
    }

    #[tokio::test]
    async fn push_temperature_uses_get() {
        let server = heating_server(FIRMWARE_V3).await;
        Mock::given(method("POST"))
            .and(path("/JQ"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "714": entity("8.0", "&deg;C", 0),
                "716": entity("30.0", "&deg;C", 0),
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/I10000=19.5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = Bsblan::http_config(no_retry(&server))
            .build_without_probe()
            .unwrap();
        client.push_temperature(19.5).await.unwrap();
    }
}
