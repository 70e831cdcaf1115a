// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for BSB-LAN controllers.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::{ParseError, ProtocolError};
use crate::protocol::{Method, Protocol, Request};

/// User agent sent with every request.
const USER_AGENT_VALUE: &str = concat!("bsblan-rs/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HttpConfig
// ============================================================================

/// Configuration for an HTTP connection to a BSB-LAN controller.
///
/// # Examples
///
/// ```
/// use bsblan_lib::protocol::{HttpConfig, RetryPolicy};
/// use std::time::Duration;
///
/// // Simple configuration
/// let config = HttpConfig::new("192.168.1.100");
///
/// // With all options
/// let config = HttpConfig::new("192.168.1.100")
///     .with_port(8080)
///     .with_passkey("1234")
///     .with_credentials("admin", "password")
///     .with_timeout(Duration::from_secs(5))
///     .with_retry(RetryPolicy::disabled());
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    use_https: bool,
    passkey: Option<String>,
    credentials: Option<(String, String)>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default HTTPS port.
    pub const DEFAULT_HTTPS_PORT: u16 = 443;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new HTTP configuration for the specified host.
    ///
    /// `host` may also be a full base URL (`http://127.0.0.1:8080`), in which
    /// case scheme and port are taken from it.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            use_https: false,
            passkey: None,
            credentials: None,
            timeout: Self::DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables HTTPS.
    ///
    /// If port hasn't been explicitly set, it will be changed to 443.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.use_https = true;
        if self.port == Self::DEFAULT_PORT {
            self.port = Self::DEFAULT_HTTPS_PORT;
        }
        self
    }

    /// Sets the passkey that prefixes every request path.
    #[must_use]
    pub fn with_passkey(mut self, passkey: impl Into<String>) -> Self {
        let passkey = passkey.into();
        self.passkey = (!passkey.is_empty()).then_some(passkey);
        self
    }

    /// Sets HTTP basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy for transient failures.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns whether HTTPS is enabled.
    #[must_use]
    pub fn use_https(&self) -> bool {
        self.use_https
    }

    /// Returns the passkey if set.
    #[must_use]
    pub fn passkey(&self) -> Option<&str> {
        self.passkey.as_deref()
    }

    /// Returns the credentials if set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry policy.
    #[must_use]
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Builds the base URL from this configuration, without passkey.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            return self.host.trim_end_matches('/').to_string();
        }
        let scheme = if self.use_https { "https" } else { "http" };
        let port_suffix =
            if (self.use_https && self.port == 443) || (!self.use_https && self.port == 80) {
                String::new()
            } else {
                format!(":{}", self.port)
            };
        format!("{scheme}://{}{port_suffix}", self.host)
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` for an empty host and
    /// `ProtocolError::Http` if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }

        let mut base_url = self.base_url();
        if let Some(passkey) = &self.passkey {
            base_url.push('/');
            base_url.push_str(passkey);
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, */*"));

        let client = Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()
            .map_err(ProtocolError::Http)?;

        let credentials = self
            .credentials
            .map(|(username, password)| Credentials { username, password });

        Ok(HttpClient {
            base_url,
            client,
            credentials,
            timeout: self.timeout,
            retry: self.retry,
        })
    }
}

// ============================================================================
// RetryPolicy
// ============================================================================

/// Retry behaviour for transient transport failures.
///
/// Timeouts, refused connections and 5xx gateway statuses are retried with
/// exponential backoff. Authentication failures and other client errors are
/// returned immediately.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use bsblan_lib::protocol::RetryPolicy;
///
/// // Default policy (3 attempts with exponential backoff)
/// let policy = RetryPolicy::default();
///
/// // Single attempt
/// let policy = RetryPolicy::disabled();
///
/// // Custom policy
/// let policy = RetryPolicy::new()
///     .with_max_attempts(5)
///     .with_initial_delay(Duration::from_millis(200))
///     .with_max_delay(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Whether retries are enabled.
    pub enabled: bool,
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for the delay between attempts.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f32,
}

impl RetryPolicy {
    /// Creates a new retry policy with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Sets the total number of attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between attempts.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the backoff multiplier.
    #[must_use]
    pub fn with_backoff_multiplier(mut self, multiplier: f32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculates the delay before retry number `attempt` (0-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return self.initial_delay.min(self.max_delay);
        }

        let multiplier = self
            .backoff_multiplier
            .powi(i32::try_from(attempt).unwrap_or(i32::MAX));

        #[allow(clippy::cast_precision_loss)]
        let delay_ms = self.initial_delay.as_millis() as f32 * multiplier;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let delay = Duration::from_millis(delay_ms as u64);

        delay.min(self.max_delay)
    }

    /// Returns true if another attempt may follow attempt number `attempt` (0-based).
    #[must_use]
    pub fn should_retry(&self, attempt: u32) -> bool {
        self.enabled && attempt.saturating_add(1) < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// HTTP client for communicating with a BSB-LAN controller.
///
/// # Examples
///
/// ```no_run
/// use bsblan_lib::protocol::{HttpConfig, Protocol, Request};
/// use bsblan_lib::types::ParameterId;
///
/// # async fn example() -> bsblan_lib::Result<()> {
/// let client = HttpConfig::new("192.168.1.100").into_client()?;
/// let body = client.request(&Request::query(&[ParameterId::new(8740)])).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    credentials: Option<Credentials>,
    timeout: Duration,
    retry: RetryPolicy,
}

/// HTTP basic authentication credentials.
#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: String,
}

impl HttpClient {
    /// Creates a new HTTP client for the specified host with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        HttpConfig::new(host).into_client()
    }

    /// Returns the base URL of the device, including the passkey.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the full URL for a request.
    fn build_url(&self, request: &Request) -> String {
        let mut url = format!("{}{}", self.base_url, request.path());
        for (i, (key, value)) in request.query_params().iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url
    }

    fn map_send_error(&self, err: reqwest::Error) -> ProtocolError {
        if err.is_timeout() {
            ProtocolError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else if err.is_connect() {
            ProtocolError::ConnectionFailed(err.to_string())
        } else {
            ProtocolError::Http(err)
        }
    }

    async fn send_once(&self, request: &Request) -> crate::Result<Value> {
        let url = self.build_url(request);

        tracing::debug!(url = %url, method = ?request.method(), "Sending BSB-LAN request");

        let mut builder = match request.method() {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        if let Some(creds) = &self.credentials {
            builder = builder.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = builder
            .send()
            .await
            .map_err(|err| self.map_send_error(err))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProtocolError::AuthenticationFailed.into());
        }

        if !status.is_success() {
            return Err(ProtocolError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|err| self.map_send_error(err))?;

        tracing::debug!(body = %body, "Received BSB-LAN response");

        let value = serde_json::from_str(&body).map_err(ParseError::Json)?;
        Ok(value)
    }
}

impl Protocol for HttpClient {
    async fn request(&self, request: &Request) -> crate::Result<Value> {
        let mut attempt = 0;
        loop {
            match self.send_once(request).await {
                Err(err) if err.is_retryable() && self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::debug!(
                        path = request.path(),
                        attempt = attempt + 1,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Retrying BSB-LAN request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterId;

    #[test]
    fn build_url_for_query() {
        let client = HttpClient::new("192.168.1.100").unwrap();
        let request = Request::query(&[ParameterId::new(700), ParameterId::new(710)]);
        assert_eq!(
            client.build_url(&request),
            "http://192.168.1.100/JQ?Parameter=700,710"
        );
    }

    #[test]
    fn build_url_with_passkey() {
        let client = HttpConfig::new("192.168.1.100")
            .with_passkey("1234")
            .into_client()
            .unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.100/1234");
        assert_eq!(
            client.build_url(&Request::device_info()),
            "http://192.168.1.100/1234/JI"
        );
    }

    #[test]
    fn empty_passkey_is_ignored() {
        let config = HttpConfig::new("192.168.1.100").with_passkey("");
        assert!(config.passkey().is_none());
    }

    #[test]
    fn build_url_with_https() {
        let client = HttpClient::new("https://192.168.1.100").unwrap();
        assert_eq!(client.base_url(), "https://192.168.1.100");
    }

    #[test]
    fn empty_host_is_rejected() {
        let result = HttpConfig::new("").into_client();
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn user_agent_carries_crate_version() {
        assert!(USER_AGENT_VALUE.starts_with("bsblan-rs/"));
        assert!(USER_AGENT_VALUE.ends_with(env!("CARGO_PKG_VERSION")));
    }

    // =========================================================================
    // HttpConfig tests
    // =========================================================================

    #[test]
    fn http_config_default_values() {
        let config = HttpConfig::new("192.168.1.100");
        assert_eq!(config.host(), "192.168.1.100");
        assert_eq!(config.port(), 80);
        assert!(!config.use_https());
        assert!(config.passkey().is_none());
        assert!(config.credentials().is_none());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.retry().max_attempts, 3);
    }

    #[test]
    fn http_config_with_https() {
        let config = HttpConfig::new("192.168.1.100").with_https();
        assert!(config.use_https());
        assert_eq!(config.port(), 443);
    }

    #[test]
    fn http_config_with_https_custom_port() {
        let config = HttpConfig::new("192.168.1.100")
            .with_port(8443)
            .with_https();
        assert_eq!(config.port(), 8443);
        assert_eq!(config.base_url(), "https://192.168.1.100:8443");
    }

    #[test]
    fn http_config_with_credentials() {
        let config = HttpConfig::new("192.168.1.100").with_credentials("admin", "secret");
        let creds = config.credentials().unwrap();
        assert_eq!(creds.0, "admin");
        assert_eq!(creds.1, "secret");
    }

    #[test]
    fn http_config_base_url_custom_port() {
        let config = HttpConfig::new("192.168.1.100").with_port(8080);
        assert_eq!(config.base_url(), "http://192.168.1.100:8080");
    }

    #[test]
    fn http_config_base_url_from_full_url() {
        let config = HttpConfig::new("http://127.0.0.1:34567/");
        assert_eq!(config.base_url(), "http://127.0.0.1:34567");
    }

    #[test]
    fn http_config_into_client() {
        let config = HttpConfig::new("192.168.1.100").with_credentials("user", "pass");
        let client = config.into_client().unwrap();
        assert_eq!(client.base_url(), "http://192.168.1.100");
        assert!(client.credentials.is_some());
    }

    // =========================================================================
    // RetryPolicy tests
    // =========================================================================

    #[test]
    fn retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert!(policy.enabled);
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(10));
    }

    #[test]
    fn retry_policy_exponential_backoff() {
        let policy = RetryPolicy::new().with_initial_delay(Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(400));
    }

    #[test]
    fn retry_policy_caps_delay() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(3));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_secs(3));
    }

    #[test]
    fn retry_policy_attempt_budget() {
        let policy = RetryPolicy::new().with_max_attempts(3);
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(1));
        assert!(!policy.should_retry(2));
    }

    #[test]
    fn retry_policy_disabled() {
        let policy = RetryPolicy::disabled();
        assert!(!policy.should_retry(0));
    }
}
