// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client builder.

use std::time::Duration;

use crate::client::Bsblan;
use crate::error::Error;
use crate::protocol::{HttpClient, HttpConfig, RetryPolicy};

/// Builder for clients talking to a controller over HTTP.
///
/// This builder can be created in two ways:
/// - `Bsblan::http("host")` - Simple host string
/// - `Bsblan::http_config(HttpConfig::new("host").with_port(8080))` - Advanced configuration
///
/// # Examples
///
/// ```no_run
/// use bsblan_lib::Bsblan;
/// use std::time::Duration;
///
/// # async fn example() -> bsblan_lib::Result<()> {
/// // Resolves the firmware version right away
/// let client = Bsblan::http("192.168.1.100")
///     .with_passkey("1234")
///     .build()
///     .await?;
///
/// // Deferred: the first operation initializes
/// let client = Bsblan::http("192.168.1.100")
///     .with_credentials("admin", "password")
///     .with_timeout(Duration::from_secs(5))
///     .build_without_probe()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BsblanBuilder {
    config: HttpConfig,
}

impl BsblanBuilder {
    pub(crate) fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Sets HTTP basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config = self.config.with_credentials(username, password);
        self
    }

    /// Sets the passkey configured on the controller.
    #[must_use]
    pub fn with_passkey(mut self, passkey: impl Into<String>) -> Self {
        self.config = self.config.with_passkey(passkey);
        self
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Sets the retry policy for transient failures.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.config = self.config.with_retry(retry);
        self
    }

    /// Returns the configuration built so far.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Builds the client and resolves the firmware version.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The HTTP client cannot be created
    /// - The controller cannot be reached
    /// - The firmware version is not supported
    pub async fn build(self) -> Result<Bsblan<HttpClient>, Error> {
        let client = self.build_without_probe()?;
        client.initialize().await?;
        Ok(client)
    }

    /// Builds the client without any network access.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn build_without_probe(self) -> Result<Bsblan<HttpClient>, Error> {
        let client = self.config.into_client()?;
        Ok(Bsblan::new(client))
    }
}

impl Bsblan<HttpClient> {
    /// Starts building a client for the controller at `host`.
    #[must_use]
    pub fn http(host: impl Into<String>) -> BsblanBuilder {
        BsblanBuilder::new(HttpConfig::new(host))
    }

    /// Starts building a client from a full HTTP configuration.
    #[must_use]
    pub fn http_config(config: HttpConfig) -> BsblanBuilder {
        BsblanBuilder::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_options() {
        let builder = Bsblan::http("192.168.1.100")
            .with_port(8080)
            .with_passkey("1234")
            .with_credentials("admin", "pass")
            .with_timeout(Duration::from_secs(3))
            .with_retry(RetryPolicy::disabled());

        let config = builder.config();
        assert_eq!(config.host(), "192.168.1.100");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.passkey(), Some("1234"));
        assert_eq!(config.credentials(), Some(("admin", "pass")));
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert!(!config.retry().enabled);
    }

    #[test]
    fn build_without_probe_does_not_initialize() {
        let client = Bsblan::http("192.168.1.100").build_without_probe().unwrap();
        assert!(client.api_version().is_none());
    }

    #[test]
    fn empty_host_is_rejected() {
        let result = Bsblan::http("").build_without_probe();
        assert!(matches!(
            result,
            Err(Error::Protocol(crate::error::ProtocolError::InvalidAddress(_)))
        ));
    }
}
