//! Configuration structures for the allotment API clients.
//!
//! [`GatewayConfig`] is deserializable with serde, so callers can load it from
//! whatever configuration source their application already uses, and it is
//! validated with `validator` before any client is built from it.

use crate::Error;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Connection settings shared by the allotment and sales-order clients.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GatewayConfig {
    /// Base URL of the allotment API
    #[validate(url)]
    pub allotment_url: String,

    /// Base URL of the sales-order API; defaults to `allotment_url`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub sales_order_url: Option<String>,

    /// Bearer token sent with every request
    #[serde(default, skip_serializing)]
    pub api_token: Option<SecretString>,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to a custom CA certificate (PEM)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl GatewayConfig {
    /// Create a configuration for the given allotment API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(allotment_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            allotment_url: allotment_url.into(),
            sales_order_url: None,
            api_token: None,
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
        };

        config.check()?;
        Ok(config)
    }

    /// Point sales-order lookups at a separate service.
    #[must_use]
    pub fn with_sales_order_url(mut self, url: impl Into<String>) -> Self {
        self.sales_order_url = Some(url.into());
        self
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set a custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate all fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Parse the allotment API URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_allotment_url(&self) -> Result<Url, Error> {
        Url::parse(&self.allotment_url)
            .map_err(|e| Error::ConfigError(format!("Invalid allotment URL: {e}")))
    }

    /// Parse the sales-order API URL, falling back to the allotment URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_sales_order_url(&self) -> Result<Url, Error> {
        let raw = self.sales_order_url.as_deref().unwrap_or(&self.allotment_url);
        Url::parse(raw).map_err(|e| Error::ConfigError(format!("Invalid sales order URL: {e}")))
    }
}
