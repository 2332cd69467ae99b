//! HTTP transport shared by the allotment API clients.
//!
//! [`ServiceClient`] owns a configured `reqwest` client and a base URL. It
//! issues exactly one request per call and reports failures as a tagged
//! [`TransportError`]. Failed requests are not retried.

use crate::config::GatewayConfig;
use crate::error::TransportError;
use crate::{Error, Result};
use bytes::Bytes;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

/// Default timeout for allotment API requests
pub const ALLOTMENT_DEFAULT_TIMEOUT: u64 = 30;

/// Default timeout for sales-order API requests
pub const SALES_ORDER_DEFAULT_TIMEOUT: u64 = 20;

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connect timeout
    pub connect_timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable request/response logging
    pub enable_logging: bool,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(ALLOTMENT_DEFAULT_TIMEOUT),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable logging.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
enum Auth {
    Bearer(SecretString),
    Basic { username: String, password: SecretString },
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    service: &'static str,
    base_url: Url,
    http_config: ClientConfig,
    user_agent: String,
    auth: Option<Auth>,
    tls_verify: bool,
    tls_ca_cert: Option<PathBuf>,
}

impl ServiceClientBuilder {
    /// Create a builder for `service` rooted at `base_url`.
    ///
    /// A trailing slash is appended to the base path so relative endpoint
    /// paths resolve beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the URL cannot be parsed.
    pub fn new(service: &'static str, base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_ref())?;
        Ok(Self {
            service,
            base_url,
            http_config: ClientConfig::new().with_timeout(timeout),
            user_agent: concat!("allotment-core/", env!("CARGO_PKG_VERSION")).to_string(),
            auth: None,
            tls_verify: true,
            tls_ca_cert: None,
        })
    }

    /// Apply the TLS, timeout and credential settings of a [`GatewayConfig`].
    #[must_use]
    pub fn with_gateway_config(mut self, config: &GatewayConfig) -> Self {
        self.http_config.timeout = config.timeout();
        self.tls_verify = config.tls_verify;
        self.tls_ca_cert.clone_from(&config.tls_ca_cert);
        if let Some(token) = &config.api_token {
            self.auth = Some(Auth::Bearer(token.clone()));
        }
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = Some(Auth::Basic {
            username: username.into(),
            password: SecretString::from(password.into()),
        });
        self
    }

    /// Configure a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::Bearer(SecretString::from(token.into())));
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the CA certificate cannot be loaded or
    /// the underlying HTTP client cannot be created.
    pub fn build(self) -> Result<ServiceClient> {
        let config = &self.http_config;
        let mut builder = ClientBuilder::new()
            .user_agent(&self.user_agent)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .gzip(config.enable_compression);

        if !self.tls_verify {
            warn!(service = self.service, "TLS verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &self.tls_ca_cert {
            debug!("loading {} CA certificate from {}", self.service, ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build {} HTTP client: {err}", self.service))
        })?;

        Ok(ServiceClient {
            http,
            service: self.service,
            base_url: self.base_url,
            auth: self.auth,
            enable_logging: config.enable_logging,
        })
    }
}

/// Shared HTTP transport for one remote service.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    service: &'static str,
    base_url: Url,
    auth: Option<Auth>,
    enable_logging: bool,
}

impl ServiceClient {
    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a single request and return the successful response.
    ///
    /// `customize` can attach headers or a body. Non-success statuses are
    /// turned into [`TransportError::Response`] with the body text captured.
    ///
    /// # Errors
    ///
    /// Returns the [`TransportError`] describing how the call failed.
    pub async fn execute<F>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        customize: F,
    ) -> std::result::Result<Response, TransportError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.base_url.join(path)?;
        let request_id = Uuid::new_v4();

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if !params.is_empty() {
            request = request.query(params);
        }
        request = match &self.auth {
            Some(Auth::Bearer(token)) => request.bearer_auth(token.expose_secret()),
            Some(Auth::Basic { username, password }) => {
                request.basic_auth(username, Some(password.expose_secret()))
            }
            None => request,
        };
        let request = customize(request).build()?;

        if self.enable_logging {
            debug!(
                service = self.service,
                %method,
                path,
                %request_id,
                "sending request"
            );
        }

        let response = self.http.execute(request).await?;
        let status = response.status();

        if self.enable_logging {
            debug!(
                service = self.service,
                %method,
                path,
                %request_id,
                status = status.as_u16(),
                "received response"
            );
        }

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(TransportError::from_status(status, body))
    }
}

/// Read the full body of a successful response.
///
/// A body that breaks off after the status line arrived is a malformed
/// response, not a missing one.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] if the body cannot be read or
/// decompressed, and a transport error for timeouts and any other failure.
pub async fn read_body(response: Response) -> Result<Bytes> {
    response.bytes().await.map_err(|err| {
        if !err.is_timeout() && (err.is_body() || err.is_decode()) {
            Error::MalformedResponse(format!("failed to read response body: {err}"))
        } else {
            Error::Transport(TransportError::from(err))
        }
    })
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
