//! Asynchronous sales-order API client implementation.

use crate::Result;
use allotment_core::client::{
    read_body, ClientConfig, ServiceClient, ServiceClientBuilder, SALES_ORDER_DEFAULT_TIMEOUT,
};
use allotment_core::config::GatewayConfig;
use allotment_core::ids::SalesOrderId;
use allotment_core::services::SalesOrderLookup;
use allotment_core::types::{SalesOrder, SalesOrderItem};
use allotment_core::Error;
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::error;
use url::Url;

const USER_AGENT: &str = concat!("sales-order-api/", env!("CARGO_PKG_VERSION"));

/// Builder for [`SalesOrderClient`].
#[derive(Debug, Clone)]
pub struct SalesOrderClientBuilder {
    inner: ServiceClientBuilder,
}

impl SalesOrderClientBuilder {
    /// Create a builder for the specified base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(
            "sales-order",
            base_url,
            Duration::from_secs(SALES_ORDER_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Create a builder from a validated [`GatewayConfig`].
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        config.check()?;
        let mut builder = Self::new(config.parse_sales_order_url()?)?;
        builder.inner = builder.inner.with_gateway_config(config);
        Ok(builder)
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Configure a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token(token);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<SalesOrderClient> {
        let inner = self.inner.build()?;
        Ok(SalesOrderClient { inner })
    }
}

/// Asynchronous sales-order API client.
#[derive(Debug, Clone)]
pub struct SalesOrderClient {
    inner: ServiceClient,
}

impl SalesOrderClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        SalesOrderClientBuilder::new(base_url)?.build()
    }

    /// Construct a client from a [`GatewayConfig`].
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        SalesOrderClientBuilder::from_config(config)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Fetch a sales order with its line items.
    pub async fn get_sales_order(&self, id: SalesOrderId) -> Result<SalesOrder> {
        let path = format!("sales-orders/{id}");
        self.get_json(&path).await.map_err(|err| {
            error!(operation = "get_sales_order", %id, error = %err, "sales order request failed");
            err
        })
    }

    /// List only the line items of a sales order.
    pub async fn list_sales_order_items(&self, id: SalesOrderId) -> Result<Vec<SalesOrderItem>> {
        let path = format!("sales-orders/{id}/items");
        self.get_json(&path).await.map_err(|err| {
            error!(operation = "list_sales_order_items", %id, error = %err, "sales order request failed");
            err
        })
    }

    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .execute(Method::GET, path, &[], |request| {
                request.header("Accept", "application/json")
            })
            .await?;
        let bytes = read_body(response).await?;
        serde_json::from_slice(&bytes).map_err(Error::from)
    }
}

#[async_trait]
impl SalesOrderLookup for SalesOrderClient {
    async fn sales_order(&self, id: SalesOrderId) -> Result<SalesOrder> {
        self.get_sales_order(id).await
    }
}
