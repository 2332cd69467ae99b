//! Asynchronous allotment API client implementation.

use crate::models::{
    Allotment, AllotmentListParams, AllotmentStatus, AllotmentStatusCheck,
    CreateAllotmentRequest, CreateAllotmentResponse, Lot, RollConfirmationSummary, SerialNumber,
    UpdateStatusRequest,
};
use crate::Result;
use allotment_core::client::{
    read_body, ClientConfig, ServiceClient, ServiceClientBuilder, ALLOTMENT_DEFAULT_TIMEOUT,
};
use allotment_core::config::GatewayConfig;
use allotment_core::ids::{AllotmentId, SalesOrderId, SalesOrderItemId};
use allotment_core::services::SalesOrderLookup;
use allotment_core::Error;
use futures::future::try_join_all;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

const USER_AGENT: &str = concat!("allotment-api/", env!("CARGO_PKG_VERSION"));
const SERVICE: &str = "allotment";

/// Builder for [`AllotmentClient`].
#[derive(Debug, Clone)]
pub struct AllotmentClientBuilder {
    inner: ServiceClientBuilder,
}

impl AllotmentClientBuilder {
    /// Create a builder for the specified base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(
            SERVICE,
            base_url,
            Duration::from_secs(ALLOTMENT_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT);

        Ok(Self { inner: builder })
    }

    /// Create a builder from a validated [`GatewayConfig`].
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        config.check()?;
        let base_url = config.parse_allotment_url()?;
        Ok(Self::new(base_url)?.with_gateway_config(config))
    }

    fn with_gateway_config(mut self, config: &GatewayConfig) -> Self {
        self.inner = self.inner.with_gateway_config(config);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.inner = self.inner.with_basic_auth(username, password);
        self
    }

    /// Configure a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.with_token(token);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<AllotmentClient> {
        let inner = self.inner.build()?;
        Ok(AllotmentClient { inner })
    }
}

/// Asynchronous allotment API client.
///
/// Holds only the shared transport; every operation is independent and the
/// client can be cloned freely across tasks.
#[derive(Debug, Clone)]
pub struct AllotmentClient {
    inner: ServiceClient,
}

impl AllotmentClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        AllotmentClientBuilder::new(base_url)?.build()
    }

    /// Construct a client from a [`GatewayConfig`].
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        AllotmentClientBuilder::from_config(config)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// List allotments, optionally filtered.
    pub async fn list_allotments(&self, params: &AllotmentListParams) -> Result<Vec<Allotment>> {
        let query = params.to_query();
        self.send_json::<(), _>(Method::GET, "allotments", None, query.as_pairs())
            .await
            .map_err(|err| log_failure("list_allotments", err))
    }

    /// Fetch the next free allotment serial number.
    pub async fn next_serial_number(&self) -> Result<SerialNumber> {
        self.send_json::<(), _>(Method::GET, "allotments/serial-number", None, &[])
            .await
            .map_err(|err| log_failure("next_serial_number", err))
    }

    /// Create a new allotment.
    pub async fn create_allotment(
        &self,
        request: &CreateAllotmentRequest,
    ) -> Result<CreateAllotmentResponse> {
        self.send_json(Method::POST, "allotments", Some(request), &[])
            .await
            .map_err(|err| log_failure("create_allotment", err))
    }

    /// Fetch a single allotment by its business identifier.
    ///
    /// Unlike the other operations, failures are classified into
    /// user-facing errors: [`Error::AllotmentNotFound`] for 404,
    /// [`Error::ServerError`] for other statuses, [`Error::Unreachable`] when
    /// no response arrived, [`Error::RequestFailed`] when the request could not
    /// be built and [`Error::Other`] for anything else. A successful response
    /// without a body yields [`Error::MalformedResponse`].
    pub async fn get_allotment(&self, allotment_id: &str) -> Result<Allotment> {
        let path = format!("allotments/{}", encode_segment(allotment_id));

        self.fetch_allotment(&path, allotment_id)
            .await
            .map_err(|err| {
                error!(
                    operation = "get_allotment",
                    allotment_id,
                    error = %err,
                    "allotment request failed"
                );
                err.classify_fetch(allotment_id)
            })
    }

    async fn fetch_allotment(&self, path: &str, allotment_id: &str) -> Result<Allotment> {
        let response = self
            .inner
            .execute(Method::GET, path, &[], accept_json)
            .await?;
        let bytes = read_body(response).await?;
        if is_blank(&bytes) {
            return Err(Error::MalformedResponse(format!(
                "empty body for allotment {allotment_id}"
            )));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Toggle the hold flag of an allotment.
    pub async fn toggle_hold(&self, id: AllotmentId) -> Result<Allotment> {
        let path = format!("allotments/{id}/toggle-hold");
        self.send_json::<(), _>(Method::PUT, &path, None, &[])
            .await
            .map_err(|err| log_failure("toggle_hold", err))
    }

    /// Suspend an allotment.
    pub async fn suspend(&self, id: AllotmentId) -> Result<Allotment> {
        let path = format!("allotments/{id}/suspend");
        self.send_json::<(), _>(Method::PUT, &path, None, &[])
            .await
            .map_err(|err| log_failure("suspend", err))
    }

    /// Restart a suspended allotment.
    pub async fn restart(&self, id: AllotmentId) -> Result<Allotment> {
        let path = format!("allotments/{id}/restart");
        self.send_json::<(), _>(Method::PUT, &path, None, &[])
            .await
            .map_err(|err| log_failure("restart", err))
    }

    /// Move an allotment to a new status.
    pub async fn update_status(&self, id: AllotmentId, status: AllotmentStatus) -> Result<Allotment> {
        let path = format!("allotments/{id}/status");
        let body = UpdateStatusRequest { status };
        self.send_json(Method::PUT, &path, Some(&body), &[])
            .await
            .map_err(|err| log_failure("update_status", err))
    }

    /// Check which downstream records exist for an allotment.
    pub async fn check_status(&self, id: AllotmentId) -> Result<AllotmentStatusCheck> {
        let path = format!("allotments/{id}/status-check");
        self.send_json::<(), _>(Method::GET, &path, None, &[])
            .await
            .map_err(|err| log_failure("check_status", err))
    }

    /// Fetch the lots produced for one sales order item.
    pub async fn lots_for_item(
        &self,
        order_id: SalesOrderId,
        item_id: SalesOrderItemId,
    ) -> Result<Vec<Lot>> {
        let path = format!("sales-orders/{order_id}/items/{item_id}/lots");
        self.send_json::<(), _>(Method::GET, &path, None, &[])
            .await
            .map_err(|err| log_failure("lots_for_item", err))
    }

    /// Fetch the roll confirmation summary for one sales order item.
    pub async fn roll_confirmation_summary(
        &self,
        order_id: SalesOrderId,
        item_id: SalesOrderItemId,
    ) -> Result<RollConfirmationSummary> {
        let path = format!("sales-orders/{order_id}/items/{item_id}/roll-confirmation-summary");
        self.send_json::<(), _>(Method::GET, &path, None, &[])
            .await
            .map_err(|err| log_failure("roll_confirmation_summary", err))
    }

    /// Fetch every lot of a sales order.
    ///
    /// Resolves the order through `orders`, then requests the lots of all of
    /// its items concurrently. The result lists item 0's lots first, then item
    /// 1's, and so on, whatever order the responses arrive in. The first
    /// failing request fails the whole call; no partial list is returned.
    pub async fn lots_for_sales_order<L>(&self, orders: &L, order_id: SalesOrderId) -> Result<Vec<Lot>>
    where
        L: SalesOrderLookup + ?Sized,
    {
        let order = orders
            .sales_order(order_id)
            .await
            .map_err(|err| log_failure("lots_for_sales_order", err))?;

        debug!(%order_id, items = order.items.len(), "fetching lots for sales order items");

        let per_item = try_join_all(
            order
                .item_ids()
                .map(|item_id| self.lots_for_item(order_id, item_id)),
        )
        .await
        .map_err(|err| log_failure("lots_for_sales_order", err))?;

        Ok(per_item.into_iter().flatten().collect())
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&'static str, String)],
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .execute(method, path, params, |mut request| {
                request = accept_json(request);
                if let Some(payload) = body {
                    request = request.json(payload);
                }
                request
            })
            .await?;

        let bytes = read_body(response).await?;
        serde_json::from_slice(&bytes).map_err(Error::from)
    }
}

fn accept_json(request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    request.header("Accept", "application/json")
}

fn log_failure(operation: &'static str, err: Error) -> Error {
    error!(operation, error = %err, "allotment request failed");
    err
}

fn is_blank(body: &[u8]) -> bool {
    match std::str::from_utf8(body) {
        Ok(text) => {
            let text = text.trim();
            text.is_empty() || text == "null"
        }
        Err(_) => false,
    }
}

fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
