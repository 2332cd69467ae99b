//! Allotment API payloads.
//!
//! Field names follow the remote API's camelCase JSON. Unknown fields are
//! ignored so server-side additions do not break decoding.

use allotment_core::ids::{AllotmentId, LotId, SalesOrderId, SalesOrderItemId};
use allotment_core::query::QueryParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lifecycle status of an allotment.
///
/// Statuses this client does not know are kept verbatim in
/// [`AllotmentStatus::Other`] so they survive a decode/encode round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AllotmentStatus {
    /// Created, not yet started on the floor.
    Pending,
    /// Production in progress.
    InProgress,
    /// Production finished.
    Completed,
    /// Cancelled before completion.
    Cancelled,
    /// Any other status reported by the server.
    Other(String),
}

impl AllotmentStatus {
    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(status) => status,
        }
    }
}

impl From<String> for AllotmentStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "pending" => Self::Pending,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(status),
        }
    }
}

impl fmt::Display for AllotmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AllotmentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AllotmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// A production allotment as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Allotment {
    /// Numeric record id.
    pub id: AllotmentId,
    /// Business identifier, e.g. `ALT-2024-0001`.
    pub allotment_id: String,
    /// Owning sales order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_order_id: Option<SalesOrderId>,
    /// Sales order item being produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_order_item_id: Option<SalesOrderItemId>,
    /// Current status.
    pub status: AllotmentStatus,
    /// Whether the allotment is on hold.
    #[serde(default)]
    pub is_on_hold: bool,
    /// Whether the allotment is suspended.
    #[serde(default)]
    pub is_suspended: bool,
    /// Allotted quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Free-text remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Filters for listing allotments. The default lists everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllotmentListParams {
    /// Only allotments with this status.
    pub status: Option<AllotmentStatus>,
    /// Only allotments for this sales order.
    pub sales_order_id: Option<SalesOrderId>,
}

impl AllotmentListParams {
    /// Filter by status.
    #[must_use]
    pub fn with_status(mut self, status: AllotmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by sales order.
    #[must_use]
    pub const fn with_sales_order(mut self, id: SalesOrderId) -> Self {
        self.sales_order_id = Some(id);
        self
    }

    pub(crate) fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("status", self.status.as_ref())
            .with_opt("salesOrderId", self.sales_order_id)
    }
}

/// Request body for creating an allotment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAllotmentRequest {
    /// Business identifier, usually taken from [`SerialNumber`].
    pub allotment_id: String,
    /// Sales order being allotted.
    pub sales_order_id: SalesOrderId,
    /// Item of the sales order being allotted.
    pub sales_order_item_id: SalesOrderItemId,
    /// Quantity to produce.
    pub quantity: f64,
    /// Free-text remarks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Result of creating an allotment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAllotmentResponse {
    /// Whether the server accepted the allotment.
    pub success: bool,
    /// Numeric id of the new record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AllotmentId>,
    /// Business identifier of the new record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allotment_id: Option<String>,
    /// Server message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Next free allotment serial number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SerialNumber {
    /// Formatted serial number.
    pub serial_number: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateStatusRequest {
    pub(crate) status: AllotmentStatus,
}

/// Which downstream records already exist for an allotment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AllotmentStatusCheck {
    /// A sticker has been printed.
    pub has_sticker: bool,
    /// Rolls have been confirmed.
    pub has_roll_confirmation: bool,
    /// Rolls have been assigned.
    pub has_roll_assignment: bool,
}

/// A production lot tied to one sales order item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Lot id.
    pub id: LotId,
    /// Lot number printed on labels.
    pub lot_number: String,
    /// Sales order the lot belongs to.
    pub sales_order_id: SalesOrderId,
    /// Sales order item the lot belongs to.
    pub sales_order_item_id: SalesOrderItemId,
    /// Produced quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Produced weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Roll confirmation totals for one sales order item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RollConfirmationSummary {
    /// Item the summary covers.
    pub sales_order_item_id: SalesOrderItemId,
    /// Rolls produced.
    #[serde(default)]
    pub total_rolls: u32,
    /// Rolls confirmed.
    #[serde(default)]
    pub confirmed_rolls: u32,
    /// Weight produced.
    #[serde(default)]
    pub total_weight: f64,
    /// Weight confirmed.
    #[serde(default)]
    pub confirmed_weight: f64,
}
