//! Sales-order types shared by the client crates.
//!
//! Sales orders are owned by a separate service; the allotment gateway only
//! needs an order's id and the ordered list of its line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{SalesOrderId, SalesOrderItemId};

/// A sales order as returned by the sales-order service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrder {
    /// Order id.
    pub id: SalesOrderId,
    /// Human-facing order number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    /// Customer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Order date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<DateTime<Utc>>,
    /// Line items, in the order the service lists them.
    #[serde(default)]
    pub items: Vec<SalesOrderItem>,
}

impl SalesOrder {
    /// Ids of the order's items, in item order.
    pub fn item_ids(&self) -> impl Iterator<Item = SalesOrderItemId> + '_ {
        self.items.iter().map(|item| item.id)
    }
}

/// A single line item of a [`SalesOrder`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrderItem {
    /// Item id.
    pub id: SalesOrderItemId,
    /// Product or quality description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Unit of the ordered quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_order() {
        let order: SalesOrder = serde_json::from_value(json!({
            "id": 12,
            "orderNumber": "SO-0012",
            "orderDate": "2024-03-01T08:00:00Z",
            "items": [
                { "id": 3, "description": "Cotton twill", "quantity": 1200.5, "unit": "m" },
                { "id": 1 }
            ],
            "unrelatedField": true
        }))
        .unwrap();

        assert_eq!(order.order_number.as_deref(), Some("SO-0012"));
        assert!(order.order_date.is_some());
        let ids: Vec<u64> = order.item_ids().map(SalesOrderItemId::get).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn missing_items_means_empty_order() {
        let order: SalesOrder = serde_json::from_value(json!({ "id": 5 })).unwrap();
        assert!(order.items.is_empty());
    }
}
