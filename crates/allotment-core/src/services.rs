//! Collaborator traits consumed by the allotment gateway.
//!
//! The gateway resolves sales orders through [`SalesOrderLookup`] rather than a
//! concrete client, so the order service can be swapped or mocked.

use crate::ids::SalesOrderId;
use crate::types::SalesOrder;

/// Sales-order lookup abstraction.
///
/// Implemented by the HTTP sales-order client; tests provide in-memory or
/// mocked implementations.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SalesOrderLookup: Send + Sync {
    /// Resolve a sales order with its line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be fetched.
    async fn sales_order(&self, id: SalesOrderId) -> crate::Result<SalesOrder>;

    /// Check whether a sales order can be resolved.
    async fn sales_order_exists(&self, id: SalesOrderId) -> bool {
        self.sales_order(id).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, TransportError};
    use mockall::predicate::eq;

    fn empty_order(id: SalesOrderId) -> SalesOrder {
        SalesOrder {
            id,
            order_number: None,
            customer_name: None,
            order_date: None,
            items: Vec::new(),
        }
    }

    struct SingleOrder(SalesOrderId);

    #[async_trait::async_trait]
    impl SalesOrderLookup for SingleOrder {
        async fn sales_order(&self, id: SalesOrderId) -> crate::Result<SalesOrder> {
            if id == self.0 {
                Ok(empty_order(id))
            } else {
                Err(Error::Transport(TransportError::NoResponse {
                    reason: "connection refused".into(),
                }))
            }
        }
    }

    #[test]
    fn exists_reflects_lookup_outcome() {
        let lookup = SingleOrder(SalesOrderId::new(1));
        assert!(tokio_test::block_on(
            lookup.sales_order_exists(SalesOrderId::new(1))
        ));
        assert!(!tokio_test::block_on(
            lookup.sales_order_exists(SalesOrderId::new(2))
        ));
    }

    #[tokio::test]
    async fn mock_lookup_usable_as_trait_object() {
        let mut mock = MockSalesOrderLookup::new();
        mock.expect_sales_order()
            .with(eq(SalesOrderId::new(4)))
            .times(1)
            .returning(|id| Ok(empty_order(id)));

        let lookup: &dyn SalesOrderLookup = &mock;
        let order = lookup.sales_order(SalesOrderId::new(4)).await.unwrap();
        assert_eq!(order.id, SalesOrderId::new(4));
    }
}
