//! Sales-order API client.
//!
//! Resolves sales orders and their line items, and serves as the
//! [`SalesOrderLookup`](allotment_core::services::SalesOrderLookup) used by the
//! allotment gateway.

#![deny(missing_docs)]

pub mod client;

pub use allotment_core::types::{SalesOrder, SalesOrderItem};
pub use client::{SalesOrderClient, SalesOrderClientBuilder};

/// Convenient result alias that reuses the shared allotment error type.
pub type Result<T> = allotment_core::Result<T>;
