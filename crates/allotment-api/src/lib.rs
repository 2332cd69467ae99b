//! Allotment API client and data models.
//!
//! Provides typed payloads and an asynchronous client for the remote
//! production-allotment API, including the sales-order lot aggregation.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{AllotmentClient, AllotmentClientBuilder};
pub use models::{
    Allotment, AllotmentListParams, AllotmentStatus, AllotmentStatusCheck,
    CreateAllotmentRequest, CreateAllotmentResponse, Lot, RollConfirmationSummary, SerialNumber,
};

/// Convenient result alias that reuses the shared allotment error type.
pub type Result<T> = allotment_core::Result<T>;
