//! # allotment-core
//!
//! Core types and utilities for talking to the production-allotment REST API.
//!
//! This crate provides the shared HTTP transport, error handling, configuration
//! and identifier types used by the allotment and sales-order client crates.
//!
//! ## Modules
//!
//! - [`error`] - Domain errors and the tagged transport failure type
//! - [`ids`] - Strongly-typed numeric identifiers
//! - [`types`] - Sales-order types shared between client crates
//! - [`config`] - Configuration structures for the API clients
//! - [`client`] - HTTP transport and client configuration
//! - [`query`] - Query-string builder
//! - [`services`] - Collaborator traits consumed by the gateway

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod ids;
pub mod query;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result, TransportError};
