//! Synchronous API client core for the Gradient clusters and hyperparameter
//! tuning services.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, keeping the core deterministic and testable.
//!
//! # Design
//! - `GradientClient` holds only endpoint configuration and its header set.
//! - Each operation is split into `build_*` and `parse_*` so the I/O boundary
//!   is explicit.
//! - `present` turns parsed values and errors into the exact text the CLI
//!   prints.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod present;
pub mod types;

pub use client::GradientClient;
pub use config::ApiConfig;
pub use error::{ApiError, ErrorDetail, Operation};
pub use headers::HeaderSet;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Payload};
pub use types::{
    Cluster, CreateHyperparameter, Created, Hyperparameter, ListFilter, ListMeta, Page,
};
