//! # ProConnect Client Library
//!
//! GET-only transport layer for the ProConnect relationship-intelligence API:
//! - `ProConnectApi` trait: the seam the enrichment engine depends on
//! - `HttpProConnectClient`: reqwest-based implementation with call tracing
//! - Bearer-token normalization, redaction, and health inspection
//!
//! The client is deliberately thin: it issues authenticated GET requests,
//! normalizes every outcome into an [`ApiResponse`] envelope, and records an
//! append-only trace of calls. Interpretation of payloads belongs to the
//! engine crate.

pub mod api;
pub mod error;
pub mod http;
pub mod token;

pub use api::{ApiResponse, ProConnectApi, RetryPolicy};
pub use error::{ClientError, Result};
pub use http::{CallTrace, HttpProConnectClient};
