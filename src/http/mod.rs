//! HTTP transport module
//!
//! Provides the `Transport` seam used by the pagination cursor and the
//! aggregation engine, and its reqwest-backed implementation.
//!
//! # Features
//!
//! - **Transport trait**: issue one request, get status + headers + raw body
//! - **Error mapping**: non-2xx responses become `Error::Api` carrying the
//!   decoded server error payload when available
//! - **Authentication**: `X-TrackerToken` header injection via the auth module
//!
//! Nothing here retries: every failure surfaces to the caller.

mod client;
mod transport;

pub use client::HttpClient;
pub use transport::{ApiRequest, ApiResponse, PaginationHeaders, Transport};
