// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Tracker API client
//!
//! An async client for the Pivotal Tracker v5 REST API.
//!
//! ## Features
//!
//! - **Lazy pagination**: A cursor probes a collection's size once, then
//!   fetches `limit`/`offset` pages as items are consumed
//! - **Batch aggregation**: Many GETs are folded into a few calls to the
//!   aggregator endpoint and matched back by URL or by story ID
//! - **Typed models**: Stories, comments, reviews, activity, projects
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tracker_api::{ClientConfig, CorrelationStrategy, Result, TrackerClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = TrackerClient::new(ClientConfig::load(None)?)?;
//!
//!     // Page through started stories
//!     let mut cursor = client.stories().iterate(99, Some("state:started")).await?;
//!     while let Some(story) = cursor.next().await? {
//!         println!("{} {}", story.id, story.name);
//!     }
//!
//!     // Fetch two stories with their comments in one round trip
//!     let mut agg = client.aggregation(CorrelationStrategy::ById);
//!     agg.queue_story_bundle(99, 1).queue_story_bundle(99, 2);
//!     agg.dispatch().await?;
//!     let bundle = agg.bundle(1)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      TrackerClient                        │
//! │   stories()  activity()  projects()  me()  aggregation()  │
//! └───────────────────────────────────────────────────────────┘
//!                │                              │
//! ┌──────────────┴─────────────┐  ┌─────────────┴─────────────┐
//! │      Cursor (paginate)     │  │   Aggregation (batch)     │
//! │ probe → pages on demand    │  │ queue → chunks → lookup   │
//! └──────────────┬─────────────┘  └─────────────┬─────────────┘
//!                └───────────────┬──────────────┘
//!                     ┌──────────┴──────────┐
//!                     │  Transport (HTTP)   │
//!                     └─────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// Token authentication
pub mod auth;

/// HTTP transport
pub mod http;

/// Client configuration
pub mod config;

/// Domain models
pub mod models;

/// Lazy pagination cursor
pub mod pagination;

/// Batch aggregation engine
pub mod aggregator;

/// Resource services
pub mod services;

/// Top-level client
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use aggregator::{Aggregation, CorrelationStrategy};
pub use client::TrackerClient;
pub use config::ClientConfig;
pub use pagination::Cursor;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
