//! CLI module
//!
//! Command-line interface over the client.
//!
//! # Commands
//!
//! - `me` - Show the authenticated user
//! - `stories` - List stories, page by page
//! - `activity` - Show the project activity feed
//! - `aggregate` - Fetch story bundles through the aggregator

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
