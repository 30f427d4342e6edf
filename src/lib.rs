//! # citescout
//!
//! Fetch the top cited papers for a search term from the
//! [OpenAlex](https://openalex.org) API and export them to CSV.
//!
//! ## Architecture
//!
//! The library is organized into a few small modules:
//!
//! - [`models`]: Core data structures ([`Paper`], [`models::Author`])
//! - [`client`]: The OpenAlex API client and its error taxonomy
//! - [`export`]: CSV export of normalized paper records
//! - [`web`]: Minimal web form for batch searches
//! - [`config`]: Environment-driven configuration

pub mod client;
pub mod config;
pub mod export;
pub mod models;
pub mod web;

// Re-export commonly used types
pub use client::OpenAlexClient;
pub use models::Paper;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
