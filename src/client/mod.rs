//! OpenAlex API client.
//!
//! The [`OpenAlexClient`] owns the HTTP session and a per-instance rate
//! limiter, and exposes one operation: [`OpenAlexClient::top_cited`], which
//! searches OpenAlex and normalizes the response into [`crate::models::Paper`]
//! records.

mod openalex;

pub use openalex::{OpenAlexClient, DEFAULT_LIMIT};

use thiserror::Error;

/// Errors that can occur while talking to the OpenAlex API
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or transport error
    #[error("network error: {0}")]
    Network(String),

    /// Non-recoverable HTTP status from the API
    #[error("OpenAlex returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// Malformed JSON response
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}
