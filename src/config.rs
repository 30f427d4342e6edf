//! Configuration management.

use serde::{Deserialize, Serialize};

/// Application configuration
///
/// Defaults are read from `CITESCOUT_*` environment variables, falling back
/// to the public OpenAlex endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the OpenAlex API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Contact email sent as the `mailto` parameter (polite pool)
    #[serde(default = "default_mailto")]
    pub mailto: String,

    /// Port for the web interface
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: std::env::var("CITESCOUT_BASE_URL").unwrap_or_else(|_| default_base_url()),
            mailto: std::env::var("CITESCOUT_MAILTO").unwrap_or_else(|_| default_mailto()),
            port: std::env::var("CITESCOUT_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openalex.org".to_string()
}

fn default_mailto() -> String {
    "contact@citescout.dev".to_string()
}

fn default_port() -> u16 {
    5000
}
