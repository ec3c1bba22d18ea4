//! Configuration for the ingestion poller
//!
//! Loaded once at startup; a missing API key or gateway URL refuses to start
//! the process.

use config::{ConfigError, Environment};
use serde::Deserialize;

/// Default Valencia open-data endpoint (opendatasoft records API).
const VALENCIA_API_URL: &str = "https://valencia.opendatasoft.com/api/explore/v2.1/catalog/datasets/estacions-contaminacio-atmosferiques-estaciones-contaminacion-atmosfericas/records?limit=100";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// City feed this poller ingests
    pub city: String,

    /// Upstream open-data endpoint
    pub upstream_url: String,

    /// Base URL of the barrier API
    pub gateway_url: String,

    /// Credential presented to the gateway
    pub api_key: String,

    /// Seconds between polling cycles
    pub poll_interval_secs: u64,

    /// Timeout applied to every outbound HTTP call, in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with AQI_ prefix.
    pub fn load() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .set_default("city", "valencia")?
            .set_default("upstream_url", VALENCIA_API_URL)?
            .set_default("gateway_url", "http://backend:8000")?
            .set_default("poll_interval_secs", 600_i64)?
            .set_default("request_timeout_secs", 30_i64)?
            // api_key has no default: startup fails without one
            .add_source(
                Environment::with_prefix("AQI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
