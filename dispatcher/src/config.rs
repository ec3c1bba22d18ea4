//! Configuration for the alert dispatcher
//!
//! Loaded once at startup; missing Telegram credentials or gateway settings
//! refuse to start the process.

use config::{ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the barrier API
    pub gateway_url: String,

    /// Credential presented to the gateway
    pub api_key: String,

    /// Telegram bot token
    pub bot_token: String,

    /// Telegram channel/chat receiving the alerts
    pub chat_id: String,

    /// Seconds between dispatch cycles
    pub check_interval_secs: u64,

    /// Timeout applied to every outbound HTTP call, in seconds
    pub request_timeout_secs: u64,

    /// Pause between consecutive channel messages, in seconds
    pub message_pause_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with AQD_ prefix.
    pub fn load() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .set_default("gateway_url", "http://backend:8000")?
            .set_default("check_interval_secs", 300_i64)?
            .set_default("request_timeout_secs", 30_i64)?
            .set_default("message_pause_secs", 1_i64)?
            // api_key, bot_token and chat_id have no defaults:
            // startup fails without them
            .add_source(
                Environment::with_prefix("AQD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
