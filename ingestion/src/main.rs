//! Air Quality Monitor - Ingestion Poller
//!
//! Polls the city's open-data endpoint on a fixed interval, reshapes each
//! record into the gateway's ingestion schema, and forwards the batch to the
//! barrier API. A failed cycle is logged and the next tick is the retry;
//! the process never crashes over an upstream hiccup.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod valencia;

use config::Config;

/// Gateway acknowledgment of one ingest call.
#[derive(Debug, Deserialize)]
struct IngestAck {
    received: usize,
    inserted: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aqm_ingestion=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let cfg = Config::load().context("invalid ingestion configuration")?;

    tracing::info!("Starting ingestion poller");
    tracing::info!("City: {}", cfg.city);
    tracing::info!("Upstream: {}", cfg.upstream_url);
    tracing::info!("Gateway: {}", cfg.gateway_url);
    tracing::info!("Interval: {}s", cfg.poll_interval_secs);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let mut ticker = tokio::time::interval(Duration::from_secs(cfg.poll_interval_secs));
    loop {
        ticker.tick().await;

        if let Err(e) = run_cycle(&client, &cfg).await {
            // Log and keep going; the next scheduled tick is the retry
            tracing::error!("Ingestion cycle for {} failed: {:#}", cfg.city, e);
        }
    }
}

/// One polling cycle: fetch, normalize, forward.
async fn run_cycle(client: &reqwest::Client, cfg: &Config) -> Result<()> {
    let readings = valencia::fetch_readings(client, &cfg.upstream_url).await?;

    if readings.is_empty() {
        tracing::warn!("Upstream returned no parseable records");
        return Ok(());
    }
    tracing::debug!("Fetched {} station records", readings.len());

    let response = client
        .post(format!("{}/api/v1/ingest", cfg.gateway_url))
        .header("X-API-Key", &cfg.api_key)
        .json(&readings)
        .send()
        .await
        .context("gateway request failed")?
        .error_for_status()
        .context("gateway rejected the batch")?;

    let ack: IngestAck = response
        .json()
        .await
        .context("gateway acknowledgment was not valid JSON")?;

    tracing::info!(
        received = ack.received,
        inserted = ack.inserted,
        "Ingestion cycle complete"
    );

    Ok(())
}
