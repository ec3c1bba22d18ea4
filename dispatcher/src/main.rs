//! Air Quality Monitor - Alert Dispatcher
//!
//! Polls the barrier API for pending alert triples, pushes each to the
//! Telegram channel, and registers only the confirmed sends back into the
//! delivery ledger. A send failure for one triple never blocks the rest of
//! the pass; unregistered triples simply come back next cycle.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shared::AlertDelivery;

mod config;
mod telegram;

use config::Config;
use telegram::TelegramClient;

/// Pending alerts payload from the gateway.
#[derive(Debug, Deserialize)]
struct PendingAlerts {
    alerts: Vec<AlertDelivery>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aqm_dispatcher=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let cfg = Config::load().context("invalid dispatcher configuration")?;

    tracing::info!("Starting alert dispatcher");
    tracing::info!("Gateway: {}", cfg.gateway_url);
    tracing::info!("Interval: {}s", cfg.check_interval_secs);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let telegram = TelegramClient::new(cfg.bot_token.clone(), cfg.chat_id.clone(), client.clone());

    let mut ticker = tokio::time::interval(Duration::from_secs(cfg.check_interval_secs));
    loop {
        ticker.tick().await;

        match run_cycle(&client, &telegram, &cfg).await {
            Ok(0) => tracing::info!("No pending alerts"),
            Ok(sent) => tracing::info!("Dispatched {} alerts", sent),
            Err(e) => tracing::error!("Dispatch cycle failed: {:#}", e),
        }
    }
}

/// One dispatch cycle. Returns the number of alerts confirmed sent.
async fn run_cycle(
    client: &reqwest::Client,
    telegram: &TelegramClient,
    cfg: &Config,
) -> Result<usize> {
    let pending = fetch_pending(client, cfg).await?;
    if pending.is_empty() {
        return Ok(0);
    }

    tracing::info!("Processing {} pending alerts", pending.len());

    let mut delivered: Vec<AlertDelivery> = Vec::with_capacity(pending.len());
    for alert in pending {
        let message = telegram::format_alert(&alert);

        match telegram.send_message(&message).await {
            Ok(()) => {
                tracing::debug!(
                    station = %alert.station_name,
                    pollutant = %alert.pollutant,
                    "Alert sent"
                );
                delivered.push(alert);
            }
            Err(e) => {
                // Leave the triple unregistered; it returns next cycle
                tracing::warn!(
                    station = %alert.station_name,
                    pollutant = %alert.pollutant,
                    "Send failed: {}",
                    e
                );
            }
        }

        tokio::time::sleep(Duration::from_secs(cfg.message_pause_secs)).await;
    }

    let sent = delivered.len();
    register_delivered(client, cfg, &delivered).await?;
    Ok(sent)
}

/// Fetch the alert triples not yet in the delivery ledger.
async fn fetch_pending(client: &reqwest::Client, cfg: &Config) -> Result<Vec<AlertDelivery>> {
    let pending: PendingAlerts = client
        .get(format!("{}/api/v1/alerts", cfg.gateway_url))
        .header("X-API-Key", &cfg.api_key)
        .send()
        .await
        .context("pending-alerts request failed")?
        .error_for_status()
        .context("gateway rejected the pending-alerts request")?
        .json()
        .await
        .context("pending-alerts response was not valid JSON")?;

    Ok(pending.alerts)
}

/// Register confirmed sends in one batched call.
async fn register_delivered(
    client: &reqwest::Client,
    cfg: &Config,
    delivered: &[AlertDelivery],
) -> Result<()> {
    if delivered.is_empty() {
        return Ok(());
    }

    client
        .post(format!("{}/api/v1/alerts/delivered", cfg.gateway_url))
        .header("X-API-Key", &cfg.api_key)
        .json(delivered)
        .send()
        .await
        .context("delivery registration request failed")?
        .error_for_status()
        .context("gateway rejected the delivery registration")?;

    Ok(())
}
