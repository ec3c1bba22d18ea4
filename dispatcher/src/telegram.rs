//! Telegram Bot API client and alert message formatting

use serde::{Deserialize, Serialize};

use shared::AlertDelivery;

/// Telegram messaging client
#[derive(Clone)]
pub struct TelegramClient {
    bot_token: String,
    chat_id: String,
    http_client: reqwest::Client,
}

/// sendMessage request payload
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Minimal sendMessage response
#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramClient {
    /// Create a new Telegram client
    pub fn new(bot_token: String, chat_id: String, http_client: reqwest::Client) -> Self {
        Self {
            bot_token,
            chat_id,
            http_client,
        }
    }

    /// Push one message to the configured chat.
    pub async fn send_message(&self, text: &str) -> Result<(), String> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = self
            .http_client
            .post(format!(
                "https://api.telegram.org/bot{}/sendMessage",
                self.bot_token
            ))
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Failed to reach Telegram: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Telegram returned status {}", response.status()));
        }

        let body: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| format!("Unreadable Telegram response: {}", e))?;

        if body.ok {
            Ok(())
        } else {
            Err(body
                .description
                .unwrap_or_else(|| "Unknown Telegram error".to_string()))
        }
    }
}

/// Render one pending alert as the outbound channel message.
pub fn format_alert(alert: &AlertDelivery) -> String {
    format!(
        "🚨 *Pollution alert*\n\n\
         📍 *Station:* {}\n\
         ⚠️ *Pollutant:* {}\n\
         📊 *Value:* {:.2} {} (limit: {:.2})",
        alert.station_name,
        alert.pollutant.display_name(),
        alert.value,
        alert.pollutant.unit(),
        alert.limit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::Pollutant;

    #[test]
    fn test_format_alert_message() {
        let alert = AlertDelivery {
            station_id: 7,
            alert_timestamp: Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap(),
            pollutant: Pollutant::No2,
            value: 43.2,
            limit: 25.0,
            station_name: "Avda. Francia".to_string(),
            city: "valencia".to_string(),
        };
        let message = format_alert(&alert);

        assert!(message.contains("Avda. Francia"));
        assert!(message.contains("NO₂"));
        assert!(message.contains("43.20 µg/m³"));
        assert!(message.contains("limit: 25.00"));
    }

    #[test]
    fn test_format_alert_uses_co_unit() {
        let alert = AlertDelivery {
            station_id: 7,
            alert_timestamp: Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap(),
            pollutant: Pollutant::Co,
            value: 6.5,
            limit: 4.0,
            station_name: "Centre".to_string(),
            city: "valencia".to_string(),
        };
        assert!(format_alert(&alert).contains("mg/m³"));
    }
}
