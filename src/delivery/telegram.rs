use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::config::settings::DeliverySettings;
use crate::errors::delivery_context;
use crate::http::RateLimitedClient;

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Posts report messages to a Telegram chat through the Bot API
pub struct TelegramClient {
    client: RateLimitedClient,
    base_url: String,
    bot_token: String,
    chat_id: String,
    max_attempts: u32,
}

impl TelegramClient {
    pub fn new(settings: &DeliverySettings) -> Result<Self> {
        let bot_token = settings
            .bot_token
            .clone()
            .context("TELEGRAM_BOT_TOKEN is not set")?;
        let chat_id = settings
            .chat_id
            .clone()
            .context("TELEGRAM_CHAT_ID is not set")?;
        let client = RateLimitedClient::new(
            &settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.clone(),
            bot_token,
            chat_id,
            max_attempts: settings.max_attempts.max(1),
        })
    }

    pub async fn send_message(&mut self, text: &str) -> Result<()> {
        let url = self.build_method_url("sendMessage");
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let mut attempt = 1;
        loop {
            match self.client.post_json(&url, &[], &body).await {
                Ok(_) => {
                    info!("Telegram message sent ({} chars)", text.chars().count());
                    return Ok(());
                }
                Err(e) if attempt < self.max_attempts => {
                    warn!("Telegram send attempt {} failed: {:#}", attempt, e);
                    attempt += 1;
                }
                // The URL carries the bot token, so it stays out of the error
                Err(e) => return Err(e.context(delivery_context("Telegram"))),
            }
        }
    }

    fn build_method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.bot_token, method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DeliverySettings {
        DeliverySettings {
            bot_token: Some("123:abc".to_string()),
            chat_id: Some("-100200".to_string()),
            ..DeliverySettings::default()
        }
    }

    #[test]
    fn test_method_url() {
        let client = TelegramClient::new(&settings()).unwrap();

        assert_eq!(
            client.build_method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_payload_shape() {
        let body = SendMessage {
            chat_id: "-100200",
            text: "hello",
            parse_mode: "Markdown",
        };

        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["chat_id"], "-100200");
        assert_eq!(json["parse_mode"], "Markdown");
    }

    #[test]
    fn test_requires_credentials() {
        assert!(TelegramClient::new(&DeliverySettings::default()).is_err());
    }
}
