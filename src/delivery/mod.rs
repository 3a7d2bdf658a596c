pub mod telegram;

use anyhow::Result;
use colored::Colorize;
use log::warn;

use crate::config::settings::DeliverySettings;
pub use telegram::TelegramClient;

/// Where assembled report messages end up
pub enum Delivery {
    Telegram(TelegramClient),
    /// Prints messages instead of posting them
    Console,
}

impl Delivery {
    /// Telegram when credentials are configured and this is not a dry run
    pub fn select(settings: &DeliverySettings, dry_run: bool) -> Result<Self> {
        if dry_run {
            return Ok(Delivery::Console);
        }
        if !settings.is_configured() {
            warn!("Telegram credentials not set. Printing messages to console instead.");
            return Ok(Delivery::Console);
        }
        Ok(Delivery::Telegram(TelegramClient::new(settings)?))
    }

    pub async fn send(&mut self, text: &str) -> Result<()> {
        match self {
            Delivery::Telegram(client) => client.send_message(text).await,
            Delivery::Console => {
                println!("{}", console_message(text));
                Ok(())
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Delivery::Telegram(_) => "telegram",
            Delivery::Console => "console",
        }
    }
}

fn console_message(text: &str) -> String {
    let rule = "-".repeat(27);
    format!(
        "{}\n{}\n{}",
        "--- MOCK TELEGRAM MESSAGE ---".bold().cyan(),
        text,
        rule.dimmed()
    )
}
