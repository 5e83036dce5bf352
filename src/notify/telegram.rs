// src/notify/telegram.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::{cooldown_from_env, format, AlertChannel};
use crate::score::ScoredItem;

const DEFAULT_COOLDOWN_SECS: i64 = 15 * 60;
// Telegram rejects messages over 4096 chars; stay under with headroom.
const TELEGRAM_CHAR_LIMIT: usize = 4000;

struct TelegramConfig {
    bot_token: String,
    chat_id: String,
}

/// Bot-API text message. Enabled by TELEGRAM_BOT_TOKEN + TELEGRAM_CHAT_ID.
pub struct TelegramChannel {
    config: Option<TelegramConfig>,
    client: Client,
    cooldown_secs: i64,
}

impl TelegramChannel {
    pub fn from_env() -> Self {
        let config = match (
            std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            std::env::var("TELEGRAM_CHAT_ID").ok(),
        ) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            _ => None,
        };
        Self {
            config,
            client: Client::new(),
            cooldown_secs: cooldown_from_env("TELEGRAM_COOLDOWN_SECS", DEFAULT_COOLDOWN_SECS),
        }
    }
}

#[async_trait]
impl AlertChannel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    fn cooldown_secs(&self) -> i64 {
        self.cooldown_secs
    }

    async fn deliver(&self, batch: &[ScoredItem]) -> Result<()> {
        let Some(cfg) = &self.config else {
            anyhow::bail!("telegram channel not configured");
        };

        let url = format!(
            "https://api.telegram.org/bot{}/sendMessage",
            cfg.bot_token
        );
        let body = serde_json::json!({
            "chat_id": cfg.chat_id,
            "text": format::plain_digest(batch, TELEGRAM_CHAR_LIMIT),
            "disable_web_page_preview": true,
        });

        self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("telegram post")?
            .error_for_status()
            .context("telegram non-2xx")?;
        Ok(())
    }
}
