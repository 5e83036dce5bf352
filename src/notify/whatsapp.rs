// src/notify/whatsapp.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::{cooldown_from_env, format, AlertChannel};
use crate::score::ScoredItem;

const DEFAULT_COOLDOWN_SECS: i64 = 30 * 60;
const DEFAULT_FROM: &str = "whatsapp:+14155238886";

struct TwilioConfig {
    account_sid: String,
    auth_token: String,
    from: String,
    to: String,
}

/// Plain-text WhatsApp message via the Twilio messages API. The body is
/// hard-capped at [`format::PLAIN_TEXT_CHAR_LIMIT`] characters; anything
/// over is truncated with a visible marker, never rejected.
pub struct WhatsAppChannel {
    config: Option<TwilioConfig>,
    client: Client,
    cooldown_secs: i64,
}

impl WhatsAppChannel {
    pub fn from_env() -> Self {
        let config = match (
            std::env::var("TWILIO_ACCOUNT_SID").ok(),
            std::env::var("TWILIO_AUTH_TOKEN").ok(),
            std::env::var("ALERT_PHONE_NUMBER").ok(),
        ) {
            (Some(account_sid), Some(auth_token), Some(to)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from: std::env::var("TWILIO_WHATSAPP_FROM")
                    .unwrap_or_else(|_| DEFAULT_FROM.to_string()),
                to,
            }),
            _ => None,
        };
        Self {
            config,
            client: Client::new(),
            cooldown_secs: cooldown_from_env("WHATSAPP_COOLDOWN_SECS", DEFAULT_COOLDOWN_SECS),
        }
    }
}

#[async_trait]
impl AlertChannel for WhatsAppChannel {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    fn cooldown_secs(&self) -> i64 {
        self.cooldown_secs
    }

    async fn deliver(&self, batch: &[ScoredItem]) -> Result<()> {
        let Some(cfg) = &self.config else {
            anyhow::bail!("whatsapp channel not configured");
        };

        let body = format::plain_digest(batch, format::PLAIN_TEXT_CHAR_LIMIT);
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            cfg.account_sid
        );

        self.client
            .post(&url)
            .basic_auth(&cfg.account_sid, Some(&cfg.auth_token))
            .form(&[
                ("To", cfg.to.as_str()),
                ("From", cfg.from.as_str()),
                ("Body", body.as_str()),
            ])
            .send()
            .await
            .context("twilio post")?
            .error_for_status()
            .context("twilio non-2xx")?;
        Ok(())
    }
}
