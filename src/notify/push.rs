// src/notify/push.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::{cooldown_from_env, format, AlertChannel};
use crate::score::ScoredItem;

const DEFAULT_COOLDOWN_SECS: i64 = 5 * 60;
const EXPO_PUSH_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Expo push notifications, one per item in a single request.
/// Enabled by PUSH_NOTIFICATION_KEY (the recipient push token).
pub struct PushChannel {
    push_token: Option<String>,
    client: Client,
    cooldown_secs: i64,
}

impl PushChannel {
    pub fn from_env() -> Self {
        Self {
            push_token: std::env::var("PUSH_NOTIFICATION_KEY").ok(),
            client: Client::new(),
            cooldown_secs: cooldown_from_env("PUSH_COOLDOWN_SECS", DEFAULT_COOLDOWN_SECS),
        }
    }
}

#[async_trait]
impl AlertChannel for PushChannel {
    fn name(&self) -> &'static str {
        "push"
    }

    fn is_configured(&self) -> bool {
        self.push_token.is_some()
    }

    fn cooldown_secs(&self) -> i64 {
        self.cooldown_secs
    }

    async fn deliver(&self, batch: &[ScoredItem]) -> Result<()> {
        let Some(token) = &self.push_token else {
            anyhow::bail!("push channel not configured");
        };

        let notifications: Vec<_> = batch
            .iter()
            .map(|item| {
                serde_json::json!({
                    "to": token,
                    "title": format::short_heading(item),
                    "body": item.item.description.chars().take(180).collect::<String>(),
                    "data": {
                        "url": item.item.url,
                        "impact": item.effective_impact(),
                    }
                })
            })
            .collect();

        self.client
            .post(EXPO_PUSH_URL)
            .json(&notifications)
            .send()
            .await
            .context("push post")?
            .error_for_status()
            .context("push non-2xx")?;
        Ok(())
    }
}
