// src/notify/slack.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::{cooldown_from_env, format, AlertChannel};
use crate::score::ScoredItem;

const DEFAULT_COOLDOWN_SECS: i64 = 10 * 60;
const MAX_ATTACHMENTS: usize = 5;

/// Incoming-webhook message with one attachment per item.
pub struct SlackChannel {
    webhook_url: Option<String>,
    client: Client,
    cooldown_secs: i64,
}

impl SlackChannel {
    pub fn from_env() -> Self {
        Self {
            webhook_url: std::env::var("SLACK_WEBHOOK_URL").ok(),
            client: Client::new(),
            cooldown_secs: cooldown_from_env("SLACK_COOLDOWN_SECS", DEFAULT_COOLDOWN_SECS),
        }
    }
}

fn attachment_color(impact: f32) -> &'static str {
    if impact >= 8.0 {
        "danger"
    } else if impact >= 6.0 {
        "warning"
    } else {
        "good"
    }
}

#[async_trait]
impl AlertChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    fn cooldown_secs(&self) -> i64 {
        self.cooldown_secs
    }

    async fn deliver(&self, batch: &[ScoredItem]) -> Result<()> {
        let Some(url) = &self.webhook_url else {
            anyhow::bail!("slack channel not configured");
        };

        let attachments: Vec<_> = batch
            .iter()
            .take(MAX_ATTACHMENTS)
            .map(|item| {
                serde_json::json!({
                    "color": attachment_color(item.effective_impact()),
                    "title": format::short_heading(item),
                    "title_link": item.item.url,
                    "fields": [
                        { "title": "Impact", "value": format!("{:.0}/10", item.effective_impact()), "short": true },
                        { "title": "Source", "value": item.item.source, "short": true }
                    ]
                })
            })
            .collect();

        let body = serde_json::json!({
            "text": format!("Market alert: {} high-impact item(s)", batch.len()),
            "attachments": attachments,
        });

        self.client
            .post(url)
            .json(&body)
            .send()
            .await
            .context("slack post")?
            .error_for_status()
            .context("slack non-2xx")?;
        Ok(())
    }
}
