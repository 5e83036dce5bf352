// src/notify/discord.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{cooldown_from_env, format, AlertChannel};
use crate::score::ScoredItem;

const DEFAULT_COOLDOWN_SECS: i64 = 10 * 60;
// Discord accepts at most 10 embeds per webhook payload.
const MAX_EMBEDS: usize = 10;

/// Webhook embeds, color-coded by impact, with a short retry loop for
/// transient webhook hiccups.
pub struct DiscordChannel {
    webhook_url: Option<String>,
    client: Client,
    timeout: Duration,
    max_retries: u8,
    cooldown_secs: i64,
}

impl DiscordChannel {
    pub fn from_env() -> Self {
        Self {
            webhook_url: std::env::var("DISCORD_WEBHOOK_URL").ok(),
            client: Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
            cooldown_secs: cooldown_from_env("DISCORD_COOLDOWN_SECS", DEFAULT_COOLDOWN_SECS),
        }
    }
}

#[derive(Serialize)]
struct Embed {
    title: String,
    description: String,
    url: String,
    color: u32,
    timestamp: String,
}

#[derive(Serialize)]
struct WebhookPayload {
    embeds: Vec<Embed>,
}

fn impact_color(impact: f32) -> u32 {
    if impact >= 8.0 {
        0xff0000
    } else if impact >= 6.0 {
        0xff8800
    } else {
        0x00ff00
    }
}

fn build_payload(batch: &[ScoredItem]) -> WebhookPayload {
    WebhookPayload {
        embeds: batch
            .iter()
            .take(MAX_EMBEDS)
            .map(|item| Embed {
                title: format::short_heading(item),
                description: format!(
                    "{} | impact {:.0}/10\n{}",
                    item.item.source,
                    item.effective_impact(),
                    item.item.description.chars().take(300).collect::<String>()
                ),
                url: item.item.url.clone(),
                color: impact_color(item.effective_impact()),
                timestamp: item.item.published_at.to_rfc3339(),
            })
            .collect(),
    }
}

#[async_trait]
impl AlertChannel for DiscordChannel {
    fn name(&self) -> &'static str {
        "discord"
    }

    fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    fn cooldown_secs(&self) -> i64 {
        self.cooldown_secs
    }

    async fn deliver(&self, batch: &[ScoredItem]) -> Result<()> {
        let Some(webhook) = &self.webhook_url else {
            anyhow::bail!("discord channel not configured");
        };

        let payload = build_payload(batch);

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(webhook)
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            match res {
                Ok(rsp) => {
                    if let Err(e) = rsp.error_for_status_ref() {
                        if attempt < self.max_retries {
                            tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1)))
                                .await;
                            continue;
                        }
                        return Err(anyhow!("discord webhook HTTP error: {e}"));
                    }
                    return Ok(());
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                        continue;
                    }
                    return Err(anyhow!("discord webhook request failed: {e}"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FeedItem;
    use crate::score::score_item;
    use crate::sources::SourcePriority;
    use chrono::Utc;

    #[test]
    fn payload_caps_embed_count() {
        let batch: Vec<_> = (0..25)
            .map(|i| {
                score_item(&FeedItem {
                    id: format!("id{i}"),
                    title: "Fed rate hike".to_string(),
                    description: String::new(),
                    url: format!("https://example.test/{i}"),
                    published_at: Utc::now(),
                    source: "Test Wire".to_string(),
                    source_category: "financial".to_string(),
                    priority: SourcePriority::High,
                })
            })
            .collect();
        assert_eq!(build_payload(&batch).embeds.len(), MAX_EMBEDS);
    }

    #[test]
    fn color_tracks_impact_tiers() {
        assert_eq!(impact_color(9.0), 0xff0000);
        assert_eq!(impact_color(6.5), 0xff8800);
        assert_eq!(impact_color(5.0), 0x00ff00);
    }
}
