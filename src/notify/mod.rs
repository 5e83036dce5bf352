//! # Alert Dispatcher
//!
//! Fans a scored batch out to every configured channel in parallel. Each
//! channel sits behind its own cooldown gate and records success/failure
//! independently; one failing transport never affects the others. A
//! console/log alert of the full batch is always emitted first, so an
//! operator sees every alert even with zero channels configured.

pub mod discord;
pub mod email;
pub mod format;
pub mod push;
pub mod slack;
pub mod telegram;
pub mod throttle;
pub mod whatsapp;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;

use crate::score::ScoredItem;
use self::throttle::ChannelThrottle;

/// One outbound transport. Implementations read their credentials from the
/// environment; a missing credential set means `is_configured() == false`
/// and the channel is skipped, never an error.
#[async_trait]
pub trait AlertChannel: Send + Sync {
    fn name(&self) -> &'static str;
    fn is_configured(&self) -> bool;
    /// Default cooldown between sends, seconds.
    fn cooldown_secs(&self) -> i64;
    async fn deliver(&self, batch: &[ScoredItem]) -> Result<()>;
}

struct ChannelSlot {
    channel: Box<dyn AlertChannel>,
    throttle: Mutex<ChannelThrottle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelStatus {
    pub name: &'static str,
    pub configured: bool,
    pub last_sent: Option<DateTime<Utc>>,
    pub can_send: bool,
}

pub struct AlertDispatcher {
    slots: Vec<Arc<ChannelSlot>>,
}

impl AlertDispatcher {
    /// The full channel inventory, each toggled by its own env credentials.
    pub fn from_env() -> Self {
        Self::with_channels(vec![
            Box::new(email::EmailChannel::from_env()),
            Box::new(whatsapp::WhatsAppChannel::from_env()),
            Box::new(telegram::TelegramChannel::from_env()),
            Box::new(discord::DiscordChannel::from_env()),
            Box::new(slack::SlackChannel::from_env()),
            Box::new(push::PushChannel::from_env()),
        ])
    }

    pub fn with_channels(channels: Vec<Box<dyn AlertChannel>>) -> Self {
        let slots = channels
            .into_iter()
            .map(|channel| {
                let throttle = ChannelThrottle::new(channel.cooldown_secs());
                Arc::new(ChannelSlot {
                    channel,
                    throttle: Mutex::new(throttle),
                })
            })
            .collect();
        Self { slots }
    }

    /// Attempt delivery on every channel in parallel, waiting for all to
    /// settle. Returns true iff at least one channel attempted a send
    /// within its cooldown window and succeeded.
    pub async fn dispatch(&self, batch: &[ScoredItem]) -> bool {
        if batch.is_empty() {
            return false;
        }

        format::log_console_alert(batch);

        let batch: Arc<Vec<ScoredItem>> = Arc::new(batch.to_vec());
        let mut set = JoinSet::new();
        for slot in &self.slots {
            let slot = slot.clone();
            let batch = batch.clone();
            set.spawn(async move { deliver_one(&slot, &batch).await });
        }

        let mut any_success = false;
        while let Some(joined) = set.join_next().await {
            if matches!(joined, Ok(true)) {
                any_success = true;
            }
        }
        any_success
    }

    pub fn status(&self) -> Vec<ChannelStatus> {
        let now = Utc::now();
        self.slots
            .iter()
            .map(|slot| {
                let throttle = slot.throttle.lock().expect("throttle lock poisoned");
                ChannelStatus {
                    name: slot.channel.name(),
                    configured: slot.channel.is_configured(),
                    last_sent: throttle.last_sent(),
                    can_send: throttle.can_send(now),
                }
            })
            .collect()
    }

    pub fn channel_count(&self) -> usize {
        self.slots.len()
    }
}

async fn deliver_one(slot: &ChannelSlot, batch: &[ScoredItem]) -> bool {
    let name = slot.channel.name();
    if !slot.channel.is_configured() {
        tracing::debug!(channel = name, "channel disabled, skipping");
        return false;
    }

    {
        let throttle = slot.throttle.lock().expect("throttle lock poisoned");
        if !throttle.can_send(Utc::now()) {
            counter!("alerts_suppressed_total").increment(1);
            tracing::info!(channel = name, "send suppressed by cooldown");
            return false;
        }
    }

    match slot.channel.deliver(batch).await {
        Ok(()) => {
            // Cooldown is consumed only by a successful delivery; a failed
            // transport call leaves the window open for the next tick.
            slot.throttle
                .lock()
                .expect("throttle lock poisoned")
                .record_send(Utc::now());
            counter!("alerts_sent_total").increment(1);
            tracing::info!(channel = name, items = batch.len(), "alert delivered");
            true
        }
        Err(e) => {
            counter!("alerts_failed_total").increment(1);
            tracing::warn!(channel = name, error = ?e, "alert delivery failed");
            false
        }
    }
}

/// Env helper shared by the channel impls: per-channel cooldown override.
fn cooldown_from_env(key: &str, default_secs: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default_secs)
}
