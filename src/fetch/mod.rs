// src/fetch/mod.rs
pub mod reddit;
pub mod rss;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

use crate::sources::{FeedSource, SourceKind, SourcePriority};

const USER_AGENT: &str = "market-news-alerter/0.1 (+https://github.com/market-news-alerter)";

/// One raw item as fetched from a feed, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Stable key: the feed GUID when present, the link otherwise.
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub source_category: String,
    pub priority: SourcePriority,
}

/// Seam between the pipeline and the network: anything that can produce a
/// batch of items. The HTTP implementation below is the production one;
/// tests plug in their own.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<FeedItem>>;
    fn name(&self) -> &str;
}

/// Production source: fetches a registry entry over HTTP and parses it
/// according to its kind, dropping items older than the age cutoff.
pub struct HttpFeedSource {
    source: FeedSource,
    client: reqwest::Client,
    max_age: ChronoDuration,
}

impl HttpFeedSource {
    pub fn new(source: FeedSource, client: reqwest::Client, max_age_days: i64) -> Self {
        Self {
            source,
            client,
            max_age: ChronoDuration::days(max_age_days.max(1)),
        }
    }
}

#[async_trait]
impl ItemSource for HttpFeedSource {
    async fn fetch_latest(&self) -> Result<Vec<FeedItem>> {
        let body = self
            .client
            .get(self.source.url)
            .send()
            .await
            .with_context(|| format!("{}: http get", self.source.name))?
            .error_for_status()
            .with_context(|| format!("{}: non-2xx", self.source.name))?
            .text()
            .await
            .with_context(|| format!("{}: read body", self.source.name))?;

        let mut items = match self.source.kind {
            SourceKind::Rss => rss::parse_feed(&body, &self.source)?,
            SourceKind::RedditListing => reddit::parse_listing(&body, &self.source)?,
        };

        let cutoff = Utc::now() - self.max_age;
        items.retain(|it| it.published_at >= cutoff);
        Ok(items)
    }

    fn name(&self) -> &str {
        self.source.name
    }
}

/// Fans the configured sources out concurrently and merges whatever
/// succeeded. A broken source contributes zero items, never an error.
pub struct FeedFetcher {
    providers: Vec<Arc<dyn ItemSource>>,
}

impl FeedFetcher {
    /// Build one HTTP provider per registry entry, sharing a single client.
    pub fn from_registry(sources: &[FeedSource], max_age_days: i64) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client");

        let providers = sources
            .iter()
            .map(|s| {
                Arc::new(HttpFeedSource::new(*s, client.clone(), max_age_days))
                    as Arc<dyn ItemSource>
            })
            .collect();
        Self { providers }
    }

    pub fn with_providers(providers: Vec<Arc<dyn ItemSource>>) -> Self {
        Self { providers }
    }

    pub fn source_count(&self) -> usize {
        self.providers.len()
    }

    /// Fetch every source concurrently; wait for all to settle, never
    /// short-circuiting on the first failure.
    pub async fn fetch_all(&self) -> Vec<FeedItem> {
        let mut set = JoinSet::new();
        for provider in &self.providers {
            let provider = provider.clone();
            set.spawn(async move {
                let name = provider.name().to_string();
                (name, provider.fetch_latest().await)
            });
        }

        let mut items = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok(mut batch))) => items.append(&mut batch),
                Ok((name, Err(e))) => {
                    counter!("feed_source_errors_total").increment(1);
                    tracing::warn!(source = %name, error = ?e, "source fetch failed");
                }
                Err(e) => {
                    counter!("feed_source_errors_total").increment(1);
                    tracing::warn!(error = ?e, "fetch task join failed");
                }
            }
        }

        counter!("feed_items_total").increment(items.len() as u64);
        tracing::info!(items = items.len(), sources = self.providers.len(), "fetch merged");
        items
    }
}

/// Normalize feed text: decode HTML entities, strip tags, straighten curly
/// quotes, collapse whitespace, cap length.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    out = re_tags.replace_all(&out, "").to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("ws regex"));
    out = re_ws.replace_all(&out, " ").trim().to_string();

    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_decodes_entities_and_strips_tags() {
        let s = "  <b>Hello&nbsp;&nbsp;world</b> &ldquo;ok&rdquo;  ";
        assert_eq!(normalize_text(s), r#"Hello world "ok""#);
    }

    #[test]
    fn normalize_caps_length() {
        let long = "x".repeat(5000);
        assert_eq!(normalize_text(&long).chars().count(), 1500);
    }

    #[tokio::test]
    async fn fetch_all_isolates_failing_sources() {
        struct Good;
        struct Bad;

        #[async_trait]
        impl ItemSource for Good {
            async fn fetch_latest(&self) -> Result<Vec<FeedItem>> {
                Ok(vec![FeedItem {
                    id: "g1".into(),
                    title: "ok".into(),
                    description: String::new(),
                    url: "https://example.test/g1".into(),
                    published_at: Utc::now(),
                    source: "Good".into(),
                    source_category: "financial".into(),
                    priority: SourcePriority::Medium,
                }])
            }
            fn name(&self) -> &str {
                "Good"
            }
        }

        #[async_trait]
        impl ItemSource for Bad {
            async fn fetch_latest(&self) -> Result<Vec<FeedItem>> {
                anyhow::bail!("boom")
            }
            fn name(&self) -> &str {
                "Bad"
            }
        }

        let fetcher = FeedFetcher::with_providers(vec![Arc::new(Good), Arc::new(Bad)]);
        let items = fetcher.fetch_all().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "g1");
    }
}
