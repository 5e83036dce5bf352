//! One pipeline tick: fetch → score → threshold/dedup filter → oracle
//! enrichment → throttled multi-channel dispatch. Scoring and filtering are
//! serial before dispatch fans out, so the cache and throttles see no
//! concurrent mutation within a tick.

use anyhow::Result;
use serde::Serialize;
use std::sync::Mutex;

use crate::analysis::{self, DynAnalyzer};
use crate::config::AppConfig;
use crate::dedup::{CacheStats, RecencyCache};
use crate::fetch::FeedFetcher;
use crate::notify::{AlertDispatcher, ChannelStatus};
use crate::score::score_item;
use crate::sources;

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TickSummary {
    pub fetched: usize,
    pub news_passed: usize,
    pub reddit_passed: usize,
    pub analyzed: usize,
    pub dispatched: bool,
}

pub struct Pipeline {
    fetcher: FeedFetcher,
    cache: Mutex<RecencyCache>,
    analyzer: DynAnalyzer,
    dispatcher: AlertDispatcher,
    min_impact: u8,
}

impl Pipeline {
    /// Production wiring: full source registry, env-selected analyzer and
    /// channels.
    pub fn from_config(cfg: &AppConfig, analyzer: DynAnalyzer, dispatcher: AlertDispatcher) -> Self {
        Self::new(
            FeedFetcher::from_registry(sources::default_sources(), cfg.max_item_age_days),
            cfg.dedup_cache_cap,
            cfg.min_impact,
            analyzer,
            dispatcher,
        )
    }

    pub fn new(
        fetcher: FeedFetcher,
        cache_cap: usize,
        min_impact: u8,
        analyzer: DynAnalyzer,
        dispatcher: AlertDispatcher,
    ) -> Self {
        Self {
            fetcher,
            cache: Mutex::new(RecencyCache::new(cache_cap)),
            analyzer,
            dispatcher,
            min_impact,
        }
    }

    pub async fn run_once(&self) -> Result<TickSummary> {
        let raw = self.fetcher.fetch_all().await;
        let fetched = raw.len();

        let scored: Vec<_> = raw.iter().map(score_item).collect();
        let fresh = self
            .cache
            .lock()
            .expect("cache lock poisoned")
            .filter_new(scored, self.min_impact);

        if fresh.is_empty() {
            tracing::info!(fetched, "no new high-impact items this tick");
            return Ok(TickSummary {
                fetched,
                ..TickSummary::default()
            });
        }

        let (news_passed, reddit_passed) =
            fresh.iter().fold((0, 0), |(news, reddit), item| {
                if item.item.source_category == "reddit" {
                    (news, reddit + 1)
                } else {
                    (news + 1, reddit)
                }
            });

        let analyzed = analysis::analyze_batch(&self.analyzer, fresh).await;
        let dispatched = self.dispatcher.dispatch(&analyzed).await;

        Ok(TickSummary {
            fetched,
            news_passed,
            reddit_passed,
            analyzed: analyzed.len(),
            dispatched,
        })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().expect("cache lock poisoned").stats()
    }

    pub fn channel_status(&self) -> Vec<ChannelStatus> {
        self.dispatcher.status()
    }

    pub fn source_count(&self) -> usize {
        self.fetcher.source_count()
    }

    pub fn analyzer_name(&self) -> &'static str {
        self.analyzer.name()
    }
}
