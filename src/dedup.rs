//! # Recency Cache
//!
//! Bounded, insertion-ordered store of already-alerted item ids. Suppresses
//! repeat alerts within process lifetime; nothing is persisted. When the
//! bound is exceeded the *oldest half* is discarded in one sweep — a
//! deliberate FIFO-ish truncation, not strict LRU.

use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::score::ScoredItem;

pub const DEFAULT_CACHE_CAP: usize = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    pub category: &'static str,
    pub impact_score: u8,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct RecencyCache {
    cap: usize,
    order: VecDeque<String>,
    entries: HashMap<String, CacheEntry>,
}

/// Aggregates over everything currently cached; served by `/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub high_impact: usize,
    pub avg_impact: f32,
    pub categories: BTreeMap<&'static str, usize>,
}

impl RecencyCache {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(2),
            order: VecDeque::new(),
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Keep only items that meet `min_impact` and have not been seen before.
    /// Passing items are inserted immediately, so a duplicate id later in
    /// the same batch is suppressed just like a cache hit from an earlier
    /// tick. Truncation runs once at the end of the batch.
    pub fn filter_new(&mut self, items: Vec<ScoredItem>, min_impact: u8) -> Vec<ScoredItem> {
        let mut passed = Vec::new();
        for scored in items {
            if scored.impact_score < min_impact {
                continue;
            }
            if self.contains(&scored.item.id) {
                continue;
            }
            self.insert(&scored);
            passed.push(scored);
        }
        self.truncate_if_over_cap();
        passed
    }

    fn insert(&mut self, scored: &ScoredItem) {
        self.order.push_back(scored.item.id.clone());
        self.entries.insert(
            scored.item.id.clone(),
            CacheEntry {
                category: scored.category.label(),
                impact_score: scored.impact_score,
                published_at: scored.item.published_at,
            },
        );
    }

    /// Retain the most recently inserted half once the bound is exceeded.
    fn truncate_if_over_cap(&mut self) {
        if self.order.len() <= self.cap {
            return;
        }
        let keep = self.cap / 2;
        while self.order.len() > keep {
            if let Some(old) = self.order.pop_front() {
                self.entries.remove(&old);
            }
        }
        tracing::debug!(retained = keep, "recency cache truncated");
    }

    pub fn stats(&self) -> CacheStats {
        let total = self.entries.len();
        let mut categories: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut high_impact = 0usize;
        let mut sum = 0u32;
        for entry in self.entries.values() {
            *categories.entry(entry.category).or_default() += 1;
            if entry.impact_score >= 7 {
                high_impact += 1;
            }
            sum += entry.impact_score as u32;
        }
        CacheStats {
            total,
            high_impact,
            avg_impact: if total > 0 {
                sum as f32 / total as f32
            } else {
                0.0
            },
            categories,
        }
    }
}

impl Default for RecencyCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAP)
    }
}
