//! # Analysis Oracle Adapter
//!
//! Optional enrichment of scored items with a structured market-impact
//! prediction. Two implementations share one trait: an OpenAI-backed
//! client (selected when `OPENAI_API_KEY` is set) and a deterministic
//! keyword fallback. Callers cannot tell them apart at the type level;
//! only the `model` field differs.

pub mod fallback;
pub mod oracle;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::score::{ScoredItem, Sentiment};

pub use fallback::FallbackAnalyzer;
pub use oracle::OracleAnalyzer;

pub const FALLBACK_MODEL: &str = "fallback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
    Watch,
}

/// One prediction per item. Oracle and fallback produce the identical
/// shape with every field populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub impact_score: f32,
    /// 0..=100
    pub confidence: u8,
    pub sentiment: Sentiment,
    pub predicted_movement: String,
    pub time_horizon: String,
    pub affected_sectors: Vec<String>,
    pub key_stocks: Vec<String>,
    pub risk_level: String,
    pub recommendation: Recommendation,
    pub reasoning: String,
    pub model: String,
    pub analyzed_at: DateTime<Utc>,
}

#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Always yields a result; implementations degrade internally rather
    /// than surfacing errors to the batch caller.
    async fn analyze_item(&self, item: &ScoredItem) -> AnalysisResult;
    fn name(&self) -> &'static str;
}

pub type DynAnalyzer = Arc<dyn Analyzer>;

/// Select the adapter from the environment: oracle-backed when an API key
/// is present, the deterministic fallback otherwise.
pub fn build_analyzer() -> DynAnalyzer {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Arc::new(OracleAnalyzer::new(key)),
        _ => {
            tracing::info!("no oracle key configured, using fallback analyzer");
            Arc::new(FallbackAnalyzer)
        }
    }
}

/// Enrich a batch sequentially — one in-flight oracle call at a time, to
/// stay inside external rate limits. The batch itself always succeeds.
pub async fn analyze_batch(analyzer: &DynAnalyzer, items: Vec<ScoredItem>) -> Vec<ScoredItem> {
    let mut out = Vec::with_capacity(items.len());
    for mut scored in items {
        let analysis = analyzer.analyze_item(&scored).await;
        counter!("analyses_total").increment(1);
        scored.analysis = Some(analysis);
        out.push(scored);
    }
    out
}
