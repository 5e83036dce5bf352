// src/analysis/fallback.rs
use async_trait::async_trait;
use chrono::Utc;

use super::{AnalysisResult, Analyzer, Recommendation, FALLBACK_MODEL};
use crate::score::{ScoredItem, Sentiment};

/// Deterministic keyword heuristic with the same output shape as the
/// oracle. Also substituted per-item when the oracle call fails.
pub struct FallbackAnalyzer;

pub fn fallback_analysis(scored: &ScoredItem) -> AnalysisResult {
    let text = format!("{} {}", scored.item.title, scored.item.description).to_lowercase();

    let (impact, sentiment, sectors): (f32, Sentiment, &[&str]) =
        if text.contains("fed") || text.contains("federal reserve") {
            (8.0, Sentiment::Bearish, &["financial", "real estate", "utilities"])
        } else if text.contains("earnings") {
            (7.0, Sentiment::Bullish, &["technology", "consumer"])
        } else if text.contains("merger") || text.contains("acquisition") {
            (9.0, Sentiment::Bullish, &["target company", "acquirer"])
        } else if text.contains("crypto") || text.contains("bitcoin") {
            (6.0, Sentiment::Bullish, &["cryptocurrency", "technology"])
        } else {
            (5.0, Sentiment::Neutral, &[])
        };

    AnalysisResult {
        impact_score: impact,
        confidence: 60,
        sentiment,
        predicted_movement: if impact >= 7.0 { "+2-5%" } else { "+1-3%" }.to_string(),
        time_horizon: "24-48 hours".to_string(),
        affected_sectors: sectors.iter().map(|s| s.to_string()).collect(),
        key_stocks: scored.tickers.clone(),
        risk_level: "medium".to_string(),
        recommendation: Recommendation::Watch,
        reasoning: "Keyword heuristic; oracle analysis not available.".to_string(),
        model: FALLBACK_MODEL.to_string(),
        analyzed_at: Utc::now(),
    }
}

#[async_trait]
impl Analyzer for FallbackAnalyzer {
    async fn analyze_item(&self, item: &ScoredItem) -> AnalysisResult {
        fallback_analysis(item)
    }

    fn name(&self) -> &'static str {
        FALLBACK_MODEL
    }
}
