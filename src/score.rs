//! # Impact Scorer
//!
//! Pure, deterministic mapping from a fetched item to a scored one. Given
//! the same keyword tables, the same text always yields the same score and
//! category, which keeps the pipeline replayable in tests.
//!
//! Scoring accumulates points from the canonical keyword table, recognized
//! tickers, urgency and movement terms, a single bonus for percentage or
//! currency figures, and a source-priority bonus, clamped to `0..=10`.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::fetch::FeedItem;
use crate::keywords::{
    AMOUNT_RE, BEARISH_TERMS, BULLISH_TERMS, CATEGORY_LADDER, IMPACT_KEYWORDS, MOVEMENT_TERMS,
    TICKERS, URGENCY_TERMS,
};

pub const MAX_IMPACT: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Earnings,
    Fed,
    Ipo,
    #[serde(rename = "m&a")]
    MergerAcquisition,
    Corporate,
    Economic,
    Crypto,
    Energy,
    Technology,
    General,
    Reddit,
}

impl NewsCategory {
    pub fn label(self) -> &'static str {
        match self {
            NewsCategory::Earnings => "earnings",
            NewsCategory::Fed => "fed",
            NewsCategory::Ipo => "ipo",
            NewsCategory::MergerAcquisition => "m&a",
            NewsCategory::Corporate => "corporate",
            NewsCategory::Economic => "economic",
            NewsCategory::Crypto => "crypto",
            NewsCategory::Energy => "energy",
            NewsCategory::Technology => "technology",
            NewsCategory::General => "general",
            NewsCategory::Reddit => "reddit",
        }
    }
}

/// A feed item plus everything the scorer derived from it. Never mutated
/// after dispatch; the optional analysis is attached once by the oracle
/// adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: FeedItem,
    pub impact_score: u8,
    pub sentiment: Sentiment,
    pub category: NewsCategory,
    pub tickers: Vec<String>,
    pub analysis: Option<AnalysisResult>,
}

impl ScoredItem {
    /// Impact as presented to channels: oracle estimate when available,
    /// the keyword score otherwise.
    pub fn effective_impact(&self) -> f32 {
        self.analysis
            .as_ref()
            .map(|a| a.impact_score)
            .unwrap_or(self.impact_score as f32)
    }

    pub fn effective_sentiment(&self) -> Sentiment {
        self.analysis
            .as_ref()
            .map(|a| a.sentiment)
            .unwrap_or(self.sentiment)
    }
}

pub fn score_item(item: &FeedItem) -> ScoredItem {
    let text = format!("{} {}", item.title, item.description).to_lowercase();

    let mut score: u32 = 0;

    for kw in IMPACT_KEYWORDS.iter() {
        if text.contains(kw.phrase) {
            score += kw.weight;
        }
    }

    let tickers = extract_tickers(item);
    score += 2 * tickers.len() as u32;

    for term in URGENCY_TERMS {
        if text.contains(term) {
            score += 3;
        }
    }

    for term in MOVEMENT_TERMS {
        if text.contains(term) {
            score += 2;
        }
    }

    // One bonus point for numeric figures, no matter how many.
    if AMOUNT_RE.is_match(&text) {
        score += 1;
    }

    if item.priority.is_high() {
        score += 1;
    }

    ScoredItem {
        impact_score: score.min(MAX_IMPACT as u32) as u8,
        sentiment: classify_sentiment(&text),
        category: categorize(&text, item),
        tickers,
        analysis: None,
        item: item.clone(),
    }
}

/// Whole-token ticker scan over the original-cased text, so "C" and "MS"
/// match only as standalone symbols.
pub fn extract_tickers(item: &FeedItem) -> Vec<String> {
    let text = format!("{} {}", item.title, item.description);
    let mut found = Vec::new();
    for token in text.split(|c: char| !c.is_ascii_alphanumeric()) {
        if token.is_empty() {
            continue;
        }
        if TICKERS.contains(&token) && !found.iter().any(|t| t == token) {
            found.push(token.to_string());
        }
    }
    found
}

/// First-match priority ladder; `Reddit` only when nothing matched and the
/// item came from a Reddit listing.
fn categorize(lower_text: &str, item: &FeedItem) -> NewsCategory {
    for (category, needles) in CATEGORY_LADDER {
        if needles.iter().any(|n| lower_text.contains(n)) {
            return *category;
        }
    }
    if item.source_category == "reddit" {
        NewsCategory::Reddit
    } else {
        NewsCategory::General
    }
}

fn classify_sentiment(lower_text: &str) -> Sentiment {
    let bulls = BULLISH_TERMS
        .iter()
        .filter(|t| lower_text.contains(*t))
        .count();
    let bears = BEARISH_TERMS
        .iter()
        .filter(|t| lower_text.contains(*t))
        .count();
    match bulls.cmp(&bears) {
        std::cmp::Ordering::Greater => Sentiment::Bullish,
        std::cmp::Ordering::Less => Sentiment::Bearish,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FeedItem;
    use crate::sources::SourcePriority;
    use chrono::Utc;

    fn item(title: &str, description: &str) -> FeedItem {
        FeedItem {
            id: format!("test:{title}"),
            title: title.to_string(),
            description: description.to_string(),
            url: "https://example.test/a".to_string(),
            published_at: Utc::now(),
            source: "Test Wire".to_string(),
            source_category: "financial".to_string(),
            priority: SourcePriority::Medium,
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let it = item("Fed signals rate hike", "Markets brace for tightening.");
        let a = score_item(&it);
        let b = score_item(&it);
        assert_eq!(a.impact_score, b.impact_score);
        assert_eq!(a.category, b.category);
        assert_eq!(a.sentiment, b.sentiment);
    }

    #[test]
    fn score_is_clamped_to_ten() {
        let it = item(
            "Breaking: Fed emergency rate hike as earnings crash",
            "Urgent alert: markets plunge 5% today, AAPL and MSFT drop on federal reserve decision.",
        );
        let scored = score_item(&it);
        assert_eq!(scored.impact_score, 10);
    }

    #[test]
    fn empty_description_does_not_panic_and_stays_in_range() {
        let it = item("Quiet afternoon", "");
        let scored = score_item(&it);
        assert!(scored.impact_score <= 10);
    }

    #[test]
    fn no_keyword_item_scores_low() {
        let it = item("Village fair draws record crowd", "Pleasant weather expected.");
        let scored = score_item(&it);
        assert!(scored.impact_score < 5, "got {}", scored.impact_score);
    }

    #[test]
    fn category_ladder_prefers_earnings_over_fed() {
        let it = item(
            "Earnings season opens as Fed holds steady",
            "Quarterly revenue in focus.",
        );
        let scored = score_item(&it);
        assert_eq!(scored.category, NewsCategory::Earnings);
    }

    #[test]
    fn fed_category_when_no_earnings_terms() {
        let it = item("Fed announces emergency rate hike", "Federal Reserve tightens policy.");
        let scored = score_item(&it);
        assert_eq!(scored.category, NewsCategory::Fed);
        assert!(scored.impact_score >= 8, "got {}", scored.impact_score);
    }

    #[test]
    fn reddit_fallback_category_only_without_keyword_match() {
        let mut it = item("An odd thing happened at work", "Long story.");
        it.source_category = "reddit".to_string();
        assert_eq!(score_item(&it).category, NewsCategory::Reddit);

        let mut fed = item("Fed decision thread", "Rates discussion.");
        fed.source_category = "reddit".to_string();
        assert_eq!(score_item(&fed).category, NewsCategory::Fed);
    }

    #[test]
    fn tickers_match_whole_tokens_only() {
        let it = item("AAPL and MSFT rally", "Chipmakers calm; Cat equipment sales steady.");
        let scored = score_item(&it);
        assert_eq!(scored.tickers, vec!["AAPL", "MSFT"]);
        // "Cat" must not trigger the single-letter C symbol.
        assert!(!scored.tickers.contains(&"C".to_string()));
    }

    #[test]
    fn amount_bonus_is_counted_once() {
        let base = item("Company profit update", "");
        let one = item("Company profit update", "Up 3% on the day.");
        let many = item("Company profit update", "Up 3% or $2b, maybe 7%.");
        let s0 = score_item(&base).impact_score;
        let s1 = score_item(&one).impact_score;
        let s2 = score_item(&many).impact_score;
        assert_eq!(s1, s0 + 1);
        assert_eq!(s2, s1);
    }

    #[test]
    fn high_priority_source_gets_bonus_point() {
        let mut low = item("Company profit update", "Steady quarter.");
        low.priority = SourcePriority::Low;
        let mut high = low.clone();
        high.priority = SourcePriority::High;
        assert_eq!(
            score_item(&high).impact_score,
            score_item(&low).impact_score + 1
        );
    }

    #[test]
    fn sentiment_follows_dominant_movement_terms() {
        assert_eq!(
            score_item(&item("Stocks surge and rally", "")).sentiment,
            Sentiment::Bullish
        );
        assert_eq!(
            score_item(&item("Stocks plunge in broad decline", "")).sentiment,
            Sentiment::Bearish
        );
        assert_eq!(
            score_item(&item("Stocks close flat", "")).sentiment,
            Sentiment::Neutral
        );
    }
}
