// tests/analysis_adapter.rs
//
// Adapter selection and fallback shape. Env-mutating tests are serialized.

use std::sync::Arc;

use chrono::Utc;
use serial_test::serial;

use market_news_alerter::analysis::{self, Analyzer, FallbackAnalyzer, FALLBACK_MODEL};
use market_news_alerter::fetch::FeedItem;
use market_news_alerter::score::score_item;
use market_news_alerter::sources::SourcePriority;

fn scored(title: &str) -> market_news_alerter::score::ScoredItem {
    score_item(&FeedItem {
        id: format!("test:{title}"),
        title: title.to_string(),
        description: String::new(),
        url: "https://example.test/a".to_string(),
        published_at: Utc::now(),
        source: "Mock Wire".to_string(),
        source_category: "financial".to_string(),
        priority: SourcePriority::High,
    })
}

#[tokio::test]
#[serial]
async fn missing_key_selects_the_fallback_adapter() {
    std::env::remove_var("OPENAI_API_KEY");
    let analyzer = analysis::build_analyzer();
    assert_eq!(analyzer.name(), FALLBACK_MODEL);

    let result = analyzer.analyze_item(&scored("Fed rate decision due")).await;
    assert_eq!(result.model, FALLBACK_MODEL);
}

#[tokio::test]
#[serial]
async fn present_key_selects_the_oracle_adapter() {
    std::env::set_var("OPENAI_API_KEY", "sk-test-not-real");
    let analyzer = analysis::build_analyzer();
    assert_eq!(analyzer.name(), "openai");
    std::env::remove_var("OPENAI_API_KEY");
}

#[tokio::test]
async fn batch_analysis_tags_every_item() {
    let analyzer: analysis::DynAnalyzer = Arc::new(FallbackAnalyzer);
    let items = vec![scored("Fed rate decision due"), scored("Earnings beat at BigCo")];

    let out = analysis::analyze_batch(&analyzer, items).await;
    assert_eq!(out.len(), 2);
    for item in &out {
        let a = item.analysis.as_ref().expect("analysis attached");
        assert_eq!(a.model, FALLBACK_MODEL);
        assert!((0.0..=10.0).contains(&a.impact_score));
        assert!(a.confidence <= 100);
        assert!(!a.time_horizon.is_empty());
        assert!(!a.predicted_movement.is_empty());
    }
}
