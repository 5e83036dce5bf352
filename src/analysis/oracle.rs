// src/analysis/oracle.rs
use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{fallback::fallback_analysis, AnalysisResult, Analyzer, Recommendation};
use crate::score::{ScoredItem, Sentiment};

const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Oracle-backed analyzer (OpenAI chat completions). Any failure — network,
/// non-2xx, malformed JSON, out-of-range values — degrades that single item
/// to the deterministic fallback.
pub struct OracleAnalyzer {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OracleAnalyzer {
    pub fn new(api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("market-news-alerter/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self {
            http,
            api_key,
            model,
        }
    }

    async fn request_analysis(&self, scored: &ScoredItem) -> Option<AnalysisResult> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let sys = "You are a financial analyst. Given one news item, respond ONLY with a JSON \
                   object using exactly these keys: impactScore (number 1-10), confidenceLevel \
                   (integer 1-100), marketSentiment (\"bullish\"|\"bearish\"|\"neutral\"), \
                   predictedPriceMovement (string), timeHorizon (string), affectedSectors \
                   (array of strings), keyStocks (array of ticker strings), riskLevel \
                   (\"low\"|\"medium\"|\"high\"), tradingRecommendation \
                   (\"buy\"|\"sell\"|\"hold\"|\"watch\"), reasoning (string). No other text.";
        let user = format!(
            "Title: {}\nContent: {}\nSource: {}\nPublished: {}",
            scored.item.title,
            scored.item.description,
            scored.item.source,
            scored.item.published_at.to_rfc3339()
        );

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: sys,
                },
                Msg {
                    role: "user",
                    content: &user,
                },
            ],
            temperature: 0.2,
            max_tokens: 600,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .ok()?;
        if !resp.status().is_success() {
            tracing::warn!(status = %resp.status(), "oracle returned non-2xx");
            return None;
        }

        let body: Resp = resp.json().await.ok()?;
        let content = body.choices.first().map(|c| c.message.content.as_str())?;
        parse_oracle_json(content, &self.model)
    }
}

#[async_trait]
impl Analyzer for OracleAnalyzer {
    async fn analyze_item(&self, item: &ScoredItem) -> AnalysisResult {
        match self.request_analysis(item).await {
            Some(analysis) => analysis,
            None => {
                counter!("oracle_fallback_total").increment(1);
                tracing::warn!(item = %item.item.id, "oracle analysis failed, using fallback");
                fallback_analysis(item)
            }
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// The schema the prompt demands, camelCase as the oracle returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OracleResponse {
    impact_score: f32,
    confidence_level: u8,
    market_sentiment: Sentiment,
    predicted_price_movement: String,
    time_horizon: String,
    #[serde(default)]
    affected_sectors: Vec<String>,
    #[serde(default)]
    key_stocks: Vec<String>,
    risk_level: String,
    trading_recommendation: Recommendation,
    reasoning: String,
}

/// Parse and validate the oracle payload; the `model` tag and server-side
/// timestamp are attached here.
fn parse_oracle_json(content: &str, model: &str) -> Option<AnalysisResult> {
    // Some models wrap JSON in code fences despite instructions.
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let parsed: OracleResponse = serde_json::from_str(trimmed).ok()?;
    if !(0.0..=10.0).contains(&parsed.impact_score) || parsed.confidence_level > 100 {
        return None;
    }

    Some(AnalysisResult {
        impact_score: parsed.impact_score,
        confidence: parsed.confidence_level,
        sentiment: parsed.market_sentiment,
        predicted_movement: parsed.predicted_price_movement,
        time_horizon: parsed.time_horizon,
        affected_sectors: parsed.affected_sectors,
        key_stocks: parsed.key_stocks,
        risk_level: parsed.risk_level,
        recommendation: parsed.trading_recommendation,
        reasoning: parsed.reasoning,
        model: model.to_string(),
        analyzed_at: Utc::now(),
    })
}
