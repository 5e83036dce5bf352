//! Canonical keyword tables for impact scoring and categorization.
//!
//! One ranked table drives both the scorer's keyword pass and the category
//! ladder, so the two can never drift apart. Phrases touching "fed" or
//! "earnings" carry weight 3, everything else weight 2.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::score::NewsCategory;

#[derive(Debug, Clone, Copy)]
pub struct Keyword {
    pub phrase: &'static str,
    pub weight: u32,
}

/// Raw phrase list, grouped by theme. Order does not matter here; the
/// category ladder below is the only order-sensitive table.
const IMPACT_PHRASES: &[&str] = &[
    // Critical financial events
    "takeover",
    "hostile takeover",
    "leveraged buyout",
    "acquisition",
    "acquire",
    "acquirer",
    "merger",
    "merger agreement",
    "merger deal",
    "earnings",
    "earnings report",
    "quarterly earnings",
    "earnings beat",
    "earnings miss",
    "earnings guidance",
    "net loss",
    "quarterly loss",
    "revenue",
    "revenue growth",
    "revenue decline",
    "net profit",
    "operating profit",
    // High-impact corporate actions
    "ipo",
    "initial public offering",
    "going public",
    "secondary offering",
    "dividend",
    "dividend cut",
    "special dividend",
    "stock split",
    "stock buyback",
    "share buyback",
    "spin-off",
    "divestiture",
    "joint venture",
    "funding round",
    "venture capital",
    "private equity",
    "activist investor",
    // Executive & governance
    "ceo resignation",
    "ceo departure",
    "ceo appointment",
    "cfo resignation",
    "board shakeup",
    "leadership change",
    "management shakeup",
    // Regulatory & legal
    "sec investigation",
    "sec enforcement",
    "sec settlement",
    "regulatory approval",
    "class action",
    "litigation",
    "securities fraud",
    "accounting fraud",
    "material weakness",
    "going concern",
    "delisting",
    "trading halt",
    // Financial distress
    "bankruptcy",
    "chapter 11",
    "liquidation",
    "restructuring",
    "debt default",
    "liquidity crisis",
    "layoffs",
    "job cuts",
    "workforce reduction",
    "cost cutting",
    // Market movements & volatility
    "volatility",
    "market crash",
    "flash crash",
    "circuit breaker",
    "bear market",
    "bull market",
    "panic selling",
    "margin call",
    "fire sale",
    // Economic indicators & policy
    "fed",
    "federal reserve",
    "interest rate",
    "rate cut",
    "rate hike",
    "rate decision",
    "inflation",
    "deflation",
    "cpi",
    "ppi",
    "gdp",
    "economic growth",
    "unemployment",
    "jobless claims",
    "central bank",
    "monetary policy",
    "fiscal policy",
    "quantitative easing",
    "trade war",
    "tariff",
    "sanctions",
    "trade deal",
    // Sector-specific
    "fda approval",
    "drug approval",
    "clinical trial",
    "oil price",
    "crude oil",
    "natural gas",
    "bitcoin",
    "crypto",
    "cryptocurrency",
    "blockchain",
    "artificial intelligence",
    "machine learning",
    // Breaking & urgency phrasing
    "breaking",
    "urgent",
    "crisis",
    "emergency",
    "just in",
    "exclusive",
    "sources say",
    // Performance indicators
    "outperform",
    "underperform",
    "guidance",
    "forecast",
    "price target",
    "upgrade",
    "downgrade",
    "profit margin",
    "free cash flow",
    "debt to equity",
    // Sentiment & outlook
    "bullish",
    "bearish",
    "recession",
    "recovery",
    "expansion",
    "contraction",
];

fn phrase_weight(phrase: &str) -> u32 {
    if phrase.contains("fed") || phrase.contains("earnings") {
        3
    } else {
        2
    }
}

pub static IMPACT_KEYWORDS: Lazy<Vec<Keyword>> = Lazy::new(|| {
    IMPACT_PHRASES
        .iter()
        .map(|p| Keyword {
            phrase: p,
            weight: phrase_weight(p),
        })
        .collect()
});

/// Recognized ticker symbols. Matched as whole tokens against the original
/// (un-lowercased) text so single-letter symbols do not light up on prose.
pub const TICKERS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "NFLX", "AMD", "INTC", "JPM", "BAC",
    "WFC", "GS", "MS", "C", "JNJ", "PG", "KO", "PEP", "SPY", "QQQ", "IWM", "VTI", "VOO", "ARKK",
    "TQQQ", "SQQQ",
];

pub const URGENCY_TERMS: &[&str] = &["breaking", "urgent", "alert", "immediate", "now", "today"];

pub const MOVEMENT_TERMS: &[&str] = &[
    "surge", "plunge", "rally", "crash", "spike", "drop", "jump", "fall",
];

pub const BULLISH_TERMS: &[&str] = &["surge", "rally", "spike", "jump", "soar", "gain", "beat"];

pub const BEARISH_TERMS: &[&str] = &[
    "plunge", "crash", "drop", "fall", "slump", "miss", "decline",
];

/// Percentage or currency amount, e.g. "3.2%" or "$1.5b". Counted once per
/// item, not per match.
pub static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+\.?\d*%|\$\d+\.?\d*[bmk]?)").expect("valid amount regex"));

/// Category ladder: first matching bucket wins, so order is significant.
pub const CATEGORY_LADDER: &[(NewsCategory, &[&str])] = &[
    (NewsCategory::Earnings, &["earnings", "quarterly", "revenue"]),
    (
        NewsCategory::Fed,
        &["fed", "federal reserve", "interest rate"],
    ),
    (NewsCategory::Ipo, &["ipo", "initial public offering"]),
    (
        NewsCategory::MergerAcquisition,
        &["merger", "acquisition", "deal"],
    ),
    (NewsCategory::Corporate, &["dividend", "buyback", "split"]),
    (
        NewsCategory::Economic,
        &["inflation", "gdp", "unemployment"],
    ),
    (NewsCategory::Crypto, &["crypto", "bitcoin", "blockchain"]),
    (NewsCategory::Energy, &["oil", "energy", "gas"]),
    (NewsCategory::Technology, &["tech", "ai", "software"]),
];
