//! # Source Registry
//!
//! Static table of every feed the watcher polls: premium financial RSS
//! feeds, sector feeds, regulatory/economic-data feeds, and Reddit hot
//! listings. Loaded once at startup into a read-only structure; there is
//! no dynamic registration.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Editorial priority of a source. `High` and `Critical` earn the scorer's
/// priority bonus point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl SourcePriority {
    pub fn is_high(self) -> bool {
        matches!(self, SourcePriority::High | SourcePriority::Critical)
    }
}

/// How the endpoint's payload is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Rss,
    RedditListing,
}

/// One feed descriptor. The `hint_keywords` are editorial notes on what the
/// feed tends to break first; scoring itself uses the canonical table in
/// [`crate::keywords`].
#[derive(Debug, Clone, Copy)]
pub struct FeedSource {
    pub name: &'static str,
    pub url: &'static str,
    pub category: &'static str,
    pub priority: SourcePriority,
    pub kind: SourceKind,
    pub hint_keywords: &'static [&'static str],
}

use SourceKind::{RedditListing, Rss};
use SourcePriority::{Critical, High, Low, Medium};

macro_rules! src {
    ($name:literal, $url:literal, $cat:literal, $prio:expr, $kind:expr, $hints:expr) => {
        FeedSource {
            name: $name,
            url: $url,
            category: $cat,
            priority: $prio,
            kind: $kind,
            hint_keywords: $hints,
        }
    };
}

pub static SOURCES: Lazy<Vec<FeedSource>> = Lazy::new(|| {
    vec![
        // Premium financial news
        src!(
            "MarketWatch",
            "https://feeds.marketwatch.com/marketwatch/topstories/",
            "financial",
            High,
            Rss,
            &["earnings", "fed", "rate", "inflation", "gdp", "unemployment"]
        ),
        src!(
            "CNBC Business",
            "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=100003114",
            "financial",
            High,
            Rss,
            &["breaking", "alert", "surge", "plunge", "rally", "crash"]
        ),
        src!(
            "Bloomberg Markets",
            "https://feeds.bloomberg.com/markets/news.rss",
            "financial",
            High,
            Rss,
            &["fed", "treasury", "bond", "yield", "inflation", "gdp"]
        ),
        src!(
            "Wall Street Journal",
            "https://feeds.a.dj.com/rss/RSSMarketsMain.xml",
            "financial",
            High,
            Rss,
            &["earnings", "ipo", "merger", "acquisition", "dividend"]
        ),
        src!(
            "Financial Times",
            "https://www.ft.com/rss/home",
            "financial",
            Medium,
            Rss,
            &["central bank", "monetary policy", "fiscal", "trade"]
        ),
        src!(
            "Reuters Business",
            "https://feeds.reuters.com/reuters/businessNews",
            "financial",
            High,
            Rss,
            &["earnings", "fed", "rate", "inflation", "gdp"]
        ),
        src!(
            "Yahoo Finance",
            "https://feeds.finance.yahoo.com/rss/2.0/headline",
            "financial",
            Medium,
            Rss,
            &["stock", "market", "trading", "volume", "price"]
        ),
        src!(
            "Seeking Alpha",
            "https://seekingalpha.com/feed.xml",
            "analysis",
            Medium,
            Rss,
            &["analysis", "outlook", "forecast", "target", "rating"]
        ),
        src!(
            "Benzinga",
            "https://www.benzinga.com/feeds/news",
            "financial",
            High,
            Rss,
            &["breaking", "alert", "earnings", "merger", "acquisition"]
        ),
        src!(
            "MarketWatch Breaking",
            "https://feeds.marketwatch.com/marketwatch/marketpulse/",
            "financial",
            High,
            Rss,
            &["breaking", "alert", "urgent", "crisis", "emergency"]
        ),
        src!(
            "CNBC Breaking News",
            "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=100727362",
            "financial",
            Critical,
            Rss,
            &["breaking", "alert", "urgent", "market crash", "fed", "earnings"]
        ),
        // Sector feeds
        src!(
            "TechCrunch",
            "https://techcrunch.com/feed/",
            "technology",
            Medium,
            Rss,
            &["ipo", "funding", "acquisition", "startup", "tech"]
        ),
        src!(
            "CoinDesk",
            "https://coindesk.com/arc/outboundfeeds/rss/",
            "crypto",
            Medium,
            Rss,
            &["bitcoin", "crypto", "blockchain", "ethereum", "defi"]
        ),
        src!(
            "CoinTelegraph",
            "https://cointelegraph.com/rss",
            "crypto",
            Medium,
            Rss,
            &["bitcoin", "crypto", "blockchain", "ethereum", "defi"]
        ),
        src!(
            "Oil Price",
            "https://oilprice.com/rss/main",
            "energy",
            Medium,
            Rss,
            &["oil", "gas", "energy", "crude"]
        ),
        src!(
            "Kitco News",
            "https://www.kitco.com/rss/",
            "commodities",
            Medium,
            Rss,
            &["gold", "silver", "precious metals", "commodities"]
        ),
        // International
        src!(
            "BBC Business",
            "http://feeds.bbci.co.uk/news/business/rss.xml",
            "financial",
            Medium,
            Rss,
            &["earnings", "market", "economy", "business"]
        ),
        src!(
            "Fortune",
            "https://fortune.com/feed/",
            "financial",
            Medium,
            Rss,
            &["business", "market", "economy", "stocks"]
        ),
        src!(
            "Business Insider",
            "https://feeds.businessinsider.com/custom/all",
            "financial",
            Medium,
            Rss,
            &["business", "market", "economy", "stocks"]
        ),
        src!(
            "Fast Company",
            "https://www.fastcompany.com/feed",
            "business",
            Low,
            Rss,
            &["business", "innovation", "startup", "tech"]
        ),
        // Government & regulatory
        src!(
            "SEC News",
            "https://www.sec.gov/news/rss",
            "regulatory",
            High,
            Rss,
            &["sec", "regulation", "enforcement", "compliance"]
        ),
        src!(
            "Federal Reserve News",
            "https://www.federalreserve.gov/feeds/press_all.xml",
            "regulatory",
            High,
            Rss,
            &["fed", "federal reserve", "monetary policy", "interest rates"]
        ),
        // Economic data
        src!(
            "Bureau of Labor Statistics",
            "https://www.bls.gov/feed/",
            "economic",
            High,
            Rss,
            &["employment", "unemployment", "inflation", "economic data"]
        ),
        src!(
            "Bureau of Economic Analysis",
            "https://www.bea.gov/feed/",
            "economic",
            High,
            Rss,
            &["gdp", "economic growth", "economic data", "statistics"]
        ),
        // Reddit hot listings
        src!(
            "Reddit Business",
            "https://www.reddit.com/r/business/hot.json?limit=25",
            "reddit",
            High,
            RedditListing,
            &["business", "finance", "economy", "market", "stock"]
        ),
        src!(
            "Reddit Economics",
            "https://www.reddit.com/r/economics/hot.json?limit=25",
            "reddit",
            High,
            RedditListing,
            &["economics", "fed", "inflation", "gdp", "unemployment"]
        ),
        src!(
            "Reddit Finance",
            "https://www.reddit.com/r/finance/hot.json?limit=25",
            "reddit",
            High,
            RedditListing,
            &["finance", "banking", "credit", "investment", "trading"]
        ),
    ]
});

pub fn default_sources() -> &'static [FeedSource] {
    &SOURCES
}
