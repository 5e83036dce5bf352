// src/notify/format.rs
//
// Channel-agnostic rendering of a scored batch. Everything here is a pure
// function of the batch so transports can be exercised independently.

use crate::score::{ScoredItem, Sentiment};

/// Hard budget for the plain-text messaging channel.
pub const PLAIN_TEXT_CHAR_LIMIT: usize = 1600;
pub const TRUNCATION_MARKER: &str = "...[truncated]";

fn sentiment_tag(s: Sentiment) -> &'static str {
    match s {
        Sentiment::Bullish => "up",
        Sentiment::Bearish => "down",
        Sentiment::Neutral => "flat",
    }
}

fn impact_tier(impact: f32) -> &'static str {
    if impact >= 8.0 {
        "CRITICAL"
    } else if impact >= 6.0 {
        "HIGH IMPACT"
    } else {
        "MARKET MOVING"
    }
}

/// One-line headline used by the terse channels.
pub fn short_heading(item: &ScoredItem) -> String {
    let title: String = if item.item.title.chars().count() > 60 {
        let head: String = item.item.title.chars().take(57).collect();
        format!("{head}...")
    } else {
        item.item.title.clone()
    };
    format!(
        "[{}] [{}] ({}) {}",
        impact_tier(item.effective_impact()),
        item.category.label(),
        sentiment_tag(item.effective_sentiment()),
        title
    )
}

/// Truncate to `cap` characters, ending with the visible marker when
/// anything was cut. Output length never exceeds `cap`.
pub fn truncate_with_marker(s: &str, cap: usize) -> String {
    if s.chars().count() <= cap {
        return s.to_string();
    }
    let marker_len = TRUNCATION_MARKER.chars().count();
    if cap <= marker_len {
        return TRUNCATION_MARKER.chars().take(cap).collect();
    }
    let mut out: String = s.chars().take(cap - marker_len).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}

/// Plain-text digest of the batch, capped at `cap` characters.
pub fn plain_digest(batch: &[ScoredItem], cap: usize) -> String {
    let mut out = format!("Market alert: {} high-impact item(s)\n", batch.len());
    for (i, item) in batch.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}\n   {} | impact {:.0}/10 | {}\n   {}\n",
            i + 1,
            short_heading(item),
            item.item.source,
            item.effective_impact(),
            sentiment_tag(item.effective_sentiment()),
            item.item.url
        ));
    }
    truncate_with_marker(out.trim_end(), cap)
}

/// Rich HTML document for the email channel.
pub fn email_html(batch: &[ScoredItem]) -> String {
    let mut body = String::new();
    for item in batch {
        let analysis_block = match &item.analysis {
            Some(a) => format!(
                "<div style=\"background:#eef4fb;padding:10px;margin-top:8px\">\
                 <p><strong>Sentiment:</strong> {}</p>\
                 <p><strong>Expected movement:</strong> {}</p>\
                 <p><strong>Time horizon:</strong> {}</p>\
                 <p><strong>Sectors:</strong> {}</p>\
                 <p><strong>Key stocks:</strong> {}</p>\
                 </div>",
                sentiment_tag(a.sentiment),
                esc(&a.predicted_movement),
                esc(&a.time_horizon),
                esc(&a.affected_sectors.join(", ")),
                esc(&a.key_stocks.join(", "))
            ),
            None => String::new(),
        };
        body.push_str(&format!(
            "<div style=\"border-left:4px solid #3b6ecc;margin:16px 0;padding:12px\">\
             <h3 style=\"margin:0 0 6px\">{}</h3>\
             <p style=\"color:#666;margin:0 0 6px\">{} | impact {:.0}/10 | {}</p>\
             <p>{}</p>{}\
             <p><a href=\"{}\">Read full article</a></p>\
             </div>",
            esc(&item.item.title),
            esc(&item.item.source),
            item.effective_impact(),
            item.item.published_at.to_rfc3339(),
            esc(&item.item.description),
            analysis_block,
            esc(&item.item.url)
        ));
    }
    format!(
        "<!DOCTYPE html><html><body style=\"font-family:Arial,sans-serif;max-width:800px\">\
         <h2>Market alert: {} high-impact item(s)</h2>{}\
         <p style=\"color:#888;font-size:12px\">Informational only, not financial advice.</p>\
         </body></html>",
        batch.len(),
        body
    )
}

fn esc(s: &str) -> String {
    html_escape::encode_text(s).to_string()
}

/// Operator-facing log line of the whole batch, emitted on every dispatch
/// regardless of channel configuration.
pub fn log_console_alert(batch: &[ScoredItem]) {
    let mut block = format!("market alert ({} items)\n", batch.len());
    for (i, item) in batch.iter().enumerate() {
        block.push_str(&format!(
            "  {}. {}\n     source={} impact={:.0}/10 url={}\n",
            i + 1,
            short_heading(item),
            item.item.source,
            item.effective_impact(),
            item.item.url
        ));
    }
    tracing::info!(target: "alerts", "{}", block.trim_end());
}
