// src/fetch/rss.rs
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::fetch::{normalize_text, FeedItem};
use crate::sources::FeedSource;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<Guid>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

// <guid isPermaLink="..."> carries its value as text content.
#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text")]
    value: Option<String>,
}

/// Items without a parseable date resolve to the epoch and are dropped by
/// the caller's age cutoff.
fn parse_rfc2822_to_utc(ts: &str) -> DateTime<Utc> {
    let secs = OffsetDateTime::parse(ts, &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .unwrap_or(0);
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

pub fn parse_feed(xml: &str, source: &FeedSource) -> Result<Vec<FeedItem>> {
    let cleaned = scrub_html_entities_for_xml(xml);
    let rss: Rss =
        from_str(&cleaned).with_context(|| format!("{}: parse rss xml", source.name))?;

    let mut out = Vec::with_capacity(rss.channel.items.len());
    for it in rss.channel.items {
        let link = it.link.unwrap_or_default();
        let id = it
            .guid
            .and_then(|g| g.value)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| link.clone());
        if id.is_empty() {
            continue;
        }

        let title = normalize_text(it.title.as_deref().unwrap_or_default());
        if title.is_empty() {
            continue;
        }

        out.push(FeedItem {
            id,
            title,
            description: normalize_text(it.description.as_deref().unwrap_or_default()),
            url: link,
            published_at: it
                .pub_date
                .as_deref()
                .map(parse_rfc2822_to_utc)
                .unwrap_or_default(),
            source: source.name.to_string(),
            source_category: source.category.to_string(),
            priority: source.priority,
        });
    }
    Ok(out)
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{SourceKind, SourcePriority};

    fn source() -> FeedSource {
        FeedSource {
            name: "Test Wire",
            url: "https://example.test/rss",
            category: "financial",
            priority: SourcePriority::High,
            kind: SourceKind::Rss,
            hint_keywords: &["fed"],
        }
    }

    const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Wire</title>
    <item>
      <title>Fed holds rates &ndash; markets shrug</title>
      <link>https://example.test/a</link>
      <guid isPermaLink="false">wire-a-1</guid>
      <pubDate>Mon, 04 Aug 2025 12:00:00 GMT</pubDate>
      <description>&lt;p&gt;Policy unchanged.&lt;/p&gt;</description>
    </item>
    <item>
      <title>Earnings beat at BigCo</title>
      <link>https://example.test/b</link>
      <pubDate>not a date</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items_with_guid_or_link_ids() {
        let items = parse_feed(FIXTURE, &source()).expect("parse fixture");
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].id, "wire-a-1");
        assert_eq!(items[0].title, "Fed holds rates - markets shrug");
        assert_eq!(items[0].description, "Policy unchanged.");
        assert_eq!(items[0].source, "Test Wire");
        assert_eq!(items[0].published_at.timestamp(), 1_754_308_800);

        // No guid: the link doubles as the id; bad date collapses to epoch.
        assert_eq!(items[1].id, "https://example.test/b");
        assert_eq!(items[1].published_at.timestamp(), 0);
    }

    #[test]
    fn bad_xml_is_an_error_not_a_panic() {
        assert!(parse_feed("<not-rss/>", &source()).is_err());
    }
}
