// src/fetch/reddit.rs
//
// Reddit "hot" listings over the public JSON endpoint. No OAuth: the
// listing payload carries everything the pipeline needs (fullname, title,
// selftext, permalink, created_utc).

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use serde::Deserialize;

use crate::fetch::{normalize_text, FeedItem};
use crate::sources::FeedSource;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    /// Fullname, e.g. "t3_abc123" — stable across refetches.
    name: String,
    title: String,
    #[serde(default)]
    selftext: String,
    permalink: String,
    created_utc: f64,
}

pub fn parse_listing(json: &str, source: &FeedSource) -> Result<Vec<FeedItem>> {
    let listing: Listing =
        serde_json::from_str(json).with_context(|| format!("{}: parse listing", source.name))?;

    let mut out = Vec::with_capacity(listing.data.children.len());
    for child in listing.data.children {
        let post = child.data;
        let title = normalize_text(&post.title);
        if title.is_empty() {
            continue;
        }

        out.push(FeedItem {
            id: post.name,
            title,
            description: normalize_text(&post.selftext),
            url: format!("https://www.reddit.com{}", post.permalink),
            published_at: Utc
                .timestamp_opt(post.created_utc as i64, 0)
                .single()
                .unwrap_or_default(),
            source: source.name.to_string(),
            source_category: source.category.to_string(),
            priority: source.priority,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{SourceKind, SourcePriority};

    fn source() -> FeedSource {
        FeedSource {
            name: "Reddit Business",
            url: "https://www.reddit.com/r/business/hot.json?limit=25",
            category: "reddit",
            priority: SourcePriority::High,
            kind: SourceKind::RedditListing,
            hint_keywords: &["business"],
        }
    }

    const FIXTURE: &str = r#"{
      "kind": "Listing",
      "data": {
        "children": [
          {
            "kind": "t3",
            "data": {
              "name": "t3_abc123",
              "title": "Major retailer files for bankruptcy",
              "selftext": "Per the court filing...",
              "permalink": "/r/business/comments/abc123/major_retailer/",
              "created_utc": 1754308800.0,
              "score": 5123
            }
          }
        ]
      }
    }"#;

    #[test]
    fn parses_posts_into_feed_items() {
        let items = parse_listing(FIXTURE, &source()).expect("parse fixture");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "t3_abc123");
        assert_eq!(
            items[0].url,
            "https://www.reddit.com/r/business/comments/abc123/major_retailer/"
        );
        assert_eq!(items[0].source_category, "reddit");
        assert_eq!(items[0].published_at.timestamp(), 1_754_308_800);
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(parse_listing("[]", &source()).is_err());
    }
}
