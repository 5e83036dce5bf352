// tests/api_http.rs
//
// HTTP-level tests for the liveness/stats surface without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use market_news_alerter::analysis::FallbackAnalyzer;
use market_news_alerter::api::{self, AppState};
use market_news_alerter::fetch::FeedFetcher;
use market_news_alerter::notify::AlertDispatcher;
use market_news_alerter::pipeline::Pipeline;
use market_news_alerter::scheduler::Scheduler;

const BODY_LIMIT: usize = 1024 * 1024;

/// Router over an idle scheduler with no sources or channels wired.
fn test_router() -> Router {
    let pipeline = Pipeline::new(
        FeedFetcher::with_providers(vec![]),
        1000,
        5,
        Arc::new(FallbackAnalyzer),
        AlertDispatcher::with_channels(vec![]),
    );
    let scheduler = Arc::new(Scheduler::new(pipeline, Duration::from_secs(900)));
    api::create_router(AppState { scheduler })
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Json::Null);
    (status, json)
}

#[tokio::test]
async fn health_reports_scheduler_status_and_statistics() {
    let (status, v) = get_json(test_router(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v.get("status").and_then(Json::as_str), Some("healthy"));
    assert!(v.get("timestamp").is_some());

    let sched = v.get("scheduler").expect("scheduler object");
    assert_eq!(sched.get("is_running").and_then(Json::as_bool), Some(false));
    assert_eq!(sched.get("run_count").and_then(Json::as_u64), Some(0));
    assert!(sched.get("channels").is_some());

    assert!(v.get("statistics").is_some());
}

#[tokio::test]
async fn root_path_serves_the_same_health_payload() {
    let (status, v) = get_json(test_router(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v.get("status").and_then(Json::as_str), Some("healthy"));
}

#[tokio::test]
async fn stats_returns_news_channel_and_scheduler_sections() {
    let (status, v) = get_json(test_router(), "/stats").await;
    assert_eq!(status, StatusCode::OK);

    let news = v.get("news").expect("news section");
    assert_eq!(news.get("total").and_then(Json::as_u64), Some(0));
    assert!(v.get("channels").expect("channels").is_array());
    assert!(v.get("scheduler").is_some());
}

#[tokio::test]
async fn unknown_paths_get_plain_text_404() {
    let req = Request::builder()
        .method("GET")
        .uri("/definitely-not-here")
        .body(Body::empty())
        .expect("build request");
    let resp = test_router().oneshot(req).await.expect("oneshot");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.expect("body");
    assert_eq!(String::from_utf8(bytes.to_vec()).expect("utf8"), "Not Found");
}
