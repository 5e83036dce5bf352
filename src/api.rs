use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::dedup::CacheStats;
use crate::notify::ChannelStatus;
use crate::scheduler::{RunStats, Scheduler, SchedulerStatus};

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<Scheduler>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/stats", get(stats))
        .fallback(not_found)
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    scheduler: SchedulerStatus,
    statistics: RunStats,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        scheduler: state.scheduler.status(),
        statistics: state.scheduler.stats(),
    })
}

#[derive(Serialize)]
struct StatsResponse {
    sources: usize,
    news: CacheStats,
    channels: Vec<ChannelStatus>,
    scheduler: RunStats,
}

async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        sources: state.scheduler.pipeline().source_count(),
        news: state.scheduler.pipeline().cache_stats(),
        channels: state.scheduler.pipeline().channel_status(),
        scheduler: state.scheduler.stats(),
    })
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
