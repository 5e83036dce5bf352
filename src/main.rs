//! Market News Alerter — Binary Entrypoint
//!
//! Boots the scheduler loop and the Axum liveness/stats server, wiring the
//! env-selected analysis adapter and notification channels.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use market_news_alerter::analysis;
use market_news_alerter::api::{self, AppState};
use market_news_alerter::config::AppConfig;
use market_news_alerter::metrics::Metrics;
use market_news_alerter::notify::AlertDispatcher;
use market_news_alerter::pipeline::Pipeline;
use market_news_alerter::scheduler::Scheduler;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env();
    let metrics = Metrics::init();

    let analyzer = analysis::build_analyzer();
    let dispatcher = AlertDispatcher::from_env();
    for ch in dispatcher.status() {
        tracing::info!(channel = ch.name, configured = ch.configured, "channel state");
    }

    let pipeline = Pipeline::from_config(&cfg, analyzer, dispatcher);
    let scheduler = Arc::new(Scheduler::new(pipeline, cfg.interval));
    scheduler.start();

    let state = AppState {
        scheduler: scheduler.clone(),
    };
    let app = api::create_router(state).merge(metrics.router());

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(%addr, "health server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(scheduler))
        .await
        .context("serve health endpoint")?;
    Ok(())
}

/// Wait for SIGINT/SIGTERM, then flip the scheduler to stopped before the
/// server drains. An in-flight tick finishes on its own.
async fn shutdown_signal(scheduler: Arc<Scheduler>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install sigterm handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    scheduler.stop();
    tracing::info!("shutdown signal received");
}
