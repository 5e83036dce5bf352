//! # Scheduler / Driver
//!
//! Fires the pipeline on a fixed interval (first tick immediately on
//! start). `Idle → Running(tick) → Idle` with a monotonically increasing
//! run counter; `start()` is guarded so a second call is a logged no-op,
//! and `stop()` flips the flag without cancelling an in-flight tick. Every
//! tick catches and logs its own failure so the next one is unaffected.

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::notify::ChannelStatus;
use crate::pipeline::Pipeline;

/// Cumulative counters for process lifetime, served by `/health` and
/// `/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,
    pub news_processed: u64,
    pub reddit_processed: u64,
    pub analyses_run: u64,
    pub alerts_dispatched: u64,
    pub ticks_failed: u64,
}

impl RunStats {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            news_processed: 0,
            reddit_processed: 0,
            analyses_run: 0,
            alerts_dispatched: 0,
            ticks_failed: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub is_running: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub run_count: u64,
    pub interval_secs: u64,
    pub sources: usize,
    pub analyzer: &'static str,
    pub channels: Vec<ChannelStatus>,
}

pub struct Scheduler {
    inner: Arc<Inner>,
}

struct Inner {
    pipeline: Pipeline,
    interval: Duration,
    running: AtomicBool,
    run_count: AtomicU64,
    last_run: RwLock<Option<DateTime<Utc>>>,
    stats: RwLock<RunStats>,
}

impl Scheduler {
    pub fn new(pipeline: Pipeline, interval: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                pipeline,
                interval,
                running: AtomicBool::new(false),
                run_count: AtomicU64::new(0),
                last_run: RwLock::new(None),
                stats: RwLock::new(RunStats::new()),
            }),
        }
    }

    /// Begin ticking. Calling start while already running is a no-op.
    pub fn start(&self) {
        if self
            .inner
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("scheduler already running, start ignored");
            return;
        }

        tracing::info!(
            interval_secs = self.inner.interval.as_secs(),
            sources = self.inner.pipeline.source_count(),
            analyzer = self.inner.pipeline.analyzer_name(),
            "scheduler started"
        );

        let inner = self.inner.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.interval);
            loop {
                // First tick fires immediately on start.
                ticker.tick().await;
                if !inner.running.load(Ordering::SeqCst) {
                    break;
                }
                inner.run_tick().await;
            }
            tracing::info!("scheduler loop exited");
        });
    }

    /// Stop future ticks. An in-flight tick is left to finish.
    pub fn stop(&self) {
        if self.inner.running.swap(false, Ordering::SeqCst) {
            tracing::info!("scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Run a single tick outside the interval loop (startup probes, tests).
    pub async fn run_tick(&self) {
        self.inner.run_tick().await;
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            is_running: self.is_running(),
            last_run: *self.inner.last_run.read().expect("last_run lock poisoned"),
            run_count: self.inner.run_count.load(Ordering::SeqCst),
            interval_secs: self.inner.interval.as_secs(),
            sources: self.inner.pipeline.source_count(),
            analyzer: self.inner.pipeline.analyzer_name(),
            channels: self.inner.pipeline.channel_status(),
        }
    }

    pub fn stats(&self) -> RunStats {
        self.inner.stats.read().expect("stats lock poisoned").clone()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.inner.pipeline
    }
}

impl Inner {
    async fn run_tick(&self) {
        let run = self.run_count.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(run, "pipeline tick started");
        counter!("pipeline_runs_total").increment(1);

        match self.pipeline.run_once().await {
            Ok(summary) => {
                let mut stats = self.stats.write().expect("stats lock poisoned");
                stats.news_processed += summary.news_passed as u64;
                stats.reddit_processed += summary.reddit_passed as u64;
                stats.analyses_run += summary.analyzed as u64;
                if summary.dispatched {
                    stats.alerts_dispatched += summary.analyzed as u64;
                }
                tracing::info!(
                    run,
                    fetched = summary.fetched,
                    passed = summary.news_passed + summary.reddit_passed,
                    dispatched = summary.dispatched,
                    "pipeline tick finished"
                );
            }
            Err(e) => {
                self.stats.write().expect("stats lock poisoned").ticks_failed += 1;
                tracing::error!(run, error = ?e, "pipeline tick failed");
            }
        }

        let now = Utc::now();
        gauge!("pipeline_last_run_ts").set(now.timestamp() as f64);
        *self.last_run.write().expect("last_run lock poisoned") = Some(now);
    }
}
