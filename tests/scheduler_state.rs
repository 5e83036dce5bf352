// tests/scheduler_state.rs
//
// Driver state machine: guarded start, stop without cancelling ticks,
// run counter and last-run bookkeeping.

use std::sync::Arc;
use std::time::Duration;

use market_news_alerter::analysis::FallbackAnalyzer;
use market_news_alerter::fetch::FeedFetcher;
use market_news_alerter::notify::AlertDispatcher;
use market_news_alerter::pipeline::Pipeline;
use market_news_alerter::scheduler::Scheduler;

fn idle_scheduler() -> Scheduler {
    let pipeline = Pipeline::new(
        FeedFetcher::with_providers(vec![]),
        1000,
        5,
        Arc::new(FallbackAnalyzer),
        AlertDispatcher::with_channels(vec![]),
    );
    Scheduler::new(pipeline, Duration::from_secs(3600))
}

#[tokio::test]
async fn starts_idle_with_zero_runs() {
    let s = idle_scheduler();
    let status = s.status();
    assert!(!status.is_running);
    assert_eq!(status.run_count, 0);
    assert!(status.last_run.is_none());
}

#[tokio::test]
async fn double_start_is_a_noop_and_stop_flips_the_flag() {
    let s = idle_scheduler();
    s.start();
    assert!(s.is_running());
    // Second start must not panic or reset anything.
    s.start();
    assert!(s.is_running());

    s.stop();
    assert!(!s.is_running());
    // Stopping an already-stopped scheduler is fine too.
    s.stop();
    assert!(!s.is_running());
}

#[tokio::test]
async fn manual_ticks_advance_counter_and_last_run() {
    let s = idle_scheduler();
    s.run_tick().await;
    s.run_tick().await;

    let status = s.status();
    assert_eq!(status.run_count, 2);
    assert!(status.last_run.is_some());
}

#[tokio::test]
async fn restart_after_stop_is_allowed() {
    let s = idle_scheduler();
    s.start();
    s.stop();
    s.start();
    assert!(s.is_running());
    s.stop();
}
