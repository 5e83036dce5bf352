use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and register the pipeline series so
    /// they show up on /metrics before first increment.
    pub fn init() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_counter!("pipeline_runs_total", "Scheduler ticks executed.");
        describe_counter!("feed_items_total", "Items merged across all sources.");
        describe_counter!("feed_source_errors_total", "Per-source fetch/parse failures.");
        describe_counter!("analyses_total", "Items run through the analysis adapter.");
        describe_counter!("oracle_fallback_total", "Oracle failures degraded to fallback.");
        describe_counter!("alerts_sent_total", "Successful channel deliveries.");
        describe_counter!("alerts_suppressed_total", "Deliveries skipped by cooldown.");
        describe_counter!("alerts_failed_total", "Channel transport failures.");
        describe_gauge!("pipeline_last_run_ts", "Unix ts of the last pipeline tick.");

        Self { handle }
    }

    /// Router exposing `/metrics` in Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
