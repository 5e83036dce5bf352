// src/config.rs
//
// Environment-driven configuration. Every key is optional: absence falls
// back to a default (or disables the feature it gates), never to a startup
// failure. Channel credentials are read by the channels themselves; this
// struct holds the pipeline-level knobs.
//
//   PORT                  health server port          (default 3000)
//   CHECK_INTERVAL_SECS   scheduler tick interval     (default 900)
//   ALERT_MIN_IMPACT      dispatch score threshold    (default 5)
//   MAX_ITEM_AGE_DAYS     fetch-time age cutoff       (default 7)
//   DEDUP_CACHE_CAP       recency cache bound         (default 1000)

use std::str::FromStr;
use std::time::Duration;

use crate::dedup::DEFAULT_CACHE_CAP;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub interval: Duration,
    pub min_impact: u8,
    pub max_item_age_days: i64,
    pub dedup_cache_cap: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", 3000),
            interval: Duration::from_secs(env_parse("CHECK_INTERVAL_SECS", 900u64).max(1)),
            min_impact: env_parse("ALERT_MIN_IMPACT", 5),
            max_item_age_days: env_parse("MAX_ITEM_AGE_DAYS", 7i64).max(1),
            dedup_cache_cap: env_parse("DEDUP_CACHE_CAP", DEFAULT_CACHE_CAP),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            interval: Duration::from_secs(900),
            min_impact: 5,
            max_item_age_days: 7,
            dedup_cache_cap: DEFAULT_CACHE_CAP,
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_apply_without_env() {
        std::env::remove_var("CHECK_INTERVAL_SECS");
        std::env::remove_var("ALERT_MIN_IMPACT");
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.interval, Duration::from_secs(900));
        assert_eq!(cfg.min_impact, 5);
        assert_eq!(cfg.max_item_age_days, 7);
    }

    #[test]
    #[serial]
    fn env_overrides_and_garbage_falls_back() {
        std::env::set_var("CHECK_INTERVAL_SECS", "60");
        std::env::set_var("ALERT_MIN_IMPACT", "not-a-number");
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.interval, Duration::from_secs(60));
        assert_eq!(cfg.min_impact, 5);
        std::env::remove_var("CHECK_INTERVAL_SECS");
        std::env::remove_var("ALERT_MIN_IMPACT");
    }
}
