// src/notify/throttle.rs
use chrono::{DateTime, Duration as ChronoDuration, Utc};

/// Cooldown gate preventing a channel from spamming.
/// - First send always allowed.
/// - Inside the cooldown window, sends are suppressed.
/// - State is updated explicitly via `record_send` after a successful
///   delivery; failed attempts leave the window open for a quick retry.
#[derive(Debug, Clone, Default)]
pub struct ChannelThrottle {
    cooldown: ChronoDuration,
    last_sent: Option<DateTime<Utc>>,
}

impl ChannelThrottle {
    /// `cooldown_secs` < 0 is treated as 0 (no cooldown).
    pub fn new(cooldown_secs: i64) -> Self {
        Self {
            cooldown: ChronoDuration::seconds(cooldown_secs.max(0)),
            last_sent: None,
        }
    }

    /// Check if the channel may send at `now`. Does NOT mutate state.
    pub fn can_send(&self, now: DateTime<Utc>) -> bool {
        match self.last_sent {
            None => true,
            Some(ts) => now.signed_duration_since(ts) >= self.cooldown,
        }
    }

    /// Record a successful send at `now`.
    pub fn record_send(&mut self, now: DateTime<Utc>) {
        self.last_sent = Some(now);
    }

    pub fn last_sent(&self) -> Option<DateTime<Utc>> {
        self.last_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn first_send_passes() {
        let t = ChannelThrottle::new(1800);
        let now = Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap();
        assert!(t.can_send(now));
    }

    #[test]
    fn inside_cooldown_blocked() {
        let mut t = ChannelThrottle::new(1800);
        let t0 = Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap();
        t.record_send(t0);
        assert!(!t.can_send(t0 + ChronoDuration::seconds(120)));
    }

    #[test]
    fn after_cooldown_passes() {
        let mut t = ChannelThrottle::new(1800);
        let t0 = Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap();
        t.record_send(t0);
        assert!(t.can_send(t0 + ChronoDuration::seconds(1800)));
    }

    #[test]
    fn unrecorded_attempt_leaves_window_open() {
        let t = ChannelThrottle::new(1800);
        let t0 = Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap();
        // A failed delivery never calls record_send, so the very next
        // attempt is still allowed.
        assert!(t.can_send(t0));
        assert!(t.can_send(t0 + ChronoDuration::seconds(1)));
    }

    #[test]
    fn negative_cooldown_means_no_gate() {
        let mut t = ChannelThrottle::new(-5);
        let t0 = Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap();
        t.record_send(t0);
        assert!(t.can_send(t0));
    }
}
