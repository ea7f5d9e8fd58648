//! Pacing policy for the serially-driven ingest run.
//!
//! The upstream API is rate limited, so the pipeline keeps one request in
//! flight and sleeps between calls. All sleeping goes through [`Sleeper`]
//! so tests can capture delays instead of serving them.

use std::time::Duration;

use async_trait::async_trait;

/// Retry policy for the detail fetch.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts, base_delay }
    }

    /// Pause after a failed attempt (1-based): linear escalation,
    /// base × attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_delay: Duration::from_millis(1000) }
    }
}

/// Counts consecutive item failures and escalates to a cooldown once the
/// threshold is hit.
#[derive(Debug)]
pub struct FailureTracker {
    consecutive: u32,
    threshold: u32,
    cooldown: Duration,
}

impl FailureTracker {
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self { consecutive: 0, threshold, cooldown }
    }

    /// Record one item failure. Returns the cooldown to serve when the
    /// threshold is reached; the counter resets alongside.
    pub fn record_failure(&mut self) -> Option<Duration> {
        self.consecutive += 1;
        if self.consecutive >= self.threshold {
            self.consecutive = 0;
            Some(self.cooldown)
        } else {
            None
        }
    }

    /// Any successfully processed item breaks the streak.
    pub fn record_success(&mut self) {
        self.consecutive = 0;
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}

/// Time suspension used by the retry loop and the pipeline pacing.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_delay_escalates_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(2), Duration::from_millis(2000));

        let custom = RetryPolicy::new(5, Duration::from_millis(250));
        assert_eq!(custom.delay_after(4), Duration::from_millis(1000));
    }

    #[test]
    fn tracker_fires_cooldown_at_threshold_and_resets() {
        let mut tracker = FailureTracker::new(3, Duration::from_secs(5));

        assert_eq!(tracker.record_failure(), None);
        assert_eq!(tracker.record_failure(), None);
        assert_eq!(tracker.record_failure(), Some(Duration::from_secs(5)));
        assert_eq!(tracker.consecutive(), 0);

        // streak starts over after the cooldown
        assert_eq!(tracker.record_failure(), None);
    }

    #[test]
    fn success_breaks_the_streak() {
        let mut tracker = FailureTracker::new(3, Duration::from_secs(5));

        tracker.record_failure();
        tracker.record_failure();
        tracker.record_success();
        assert_eq!(tracker.record_failure(), None);
        assert_eq!(tracker.record_failure(), None);
        assert_eq!(tracker.record_failure(), Some(Duration::from_secs(5)));
    }
}
