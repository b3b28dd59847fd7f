//! Minute-boundary scheduling.
//!
//! The delay is computed in whole seconds from the current second-of-minute.
//! There is no catch-up: if a cycle overruns, the next delay is simply
//! computed from wherever the clock is when the cycle finishes.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Whole seconds until the seconds component next reads zero.
///
/// At `:00` this is a full 60, never 0.
pub fn seconds_until_next_minute<Tz: TimeZone>(now: &DateTime<Tz>) -> u64 {
    60 - u64::from(now.second())
}

/// `seconds_until_next_minute` as a `Duration`.
pub fn delay_until_next_minute<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    Duration::from_secs(seconds_until_next_minute(now))
}

/// Sleep until the next minute boundary.
///
/// Returns `false` if `cancel` fired before the boundary was reached.
pub async fn wait_for_next_minute(cancel: &CancellationToken) -> bool {
    if cancel.is_cancelled() {
        return false;
    }

    let delay = delay_until_next_minute(&Utc::now());
    debug!(delay_secs = delay.as_secs(), "Sleeping until next minute");

    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn at_second(sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 12, 34, sec).unwrap()
    }

    #[test]
    fn test_wait_is_sixty_minus_seconds() {
        assert_eq!(seconds_until_next_minute(&at_second(17)), 43);
        assert_eq!(seconds_until_next_minute(&at_second(59)), 1);
        assert_eq!(seconds_until_next_minute(&at_second(1)), 59);
    }

    #[test]
    fn test_wait_at_boundary_is_full_minute() {
        assert_eq!(seconds_until_next_minute(&at_second(0)), 60);
        assert_eq!(
            delay_until_next_minute(&at_second(0)),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_subsecond_part_is_ignored() {
        let now = at_second(17) + chrono::Duration::milliseconds(900);
        assert_eq!(seconds_until_next_minute(&now), 43);
    }

    #[test]
    fn test_wait_is_always_in_range() {
        for sec in 0..60 {
            let wait = seconds_until_next_minute(&at_second(sec));
            assert!((1..=60).contains(&wait), "sec={sec} wait={wait}");
        }
    }

    #[tokio::test]
    async fn test_wait_returns_false_when_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let started = Instant::now();
        assert!(!wait_for_next_minute(&cancel).await);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_wait_interrupted_by_cancel() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        // May also return at a real minute boundary; either way it must not
        // sleep out the full delay once cancelled.
        let started = Instant::now();
        wait_for_next_minute(&cancel).await;
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
