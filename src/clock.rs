//! Timestamp sources
//!
//! Resources stamp creation, modification and snapshot times through a
//! [`Clock`]. The recency ranking depends on these stamps being strictly
//! increasing, so both clocks here never hand out the same instant twice.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};

/// Source of strictly increasing timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, clamped so that consecutive readings always move forward.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_nanos: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let mut prev = self.last_nanos.load(Ordering::Relaxed);
        loop {
            let next = wall.max(prev.saturating_add(1));
            match self.last_nanos.compare_exchange_weak(
                prev,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return DateTime::<Utc>::from_timestamp_nanos(next),
                Err(observed) => prev = observed,
            }
        }
    }
}

/// Deterministic clock that advances by a fixed step on every reading.
#[derive(Debug)]
pub struct ManualClock {
    next_nanos: AtomicI64,
    step_nanos: i64,
}

impl ManualClock {
    /// Start at `start`, moving forward by `step` per call
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next_nanos: AtomicI64::new(start.timestamp_nanos_opt().unwrap_or(0)),
            step_nanos: step.num_nanoseconds().unwrap_or(1).max(1),
        }
    }

    /// Starts at the Unix epoch and ticks one second per reading
    pub fn ticking() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH, Duration::seconds(1))
    }

    /// Jump forward without producing a reading
    pub fn advance(&self, by: Duration) {
        let nanos = by.num_nanoseconds().unwrap_or(0).max(0);
        self.next_nanos.fetch_add(nanos, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let nanos = self.next_nanos.fetch_add(self.step_nanos, Ordering::Relaxed);
        DateTime::<Utc>::from_timestamp_nanos(nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_strictly_increasing() {
        let clock = SystemClock::new();
        let mut prev = clock.now();
        for _ in 0..1000 {
            let next = clock.now();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn test_manual_clock_steps() {
        let clock = ManualClock::ticking();
        let first = clock.now();
        let second = clock.now();
        assert_eq!(first, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(second - first, Duration::seconds(1));

        clock.advance(Duration::minutes(1));
        assert_eq!(clock.now() - second, Duration::seconds(61));
    }
}
