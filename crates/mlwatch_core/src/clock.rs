//! Wall-clock abstraction for record timestamps.

use parking_lot::RwLock;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of record timestamps.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Seconds since the Unix epoch.
    fn now(&self) -> f64;
}

/// The operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        // A clock set before 1970 yields 0 rather than failing the write.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// A manually driven clock for tests.
#[derive(Debug)]
pub struct MockClock {
    now: RwLock<f64>,
}

impl MockClock {
    /// Creates a clock frozen at `seconds`.
    pub fn with_time(seconds: f64) -> Self {
        Self {
            now: RwLock::new(seconds),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, duration: Duration) {
        *self.now.write() += duration.as_secs_f64();
    }

    /// Sets the current time.
    pub fn set_time(&self, seconds: f64) {
        *self.now.write() = seconds;
    }
}

impl Clock for MockClock {
    fn now(&self) -> f64 {
        *self.now.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_recent() {
        // 2020-01-01
        assert!(SystemClock.now() > 1_577_836_800.0);
    }

    #[test]
    fn mock_clock_advances() {
        let clock = MockClock::with_time(100.0);
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now(), 100.25);
        clock.set_time(5.0);
        assert_eq!(clock.now(), 5.0);
    }
}
