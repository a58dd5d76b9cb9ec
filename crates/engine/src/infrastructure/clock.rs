//! Clock implementations.

use crate::infrastructure::ports::ClockPort;
use chrono::{DateTime, Utc};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Clock that only moves when a test advances it.
#[cfg(test)]
pub struct ManualClock {
    start: DateTime<Utc>,
    elapsed_secs: std::sync::atomic::AtomicI64,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            elapsed_secs: std::sync::atomic::AtomicI64::new(0),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.elapsed_secs
            .fetch_add(by.num_seconds(), std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl ClockPort for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.elapsed_secs.load(std::sync::atomic::Ordering::SeqCst);
        self.start + chrono::Duration::seconds(secs)
    }
}
