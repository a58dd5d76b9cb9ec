//! Testability ports.

use chrono::{DateTime, Utc};

/// Clock abstraction so session timestamps and idle eviction are testable.
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
