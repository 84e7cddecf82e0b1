//! Wall-clock source for report timestamps

use chrono::{DateTime, Utc};

/// Source of the begin and end timestamps recorded in a report
///
/// Per-call latencies are measured with a monotonic clock and do not go
/// through this trait.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
