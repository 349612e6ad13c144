//! Wall clock abstraction
//!
//! Cursor timestamps are taken from the host-local calendar, so the clock
//! hands out naive local time. Timer delays are not part of this trait; they
//! go through `tokio::time` so tests can pause and advance virtual time.

use chrono::{Local, NaiveDateTime};

/// Source of the current local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Clock backed by the system's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
