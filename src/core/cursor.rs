//! Poll cursor
//!
//! The cursor is the exclusive lower bound of reminders already delivered.
//! The server only understands minute precision, so the wire form always
//! carries a literal `00` in the seconds field.

use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fmt;

/// Timestamp boundary of the last delivered window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCursor {
    last_check: NaiveDateTime,
}

impl PollCursor {
    pub fn new(last_check: NaiveDateTime) -> Self {
        Self { last_check }
    }

    pub fn last_check(&self) -> NaiveDateTime {
        self.last_check
    }

    /// Move the cursor to `now`. Never moves backwards.
    ///
    /// Returns `true` if the cursor changed.
    pub fn advance_to(&mut self, now: NaiveDateTime) -> bool {
        if now > self.last_check {
            self.last_check = now;
            true
        } else {
            false
        }
    }

    /// Wire form used in the `new_reminders` endpoint path
    pub fn formatted(&self) -> String {
        format_cursor(&self.last_check)
    }
}

impl fmt::Display for PollCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

/// Format a timestamp as `YYYY-M-D H:M:00` (1-indexed month, no padding)
pub fn format_cursor(at: &NaiveDateTime) -> String {
    format!(
        "{}-{}-{} {}:{}:00",
        at.year(),
        at.month(),
        at.day(),
        at.hour(),
        at.minute()
    )
}
