//! # Polling Feature
//!
//! Repeating fetch of newly due reminders from the reminders service.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Token exchange with username/password
//! - 1.1.0: Configurable cursor policy for failed requests
//! - 1.0.0: Initial release with fixed-cadence polling

pub mod poller;
pub mod source;

pub use poller::{CycleOutcome, CycleReport, PollLoop, PollSettings};
pub use source::{FetchError, HttpReminderSource, ReminderSource};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// How the cursor moves when a poll request fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorPolicy {
    /// Keep the cursor so the failed window is fetched again next cycle
    AdvanceOnSuccess,
    /// Move the cursor to the cycle start even on failure. Reminders that
    /// fell in the failed window are never fetched.
    AdvanceAlways,
}

impl FromStr for CursorPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "advance_on_success" => Ok(Self::AdvanceOnSuccess),
            "advance_always" => Ok(Self::AdvanceAlways),
            other => Err(anyhow!(
                "unknown cursor policy '{other}' (expected advance_on_success or advance_always)"
            )),
        }
    }
}

impl fmt::Display for CursorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdvanceOnSuccess => f.write_str("advance_on_success"),
            Self::AdvanceAlways => f.write_str("advance_always"),
        }
    }
}
