//! # Permission Feature
//!
//! Decides whether notifications may be shown and starts polling once they
//! may. Re-run on every user interaction because some hosts only honour a
//! consent prompt that follows one.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod gate;
pub mod interaction;

pub use gate::{GateOutcome, PermissionGate, PollLauncher};
pub use interaction::{interaction_loop, spawn_stdin_reader};

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Permission to show native notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    /// Not decided yet; a consent prompt may be shown
    #[serde(alias = "unknown")]
    Default,
    Granted,
    Denied,
}

impl FromStr for PermissionState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "default" | "unknown" | "ask" => Ok(Self::Default),
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            other => Err(anyhow!(
                "unknown permission '{other}' (expected granted, denied or default)"
            )),
        }
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        };
        f.write_str(name)
    }
}
