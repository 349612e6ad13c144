//! # Feature: Poll Loop
//!
//! Fetches newly due reminders on a fixed cadence and hands them to the
//! renderer. The delay is anchored to the end of the previous cycle, so
//! requests are `interval + request duration` apart. Exactly one request is
//! in flight at a time and no error ends the loop.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Cursor handling on failure follows CursorPolicy
//! - 1.0.0: Initial release

use super::source::{FetchError, ReminderSource};
use super::CursorPolicy;
use crate::core::{Clock, Config, PollCursor};
use crate::features::permission::PollLauncher;
use crate::features::renderer::NotificationRenderer;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between the end of one cycle and the next request
    pub interval: Duration,
    /// Upper bound on a single request
    pub request_timeout: Duration,
    pub cursor_policy: CursorPolicy,
}

impl PollSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.poll_interval(),
            request_timeout: config.request_timeout(),
            cursor_policy: config.cursor_policy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Delivered { received: usize, rendered: usize },
    Failed(FetchError),
}

/// Summary of one poll cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Cursor string sent to the server
    pub requested: String,
    pub outcome: CycleOutcome,
    /// Whether the cursor moved after this cycle
    pub advanced: bool,
}

#[derive(Clone)]
pub struct PollLoop {
    source: Arc<dyn ReminderSource>,
    renderer: Arc<NotificationRenderer>,
    clock: Arc<dyn Clock>,
    settings: PollSettings,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn ReminderSource>,
        renderer: Arc<NotificationRenderer>,
        clock: Arc<dyn Clock>,
        settings: PollSettings,
    ) -> Self {
        Self {
            source,
            renderer,
            clock,
            settings,
        }
    }

    /// Poll forever, waiting the interval before every request
    pub async fn run(self, mut cursor: PollCursor) {
        info!(
            "Reminder polling started (every {}s, timeout {}s, cursor policy {})",
            self.settings.interval.as_secs(),
            self.settings.request_timeout.as_secs(),
            self.settings.cursor_policy
        );

        loop {
            sleep(self.settings.interval).await;
            let report = self.poll_once(&mut cursor).await;
            match &report.outcome {
                CycleOutcome::Delivered { received: 0, .. } => {
                    debug!("No new reminders since {}", report.requested)
                }
                CycleOutcome::Delivered { received, rendered } => info!(
                    "Delivered {rendered}/{received} reminder(s) due since {}",
                    report.requested
                ),
                CycleOutcome::Failed(_) => {}
            }
        }
    }

    /// Run a single fetch-render-advance cycle
    pub async fn poll_once(&self, cursor: &mut PollCursor) -> CycleReport {
        let cycle_start = self.clock.now();
        let requested = cursor.formatted();

        let result = match timeout(self.settings.request_timeout, self.source.fetch_since(cursor)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.settings.request_timeout)),
        };

        match result {
            Ok(notices) => {
                let rendered = self.renderer.render(&notices).await;
                let advanced = cursor.advance_to(self.clock.now());
                CycleReport {
                    requested,
                    outcome: CycleOutcome::Delivered {
                        received: notices.len(),
                        rendered,
                    },
                    advanced,
                }
            }
            Err(error) => {
                let advanced = match self.settings.cursor_policy {
                    CursorPolicy::AdvanceAlways => cursor.advance_to(cycle_start),
                    CursorPolicy::AdvanceOnSuccess => false,
                };
                if advanced {
                    warn!("Poll since {requested} failed: {error}; skipping to {cursor}");
                } else {
                    warn!("Poll since {requested} failed: {error}; will retry the same window");
                }
                CycleReport {
                    requested,
                    outcome: CycleOutcome::Failed(error),
                    advanced,
                }
            }
        }
    }
}

impl PollLauncher for PollLoop {
    fn launch(&self, cursor: PollCursor) {
        let poll_loop = self.clone();
        tokio::spawn(poll_loop.run(cursor));
    }
}
