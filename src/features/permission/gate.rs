//! # Feature: Permission Gate
//!
//! Checks notification permission, prompts once while undecided and starts
//! the poll loop when permission is granted. Safe to call any number of
//! times: at most one prompt is outstanding and at most one poll loop runs.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Dismissed prompts leave the gate undecided so a later interaction can ask again
//! - 1.0.0: Initial release

use super::PermissionState;
use crate::core::{Clock, PollCursor};
use crate::features::capability::NotificationCapability;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Starts the poll loop from a given cursor
pub trait PollLauncher: Send + Sync {
    fn launch(&self, cursor: PollCursor);
}

/// What a gate check did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Permission is granted and this call started the poll loop
    Started,
    /// The poll loop was already running
    AlreadyRunning,
    /// Another call is waiting for the user to answer the consent prompt
    PromptPending,
    Denied,
    /// The prompt was dismissed without an answer
    Undecided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Prompting,
    Polling,
}

struct GateState {
    phase: Phase,
    /// Answer from a consent prompt; overrides what the capability reports
    decided: Option<PermissionState>,
}

pub struct PermissionGate {
    capability: Arc<dyn NotificationCapability>,
    clock: Arc<dyn Clock>,
    launcher: Arc<dyn PollLauncher>,
    state: Mutex<GateState>,
}

impl PermissionGate {
    pub fn new(
        capability: Arc<dyn NotificationCapability>,
        clock: Arc<dyn Clock>,
        launcher: Arc<dyn PollLauncher>,
    ) -> Self {
        Self {
            capability,
            clock,
            launcher,
            state: Mutex::new(GateState {
                phase: Phase::Idle,
                decided: None,
            }),
        }
    }

    /// Check permission and start polling if allowed
    pub async fn check_and_enable(&self) -> GateOutcome {
        // The cursor starts at the time of the check, not when a prompt resolves
        let checked_at = self.clock.now();

        {
            let mut state = self.state.lock().await;
            match state.phase {
                Phase::Polling => return GateOutcome::AlreadyRunning,
                Phase::Prompting => return GateOutcome::PromptPending,
                Phase::Idle => {}
            }

            let permission = state
                .decided
                .unwrap_or_else(|| self.capability.permission());
            match permission {
                PermissionState::Granted => {
                    state.phase = Phase::Polling;
                    drop(state);
                    self.start(PollCursor::new(checked_at));
                    return GateOutcome::Started;
                }
                PermissionState::Denied => {
                    debug!("Notifications denied; not polling");
                    return GateOutcome::Denied;
                }
                PermissionState::Default => state.phase = Phase::Prompting,
            }
        }

        info!(
            "Asking for permission to show notifications ({} backend)",
            self.capability.name()
        );
        let answer = self.capability.request_permission().await;

        let mut state = self.state.lock().await;
        match answer {
            PermissionState::Granted => {
                state.decided = Some(PermissionState::Granted);
                state.phase = Phase::Polling;
                drop(state);
                info!("Notification permission granted");
                self.start(PollCursor::new(checked_at));
                GateOutcome::Started
            }
            PermissionState::Denied => {
                state.decided = Some(PermissionState::Denied);
                state.phase = Phase::Idle;
                info!("Notification permission denied; reminders will not be shown");
                GateOutcome::Denied
            }
            PermissionState::Default => {
                state.phase = Phase::Idle;
                info!("Notification prompt dismissed without an answer");
                GateOutcome::Undecided
            }
        }
    }

    fn start(&self, cursor: PollCursor) {
        info!("Starting reminder polling from {cursor}");
        self.launcher.launch(cursor);
    }
}
