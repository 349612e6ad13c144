//! # Features
//!
//! Feature modules of the notifier and their versions.

pub mod capability;
pub mod permission;
pub mod polling;
pub mod renderer;

pub use capability::{detect_capability, NativeNotification, NotificationCapability};
pub use permission::{GateOutcome, PermissionGate, PermissionState};
pub use polling::{CursorPolicy, HttpReminderSource, PollLoop, PollSettings};
pub use renderer::NotificationRenderer;

/// Name and version of a feature module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Crate version
pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Versions of all feature modules, logged at startup
pub fn get_features() -> Vec<FeatureInfo> {
    vec![
        FeatureInfo { name: "capability", version: "1.2.0" },
        FeatureInfo { name: "permission", version: "1.0.0" },
        FeatureInfo { name: "permission-gate", version: "1.1.0" },
        FeatureInfo { name: "polling", version: "1.2.0" },
        FeatureInfo { name: "poll-loop", version: "1.1.0" },
        FeatureInfo { name: "renderer", version: "1.1.0" },
    ]
}
