// Core layer - shared types, configuration and clock
pub mod core;

// Features layer - permission gate, polling, rendering and backends
pub mod features;

#[cfg(test)]
mod test_utils;

pub use core::Config;

pub use features::{
    // Capability
    detect_capability, NativeNotification, NotificationCapability,
    // Permission
    GateOutcome, PermissionGate, PermissionState,
    // Polling
    CursorPolicy, HttpReminderSource, PollLoop, PollSettings,
    // Rendering
    NotificationRenderer,
};
