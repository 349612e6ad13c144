//! # Core Module
//!
//! Core domain types, configuration, and the wall clock for the notifier.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add YAML config file overlay
//! - 1.0.0: Initial creation with config, clock, cursor and notice modules

pub mod clock;
pub mod config;
pub mod cursor;
pub mod notice;

// Re-export commonly used items
pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use cursor::{format_cursor, PollCursor};
pub use notice::ReminderNotice;
