//! # Notification Capability
//!
//! Polymorphic interface over the host's native notification mechanism.
//! Backends are picked by runtime detection instead of a fallback chain.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.2.0: Desktop notifications wait for clicks on their own threads
//! - 1.1.0: Headless log backend for machines without a notification server
//! - 1.0.0: Desktop backend via notify-rust

pub mod desktop;
pub mod headless;
pub mod opener;

pub use desktop::DesktopCapability;
pub use headless::LogCapability;
pub use opener::{SystemOpener, UrlOpener};

use crate::core::Config;
use crate::features::permission::PermissionState;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{info, warn};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// What happens when the user clicks a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Open the page in the user's browser
    OpenUrl(String),
}

/// A notification ready to hand to a backend
///
/// The click action travels with the notification, so it is bound before the
/// backend can show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub on_click: ClickAction,
}

impl NativeNotification {
    /// Run the click action
    pub async fn click(&self, opener: &dyn UrlOpener) -> Result<()> {
        match &self.on_click {
            ClickAction::OpenUrl(url) => opener.open(url).await,
        }
    }
}

#[async_trait]
pub trait NotificationCapability: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Permission as the host currently reports it
    fn permission(&self) -> PermissionState;

    /// Ask the user for consent. Resolves once the user has answered or the
    /// prompt was dismissed.
    async fn request_permission(&self) -> PermissionState;

    /// Show a notification. Returns once it is on screen; clicks are handled
    /// in the background.
    async fn display(&self, notification: NativeNotification) -> Result<()>;
}

/// Which backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Desktop notifications if a notification server answers, otherwise none
    Auto,
    Desktop,
    Log,
    #[serde(alias = "none")]
    Disabled,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "desktop" => Ok(Self::Desktop),
            "log" => Ok(Self::Log),
            "none" | "disabled" => Ok(Self::Disabled),
            other => Err(anyhow!(
                "unknown backend '{other}' (expected auto, desktop, log or none)"
            )),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Desktop => "desktop",
            Self::Log => "log",
            Self::Disabled => "none",
        };
        f.write_str(name)
    }
}

/// Pick a notification backend for this host
///
/// Returns `None` when the host has no usable notification capability.
pub fn detect_capability(
    config: &Config,
    opener: Arc<dyn UrlOpener>,
) -> Option<Arc<dyn NotificationCapability>> {
    match config.backend {
        BackendKind::Auto => {
            let desktop = DesktopCapability::detect(config.permission, opener);
            if desktop.is_none() {
                info!("No desktop notification server detected");
            }
            desktop.map(|d| Arc::new(d) as Arc<dyn NotificationCapability>)
        }
        BackendKind::Desktop => {
            let desktop = DesktopCapability::detect(config.permission, opener);
            if desktop.is_none() {
                warn!("Desktop backend requested but no notification server is available");
            }
            desktop.map(|d| Arc::new(d) as Arc<dyn NotificationCapability>)
        }
        BackendKind::Log => Some(Arc::new(LogCapability) as Arc<dyn NotificationCapability>),
        BackendKind::Disabled => None,
    }
}
