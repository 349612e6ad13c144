//! Headless backend: notifications go to the log
//!
//! Useful on servers and in containers where no notification daemon runs.
//! There is nobody to ask for consent, so permission is always granted.

use super::{ClickAction, NativeNotification, NotificationCapability};
use crate::features::permission::PermissionState;
use anyhow::Result;
use async_trait::async_trait;
use log::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogCapability;

#[async_trait]
impl NotificationCapability for LogCapability {
    fn name(&self) -> &'static str {
        "log"
    }

    fn permission(&self) -> PermissionState {
        PermissionState::Granted
    }

    async fn request_permission(&self) -> PermissionState {
        PermissionState::Granted
    }

    async fn display(&self, notification: NativeNotification) -> Result<()> {
        let ClickAction::OpenUrl(url) = &notification.on_click;
        info!("🔔 {}: {} <{}>", notification.title, notification.body, url);
        Ok(())
    }
}
