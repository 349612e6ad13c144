//! # Notification Renderer
//!
//! Turns reminder notices into native notifications, one per notice, in the
//! order the server sent them.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: A display that does not finish in time counts as failed
//! - 1.0.0: Initial release

use crate::core::ReminderNotice;
use crate::features::capability::{ClickAction, NativeNotification, NotificationCapability};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Upper bound on handing one notification to the backend
pub const DEFAULT_DISPLAY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct NotificationRenderer {
    capability: Arc<dyn NotificationCapability>,
    title: String,
    icon_url: String,
    display_timeout: Duration,
}

impl NotificationRenderer {
    pub fn new(
        capability: Arc<dyn NotificationCapability>,
        title: impl Into<String>,
        icon_url: impl Into<String>,
    ) -> Self {
        Self {
            capability,
            title: title.into(),
            icon_url: icon_url.into(),
            display_timeout: DEFAULT_DISPLAY_TIMEOUT,
        }
    }

    pub fn with_display_timeout(mut self, display_timeout: Duration) -> Self {
        self.display_timeout = display_timeout;
        self
    }

    /// Build the notification for a single notice
    pub fn build(&self, notice: &ReminderNotice) -> NativeNotification {
        NativeNotification {
            title: self.title.clone(),
            body: notice.short_content.clone(),
            icon: self.icon_url.clone(),
            on_click: ClickAction::OpenUrl(notice.url.clone()),
        }
    }

    /// Show every notice. A notice that fails to display, or does not finish
    /// within the display timeout, does not stop the rest.
    ///
    /// Returns how many notifications were shown.
    pub async fn render(&self, notices: &[ReminderNotice]) -> usize {
        let mut shown = 0;
        for notice in notices {
            match timeout(self.display_timeout, self.capability.display(self.build(notice))).await {
                Ok(Ok(())) => {
                    debug!("Shown reminder {}", notice.label());
                    shown += 1;
                }
                Ok(Err(e)) => warn!("Failed to show reminder {}: {e}", notice.label()),
                Err(_) => warn!(
                    "Notification backend did not show reminder {} within {}s",
                    notice.label(),
                    self.display_timeout.as_secs()
                ),
            }
        }
        shown
    }
}
