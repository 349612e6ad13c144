//! Desktop notification backend
//!
//! Talks to the platform notification server through notify-rust. Clicks and
//! consent prompts rely on notification actions, which only XDG notification
//! servers (Linux and the BSDs) support. Elsewhere notifications are shown
//! without a click action and consent must come from configuration.

use super::{NativeNotification, NotificationCapability, UrlOpener};
use crate::features::permission::PermissionState;
use anyhow::Result;
use async_trait::async_trait;
use log::info;
#[cfg(all(unix, not(target_os = "macos")))]
use {
    anyhow::anyhow,
    log::{debug, warn},
};
use notify_rust::Notification;
use std::sync::Arc;

/// Application name reported to the notification server
pub const APP_NAME: &str = "remindme";

pub struct DesktopCapability {
    initial: PermissionState,
    opener: Arc<dyn UrlOpener>,
}

impl DesktopCapability {
    pub fn new(initial: PermissionState, opener: Arc<dyn UrlOpener>) -> Self {
        Self { initial, opener }
    }

    /// Returns the backend if a notification server is reachable
    pub fn detect(initial: PermissionState, opener: Arc<dyn UrlOpener>) -> Option<Self> {
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            match notify_rust::get_server_information() {
                Ok(server) => info!(
                    "Desktop notification server: {} {} ({})",
                    server.name, server.version, server.vendor
                ),
                Err(e) => {
                    debug!("Notification server query failed: {e}");
                    return None;
                }
            }
        }

        Some(Self::new(initial, opener))
    }

    fn build(notification: &NativeNotification) -> Notification {
        let mut toast = Notification::new();
        toast
            .appname(APP_NAME)
            .summary(&notification.title)
            .body(&notification.body)
            .icon(&notification.icon);
        toast
    }
}

#[async_trait]
impl NotificationCapability for DesktopCapability {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn permission(&self) -> PermissionState {
        self.initial
    }

    async fn request_permission(&self) -> PermissionState {
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            match tokio::task::spawn_blocking(ask_consent).await {
                Ok(answer) => answer,
                Err(e) => {
                    warn!("Consent prompt task failed: {e}");
                    PermissionState::Default
                }
            }
        }

        #[cfg(not(all(unix, not(target_os = "macos"))))]
        {
            info!("This platform cannot prompt for consent; set REMINDME_PERMISSION=granted to enable reminders");
            PermissionState::Default
        }
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    async fn display(&self, notification: NativeNotification) -> Result<()> {
        let mut toast = Self::build(&notification);
        toast.action("default", "Open");

        let (shown_tx, shown_rx) = tokio::sync::oneshot::channel();
        let opener = self.opener.clone();
        let runtime = tokio::runtime::Handle::current();

        // The handle blocks until the notification is clicked or closed, which
        // may be never, so it gets a plain thread outside tokio's blocking pool.
        std::thread::Builder::new()
            .name("remindme-notification".to_string())
            .spawn(move || {
                let handle = match toast.show() {
                    Ok(handle) => {
                        let _ = shown_tx.send(Ok(()));
                        handle
                    }
                    Err(e) => {
                        let _ = shown_tx.send(Err(anyhow!("Failed to show desktop notification: {e}")));
                        return;
                    }
                };

                let mut clicked = false;
                handle.wait_for_action(|action| clicked = action == "default");

                // Invoking the default action dismisses the notification server-side
                if clicked {
                    runtime.spawn(async move {
                        if let Err(e) = notification.click(opener.as_ref()).await {
                            warn!("Failed to open reminder page: {e}");
                        }
                    });
                }
            })
            .map_err(|e| anyhow!("Could not start notification thread: {e}"))?;

        shown_rx
            .await
            .map_err(|_| anyhow!("Notification worker exited before showing the notification"))?
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    async fn display(&self, notification: NativeNotification) -> Result<()> {
        use anyhow::Context;

        let toast = Self::build(&notification);
        tokio::task::spawn_blocking(move || toast.show().map(|_| ()))
            .await
            .context("Notification worker panicked")?
            .context("Failed to show desktop notification")
    }
}

/// Ask for consent with an Allow/Block notification
#[cfg(all(unix, not(target_os = "macos")))]
fn ask_consent() -> PermissionState {
    let mut prompt = Notification::new();
    prompt
        .appname(APP_NAME)
        .summary("Allow reminder notifications?")
        .body("remindme would like to show your due reminders as desktop notifications.")
        .action("allow", "Allow")
        .action("block", "Block")
        .timeout(notify_rust::Timeout::Never);

    let handle = match prompt.show() {
        Ok(handle) => handle,
        Err(e) => {
            warn!("Could not show consent prompt: {e}");
            return PermissionState::Default;
        }
    };

    let mut answer = PermissionState::Default;
    handle.wait_for_action(|action| {
        answer = match action {
            "allow" => PermissionState::Granted,
            "block" => PermissionState::Denied,
            _ => PermissionState::Default,
        }
    });
    answer
}
