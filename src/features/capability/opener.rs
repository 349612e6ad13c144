//! Opening reminder pages in the user's browser

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Url;
use tokio::process::Command;

#[async_trait]
pub trait UrlOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform's default handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

#[async_trait]
impl UrlOpener for SystemOpener {
    async fn open(&self, url: &str) -> Result<()> {
        // URLs come from the server; never hand anything but a web page to the shell opener
        let parsed = Url::parse(url).map_err(|e| anyhow!("Invalid reminder URL '{url}': {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!("Refusing to open non-web URL: {url}"));
        }

        let mut cmd = opener_command(parsed.as_str());
        debug!("Opening {parsed} with {cmd:?}");
        let status = cmd
            .status()
            .await
            .context("Failed to launch the system URL opener")?;

        if !status.success() {
            return Err(anyhow!("URL opener exited with {status}"));
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
