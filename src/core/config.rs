//! # Configuration
//!
//! Settings come from three layers, later ones winning:
//! built-in defaults, an optional YAML file, then environment variables
//! (after `.env` has been loaded by the binary).
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Optional YAML file via REMINDME_CONFIG or ./remindme.yaml
//! - 1.0.0: Environment-only configuration

use crate::features::capability::BackendKind;
use crate::features::permission::PermissionState;
use crate::features::polling::CursorPolicy;
use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use serde::Deserialize;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://remindmelatr.com";
pub const DEFAULT_TITLE: &str = "New Reminder from Remind Me Latr";
pub const DEFAULT_ICON_URL: &str =
    "https://remindmelatr.com/static/images/remindmelatr-notification-icon-32x32.png";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Config file picked up from the working directory when REMINDME_CONFIG is unset
pub const DEFAULT_CONFIG_FILE: &str = "remindme.yaml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the reminders service, e.g. `https://remindmelatr.com`
    pub base_url: String,
    pub api_token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub backend: BackendKind,
    /// Permission the desktop backend reports before any consent prompt
    pub permission: PermissionState,
    pub cursor_policy: CursorPolicy,
    pub title: String,
    pub icon_url: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            username: None,
            password: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            backend: BackendKind::Auto,
            permission: PermissionState::Default,
            cursor_policy: CursorPolicy::AdvanceOnSuccess,
            title: DEFAULT_TITLE.to_string(),
            icon_url: DEFAULT_ICON_URL.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Build the configuration from the optional YAML file and the environment
    pub fn from_env() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) => Self::load(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings from a YAML file. Missing keys keep their defaults.
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid config file {path}"))?;
        Ok(config)
    }

    fn config_file_path() -> Option<String> {
        match std::env::var("REMINDME_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Some(path),
            _ => Path::new(DEFAULT_CONFIG_FILE)
                .exists()
                .then(|| DEFAULT_CONFIG_FILE.to_string()),
        }
    }

    /// Apply `REMINDME_*` overrides. Empty values count as unset.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("REMINDME_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = get("REMINDME_API_TOKEN") {
            self.api_token = Some(v);
        }
        if let Some(v) = get("REMINDME_USERNAME") {
            self.username = Some(v);
        }
        if let Some(v) = get("REMINDME_PASSWORD") {
            self.password = Some(v);
        }
        if let Some(v) = get("REMINDME_POLL_INTERVAL_SECS") {
            self.poll_interval_secs = parse_var("REMINDME_POLL_INTERVAL_SECS", &v)?;
        }
        if let Some(v) = get("REMINDME_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("REMINDME_REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("REMINDME_BACKEND") {
            self.backend = parse_var("REMINDME_BACKEND", &v)?;
        }
        if let Some(v) = get("REMINDME_PERMISSION") {
            self.permission = parse_var("REMINDME_PERMISSION", &v)?;
        }
        if let Some(v) = get("REMINDME_CURSOR_POLICY") {
            self.cursor_policy = parse_var("REMINDME_CURSOR_POLICY", &v)?;
        }
        if let Some(v) = get("REMINDME_TITLE") {
            self.title = v;
        }
        if let Some(v) = get("REMINDME_ICON_URL") {
            self.icon_url = v;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.log_level = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| anyhow!("Invalid base URL '{}': {}", self.base_url, e))?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(anyhow!(
                "Base URL must be an http(s) URL: {}",
                self.base_url
            ));
        }

        if self.poll_interval_secs == 0 {
            return Err(anyhow!("Poll interval must be at least 1 second"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("Request timeout must be at least 1 second"));
        }

        if self.username.is_some() != self.password.is_some() {
            return Err(anyhow!(
                "REMINDME_USERNAME and REMINDME_PASSWORD must be set together"
            ));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Username and password for token exchange, if both are configured
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        }
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| anyhow!("Invalid value for {key} ('{value}'): {e}"))
}
