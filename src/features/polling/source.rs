//! Reminder source: the client side of `GET /api/new_reminders/{since}/`

use crate::core::{Config, PollCursor, ReminderNotice};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Why a poll request produced no reminders
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server returned HTTP {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Anything that can list the reminders that became due since a cursor
#[async_trait]
pub trait ReminderSource: Send + Sync {
    async fn fetch_since(&self, cursor: &PollCursor) -> Result<Vec<ReminderNotice>, FetchError>;
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// HTTP client for the reminders service
///
/// Authenticates with `Authorization: Token <key>`. The key is either
/// configured directly or exchanged once for a username and password.
pub struct HttpReminderSource {
    client: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
    credentials: Option<(String, String)>,
}

impl HttpReminderSource {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base URL {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Base URL cannot carry a path: {base_url}"));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(config.request_timeout())
            .user_agent(concat!("remindme-notifier/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: RwLock::new(config.api_token.clone()),
            credentials: config.credentials(),
        })
    }

    /// Full URL for a poll from `cursor`
    pub fn endpoint_for(&self, cursor: &PollCursor) -> Url {
        self.api_url(&["new_reminders", &cursor.formatted(), ""])
    }

    fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in new(): the base URL can carry a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    /// Current API token, exchanging credentials for one if needed
    async fn token(&self) -> Result<Option<String>, FetchError> {
        if let Some(token) = self.token.read().await.clone() {
            return Ok(Some(token));
        }
        let Some((username, password)) = &self.credentials else {
            return Ok(None);
        };

        let url = self.api_url(&["token-auth", ""]);
        debug!("Requesting API token from {url}");
        let response = self
            .client
            .post(url)
            .form(&[("username", username.as_str()), ("password", password.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: TokenResponse = response.json().await?;
        *self.token.write().await = Some(body.token.clone());
        info!("Obtained API token for {username}");
        Ok(Some(body.token))
    }
}

#[async_trait]
impl ReminderSource for HttpReminderSource {
    async fn fetch_since(&self, cursor: &PollCursor) -> Result<Vec<ReminderNotice>, FetchError> {
        let url = self.endpoint_for(cursor);
        debug!("GET {url}");

        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = self.token().await? {
            request = request.header(AUTHORIZATION, format!("Token {token}"));
        }

        let response = request.send().await?;
        let status = response.status();

        // A token obtained from credentials may have been revoked; fetch a fresh one next time
        if status == StatusCode::UNAUTHORIZED && self.credentials.is_some() {
            *self.token.write().await = None;
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Vec<ReminderNotice>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}
