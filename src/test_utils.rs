//! Shared test doubles for the notifier.
//!
//! Fake clock, scripted reminder source, recording notification backend and
//! a one-shot HTTP responder.

#![cfg(test)]

use crate::core::{Clock, PollCursor, ReminderNotice};
use crate::features::capability::{NativeNotification, NotificationCapability, UrlOpener};
use crate::features::permission::{PermissionState, PollLauncher};
use crate::features::polling::{FetchError, ReminderSource};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Local timestamp at minute precision
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid test timestamp")
}

/// Wall clock that only moves when told to
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.now.lock().unwrap();
        *now += ChronoDuration::minutes(minutes);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

/// Notification backend that records what it was asked to do
pub struct MockCapability {
    permission: PermissionState,
    answer: Mutex<PermissionState>,
    hold_prompt: bool,
    release: Notify,
    fail_body: Option<String>,
    stall_body: Option<String>,
    prompts: Mutex<usize>,
    displayed: Mutex<Vec<NativeNotification>>,
}

impl MockCapability {
    pub fn new(permission: PermissionState) -> Self {
        Self {
            permission,
            answer: Mutex::new(PermissionState::Default),
            hold_prompt: false,
            release: Notify::new(),
            fail_body: None,
            stall_body: None,
            prompts: Mutex::new(0),
            displayed: Mutex::new(Vec::new()),
        }
    }

    /// What the user answers when prompted
    pub fn answering(self, answer: PermissionState) -> Self {
        *self.answer.lock().unwrap() = answer;
        self
    }

    /// Keep prompts pending until `release()` is called
    pub fn held(mut self) -> Self {
        self.hold_prompt = true;
        self
    }

    /// Fail to display notifications with this body
    pub fn failing_on(mut self, body: &str) -> Self {
        self.fail_body = Some(body.to_string());
        self
    }

    /// Never finish displaying notifications with this body
    pub fn stalling_on(mut self, body: &str) -> Self {
        self.stall_body = Some(body.to_string());
        self
    }

    pub fn set_answer(&self, answer: PermissionState) {
        *self.answer.lock().unwrap() = answer;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    pub fn prompts(&self) -> usize {
        *self.prompts.lock().unwrap()
    }

    pub fn displayed(&self) -> Vec<NativeNotification> {
        self.displayed.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationCapability for MockCapability {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn permission(&self) -> PermissionState {
        self.permission
    }

    async fn request_permission(&self) -> PermissionState {
        *self.prompts.lock().unwrap() += 1;
        if self.hold_prompt {
            self.release.notified().await;
        }
        *self.answer.lock().unwrap()
    }

    async fn display(&self, notification: NativeNotification) -> Result<()> {
        if self.stall_body.as_deref() == Some(notification.body.as_str()) {
            std::future::pending::<()>().await;
        }
        if self.fail_body.as_deref() == Some(notification.body.as_str()) {
            return Err(anyhow!("display failed"));
        }
        self.displayed.lock().unwrap().push(notification);
        Ok(())
    }
}

/// URL opener that remembers what it opened
#[derive(Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl UrlOpener for RecordingOpener {
    async fn open(&self, url: &str) -> Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Launcher that counts poll loop starts
#[derive(Default)]
pub struct CountingLauncher {
    cursors: Mutex<Vec<PollCursor>>,
}

impl CountingLauncher {
    pub fn launches(&self) -> usize {
        self.cursors.lock().unwrap().len()
    }

    pub fn cursors(&self) -> Vec<PollCursor> {
        self.cursors.lock().unwrap().clone()
    }
}

impl PollLauncher for CountingLauncher {
    fn launch(&self, cursor: PollCursor) {
        self.cursors.lock().unwrap().push(cursor);
    }
}

/// One scripted response of a ScriptedSource
pub struct Scripted {
    result: Result<Vec<ReminderNotice>, FetchError>,
    latency: Duration,
}

impl Scripted {
    pub fn ok(notices: Vec<ReminderNotice>) -> Self {
        Self {
            result: Ok(notices),
            latency: Duration::ZERO,
        }
    }

    pub fn err(error: FetchError) -> Self {
        Self {
            result: Err(error),
            latency: Duration::ZERO,
        }
    }

    /// Delay the response by `latency` (tokio time)
    pub fn taking(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// Reminder source that plays back scripted responses, then empty lists
pub struct ScriptedSource {
    script: Mutex<VecDeque<Scripted>>,
    cursors: Mutex<Vec<String>>,
    starts: Mutex<Vec<Instant>>,
    ends: Mutex<Vec<Instant>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            cursors: Mutex::new(Vec::new()),
            starts: Mutex::new(Vec::new()),
            ends: Mutex::new(Vec::new()),
        }
    }

    /// Cursor strings requested so far
    pub fn cursors(&self) -> Vec<String> {
        self.cursors.lock().unwrap().clone()
    }

    pub fn request_starts(&self) -> Vec<Instant> {
        self.starts.lock().unwrap().clone()
    }

    /// Completion times of requests that were not cancelled
    pub fn request_ends(&self) -> Vec<Instant> {
        self.ends.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReminderSource for ScriptedSource {
    async fn fetch_since(&self, cursor: &PollCursor) -> Result<Vec<ReminderNotice>, FetchError> {
        self.cursors.lock().unwrap().push(cursor.formatted());
        self.starts.lock().unwrap().push(Instant::now());

        let next = self.script.lock().unwrap().pop_front();
        let Scripted { result, latency } = next.unwrap_or_else(|| Scripted::ok(Vec::new()));
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        self.ends.lock().unwrap().push(Instant::now());
        result
    }
}

/// Answer one HTTP request with `status` and a JSON `body`
///
/// Returns the base URL to use and a handle resolving to the raw request.
pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
    let (base_url, requests) = serve_sequence(vec![(status, body)]).await;
    let handle = tokio::spawn(async move {
        requests.await.unwrap().into_iter().next().unwrap_or_default()
    });
    (base_url, handle)
}

/// Answer one HTTP request per `(status, body)` pair, in order
///
/// Every response closes its connection, so each request arrives on a fresh
/// one. The handle resolves to the raw requests (head and body) once all
/// responses were sent.
pub async fn serve_sequence(responses: Vec<(u16, &str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let responses: Vec<(u16, String)> = responses
        .into_iter()
        .map(|(status, body)| (status, body.to_string()))
        .collect();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut socket).await);

            let reason = match status {
                200 => "OK",
                400 => "Bad Request",
                401 => "Unauthorized",
                500 => "Internal Server Error",
                _ => "Status",
            };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
        requests
    });

    (format!("http://{addr}"), handle)
}

/// Read a request head plus a `Content-Length` body
async fn read_request(socket: &mut TcpStream) -> String {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 1024];
    let mut expected: Option<usize> = None;
    loop {
        if let Some(total) = expected {
            if raw.len() >= total {
                break;
            }
        }
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..n]);

        if expected.is_none() {
            if let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&raw[..end]).to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                expected = Some(end + 4 + length);
            }
        }
    }
    String::from_utf8_lossy(&raw).into_owned()
}
