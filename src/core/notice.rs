//! Reminder notices as returned by the `new_reminders` endpoint

use serde::{Deserialize, Serialize};

/// A reminder that became due since the last poll
///
/// Only `short_content` and `url` are required. The server sends the full
/// reminder record; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReminderNotice {
    /// Server-side reminder id, used for logging
    #[serde(default)]
    pub id: Option<u64>,

    /// Truncated reminder text shown as the notification body
    pub short_content: String,

    /// Page to open when the notification is clicked
    pub url: String,

    /// Full reminder text
    #[serde(default)]
    pub content: Option<String>,
}

impl ReminderNotice {
    pub fn new(short_content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: None,
            short_content: short_content.into(),
            url: url.into(),
            content: None,
        }
    }

    /// Short label for log lines
    pub fn label(&self) -> String {
        match self.id {
            Some(id) => format!("#{id}"),
            None => self.url.clone(),
        }
    }
}
