//! Notification Data Model
//!
//! Defines the remote-sourced `Notification` record, its type tag, and the
//! push event payload normalization at the transport boundary.

use serde::{Deserialize, Serialize};

/// A notification record as served by the backend.
///
/// Notifications are created server-side only; the client observes them via
/// fetch or push and never originates one. `id` is the primary key for
/// deduplication and state updates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Unique, stable identifier
    pub id: u64,
    /// Type tag driving icon choice and default navigation target
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    /// Display title
    pub title: String,
    /// Display body
    pub message: String,
    /// Optional path that overrides kind-based navigation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Opaque payload, passed through uninterpreted
    #[serde(default)]
    pub data: serde_json::Value,
    /// Read flag; authoritative only after remote confirmation
    #[serde(default)]
    pub read: bool,
    /// Creation timestamp string, display-only
    #[serde(default)]
    pub created_at: String,
}

impl Notification {
    /// Format `created_at` for display ("Nov 03, 14:05").
    ///
    /// Falls back to the raw string when it is not a valid RFC 3339 timestamp.
    pub fn created_at_display(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.format("%b %d, %H:%M").to_string())
            .unwrap_or_else(|_| self.created_at.clone())
    }
}

/// Notification type tag.
///
/// Unknown tags from the server deserialize to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Event,
    TaskAssigned,
    Message,
    ProjectMessage,
    #[default]
    #[serde(other)]
    Other,
}

/// Push event payload as delivered on the wire.
///
/// The event envelope either wraps the notification under a `notification`
/// key or is the notification object itself. Both shapes are accepted here,
/// in one place, so call sites only ever see a [`Notification`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PushPayload {
    Wrapped { notification: Notification },
    Bare(Notification),
}

impl PushPayload {
    /// Normalize either wire shape into the notification it carries.
    pub fn into_notification(self) -> Notification {
        match self {
            PushPayload::Wrapped { notification } => notification,
            PushPayload::Bare(notification) => notification,
        }
    }
}
