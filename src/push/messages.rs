//! Push Wire Messages
//!
//! Frame types exchanged with the push transport, and the per-user channel
//! naming conventions.

use serde::{Deserialize, Serialize};

/// Event name carrying a new notification.
pub const NOTIFICATION_RECEIVED: &str = "notification.received";

/// Channel subscribed on session start for a given user.
pub fn user_channel(user_id: &str) -> String {
    format!("user.{}", user_id)
}

/// Channel name used when unsubscribing on teardown.
pub fn private_user_channel(user_id: &str) -> String {
    format!("private-user.{}", user_id)
}

/// Frames sent from client to transport
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Subscribe to channels for real-time events
    Subscribe {
        channels: Vec<String>,
        /// Per-session client identifier
        client_id: String,
    },
    /// Unsubscribe from channels
    Unsubscribe { channels: Vec<String> },
    /// Keepalive
    Ping,
}

/// Frames sent from transport to client
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// A named event on a subscribed channel
    Event {
        channel: String,
        event: String,
        data: serde_json::Value,
    },
    /// Subscription confirmed
    Subscribed { channels: Vec<String> },
    /// Unsubscription confirmed
    Unsubscribed { channels: Vec<String> },
    /// Keepalive response
    Pong,
    /// Transport-reported error
    Error { message: String },
}
