//! Push Channel
//!
//! Real-time delivery of server-originated notification events over a
//! per-user channel, with a silent fallback to polling when the transport
//! is unavailable.

pub mod bridge;
pub mod messages;
pub mod transport;

pub use bridge::PushBridge;
pub use messages::{private_user_channel, user_channel, NOTIFICATION_RECEIVED};
pub use transport::{PushError, PushTransport, WsTransport};
