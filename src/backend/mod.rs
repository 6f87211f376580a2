//! REST Notification Backend
//!
//! The remote source of truth for notification state.

mod client;

pub use client::{BackendConfig, BackendError, NotificationApi};
