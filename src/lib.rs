//! # Herald
//!
//! Real-time notification synchronization client: keeps a local, in-memory
//! view of a user's notifications in sync with a remote REST service via a
//! fixed-interval polling loop and a per-user push channel, with
//! per-session alert deduplication.
//!
//! ## Features
//!
//! - **Dual-channel sync**: 10-second polling with an in-flight guard,
//!   plus immediate updates from a push subscription
//! - **Graceful degradation**: a failed push subscription silently falls
//!   back to polling alone
//! - **Idempotent alerts**: a notification id alerts at most once per
//!   session, regardless of which channel observed it first
//! - **Optimistic mutations**: mark-read / mark-all-read / delete update
//!   local state only after remote confirmation
//!
//! ## Modules
//!
//! - [`store`]: in-memory notification state
//! - [`center`]: REST-backed mutation operations
//! - [`sync`]: periodic refresh scheduler
//! - [`push`]: push channel bridge and transport
//! - [`alert`]: alert gate and delivery sinks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use herald::backend::{BackendConfig, NotificationApi};
//! use herald::center::NotificationCenter;
//! use herald::sync::{SyncScheduler, SyncTarget};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = Arc::new(NotificationApi::new(BackendConfig {
//!         base_url: "http://localhost:8082/api".into(),
//!         token: "bearer-token".into(),
//!         ..BackendConfig::default()
//!     }));
//!     let center = Arc::new(NotificationCenter::new(api));
//!
//!     let scheduler = Arc::new(SyncScheduler::new(center.clone(), SyncTarget::Inbox));
//!     let handle = scheduler.clone().start();
//!
//!     // ... run the session ...
//!
//!     scheduler.stop().await;
//!     handle.abort();
//! }
//! ```

pub mod alert;
pub mod backend;
pub mod center;
pub mod config;
pub mod model;
pub mod perf;
pub mod push;
pub mod routing;
pub mod store;
pub mod sync;
pub mod util;

// Re-export top-level types for convenience
pub use alert::{AlertGate, AlertSink, HapticSink, Toast, ToastSink};
pub use backend::{BackendConfig, BackendError, NotificationApi};
pub use center::NotificationCenter;
pub use config::{Config, ConfigError};
pub use model::{Notification, NotificationKind, PushPayload};
pub use perf::RateSampler;
pub use push::{PushBridge, PushError, PushTransport, WsTransport};
pub use routing::{resolve_target, Page};
pub use store::NotificationStore;
pub use sync::{SyncScheduler, SyncTarget, DEFAULT_SYNC_INTERVAL};
pub use util::{Debouncer, Throttle};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
