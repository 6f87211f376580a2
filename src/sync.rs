//! Sync Scheduler
//!
//! Drives periodic refresh of the notification store: an immediate fetch on
//! start, then one every fixed interval while no fetch of the same kind is
//! in flight. A failed background poll is silent; the next tick is the
//! retry mechanism.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::center::NotificationCenter;

/// Default polling period.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(10);

/// Which view the scheduler refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTarget {
    /// Bell badge: the standalone unread counter
    Badge,
    /// Inbox: the full notification list
    Inbox,
}

/// Periodic refresh driver for one consuming view.
///
/// The badge and inbox views each run their own scheduler; their fetches
/// are independent and may overlap each other, but never themselves.
pub struct SyncScheduler {
    center: Arc<NotificationCenter>,
    target: SyncTarget,
    interval: Duration,
    in_flight: Arc<AtomicBool>,
    running: Arc<RwLock<bool>>,
}

impl SyncScheduler {
    /// Create a scheduler with the default 10-second period.
    pub fn new(center: Arc<NotificationCenter>, target: SyncTarget) -> Self {
        Self::with_interval(center, target, DEFAULT_SYNC_INTERVAL)
    }

    /// Create a scheduler with a custom period.
    pub fn with_interval(
        center: Arc<NotificationCenter>,
        target: SyncTarget,
        interval: Duration,
    ) -> Self {
        Self {
            center,
            target,
            interval,
            in_flight: Arc::new(AtomicBool::new(false)),
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Start the background polling task.
    ///
    /// The first tick fires immediately. Each tick runs as its own task so
    /// a slow fetch never delays the timer; the in-flight guard turns any
    /// overlapping tick into a no-op instead.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let scheduler = self.clone();

        tracing::info!(
            view = ?self.target,
            interval_secs = self.interval.as_secs(),
            "Starting notification sync"
        );

        tokio::spawn(async move {
            *scheduler.running.write().await = true;

            let mut ticker = tokio::time::interval(scheduler.interval);

            loop {
                ticker.tick().await;

                if !*scheduler.running.read().await {
                    break;
                }

                let scheduler = scheduler.clone();
                tokio::spawn(async move {
                    scheduler.poll_once().await;
                });
            }
        })
    }

    /// Stop the scheduler. The next tick exits the loop; callers that need
    /// immediate teardown abort the returned handle as well.
    pub async fn stop(&self) {
        *self.running.write().await = false;
        tracing::info!(view = ?self.target, "Stopped notification sync");
    }

    /// Run one poll, or nothing if one is already in flight.
    ///
    /// No sequence guard beyond this: fetches fully replace state, so the
    /// most recently completed fetch wins and any stale overwrite heals on
    /// the next tick.
    pub async fn poll_once(&self) {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::trace!(view = ?self.target, "Previous fetch still in flight, skipping tick");
            return;
        }

        match self.target {
            SyncTarget::Badge => self.center.fetch_unread_count().await,
            SyncTarget::Inbox => self.center.fetch_list().await,
        }

        self.in_flight.store(false, Ordering::SeqCst);
    }
}
