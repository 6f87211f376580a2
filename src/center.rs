//! Notification Center
//!
//! REST-backed mutation operations over the in-memory store. Each operation
//! calls the backend and updates local state only on success; a failed call
//! leaves prior state intact and is logged internally, never surfaced to
//! the caller.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::NotificationApi;
use crate::model::Notification;
use crate::store::NotificationStore;

/// Coordinates the REST backend and the local notification store.
pub struct NotificationCenter {
    api: Arc<NotificationApi>,
    store: Arc<RwLock<NotificationStore>>,
}

impl NotificationCenter {
    /// Create a center over a backend client and a fresh store.
    pub fn new(api: Arc<NotificationApi>) -> Self {
        Self {
            api,
            store: Arc::new(RwLock::new(NotificationStore::new())),
        }
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<RwLock<NotificationStore>> {
        Arc::clone(&self.store)
    }

    /// Replace the unread counter with the server-reported count.
    pub async fn fetch_unread_count(&self) {
        match self.api.unread_count().await {
            Ok(count) => {
                self.store.write().await.set_unread(count);
                tracing::debug!(count, "Unread count refreshed");
            }
            Err(e) => {
                tracing::debug!(error = %e, "Unread count fetch failed, keeping prior state");
            }
        }
    }

    /// Replace the full list with the server-reported list.
    ///
    /// Full replace: any optimistic edit made since the last fetch is
    /// re-derived from server state.
    pub async fn fetch_list(&self) {
        match self.api.list().await {
            Ok(list) => {
                let count = list.len();
                self.store.write().await.replace_list(list);
                tracing::debug!(count, "Notification list refreshed");
            }
            Err(e) => {
                tracing::debug!(error = %e, "List fetch failed, keeping prior state");
            }
        }
    }

    /// Mark one notification read, locally only after remote confirmation.
    pub async fn mark_read(&self, id: u64) {
        match self.api.mark_read(id).await {
            Ok(()) => {
                self.store.write().await.mark_read(id);
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Mark-read request failed");
            }
        }
    }

    /// Mark every notification read, locally only after remote confirmation.
    pub async fn mark_all_read(&self) {
        match self.api.mark_all_read().await {
            Ok(()) => {
                let mut store = self.store.write().await;
                store.mark_all_read();
                store.set_unread(0);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Mark-all-read request failed");
            }
        }
    }

    /// Delete one notification.
    ///
    /// The backend treats not-found as already-deleted, so the entry is
    /// removed locally in that case too.
    pub async fn delete(&self, id: u64) {
        match self.api.delete(id).await {
            Ok(()) => {
                self.store.write().await.remove(id);
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Delete request failed");
            }
        }
    }

    /// Increment the locally cached unread counter (push event, badge view).
    pub async fn bump_unread(&self) {
        self.store.write().await.increment_unread();
    }

    /// Snapshot of the current list.
    pub async fn items(&self) -> Vec<Notification> {
        self.store.read().await.items().to_vec()
    }

    /// Current unread counter.
    pub async fn unread(&self) -> u64 {
        self.store.read().await.unread()
    }
}
