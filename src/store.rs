//! Notification Store
//!
//! Holds the authoritative in-memory list of notification records and the
//! locally cached unread counter for the current session. All transitions
//! are synchronous and side-effect free; the REST-backed operations in
//! [`crate::center`] decide when to apply them.
//!
//! The unread counter and the list are independent views of server state:
//! the bell badge fetches a standalone scalar while the inbox fetches the
//! full list. They converge on the next fetch rather than being derived
//! from one another.

use crate::model::Notification;

/// In-memory notification state for the current session.
#[derive(Debug, Default)]
pub struct NotificationStore {
    items: Vec<Notification>,
    unread: u64,
}

impl NotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full list with a fetch result.
    ///
    /// Full replace, not merge: optimistic local edits made between fetches
    /// are discarded and re-derived from server state. The list is
    /// deduplicated by id (first occurrence wins) so the store never holds
    /// two entries for the same notification.
    pub fn replace_list(&mut self, list: Vec<Notification>) {
        let mut deduped: Vec<Notification> = Vec::with_capacity(list.len());
        for notification in list {
            if !deduped.iter().any(|n| n.id == notification.id) {
                deduped.push(notification);
            }
        }
        self.items = deduped;
    }

    /// Replace the unread counter with a server-reported count.
    pub fn set_unread(&mut self, count: u64) {
        self.unread = count;
    }

    /// Increment the unread counter by one (push event on the badge view).
    pub fn increment_unread(&mut self) {
        self.unread = self.unread.saturating_add(1);
    }

    /// Mark one entry read. Returns false (and changes nothing) if the id
    /// is absent.
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    /// Mark every entry read.
    pub fn mark_all_read(&mut self) {
        for n in &mut self.items {
            n.read = true;
        }
    }

    /// Remove one entry. Returns false if the id is absent.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// The current notification list.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// The locally cached unread counter (badge view).
    pub fn unread(&self) -> u64 {
        self.unread
    }

    /// Unread count derived from the held list (inbox view).
    pub fn unread_in_list(&self) -> u64 {
        self.items.iter().filter(|n| !n.read).count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationKind;

    fn notification(id: u64, read: bool) -> Notification {
        Notification {
            id,
            kind: NotificationKind::Other,
            title: format!("n{}", id),
            message: String::new(),
            link: None,
            data: serde_json::Value::Null,
            read,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_replace_is_full_not_merge() {
        let mut store = NotificationStore::new();
        store.replace_list(vec![notification(1, false), notification(2, false)]);
        store.replace_list(vec![notification(3, false)]);

        let ids: Vec<u64> = store.items().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_replace_deduplicates_by_id() {
        let mut store = NotificationStore::new();
        store.replace_list(vec![
            notification(1, false),
            notification(1, true),
            notification(2, false),
        ]);

        assert_eq!(store.items().len(), 2);
        // First occurrence wins
        assert!(!store.items()[0].read);
    }

    #[test]
    fn test_later_fetch_overwrites_local_mark_read() {
        let mut store = NotificationStore::new();
        store.replace_list(vec![notification(1, false)]);
        assert!(store.mark_read(1));

        // Server still says unread; the completed fetch wins.
        store.replace_list(vec![notification(1, false)]);
        assert!(!store.items()[0].read);
    }

    #[test]
    fn test_mark_read_absent_id_is_noop() {
        let mut store = NotificationStore::new();
        store.replace_list(vec![notification(1, false)]);
        assert!(!store.mark_read(99));
        assert_eq!(store.unread_in_list(), 1);
    }

    #[test]
    fn test_mark_all_read() {
        let mut store = NotificationStore::new();
        store.replace_list(vec![notification(1, false), notification(2, false)]);
        store.mark_all_read();
        assert_eq!(store.unread_in_list(), 0);
    }

    #[test]
    fn test_remove() {
        let mut store = NotificationStore::new();
        store.replace_list(vec![notification(1, false), notification(2, false)]);
        assert!(store.remove(1));
        assert!(!store.remove(1));
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_unread_counter_independent_of_list() {
        let mut store = NotificationStore::new();
        store.set_unread(5);
        store.increment_unread();
        assert_eq!(store.unread(), 6);
        assert_eq!(store.unread_in_list(), 0);
    }
}
