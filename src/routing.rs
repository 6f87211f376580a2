//! Navigation Resolution
//!
//! Resolves a clicked notification to a target page identifier. Pure and
//! deterministic: the `link` field is checked for known path substrings in a
//! fixed precedence order, then the type tag decides the fallback.

use crate::model::{Notification, NotificationKind};

/// Target page identifiers understood by the navigation host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Events,
    General,
    Project,
    Home,
}

impl Page {
    /// The page-id string handed to the navigation host.
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Events => "events",
            Page::General => "general",
            Page::Project => "project",
            Page::Home => "home",
        }
    }
}

/// Resolve the page a notification should navigate to.
///
/// Link substrings take precedence over the type mapping: `events`,
/// `general`, `project`, `home`, in that order.
pub fn resolve_target(notification: &Notification) -> Page {
    if let Some(link) = &notification.link {
        if link.contains("events") {
            return Page::Events;
        }
        if link.contains("general") {
            return Page::General;
        }
        if link.contains("project") {
            return Page::Project;
        }
        if link.contains("home") {
            return Page::Home;
        }
    }

    match notification.kind {
        NotificationKind::Event => Page::Events,
        NotificationKind::TaskAssigned => Page::Home,
        NotificationKind::Message => Page::General,
        NotificationKind::ProjectMessage => Page::Project,
        NotificationKind::Other => Page::Home,
    }
}
