//! Transient user-facing notifications.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::lock;

/// Most recent notifications kept in the feed.
pub const FEED_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>, variant: Variant) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
            timestamp: Utc::now(),
        }
    }

    /// Age relative to `now`, e.g. `3m ago`.
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        let secs = (now - self.timestamp).num_seconds().max(0);
        match secs {
            0..=4 => "just now".to_string(),
            5..=59 => format!("{secs}s ago"),
            60..=3599 => format!("{}m ago", secs / 60),
            3600..=86_399 => format!("{}h ago", secs / 3600),
            _ => format!("{}d ago", secs / 86_400),
        }
    }
}

/// Shared, bounded notification sink. Cloning yields another handle to the
/// same feed.
#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    entries: Arc<Mutex<VecDeque<Notification>>>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notification: Notification) {
        match notification.variant {
            Variant::Default => info!(title = %notification.title, "{}", notification.description),
            Variant::Destructive => warn!(title = %notification.title, "{}", notification.description),
        }
        let mut entries = lock(&self.entries);
        if entries.len() == FEED_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(notification);
    }

    pub fn success(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Notification::new(title, description, Variant::Default));
    }

    pub fn failure(&self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Notification::new(title, description, Variant::Destructive));
    }

    pub fn latest(&self) -> Option<Notification> {
        lock(&self.entries).back().cloned()
    }

    /// Oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        lock(&self.entries).iter().cloned().collect()
    }

    /// Remove and return everything, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        lock(&self.entries).drain(..).collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
