//! User-facing notifications (toasts)
//!
//! The dispatcher only produces [`Notification`] values; how they are shown
//! is up to whoever implements [`Notifier`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Maximum queued notifications before the oldest are dropped
const MAX_QUEUED: usize = 64;

/// Toast color / severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationColor {
    Neutral,
    Primary,
    Secondary,
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub color: NotificationColor,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        color: NotificationColor,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationColor::Error)
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationColor::Warning)
    }
}

/// Sink for notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that keeps toasts in a bounded queue until a front end drains
/// them
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    queue: Arc<Mutex<VecDeque<Notification>>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.push_back(notification);
        while queue.len() > MAX_QUEUED {
            queue.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let queue = NotificationQueue::new();
        queue.notify(Notification::error("a", "1"));
        queue.notify(Notification::warning("b", "2"));
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained[0].title, "a");
        assert_eq!(drained[1].color, NotificationColor::Warning);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let queue = NotificationQueue::new();
        for i in 0..(MAX_QUEUED + 5) {
            queue.notify(Notification::error("t", i.to_string()));
        }
        let drained = queue.drain();
        assert_eq!(drained.len(), MAX_QUEUED);
        assert_eq!(drained[0].description, "5");
    }
}
