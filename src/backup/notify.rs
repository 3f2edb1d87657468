//! Notification sink for task start/completion messages.
//!
//! The sink is an external collaborator (the hosting app's toast window);
//! the core fires and forgets, and must work with a no-op sink.

use tracing::info;

pub trait Notification {
    fn notify_start(&self, title: &str, message: &str);
    fn notify_complete(&self, message: &str);
}

/// Emits notifications to the log. Used by the CLI, where there is no UI.
pub struct LogNotification;

impl Notification for LogNotification {
    fn notify_start(&self, title: &str, message: &str) {
        info!("[{title}] {message}");
    }

    fn notify_complete(&self, message: &str) {
        info!("{message}");
    }
}

/// Discards all notifications.
pub struct NullNotification;

impl Notification for NullNotification {
    fn notify_start(&self, _title: &str, _message: &str) {}

    fn notify_complete(&self, _message: &str) {}
}

#[cfg(test)]
pub(crate) struct RecordingNotification {
    pub messages: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl RecordingNotification {
    pub fn new() -> Self {
        Self {
            messages: std::cell::RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl Notification for RecordingNotification {
    fn notify_start(&self, title: &str, message: &str) {
        self.messages
            .borrow_mut()
            .push(format!("start: [{title}] {message}"));
    }

    fn notify_complete(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push(format!("complete: {message}"));
    }
}
