//! User notifications raised by stores

use std::cell::RefCell;
use std::rc::Rc;

pub const INJECTION_FAILED_MESSAGE: &str =
    "There was a problem injecting into the target page. Please reload the page and try again.";

/// Surfaces a message to the user
pub trait NotificationCreator {
    fn create_notification(&self, message: &str);
}

/// Writes notifications to the log
#[derive(Debug, Default)]
pub struct LogNotificationCreator;

impl NotificationCreator for LogNotificationCreator {
    fn create_notification(&self, message: &str) {
        log::warn!("Notification: {}", message);
    }
}

/// Keeps every notification, for tests and for callers that poll
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationCreator {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingNotificationCreator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl NotificationCreator for RecordingNotificationCreator {
    fn create_notification(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
