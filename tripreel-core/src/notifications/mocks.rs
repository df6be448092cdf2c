// tripreel-core/src/notifications/mocks.rs

// Only compiled with the "test-mocks" feature.

use super::{NotificationSender, NotificationType};
use crate::error::{CoreError, CoreResult};
use std::cell::RefCell;
use std::rc::Rc;

/// Records every notification it is asked to send.
#[derive(Clone, Default)]
pub struct MockNotifier {
    sent: Rc<RefCell<Vec<NotificationType>>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that records each notification and then reports failure.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<NotificationType> {
        self.sent.borrow().clone()
    }

    /// Tags of the sent notifications, in order.
    pub fn sent_tags(&self) -> Vec<&'static str> {
        self.sent.borrow().iter().map(NotificationType::tag).collect()
    }
}

impl NotificationSender for MockNotifier {
    fn send(&self, notification: &NotificationType) -> CoreResult<()> {
        self.sent.borrow_mut().push(notification.clone());
        if self.fail {
            return Err(CoreError::NotificationError(
                "MockNotifier configured to fail".to_string(),
            ));
        }
        Ok(())
    }
}
