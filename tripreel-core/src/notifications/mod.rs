//! Notification system for assembly status updates.
//!
//! Push notifications about assembly runs, delivered through ntfy.sh.
mod abstraction;
mod ntfy;

/// Recording notifier for tests
#[cfg(feature = "test-mocks")]
pub mod mocks;

pub use abstraction::{NotificationSender, NotificationType, notify};
pub use ntfy::NtfyNotificationSender;
