// ============================================================================
// tripreel-core/src/notifications/ntfy.rs
// ============================================================================
//
// NTFY IMPLEMENTATION: Notifications delivered through ntfy.sh
//
// AI-ASSISTANT-INFO: ntfy.sh implementation for sending notifications

use super::{NotificationSender, NotificationType};
use crate::error::{CoreError, CoreResult};
use ntfy::DispatcherBuilder;
use ntfy::payload::{Payload, Priority as NtfyPriority};

/// Sends notifications to an ntfy topic.
///
/// # Examples
///
/// ```rust,no_run
/// use tripreel_core::notifications::{NotificationSender, NotificationType, NtfyNotificationSender};
/// use std::path::PathBuf;
///
/// let sender = NtfyNotificationSender::new("https://ntfy.sh/my_trip").unwrap();
/// sender.send(&NotificationType::AssemblyStart {
///     clip_count: 3,
///     output_path: PathBuf::from("merged_video.mp4"),
///     hostname: "laptop".to_string(),
/// }).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct NtfyNotificationSender {
    base_url: String,
    topic: String,
}

impl NtfyNotificationSender {
    /// Creates a sender for a full topic URL such as `https://ntfy.sh/my_trip`.
    pub fn new(topic_url: &str) -> CoreResult<Self> {
        let (base_url, topic) = split_topic_url(topic_url)?;
        Ok(Self { base_url, topic })
    }

    pub fn topic_url(&self) -> String {
        format!("{}/{}", self.base_url, self.topic)
    }
}

impl NotificationSender for NtfyNotificationSender {
    fn send(&self, notification: &NotificationType) -> CoreResult<()> {
        let dispatcher = DispatcherBuilder::new(&self.base_url)
            .build_blocking()
            .map_err(|e| {
                CoreError::NotificationError(format!(
                    "Failed to build ntfy dispatcher for {}: {e}",
                    self.base_url
                ))
            })?;

        let priority = map_priority(notification.priority()).unwrap_or_else(|| {
            log::warn!("Invalid ntfy priority value: {}", notification.priority());
            NtfyPriority::Default
        });

        let payload = Payload::new(&self.topic)
            .message(notification.message())
            .title(notification.title())
            .priority(priority)
            .tags(vec!["tripreel".to_string(), notification.tag().to_string()]);

        dispatcher.send(&payload).map_err(|e| {
            CoreError::NotificationError(format!(
                "Failed to send ntfy notification to {}: {e}",
                self.topic_url()
            ))
        })?;
        log::debug!("Sent '{}' notification", notification.title());
        Ok(())
    }
}

/// Splits `https://host[/path]/topic` into base URL and topic.
fn split_topic_url(topic_url: &str) -> CoreResult<(String, String)> {
    let invalid = |reason: &str| {
        CoreError::NotificationError(format!("Invalid ntfy topic URL '{topic_url}': {reason}"))
    };

    let rest = topic_url
        .strip_prefix("https://")
        .or_else(|| topic_url.strip_prefix("http://"))
        .ok_or_else(|| invalid("must start with https:// or http://"))?;
    let scheme = &topic_url[..topic_url.len() - rest.len()];

    let (base, topic) = rest
        .trim_end_matches('/')
        .rsplit_once('/')
        .ok_or_else(|| invalid("missing topic path"))?;
    let host = base.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(invalid("host must not be empty"));
    }
    if topic.is_empty() {
        return Err(invalid("missing topic path"));
    }
    Ok((format!("{scheme}{base}"), topic.to_string()))
}

/// Maps a numeric priority value (1-5) to the ntfy priority.
fn map_priority(p: u8) -> Option<NtfyPriority> {
    match p {
        1 => Some(NtfyPriority::Min),
        2 => Some(NtfyPriority::Low),
        3 => Some(NtfyPriority::Default),
        4 => Some(NtfyPriority::High),
        5 => Some(NtfyPriority::Max),
        _ => None,
    }
}
