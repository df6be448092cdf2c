// ============================================================================
// tripreel-core/src/notifications/abstraction.rs
// ============================================================================
//
// NOTIFICATION ABSTRACTION: Notification types and the sender trait
//
// Assembly runs can take a while, so the finish flow announces when a run
// starts, completes, or fails. Backends implement NotificationSender; ntfy
// is the one shipped.
//
// AI-ASSISTANT-INFO: Notification system abstractions

use crate::error::CoreResult;
use crate::utils::{format_bytes, format_duration};
use std::path::PathBuf;
use std::time::Duration;

/// Notifications sent around an assembly run.
#[derive(Debug, Clone)]
pub enum NotificationType {
    /// Assembly has started
    AssemblyStart {
        clip_count: usize,
        output_path: PathBuf,
        hostname: String,
    },

    /// Assembly finished and the video was written
    AssemblyComplete {
        output_path: PathBuf,
        /// Length of the assembled video in seconds
        video_secs: f64,
        output_size: u64,
        /// Wall time the run took
        elapsed: Duration,
        hostname: String,
    },

    /// Assembly failed
    AssemblyError {
        output_path: PathBuf,
        message: String,
        hostname: String,
    },
}

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

impl NotificationType {
    pub fn title(&self) -> &'static str {
        match self {
            NotificationType::AssemblyStart { .. } => "Trip Video Started",
            NotificationType::AssemblyComplete { .. } => "Trip Video Ready",
            NotificationType::AssemblyError { .. } => "Trip Video Failed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            NotificationType::AssemblyStart {
                clip_count,
                output_path,
                hostname,
            } => format!(
                "Assembling {clip_count} clip(s) into {} on {hostname}",
                file_label(output_path)
            ),
            NotificationType::AssemblyComplete {
                output_path,
                video_secs,
                output_size,
                elapsed,
                hostname,
            } => format!(
                "{} ({}, {}) is ready on {hostname}; took {}",
                file_label(output_path),
                format_duration(*video_secs),
                format_bytes(*output_size),
                format_duration(elapsed.as_secs_f64())
            ),
            NotificationType::AssemblyError {
                output_path,
                message,
                hostname,
            } => format!(
                "Assembling {} failed on {hostname}: {message}",
                file_label(output_path)
            ),
        }
    }

    /// Priority level (1-5, with 5 being highest)
    pub fn priority(&self) -> u8 {
        match self {
            NotificationType::AssemblyStart { .. } => 3,
            NotificationType::AssemblyComplete { .. } => 4,
            NotificationType::AssemblyError { .. } => 5,
        }
    }

    /// Short tag naming the notification kind.
    pub fn tag(&self) -> &'static str {
        match self {
            NotificationType::AssemblyStart { .. } => "start",
            NotificationType::AssemblyComplete { .. } => "complete",
            NotificationType::AssemblyError { .. } => "error",
        }
    }
}

/// Something that can deliver notifications.
pub trait NotificationSender {
    fn send(&self, notification: &NotificationType) -> CoreResult<()>;
}

/// Sends `notification` if a sender is configured, logging failures.
///
/// Notification problems never fail an assembly run.
pub fn notify(sender: Option<&dyn NotificationSender>, notification: &NotificationType) {
    let Some(sender) = sender else {
        return;
    };
    if let Err(e) = sender.send(notification) {
        log::warn!("Failed to send '{}' notification: {e}", notification.title());
    }
}
