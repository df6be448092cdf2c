// ============================================================================
// tripreel-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types and Helpers
//
// This module defines the error taxonomy for the tripreel-core library. The
// assembly pipeline surfaces exactly four terminal error kinds
// (ResourceNotFound, CompositionError, AudioDurationMismatch, EncodeError);
// the remaining variants describe failures of the supporting machinery
// (external commands, storage, configuration, notifications) and are folded
// into the terminal kinds at stage boundaries.
//
// KEY COMPONENTS:
// - CoreError: The main error enum
// - CoreResult: Result alias used across the crate
// - command_*_error: Helpers for external command failures
//
// AI-ASSISTANT-INFO: Error taxonomy and helpers for tripreel-core

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::io;
use std::process::ExitStatus;

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors produced by tripreel-core.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Pipeline taxonomy ----
    /// A clip or audio path does not resolve to a readable, decodable file,
    /// or no clips were selected at all.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// A clip stream could not be joined into the composed video.
    #[error("Composition error: {0}")]
    CompositionError(String),

    /// The audio track cannot be fitted to the composed video's duration.
    #[error(
        "Audio duration mismatch: audio is {audio_secs:.3}s, video needs {video_secs:.3}s"
    )]
    AudioDurationMismatch { audio_secs: f64, video_secs: f64 },

    /// The final encode failed (unsupported codec, I/O failure, ffmpeg exit).
    #[error("Encode error: {0}")]
    EncodeError(String),

    // ---- Supporting machinery ----
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, io::Error),

    #[error("Command '{cmd}' failed with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("ffprobe output could not be interpreted: {0}")]
    FfprobeParse(String),

    #[error("Required dependency '{0}' not found in PATH")]
    DependencyNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Object not found in store: {0}")]
    ObjectNotFound(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for tripreel-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// ============================================================================
// HELPERS
// ============================================================================

/// Builds a `CommandStart` error for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a `CommandWait` error for a command whose exit could not be collected.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Builds a `CommandFailed` error for a command that exited unsuccessfully.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Builds a `ResourceNotFound` error naming a path.
pub fn resource_not_found(path: &std::path::Path, reason: impl AsRef<str>) -> CoreError {
    CoreError::ResourceNotFound(format!("{} ({})", path.display(), reason.as_ref()))
}

impl CoreError {
    /// Whether this error is one of the four terminal pipeline kinds.
    #[must_use]
    pub fn is_pipeline_error(&self) -> bool {
        matches!(
            self,
            CoreError::ResourceNotFound(_)
                | CoreError::CompositionError(_)
                | CoreError::AudioDurationMismatch { .. }
                | CoreError::EncodeError(_)
        )
    }

    /// Folds a supporting error into the encode stage's terminal kind.
    /// Errors that already belong to the taxonomy pass through unchanged.
    #[must_use]
    pub fn into_encode_error(self) -> CoreError {
        if self.is_pipeline_error() {
            self
        } else {
            CoreError::EncodeError(self.to_string())
        }
    }

    /// Folds a supporting error into the concatenation stage's terminal kind.
    #[must_use]
    pub fn into_composition_error(self) -> CoreError {
        if self.is_pipeline_error() {
            self
        } else {
            CoreError::CompositionError(self.to_string())
        }
    }
}
