// ============================================================================
// tripreel-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reports failures with the core error type so the four assembly
// error kinds reach the terminal unchanged. Context is added where a
// command wraps a lower-level failure.
//
// AI-ASSISTANT-INFO: CLI error handling utilities

// ---- Internal crate imports ----
use tripreel_core::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::fmt;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Extension trait for adding context to errors in the CLI.
///
/// Wraps the underlying error as `CoreError::OperationFailed`, so only use
/// it where the original error kind does not matter to the caller.
pub trait CliErrorContext<T> {
    /// Add context to an error.
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;

    /// Add context using a closure (for lazy evaluation).
    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{context}: {core_error}"))
        })
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {core_error}", f()))
        })
    }
}

impl<T> CliErrorContext<T> for Option<T> {
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.ok_or_else(|| CoreError::OperationFailed(context.to_string()))
    }

    fn cli_with_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| CoreError::OperationFailed(f().to_string()))
    }
}

/// Suggestion printed under an error, when one applies.
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::DependencyNotFound(_) => Some("Install ffmpeg (which provides ffprobe) and make sure it is on PATH"),
        CoreError::AudioDurationMismatch { .. } => {
            Some("Use --audio-fit loop or --audio-fit pad, or pick a longer track")
        }
        CoreError::Config(msg) if msg.contains("audio track") => {
            Some("Pass --audio or set TRIPREEL_AUDIO")
        }
        CoreError::OperationFailed(msg) if msg.contains("quest incomplete") => {
            Some("Upload more clips, or pass --force to assemble anyway")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_message() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        match result.cli_context("Saving session") {
            Err(CoreError::OperationFailed(msg)) => {
                assert!(msg.starts_with("Saving session: "));
                assert!(msg.contains("disk full"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_option_context() {
        let missing: Option<u8> = None;
        assert!(matches!(
            missing.cli_with_context(|| "nothing here"),
            Err(CoreError::OperationFailed(msg)) if msg == "nothing here"
        ));
    }

    #[test]
    fn test_suggestions() {
        let err = CoreError::AudioDurationMismatch {
            audio_secs: 4.0,
            video_secs: 5.0,
        };
        assert!(suggestion_for(&err).is_some());
        assert!(suggestion_for(&CoreError::EncodeError("boom".into())).is_none());
    }
}
