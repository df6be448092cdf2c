//! Progress Reporting API
//!
//! This module provides a minimal API for the core library to report pipeline
//! stages, encode progress, and status messages without depending on any
//! terminal formatting. The CLI supplies an indicatif-backed implementation;
//! library callers that don't care pass `NullProgressReporter`.
//!
//! Reporters are handed to the pipeline explicitly rather than installed
//! globally.

pub mod ffmpeg_handler;

pub use ffmpeg_handler::FfmpegProgressHandler;

use crate::assembly::PipelineState;

/// Represents different levels of output for structured reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    /// Major workflow phases
    Section,
    /// Processing steps
    Processing,
    /// Success messages
    Success,
    /// Warning messages
    Warning,
    /// Error messages
    Error,
    /// General information
    Info,
}

/// Receiver for pipeline progress.
pub trait ProgressReporter {
    /// Output a message at a specific level
    fn output(&self, level: OutputLevel, text: &str);

    /// Called whenever the pipeline enters a new state
    fn stage(&self, state: PipelineState) {
        let level = match state {
            PipelineState::Done => OutputLevel::Success,
            PipelineState::Failed => OutputLevel::Error,
            _ => OutputLevel::Processing,
        };
        self.output(level, state.description());
    }

    /// Report encode progress
    fn progress(&self, percent: f32, elapsed_secs: f64, total_secs: f64);

    /// Clear any active progress display
    fn finish(&self);
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn output(&self, _level: OutputLevel, _text: &str) {}
    fn progress(&self, _percent: f32, _elapsed_secs: f64, _total_secs: f64) {}
    fn finish(&self) {}
}
