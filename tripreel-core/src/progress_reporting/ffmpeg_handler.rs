//! `FFmpeg` progress handler
//!
//! Turns the ffmpeg event stream into progress reports against the expected
//! output duration, forwards ffmpeg's own log lines to `log`, and keeps the
//! error lines so a failed encode can say why.

use crate::error::CoreResult;
use crate::progress_reporting::ProgressReporter;
use crate::utils::{format_duration, parse_ffmpeg_time};
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel as FfmpegLogLevel};
use std::time::Instant;

/// Minimum advance, in percent, between two progress reports.
const REPORT_STEP_PERCENT: f64 = 3.0;

/// Error lines kept for the failure message.
const MAX_ERROR_LINES: usize = 20;

/// Handler for `FFmpeg` progress events
pub struct FfmpegProgressHandler<'a> {
    duration: Option<f64>,
    reporter: &'a dyn ProgressReporter,
    start_time: Instant,
    last_progress_percent: f64,
    last_logged_decile: i32,
    error_lines: Vec<String>,
}

impl<'a> FfmpegProgressHandler<'a> {
    /// Creates a handler for an encode expected to produce `duration` seconds.
    #[must_use]
    pub fn new(duration: Option<f64>, reporter: &'a dyn ProgressReporter) -> Self {
        Self {
            duration,
            reporter,
            start_time: Instant::now(),
            last_progress_percent: -REPORT_STEP_PERCENT,
            last_logged_decile: -1,
            error_lines: Vec::new(),
        }
    }

    /// Handles an `FFmpeg` event
    pub fn handle_event(&mut self, event: FfmpegEvent) -> CoreResult<()> {
        match event {
            FfmpegEvent::Progress(progress) => self.handle_progress(&progress),
            FfmpegEvent::Log(level, message) => self.handle_log(level, &message),
            FfmpegEvent::Error(error) => self.handle_error(error),
            _ => {}
        }
        Ok(())
    }

    /// Error lines collected so far, oldest first.
    #[must_use]
    pub fn error_lines(&self) -> &[String] {
        &self.error_lines
    }

    /// Collected error lines joined for inclusion in an error message.
    #[must_use]
    pub fn error_summary(&self) -> String {
        self.error_lines.join("\n")
    }

    fn handle_progress(&mut self, progress: &FfmpegProgress) {
        let current_secs = parse_ffmpeg_time(&progress.time).unwrap_or(0.0);
        let percent = self
            .duration
            .filter(|&d| d > 0.0)
            .map_or(0.0, |d| (current_secs / d * 100.0).min(100.0));

        if percent >= self.last_progress_percent + REPORT_STEP_PERCENT
            || (percent >= 100.0 && self.last_progress_percent < 100.0)
        {
            self.reporter
                .progress(percent as f32, current_secs, self.duration.unwrap_or(0.0));
            self.log_progress_if_needed(percent, current_secs, progress.speed);
            self.last_progress_percent = percent;
        }
    }

    fn handle_log(&mut self, level: FfmpegLogLevel, message: &str) {
        let log_level = map_ffmpeg_log_level(&level);
        if log_level == log::Level::Info {
            log::debug!(target: "ffmpeg_log", "{message}");
        } else {
            log::log!(target: "ffmpeg_log", log_level, "{message}");
        }
        if log_level == log::Level::Error {
            self.push_error(message.to_string());
        }
    }

    fn handle_error(&mut self, error: String) {
        if is_non_critical_ffmpeg_error(&error) {
            log::debug!("ffmpeg non-critical message: {error}");
            return;
        }
        log::warn!("ffmpeg error: {error}");
        self.push_error(error);
    }

    fn push_error(&mut self, line: String) {
        if self.error_lines.len() == MAX_ERROR_LINES {
            self.error_lines.remove(0);
        }
        self.error_lines.push(line);
    }

    /// Logs once per 10% so log files carry a coarse record of the encode.
    fn log_progress_if_needed(&mut self, percent: f64, current_secs: f64, speed: f32) {
        let decile = (percent as i32 / 10) * 10;
        if decile > self.last_logged_decile {
            log::info!(
                target: "tripreel::progress",
                "Encoding progress: {:.1}% | Time: {} / {} | Speed: {:.2}x | Elapsed: {}",
                percent,
                format_duration(current_secs),
                format_duration(self.duration.unwrap_or(0.0)),
                speed,
                format_duration(self.start_time.elapsed().as_secs_f64())
            );
            self.last_logged_decile = decile;
        }
    }
}

/// Maps `FFmpeg` log level to Rust log level
fn map_ffmpeg_log_level(level: &FfmpegLogLevel) -> log::Level {
    match level {
        FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => log::Level::Error,
        FfmpegLogLevel::Warning => log::Level::Warn,
        FfmpegLogLevel::Info => log::Level::Info,
        _ => log::Level::Trace,
    }
}

/// Messages ffmpeg prints on stderr that don't indicate a failed encode.
fn is_non_critical_ffmpeg_error(error: &str) -> bool {
    error.contains("deprecated pixel format")
        || error.contains("No accelerated colorspace conversion")
        || error.contains("automatically inserted filter")
        || error.contains("Timestamps are unset")
        || error.contains("Queue input is backward")
        || error.contains("first frame is no keyframe")
}
