//! FFprobe integration for media analysis.
//!
//! The clip loader and audio binder only need a handful of facts about a
//! file: its duration, whether it carries video and audio streams, and the
//! video frame size. This module extracts those through the `ffprobe` crate
//! behind a trait so tests can script the answers.
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbe, FfProbeError, ffprobe};
use std::path::Path;

/// Facts about a media file relevant to assembly.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MediaInfo {
    /// Duration in seconds: the video stream's own when known, else the container's
    pub duration: Option<f64>,
    /// Width of the first video stream
    pub width: Option<u32>,
    /// Height of the first video stream
    pub height: Option<u32>,
    /// Whether a video stream is present
    pub has_video: bool,
    /// Whether an audio stream is present
    pub has_audio: bool,
    /// Codec name of the first video stream
    pub video_codec: Option<String>,
}

impl MediaInfo {
    /// Convenience constructor for a video file.
    pub fn video(duration: f64, width: u32, height: u32) -> Self {
        Self {
            duration: Some(duration),
            width: Some(width),
            height: Some(height),
            has_video: true,
            has_audio: true,
            video_codec: Some("h264".to_string()),
        }
    }

    /// Convenience constructor for an audio-only file.
    pub fn audio(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            has_audio: true,
            ..Self::default()
        }
    }
}

/// Trait for probing media files.
pub trait FfprobeExecutor {
    /// Probes `input_path` and returns its media facts.
    fn probe(&self, input_path: &Path) -> CoreResult<MediaInfo>;
}

/// Production `FfprobeExecutor` backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn probe(&self, input_path: &Path) -> CoreResult<MediaInfo> {
        log::debug!(
            "Running ffprobe (via crate) for media info on: {}",
            input_path.display()
        );
        match ffprobe(input_path) {
            Ok(metadata) => Ok(media_info_from_probe(&metadata)),
            Err(err) => {
                log::warn!("ffprobe failed on {}: {err:?}", input_path.display());
                Err(map_ffprobe_error(err, "media info"))
            }
        }
    }
}

fn media_info_from_probe(metadata: &FfProbe) -> MediaInfo {
    let video_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));

    let mut info = MediaInfo {
        duration: preferred_duration(
            video_stream.and_then(|s| s.duration.as_deref()),
            metadata.format.duration.as_deref(),
        ),
        ..Default::default()
    };

    info.has_audio = metadata
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    if let Some(video_stream) = video_stream {
        info.has_video = true;
        info.width = video_stream.width.and_then(|w| u32::try_from(w).ok());
        info.height = video_stream.height.and_then(|h| u32::try_from(h).ok());
        info.video_codec = video_stream.codec_name.clone();
    }

    info
}

/// Picks the video stream's own duration over the container's.
///
/// Phone footage often carries audio that runs past the last frame, which
/// stretches the container duration beyond the picture.
fn preferred_duration(video_stream: Option<&str>, container: Option<&str>) -> Option<f64> {
    let parse = |value: Option<&str>| {
        value
            .and_then(|d| d.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0)
    };
    parse(video_stream).or_else(|| parse(container))
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::FfprobeParse(format!("ffprobe {context} output deserialization: {err}"))
        }
        #[allow(unreachable_patterns)]
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_stream_duration_wins_over_container() {
        assert_eq!(preferred_duration(Some("4.966667"), Some("5.120000")), Some(4.966667));
    }

    #[test]
    fn test_container_duration_is_the_fallback() {
        assert_eq!(preferred_duration(None, Some("5.120000")), Some(5.12));
        assert_eq!(preferred_duration(Some("N/A"), Some("5.120000")), Some(5.12));
        assert_eq!(preferred_duration(Some("0.000000"), Some("2.5")), Some(2.5));
        assert_eq!(preferred_duration(None, None), None);
    }
}
