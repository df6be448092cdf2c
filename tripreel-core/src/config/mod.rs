//! Configuration structures and constants for the tripreel-core library.
//!
//! This module provides the configuration for the assembly pipeline and the
//! storage/session bookkeeping around it: where clips are stored and
//! fetched to, which background track is bound, the fade length, and the
//! codecs handed to the encoder.

mod builder;

use std::path::PathBuf;

use crate::assembly::AudioFitPolicy;
use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;

// Default constants

/// Default fade-out length applied to the tail of every clip except the last.
pub const DEFAULT_FADE_SECS: f64 = 0.5;

/// Default video codec passed to ffmpeg for the final encode.
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

/// Default audio codec passed to ffmpeg for the final encode.
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

/// Key prefix under which uploaded clips are stored.
pub const DEFAULT_UPLOAD_PREFIX: &str = "uploaded/";

/// Key the assembled video is published under.
pub const DEFAULT_MERGED_KEY: &str = "merged/merged_video.mp4";

/// Extension a stored object must carry to be offered as a clip.
pub const CLIP_EXTENSION: &str = "mp4";

/// Main configuration structure for the tripreel-core library.
///
/// All fields have defaults; assembling a video additionally requires
/// `audio_track` to be set, which `validate_for_assembly` checks.
///
/// # Examples
///
/// ```rust,no_run
/// use tripreel_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .store_dir(PathBuf::from("/srv/tripreel/bucket"))
///     .work_dir(PathBuf::from("/srv/tripreel/work"))
///     .audio_track(PathBuf::from("/srv/tripreel/audio/lost_found.mp3"))
///     .fade_secs(0.5)
///     .build();
/// config.validate_for_assembly().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Root of the local object store (a directory acting as the bucket)
    pub store_dir: PathBuf,

    /// Directory selected clips are downloaded into before assembly
    pub download_dir: PathBuf,

    /// Directory for assembled output
    pub work_dir: PathBuf,

    /// Directory for log files
    pub log_dir: PathBuf,

    /// Optional directory for temporary files (defaults to the output's directory)
    pub temp_dir: Option<PathBuf>,

    /// Background track bound to every assembled video
    pub audio_track: Option<PathBuf>,

    /// Fade-out length in seconds
    pub fade_secs: f64,

    /// Video codec identifier, passed through to ffmpeg unchanged
    pub video_codec: String,

    /// Audio codec identifier, passed through to ffmpeg unchanged
    pub audio_codec: String,

    /// What to do when the audio track is shorter than the video
    pub audio_fit_policy: AudioFitPolicy,

    /// Key prefix for uploaded clips
    pub upload_prefix: String,

    /// Key the assembled video is uploaded under
    pub merged_key: String,

    /// Optional ntfy.sh topic URL for sending notifications
    pub ntfy_topic: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("tripreel-store"),
            download_dir: PathBuf::from("tripreel-work").join("download"),
            work_dir: PathBuf::from("tripreel-work"),
            log_dir: PathBuf::from("tripreel-work").join("logs"),
            temp_dir: None,
            audio_track: None,
            fade_secs: DEFAULT_FADE_SECS,
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            audio_fit_policy: AudioFitPolicy::default(),
            upload_prefix: DEFAULT_UPLOAD_PREFIX.to_string(),
            merged_key: DEFAULT_MERGED_KEY.to_string(),
            ntfy_topic: None,
        }
    }
}

impl CoreConfig {
    /// Creates a config rooted at the given store and work directories.
    /// Download and log directories are placed under `work_dir`.
    pub fn new(store_dir: PathBuf, work_dir: PathBuf) -> Self {
        Self {
            store_dir,
            download_dir: work_dir.join("download"),
            log_dir: work_dir.join("logs"),
            work_dir,
            ..Self::default()
        }
    }

    /// Default output path for an assembled video.
    pub fn default_output_path(&self) -> PathBuf {
        self.work_dir.join("merged").join("merged_video.mp4")
    }

    /// Checks values that every command relies on.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.fade_secs.is_finite() || self.fade_secs < 0.0 {
            return Err(CoreError::Config(format!(
                "fade duration must be a finite, non-negative number of seconds (got {})",
                self.fade_secs
            )));
        }
        if self.video_codec.trim().is_empty() {
            return Err(CoreError::Config("video codec must not be empty".into()));
        }
        if self.audio_codec.trim().is_empty() {
            return Err(CoreError::Config("audio codec must not be empty".into()));
        }
        if self.merged_key.trim().is_empty() {
            return Err(CoreError::Config("merged key must not be empty".into()));
        }
        if let Some(topic) = &self.ntfy_topic {
            if topic.trim().is_empty() {
                return Err(CoreError::Config("ntfy topic must not be empty when set".into()));
            }
        }
        Ok(())
    }

    /// Checks everything `validate` does, plus the presence of an audio track.
    pub fn validate_for_assembly(&self) -> CoreResult<()> {
        self.validate()?;
        if self.audio_track.is_none() {
            return Err(CoreError::Config(
                "an audio track path is required to assemble a video".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.fade_secs, DEFAULT_FADE_SECS);
        assert_eq!(config.video_codec, "libx264");
        assert_eq!(config.audio_codec, "aac");
        assert_eq!(config.upload_prefix, "uploaded/");
        assert_eq!(config.audio_fit_policy, AudioFitPolicy::Loop);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_places_dirs_under_work_dir() {
        let config = CoreConfig::new(PathBuf::from("/bucket"), PathBuf::from("/work"));
        assert_eq!(config.download_dir, PathBuf::from("/work/download"));
        assert_eq!(config.log_dir, PathBuf::from("/work/logs"));
        assert_eq!(
            config.default_output_path(),
            PathBuf::from("/work/merged/merged_video.mp4")
        );
    }

    #[test]
    fn test_negative_fade_rejected() {
        let config = CoreConfig {
            fade_secs: -1.0,
            ..CoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_assembly_requires_audio_track() {
        let mut config = CoreConfig::default();
        assert!(config.validate_for_assembly().is_err());
        config.audio_track = Some(PathBuf::from("track.mp3"));
        assert!(config.validate_for_assembly().is_ok());
    }
}
