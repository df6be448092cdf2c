// ============================================================================
// tripreel-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig. Unset fields keep the defaults from
// CoreConfig::default(); download and log directories follow the work
// directory unless set explicitly.
//
// AI-ASSISTANT-INFO: Builder pattern implementation for CoreConfig

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::CoreConfig;
use crate::assembly::AudioFitPolicy;

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use tripreel_core::config::CoreConfigBuilder;
/// use tripreel_core::assembly::AudioFitPolicy;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .work_dir(PathBuf::from("/tmp/work"))
///     .audio_fit_policy(AudioFitPolicy::PadSilence)
///     .video_codec("libx265")
///     .build();
/// assert_eq!(config.download_dir, PathBuf::from("/tmp/work/download"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    store_dir: Option<PathBuf>,
    work_dir: Option<PathBuf>,
    download_dir: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    temp_dir: Option<PathBuf>,
    audio_track: Option<PathBuf>,
    fade_secs: Option<f64>,
    video_codec: Option<String>,
    audio_codec: Option<String>,
    audio_fit_policy: Option<AudioFitPolicy>,
    upload_prefix: Option<String>,
    merged_key: Option<String>,
    ntfy_topic: Option<String>,
}

impl CoreConfigBuilder {
    /// Creates a new builder with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_dir(mut self, dir: PathBuf) -> Self {
        self.store_dir = Some(dir);
        self
    }

    pub fn work_dir(mut self, dir: PathBuf) -> Self {
        self.work_dir = Some(dir);
        self
    }

    pub fn download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = Some(dir);
        self
    }

    pub fn log_dir(mut self, dir: PathBuf) -> Self {
        self.log_dir = Some(dir);
        self
    }

    pub fn temp_dir(mut self, dir: PathBuf) -> Self {
        self.temp_dir = Some(dir);
        self
    }

    pub fn audio_track(mut self, path: PathBuf) -> Self {
        self.audio_track = Some(path);
        self
    }

    pub fn fade_secs(mut self, secs: f64) -> Self {
        self.fade_secs = Some(secs);
        self
    }

    pub fn video_codec(mut self, codec: &str) -> Self {
        self.video_codec = Some(codec.to_string());
        self
    }

    pub fn audio_codec(mut self, codec: &str) -> Self {
        self.audio_codec = Some(codec.to_string());
        self
    }

    pub fn audio_fit_policy(mut self, policy: AudioFitPolicy) -> Self {
        self.audio_fit_policy = Some(policy);
        self
    }

    pub fn upload_prefix(mut self, prefix: &str) -> Self {
        self.upload_prefix = Some(prefix.to_string());
        self
    }

    pub fn merged_key(mut self, key: &str) -> Self {
        self.merged_key = Some(key.to_string());
        self
    }

    pub fn ntfy_topic(mut self, topic: &str) -> Self {
        self.ntfy_topic = Some(topic.to_string());
        self
    }

    /// Builds the CoreConfig instance.
    pub fn build(self) -> CoreConfig {
        let defaults = CoreConfig::default();
        let work_dir = self.work_dir.unwrap_or(defaults.work_dir);

        CoreConfig {
            store_dir: self.store_dir.unwrap_or(defaults.store_dir),
            download_dir: self
                .download_dir
                .unwrap_or_else(|| work_dir.join("download")),
            log_dir: self.log_dir.unwrap_or_else(|| work_dir.join("logs")),
            work_dir,
            temp_dir: self.temp_dir,
            audio_track: self.audio_track,
            fade_secs: self.fade_secs.unwrap_or(defaults.fade_secs),
            video_codec: self.video_codec.unwrap_or(defaults.video_codec),
            audio_codec: self.audio_codec.unwrap_or(defaults.audio_codec),
            audio_fit_policy: self.audio_fit_policy.unwrap_or(defaults.audio_fit_policy),
            upload_prefix: self.upload_prefix.unwrap_or(defaults.upload_prefix),
            merged_key: self.merged_key.unwrap_or(defaults.merged_key),
            ntfy_topic: self.ntfy_topic,
        }
    }
}
