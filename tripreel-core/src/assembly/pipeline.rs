// ============================================================================
// tripreel-core/src/assembly/pipeline.rs
// ============================================================================
//
// PIPELINE: Sequencing the five assembly stages
//
// Loader -> Compositor -> Concatenator -> Audio Binder -> Encoder, strictly
// in order. The pipeline tracks which state it is in and which states it
// visited, so a failure can be attributed to the stage that raised it.
// Failed is reachable from every running state; there are no retries and no
// resumption. Each call to run starts again from Idle.
//
// AI-ASSISTANT-INFO: Assembly state machine and stage orchestration

use super::audio::{AudioFitPolicy, BoundVideo, bind_audio, load_audio_track};
use super::compositor::{TransitionSpec, apply_transitions};
use super::concat::concatenate;
use super::encoder::{EncodeSettings, OutputVideo, encode};
use super::loader::{ClipReference, load_clips};
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor};
use crate::progress_reporting::ProgressReporter;
use std::fmt;
use std::path::PathBuf;

/// Where a pipeline run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Idle,
    Loading,
    Compositing,
    Concatenating,
    AudioBinding,
    Encoding,
    Done,
    Failed,
}

impl PipelineState {
    /// Human-readable description used by reporters.
    pub fn description(self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Loading => "Loading clips",
            PipelineState::Compositing => "Applying transitions",
            PipelineState::Concatenating => "Concatenating clips",
            PipelineState::AudioBinding => "Binding audio track",
            PipelineState::Encoding => "Encoding output",
            PipelineState::Done => "Assembly complete",
            PipelineState::Failed => "Assembly failed",
        }
    }

    /// Whether this is one of the five working stages.
    pub fn is_running(self) -> bool {
        !matches!(
            self,
            PipelineState::Idle | PipelineState::Done | PipelineState::Failed
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyRequest {
    /// Clips in playback order
    pub clips: Vec<ClipReference>,
    /// Background track
    pub audio_track: PathBuf,
    /// Where the finished video is written
    pub output: PathBuf,
    pub transition: TransitionSpec,
    pub encode: EncodeSettings,
    pub audio_fit_policy: AudioFitPolicy,
    /// Where ffmpeg renders before the output is replaced; defaults to the
    /// output's directory
    pub temp_dir: Option<PathBuf>,
}

impl AssemblyRequest {
    /// A request with the default fade, codecs and audio policy.
    pub fn new<I, P>(clips: I, audio_track: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            clips: clips.into_iter().map(ClipReference::new).collect(),
            audio_track: audio_track.into(),
            output: output.into(),
            transition: TransitionSpec::default(),
            encode: EncodeSettings::default(),
            audio_fit_policy: AudioFitPolicy::default(),
            temp_dir: None,
        }
    }

    /// A request taking fade, codecs, audio track and policy from `config`.
    ///
    /// # Errors
    ///
    /// `Config` when the configuration is invalid or names no audio track.
    pub fn from_config<I, P>(config: &CoreConfig, clips: I, output: impl Into<PathBuf>) -> CoreResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        config.validate_for_assembly()?;
        let audio_track = config
            .audio_track
            .clone()
            .ok_or_else(|| CoreError::Config("no audio track configured".to_string()))?;

        let mut request = Self::new(clips, audio_track, output);
        request.transition = TransitionSpec::fade_out(config.fade_secs);
        request.encode = EncodeSettings {
            video_codec: config.video_codec.clone(),
            audio_codec: config.audio_codec.clone(),
        };
        request.audio_fit_policy = config.audio_fit_policy;
        request.temp_dir = config.temp_dir.clone();
        Ok(request)
    }

    #[must_use]
    pub fn with_fade_secs(mut self, fade_secs: f64) -> Self {
        self.transition = TransitionSpec::fade_out(fade_secs);
        self
    }

    #[must_use]
    pub fn with_codecs(mut self, video_codec: &str, audio_codec: &str) -> Self {
        self.encode = EncodeSettings {
            video_codec: video_codec.to_string(),
            audio_codec: audio_codec.to_string(),
        };
        self
    }

    #[must_use]
    pub fn with_audio_fit_policy(mut self, policy: AudioFitPolicy) -> Self {
        self.audio_fit_policy = policy;
        self
    }

    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}

/// The assembly pipeline.
///
/// Generic over the ffmpeg spawner and ffprobe executor so tests can drive
/// it with the scripted implementations from `external::mocks`.
///
/// # Examples
///
/// ```rust,no_run
/// use tripreel_core::assembly::{AssemblyRequest, Pipeline};
/// use tripreel_core::external::{CrateFfprobeExecutor, SidecarSpawner};
/// use tripreel_core::progress_reporting::NullProgressReporter;
///
/// let request = AssemblyRequest::new(
///     ["beach.mp4", "market.mp4"],
///     "lost_found.mp3",
///     "merged_video.mp4",
/// );
/// let mut pipeline = Pipeline::new(SidecarSpawner, CrateFfprobeExecutor::new());
/// let output = pipeline.run(&request, &NullProgressReporter).unwrap();
/// println!("{:.1}s written to {}", output.duration, output.path.display());
/// ```
pub struct Pipeline<S, P> {
    spawner: S,
    prober: P,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<S: FfmpegSpawner, P: FfprobeExecutor> Pipeline<S, P> {
    pub fn new(spawner: S, prober: P) -> Self {
        Self {
            spawner,
            prober,
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// States visited during the most recent run, starting with `Idle`.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// The running state the last run failed in, if it failed.
    pub fn failed_during(&self) -> Option<PipelineState> {
        if self.state != PipelineState::Failed {
            return None;
        }
        self.history
            .iter()
            .rev()
            .copied()
            .find(|s| s.is_running())
    }

    /// Runs the four planning stages, stopping short of the encode.
    ///
    /// The returned plan fully determines the ffmpeg invocation.
    pub fn compose(
        &mut self,
        request: &AssemblyRequest,
        reporter: &dyn ProgressReporter,
    ) -> CoreResult<BoundVideo> {
        self.reset();
        let result = self.compose_stages(request, reporter);
        self.settle(&result, reporter);
        result
    }

    /// Runs every stage and writes the output video.
    pub fn run(
        &mut self,
        request: &AssemblyRequest,
        reporter: &dyn ProgressReporter,
    ) -> CoreResult<OutputVideo> {
        self.reset();
        let result = self.compose_stages(request, reporter).and_then(|bound| {
            self.enter(PipelineState::Encoding, reporter);
            encode(
                &self.spawner,
                &bound,
                &request.encode,
                &request.output,
                request.temp_dir.as_deref(),
                reporter,
            )
        });
        if result.is_ok() {
            self.enter(PipelineState::Done, reporter);
        } else {
            self.settle(&result, reporter);
        }
        result
    }

    fn compose_stages(
        &mut self,
        request: &AssemblyRequest,
        reporter: &dyn ProgressReporter,
    ) -> CoreResult<BoundVideo> {
        self.enter(PipelineState::Loading, reporter);
        let clips = load_clips(&self.prober, &request.clips)?;

        self.enter(PipelineState::Compositing, reporter);
        let transitioned = apply_transitions(clips, &request.transition);

        self.enter(PipelineState::Concatenating, reporter);
        let composed = concatenate(transitioned).map_err(CoreError::into_composition_error)?;

        self.enter(PipelineState::AudioBinding, reporter);
        let track = load_audio_track(&self.prober, &request.audio_track)?;
        bind_audio(composed, track, request.audio_fit_policy)
    }

    fn reset(&mut self) {
        self.state = PipelineState::Idle;
        self.history.clear();
        self.history.push(PipelineState::Idle);
    }

    fn enter(&mut self, state: PipelineState, reporter: &dyn ProgressReporter) {
        log::debug!("Pipeline: {} -> {}", self.state, state);
        self.state = state;
        self.history.push(state);
        reporter.stage(state);
    }

    /// Moves to `Failed` when `result` is an error; leaves state untouched otherwise.
    fn settle<T>(&mut self, result: &CoreResult<T>, reporter: &dyn ProgressReporter) {
        if let Err(err) = result {
            let stage = self.state;
            log::error!("Assembly failed while {}: {err}", stage.description().to_lowercase());
            self.enter(PipelineState::Failed, reporter);
        }
    }
}
