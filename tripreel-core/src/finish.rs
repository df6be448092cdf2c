// ============================================================================
// tripreel-core/src/finish.rs
// ============================================================================
//
// FINISH FLOW: From selected store keys to a published trip video
//
// The "finish" action downloads the clips the traveler selected, runs the
// assembly pipeline over them, uploads the result under the merged key, and
// records that key on the session. Notifications bracket every run; their
// failures are logged and never fail the run.
//
// AI-ASSISTANT-INFO: High-level merge/finish orchestration and reporting

use crate::assembly::{AssemblyRequest, Pipeline, PipelineState};
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor};
use crate::notifications::{NotificationSender, NotificationType, notify};
use crate::progress_reporting::ProgressReporter;
use crate::session::{QUEST_MAX, TripSession};
use crate::storage::{ObjectStore, fetch_clips};
use crate::utils::hostname;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Summary of a successful assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyReport {
    pub output_path: PathBuf,
    /// Output duration in seconds
    pub duration: f64,
    pub clip_count: usize,
    pub video_codec: String,
    pub audio_codec: String,
    pub output_size: u64,
    /// Wall time of the pipeline run
    pub elapsed: Duration,
    /// Pipeline states visited, `Idle` through `Done`
    pub states: Vec<PipelineState>,
    /// Store key of the published video, when it was uploaded
    pub uploaded_key: Option<String>,
}

/// Runs assembly jobs with a reporter and an optional notification sender.
pub struct Assembler<'a, S, P> {
    pipeline: Pipeline<S, P>,
    reporter: &'a dyn ProgressReporter,
    notifier: Option<&'a dyn NotificationSender>,
    require_complete_quest: bool,
}

impl<'a, S: FfmpegSpawner, P: FfprobeExecutor> Assembler<'a, S, P> {
    pub fn new(pipeline: Pipeline<S, P>, reporter: &'a dyn ProgressReporter) -> Self {
        Self {
            pipeline,
            reporter,
            notifier: None,
            require_complete_quest: true,
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: &'a dyn NotificationSender) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Whether `finish` refuses to run before the quest is complete (default: yes).
    #[must_use]
    pub fn require_complete_quest(mut self, required: bool) -> Self {
        self.require_complete_quest = required;
        self
    }

    pub fn pipeline(&self) -> &Pipeline<S, P> {
        &self.pipeline
    }

    /// Runs the pipeline for `request` and reports on the result.
    pub fn merge(&mut self, request: &AssemblyRequest) -> CoreResult<AssemblyReport> {
        let host = hostname();
        notify(
            self.notifier,
            &NotificationType::AssemblyStart {
                clip_count: request.clips.len(),
                output_path: request.output.clone(),
                hostname: host.clone(),
            },
        );

        let started = Instant::now();
        let output = match self.pipeline.run(request, self.reporter) {
            Ok(output) => output,
            Err(e) => {
                notify(
                    self.notifier,
                    &NotificationType::AssemblyError {
                        output_path: request.output.clone(),
                        message: e.to_string(),
                        hostname: host,
                    },
                );
                return Err(e);
            }
        };
        let elapsed = started.elapsed();
        let output_size = std::fs::metadata(&output.path).map(|m| m.len()).unwrap_or(0);

        notify(
            self.notifier,
            &NotificationType::AssemblyComplete {
                output_path: output.path.clone(),
                video_secs: output.duration,
                output_size,
                elapsed,
                hostname: host,
            },
        );

        Ok(AssemblyReport {
            output_path: output.path,
            duration: output.duration,
            clip_count: output.clip_count,
            video_codec: output.video_codec,
            audio_codec: output.audio_codec,
            output_size,
            elapsed,
            states: self.pipeline.history().to_vec(),
            uploaded_key: None,
        })
    }

    /// Checks the selection and quest state `finish` requires, without
    /// touching the store.
    pub fn check_ready(&self, session: &TripSession, selected_keys: &[String]) -> CoreResult<()> {
        if selected_keys.is_empty() {
            return Err(CoreError::ResourceNotFound(
                "no clips were selected for assembly".to_string(),
            ));
        }
        if self.require_complete_quest && !session.quest_complete() {
            return Err(CoreError::OperationFailed(format!(
                "quest incomplete ({}/{QUEST_MAX}); upload more clips first",
                session.progress
            )));
        }
        Ok(())
    }

    /// Downloads `selected_keys`, assembles them into `output`, and publishes
    /// the result under `config.merged_key`.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` for an empty selection (before anything is
    /// downloaded) or a selected key missing from the store;
    /// `OperationFailed` when the quest is required but incomplete; any
    /// pipeline error; `Storage` if publishing fails.
    pub fn finish<O: ObjectStore + ?Sized>(
        &mut self,
        store: &O,
        session: &mut TripSession,
        config: &CoreConfig,
        selected_keys: &[String],
        output: &Path,
    ) -> CoreResult<AssemblyReport> {
        self.check_ready(session, selected_keys)?;
        config.validate_for_assembly()?;

        let clip_paths = fetch_clips(store, selected_keys, &config.download_dir).map_err(
            |e| match e {
                CoreError::ObjectNotFound(key) => {
                    CoreError::ResourceNotFound(format!("{key} (not in store)"))
                }
                other => other,
            },
        )?;

        let request = AssemblyRequest::from_config(config, clip_paths, output)?;
        let mut report = self.merge(&request)?;

        let key = store.upload(&report.output_path, &config.merged_key)?;
        log::info!("Published assembled video as {key}");
        session.merged_key = Some(key.clone());
        report.uploaded_key = Some(key);
        Ok(report)
    }
}
