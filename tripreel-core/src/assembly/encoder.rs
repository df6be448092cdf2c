// ============================================================================
// tripreel-core/src/assembly/encoder.rs
// ============================================================================
//
// ENCODER/WRITER: Rendering the bound video to its output container
//
// One ffmpeg invocation renders every clip input plus the audio input
// through the filter_complex graph built by the earlier stages. ffmpeg
// writes to a temporary sibling of the output path; only after a clean exit
// is that file renamed over the output, so a failed run never leaves a
// truncated file behind. Every failure in here surfaces as EncodeError.
//
// AI-ASSISTANT-INFO: Final assembly stage, ffmpeg invocation and publish

use super::audio::{AUDIO_OUTPUT_LABEL, AudioFit, BoundVideo};
use super::concat::VIDEO_OUTPUT_LABEL;
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_executor::command_args;
use crate::external::{FfmpegProcess, FfmpegSpawner};
use crate::progress_reporting::{FfmpegProgressHandler, ProgressReporter};
use crate::temp_files;
use crate::utils::format_seconds;
use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::{Path, PathBuf};

/// Containers that benefit from moving the index to the front.
const FASTSTART_EXTENSIONS: [&str; 3] = ["mp4", "mov", "m4v"];

/// Codec identifiers handed through to ffmpeg unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    pub video_codec: String,
    pub audio_codec: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: crate::config::DEFAULT_VIDEO_CODEC.to_string(),
            audio_codec: crate::config::DEFAULT_AUDIO_CODEC.to_string(),
        }
    }
}

/// The final artifact of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputVideo {
    pub path: PathBuf,
    pub video_codec: String,
    pub audio_codec: String,
    /// Duration in seconds, equal to the sum of the clip durations.
    pub duration: f64,
    pub clip_count: usize,
    pub audio_fit: AudioFit,
}

/// Builds the ffmpeg command rendering `bound` into `target`.
///
/// `target` is the last argument; nothing else depends on its value, so
/// identical inputs always produce identical argument lists.
pub fn build_encode_command(
    bound: &BoundVideo,
    settings: &EncodeSettings,
    target: &Path,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    cmd.arg("-hide_banner");
    cmd.arg("-y");

    for input in bound.video.inputs() {
        cmd.input(input);
    }
    if bound.loops_audio_input() {
        cmd.args(["-stream_loop", "-1"]);
    }
    cmd.input(&bound.audio.path);

    cmd.args(["-filter_complex", bound.filter_complex().as_str()]);
    cmd.args(["-map", format!("[{VIDEO_OUTPUT_LABEL}]").as_str()]);
    cmd.args(["-map", format!("[{AUDIO_OUTPUT_LABEL}]").as_str()]);
    cmd.args(["-c:v", settings.video_codec.as_str()]);
    cmd.args(["-c:a", settings.audio_codec.as_str()]);
    cmd.args(["-t", format_seconds(bound.duration()).as_str()]);

    let wants_faststart = target
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FASTSTART_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        });
    if wants_faststart {
        cmd.args(["-movflags", "+faststart"]);
    }

    cmd.output(target);
    cmd
}

/// Renders `bound` to `output`, replacing any existing file there.
///
/// # Errors
///
/// `EncodeError` for empty codec identifiers, temp file or rename failures,
/// ffmpeg spawn failures, and non-zero ffmpeg exits.
pub fn encode<S: FfmpegSpawner>(
    spawner: &S,
    bound: &BoundVideo,
    settings: &EncodeSettings,
    output: &Path,
    temp_dir: Option<&Path>,
    reporter: &dyn ProgressReporter,
) -> CoreResult<OutputVideo> {
    encode_inner(spawner, bound, settings, output, temp_dir, reporter)
        .map_err(CoreError::into_encode_error)
}

fn encode_inner<S: FfmpegSpawner>(
    spawner: &S,
    bound: &BoundVideo,
    settings: &EncodeSettings,
    output: &Path,
    temp_dir: Option<&Path>,
    reporter: &dyn ProgressReporter,
) -> CoreResult<OutputVideo> {
    if settings.video_codec.trim().is_empty() || settings.audio_codec.trim().is_empty() {
        return Err(CoreError::EncodeError(
            "video and audio codec identifiers must not be empty".to_string(),
        ));
    }

    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let staging_dir = temp_dir.map_or_else(|| output_dir.clone(), Path::to_path_buf);
    std::fs::create_dir_all(&output_dir)?;

    // Dropped (and deleted) on every early return below.
    let staging = temp_files::create_temp_output(&staging_dir, output)?;

    let mut cmd = build_encode_command(bound, settings, &staging);
    let args = command_args(&mut cmd);
    log::debug!("ffmpeg {}", args.join(" "));

    log::info!(
        "Encoding {} clip(s), {:.3}s, video={} audio={} -> {}",
        bound.video.input_count(),
        bound.duration(),
        settings.video_codec,
        settings.audio_codec,
        output.display()
    );

    let mut process = spawner.spawn(cmd)?;
    let mut handler = FfmpegProgressHandler::new(Some(bound.duration()), reporter);
    process.handle_events(|event| handler.handle_event(event))?;
    let status = process.wait()?;
    reporter.finish();

    if !status.success() {
        let details = handler.error_summary();
        let message = if details.is_empty() {
            format!("ffmpeg exited with {status}")
        } else {
            format!("ffmpeg exited with {status}: {details}")
        };
        log::error!("{message}");
        return Err(CoreError::EncodeError(message));
    }

    temp_files::persist_output(staging, output)?;
    log::info!("Wrote {}", output.display());

    Ok(OutputVideo {
        path: output.to_path_buf(),
        video_codec: settings.video_codec.clone(),
        audio_codec: settings.audio_codec.clone(),
        duration: bound.duration(),
        clip_count: bound.video.input_count(),
        audio_fit: bound.fit,
    })
}
