// ============================================================================
// tripreel-core/src/assembly/audio.rs
// ============================================================================
//
// AUDIO BINDER: Fitting the background track to the composed video
//
// The configured track becomes the output's only audio stream; clip audio
// is discarded. The track is always cut at the video's duration. When it is
// too short, AudioFitPolicy decides whether it loops, is padded with
// silence, or the run fails.
//
// AI-ASSISTANT-INFO: Fourth assembly stage, audio fitting and filter graph

use super::concat::ComposedVideo;
use crate::error::{CoreError, CoreResult, resource_not_found};
use crate::external::FfprobeExecutor;
use crate::utils::format_seconds;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Label of the finished audio stream in the filter graph.
pub const AUDIO_OUTPUT_LABEL: &str = "aout";

/// Tracks within this many seconds of the video count as long enough.
const DURATION_EPSILON: f64 = 1e-3;

/// What to do when the audio track is shorter than the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioFitPolicy {
    /// Repeat the track until the video ends.
    #[default]
    Loop,
    /// Play the track once, then silence.
    PadSilence,
    /// Refuse with `AudioDurationMismatch`.
    Fail,
}

impl fmt::Display for AudioFitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AudioFitPolicy::Loop => "loop",
            AudioFitPolicy::PadSilence => "pad",
            AudioFitPolicy::Fail => "fail",
        };
        f.write_str(name)
    }
}

impl FromStr for AudioFitPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loop" => Ok(AudioFitPolicy::Loop),
            "pad" | "pad-silence" | "silence" => Ok(AudioFitPolicy::PadSilence),
            "fail" => Ok(AudioFitPolicy::Fail),
            other => Err(CoreError::Config(format!(
                "unknown audio fit policy '{other}' (expected loop, pad or fail)"
            ))),
        }
    }
}

/// The background track, opened and measured.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTrack {
    pub path: PathBuf,
    pub duration: f64,
}

/// Opens the configured audio track.
///
/// # Errors
///
/// `ResourceNotFound` when the file is missing, cannot be probed, has no
/// audio stream, or reports no positive duration.
pub fn load_audio_track<P: FfprobeExecutor>(prober: &P, path: &Path) -> CoreResult<AudioTrack> {
    if !path.is_file() {
        return Err(resource_not_found(path, "no such audio file"));
    }
    let info = prober
        .probe(path)
        .map_err(|e| resource_not_found(path, format!("unreadable audio: {e}")))?;
    if !info.has_audio {
        return Err(resource_not_found(path, "no audio stream"));
    }
    let duration = info
        .duration
        .filter(|d| *d > 0.0 && d.is_finite())
        .ok_or_else(|| resource_not_found(path, "audio duration unknown"))?;

    log::debug!("Audio track {}: {:.3}s", path.display(), duration);
    Ok(AudioTrack {
        path: path.to_path_buf(),
        duration,
    })
}

/// How the track was fitted to the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFit {
    /// Track was long enough and is cut at the video's end.
    Crop,
    /// Track repeats, then is cut at the video's end.
    Loop,
    /// Track plays once followed by silence.
    PadSilence,
}

impl fmt::Display for AudioFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AudioFit::Crop => "cropped",
            AudioFit::Loop => "looped",
            AudioFit::PadSilence => "padded with silence",
        };
        f.write_str(name)
    }
}

/// A composed video with its background track attached.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundVideo {
    pub video: ComposedVideo,
    pub audio: AudioTrack,
    pub fit: AudioFit,
}

impl BoundVideo {
    /// Output duration; the audio never extends past it.
    pub fn duration(&self) -> f64 {
        self.video.duration
    }

    /// ffmpeg input index of the audio track (after all clips).
    pub fn audio_input_index(&self) -> usize {
        self.video.input_count()
    }

    /// Whether the audio input must be read with `-stream_loop -1`.
    pub fn loops_audio_input(&self) -> bool {
        self.fit == AudioFit::Loop
    }

    /// Renders the audio half of the filter graph, ending in `[aout]`.
    pub fn audio_filter_graph(&self) -> String {
        let end = format_seconds(self.duration());
        let pad = match self.fit {
            AudioFit::PadSilence => format!("apad=whole_dur={end},"),
            AudioFit::Crop | AudioFit::Loop => String::new(),
        };
        format!(
            "[{}:a]{pad}atrim=start=0:end={end},asetpts=PTS-STARTPTS[{AUDIO_OUTPUT_LABEL}]",
            self.audio_input_index()
        )
    }

    /// The complete `-filter_complex` argument.
    pub fn filter_complex(&self) -> String {
        format!(
            "{};{}",
            self.video.video_filter_graph(),
            self.audio_filter_graph()
        )
    }
}

/// Fits `track` to `video` according to `policy`.
///
/// # Errors
///
/// `AudioDurationMismatch` when the track is shorter than the video and the
/// policy is `Fail`.
pub fn bind_audio(
    video: ComposedVideo,
    track: AudioTrack,
    policy: AudioFitPolicy,
) -> CoreResult<BoundVideo> {
    let target = video.duration;
    let fit = if track.duration + DURATION_EPSILON >= target {
        AudioFit::Crop
    } else {
        match policy {
            AudioFitPolicy::Loop => AudioFit::Loop,
            AudioFitPolicy::PadSilence => AudioFit::PadSilence,
            AudioFitPolicy::Fail => {
                return Err(CoreError::AudioDurationMismatch {
                    audio_secs: track.duration,
                    video_secs: target,
                });
            }
        }
    };

    log::info!(
        "Audio {:.3}s bound to {:.3}s of video ({fit})",
        track.duration,
        target
    );
    Ok(BoundVideo {
        video,
        audio: track,
        fit,
    })
}
