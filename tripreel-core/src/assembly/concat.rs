// ============================================================================
// tripreel-core/src/assembly/concat.rs
// ============================================================================
//
// CONCATENATOR: Joining transitioned clips into one video track
//
// Produces the ComposedVideo: an ordered list of segments plus the canvas
// they are composited onto. Clips of differing resolutions are not
// resampled; each keeps its frame size and is centred on a black canvas as
// large as the widest and tallest clip. The resulting plan renders as the
// video half of an ffmpeg filter_complex graph:
//
//   [i:v]setpts=PTS-STARTPTS[,fade=t=out:st=S:d=L],pad=W:H:...,setsar=1[vi]
//   [v0][v1]...concat=n=N:v=1:a=0[vcat]
//   [vcat]format=yuv420p[vout]
//
// Clip audio is never referenced, so it is dropped from the output.
//
// AI-ASSISTANT-INFO: Third assembly stage, builds the video filter graph

use super::compositor::{FadeOut, TransitionedClip};
use crate::error::{CoreError, CoreResult};
use crate::utils::format_seconds;
use std::path::{Path, PathBuf};

/// Label of the finished video stream in the filter graph.
pub const VIDEO_OUTPUT_LABEL: &str = "vout";

/// Frame size every segment is centred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Smallest canvas holding every frame size, rounded up to even
    /// dimensions for 4:2:0 output.
    fn enclosing(sizes: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let (width, height) = sizes
            .into_iter()
            .fold((0, 0), |(w, h), (cw, ch)| (w.max(cw), h.max(ch)));
        Self {
            width: round_up_even(width),
            height: round_up_even(height),
        }
    }
}

fn round_up_even(value: u32) -> u32 {
    value + (value % 2)
}

/// One clip's place in the composed video.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedSegment {
    /// ffmpeg input index of the clip.
    pub input_index: usize,
    pub path: PathBuf,
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub fade_out: Option<FadeOut>,
}

impl ComposedSegment {
    fn label(&self) -> String {
        format!("v{}", self.input_index)
    }

    fn filter_chain(&self, canvas: Canvas) -> String {
        let mut chain = format!("[{}:v]setpts=PTS-STARTPTS", self.input_index);
        if let Some(fade) = self.fade_out {
            chain.push_str(&format!(
                ",fade=t=out:st={}:d={}",
                format_seconds(fade.start),
                format_seconds(fade.duration)
            ));
        }
        chain.push_str(&format!(
            ",pad={}:{}:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1[{}]",
            canvas.width,
            canvas.height,
            self.label()
        ));
        chain
    }
}

/// The ordered concatenation of all clips with transitions baked in.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedVideo {
    pub segments: Vec<ComposedSegment>,
    pub canvas: Canvas,
    /// Sum of segment durations in seconds.
    pub duration: f64,
}

impl ComposedVideo {
    /// Clip paths in ffmpeg input order.
    pub fn inputs(&self) -> impl Iterator<Item = &Path> {
        self.segments.iter().map(|s| s.path.as_path())
    }

    /// Number of ffmpeg inputs the video half of the graph consumes.
    pub fn input_count(&self) -> usize {
        self.segments.len()
    }

    /// Renders the video half of the filter graph, ending in `[vout]`.
    pub fn video_filter_graph(&self) -> String {
        let mut chains: Vec<String> = self
            .segments
            .iter()
            .map(|segment| segment.filter_chain(self.canvas))
            .collect();

        let labels: String = self
            .segments
            .iter()
            .map(|s| format!("[{}]", s.label()))
            .collect();
        chains.push(format!(
            "{labels}concat=n={}:v=1:a=0[vcat]",
            self.segments.len()
        ));
        chains.push(format!("[vcat]format=yuv420p[{VIDEO_OUTPUT_LABEL}]"));
        chains.join(";")
    }
}

/// Joins the transitioned clips in order.
///
/// # Errors
///
/// `CompositionError` when the list is empty or a clip has no video stream,
/// no known frame size, or a non-positive duration.
pub fn concatenate(clips: Vec<TransitionedClip>) -> CoreResult<ComposedVideo> {
    if clips.is_empty() {
        return Err(CoreError::CompositionError(
            "nothing to concatenate".to_string(),
        ));
    }

    let mut segments = Vec::with_capacity(clips.len());
    for (input_index, transitioned) in clips.into_iter().enumerate() {
        let clip = &transitioned.clip;
        let path = clip.path().display();

        if !clip.has_video() {
            return Err(CoreError::CompositionError(format!(
                "clip {input_index} ({path}) has no video stream"
            )));
        }
        let (width, height) = clip
            .dimensions()
            .filter(|&(w, h)| w > 0 && h > 0)
            .ok_or_else(|| {
                CoreError::CompositionError(format!(
                    "clip {input_index} ({path}) has no usable frame size"
                ))
            })?;
        let duration = clip.duration();
        if !(duration > 0.0) || !duration.is_finite() {
            return Err(CoreError::CompositionError(format!(
                "clip {input_index} ({path}) has unusable duration {duration}"
            )));
        }

        segments.push(ComposedSegment {
            input_index,
            path: transitioned.clip.path().to_path_buf(),
            duration,
            width,
            height,
            fade_out: transitioned.fade_out,
        });
    }

    let canvas = Canvas::enclosing(segments.iter().map(|s| (s.width, s.height)));
    let duration = segments.iter().map(|s| s.duration).sum();

    log::info!(
        "Composed {} segment(s) on a {}x{} canvas, {:.3}s total",
        segments.len(),
        canvas.width,
        canvas.height,
        duration
    );

    Ok(ComposedVideo {
        segments,
        canvas,
        duration,
    })
}
