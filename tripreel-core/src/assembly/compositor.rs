//! Transition compositor.
//!
//! Attaches a tail fade-out to every clip except the last. There is no
//! matching fade-in on the following clip, and the fade never changes a
//! clip's length: it only darkens the final `d` seconds.

use super::loader::Clip;

/// Shortest fade the filter graph can express (its millisecond precision).
pub const MIN_FADE_SECS: f64 = 0.001;

/// Uniform transition configuration for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSpec {
    /// Fade-out length in seconds. Zero disables fading.
    pub fade_secs: f64,
}

impl TransitionSpec {
    pub fn fade_out(fade_secs: f64) -> Self {
        Self { fade_secs }
    }
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self::fade_out(crate::config::DEFAULT_FADE_SECS)
    }
}

/// A fade-out placed on a clip's own timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeOut {
    /// Seconds from the clip start at which the fade begins.
    pub start: f64,
    /// Fade length in seconds.
    pub duration: f64,
}

impl FadeOut {
    /// Places a fade of `fade_secs` at the tail of a clip lasting `clip_secs`.
    ///
    /// Clips shorter than the fade fade over their whole length. Returns
    /// `None` when the resulting fade would be shorter than
    /// [`MIN_FADE_SECS`], including non-positive lengths.
    pub fn at_tail(clip_secs: f64, fade_secs: f64) -> Option<Self> {
        if !(fade_secs > 0.0) || !(clip_secs > 0.0) {
            return None;
        }
        let duration = fade_secs.min(clip_secs);
        if duration < MIN_FADE_SECS {
            return None;
        }
        Some(Self {
            start: clip_secs - duration,
            duration,
        })
    }
}

/// A clip with its (optional) fade-out attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionedClip {
    pub clip: Clip,
    pub fade_out: Option<FadeOut>,
}

/// Applies the fade-out to all clips but the last, preserving order and count.
pub fn apply_transitions(clips: Vec<Clip>, spec: &TransitionSpec) -> Vec<TransitionedClip> {
    let last = clips.len().saturating_sub(1);
    clips
        .into_iter()
        .enumerate()
        .map(|(index, clip)| {
            let fade_out = if index < last {
                FadeOut::at_tail(clip.duration(), spec.fade_secs)
            } else {
                None
            };
            if let Some(fade) = fade_out {
                log::debug!(
                    "Clip {index}: fade-out from {:.3}s for {:.3}s",
                    fade.start,
                    fade.duration
                );
            }
            TransitionedClip { clip, fade_out }
        })
        .collect()
}
