//! Multi-clip video assembly.
//!
//! The pipeline runs five stages in order:
//!
//! 1. [`loader`] probes every selected clip.
//! 2. [`compositor`] attaches a fade-out to every clip except the last.
//! 3. [`concat`] joins the clips on a shared canvas.
//! 4. [`audio`] fits the background track to the joined video.
//! 5. [`encoder`] renders everything with one ffmpeg invocation.
//!
//! Stages 1-4 only plan; nothing is decoded until the encoder runs, and the
//! plan (filter graph and argument list) is a pure function of the inputs.

pub mod audio;
pub mod compositor;
pub mod concat;
pub mod encoder;
pub mod loader;
pub mod pipeline;

pub use audio::{AudioFit, AudioFitPolicy, AudioTrack, BoundVideo};
pub use compositor::{FadeOut, TransitionSpec, TransitionedClip};
pub use concat::{Canvas, ComposedSegment, ComposedVideo};
pub use encoder::{EncodeSettings, OutputVideo, build_encode_command};
pub use loader::{Clip, ClipReference};
pub use pipeline::{AssemblyRequest, Pipeline, PipelineState};
