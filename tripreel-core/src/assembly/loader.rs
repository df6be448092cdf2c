// ============================================================================
// tripreel-core/src/assembly/loader.rs
// ============================================================================
//
// CLIP LOADER: Opening selected clips as probed video resources
//
// The first pipeline stage. Every selected path must exist as a regular file
// and answer an ffprobe query; anything else (including an empty selection)
// is a ResourceNotFound. Whether the probed file actually carries a usable
// video stream is judged later by the concatenator.
//
// AI-ASSISTANT-INFO: First assembly stage, turns paths into probed Clips

use crate::error::{CoreError, CoreResult, resource_not_found};
use crate::external::{FfprobeExecutor, MediaInfo};
use std::path::{Path, PathBuf};

/// A clip selected by the user, identified by its local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipReference {
    path: PathBuf,
}

impl ClipReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl From<PathBuf> for ClipReference {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for ClipReference {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

/// An opened clip: the reference plus what ffprobe reported about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub reference: ClipReference,
    pub info: MediaInfo,
}

impl Clip {
    pub fn path(&self) -> &Path {
        self.reference.path()
    }

    /// Probed duration in seconds, `0.0` when ffprobe reported none.
    pub fn duration(&self) -> f64 {
        self.info.duration.unwrap_or(0.0)
    }

    pub fn has_video(&self) -> bool {
        self.info.has_video
    }

    /// Frame size, when the clip has a video stream with known dimensions.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.info.width, self.info.height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }
}

/// Opens every reference in order.
///
/// # Errors
///
/// `ResourceNotFound` when `references` is empty, when a path is not a
/// regular file, or when ffprobe cannot read it.
pub fn load_clips<P: FfprobeExecutor>(
    prober: &P,
    references: &[ClipReference],
) -> CoreResult<Vec<Clip>> {
    if references.is_empty() {
        return Err(CoreError::ResourceNotFound(
            "no clips were selected for assembly".to_string(),
        ));
    }

    let mut clips = Vec::with_capacity(references.len());
    for (index, reference) in references.iter().enumerate() {
        let path = reference.path();
        if !path.is_file() {
            return Err(resource_not_found(path, "no such file"));
        }

        let info = prober
            .probe(path)
            .map_err(|e| resource_not_found(path, format!("unreadable media: {e}")))?;

        log::debug!(
            "Loaded clip {} ({}): duration={:?} size={:?}x{:?}",
            index,
            path.display(),
            info.duration,
            info.width,
            info.height
        );
        clips.push(Clip {
            reference: reference.clone(),
            info,
        });
    }

    log::info!("Loaded {} clip(s)", clips.len());
    Ok(clips)
}
