// ============================================================================
// tripreel-core/src/storage/mod.rs
// ============================================================================
//
// OBJECT STORAGE: Where uploaded clips and assembled videos live
//
// The rest of the crate depends only on the three operations of the
// ObjectStore trait. A directory-backed store is always available; an S3
// store is compiled in with the `s3` feature.
//
// KEY COMPONENTS:
// - ObjectStore: upload / download / list
// - LocalObjectStore: a directory acting as the bucket
// - unique_upload_key: collision-free key for a new upload
// - list_clip_keys / fetch_clips: selecting and downloading clips for assembly
//
// AI-ASSISTANT-INFO: Object storage abstraction and clip bookkeeping helpers

mod local;
#[cfg(feature = "s3")]
mod s3;

pub use local::LocalObjectStore;
#[cfg(feature = "s3")]
pub use s3::S3ObjectStore;

use crate::error::{CoreError, CoreResult};
use crate::utils::has_clip_extension;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A flat key/value object store.
///
/// Keys are `/`-separated strings such as `uploaded/beach_3f2a.mp4`.
pub trait ObjectStore {
    /// Stores the file at `local_path` under `key` and returns the key.
    fn upload(&self, local_path: &Path, key: &str) -> CoreResult<String>;

    /// Writes the object stored under `key` to `local_path`.
    ///
    /// Fails with `ObjectNotFound` when no such key exists.
    fn download(&self, key: &str, local_path: &Path) -> CoreResult<()>;

    /// Keys starting with `prefix`, sorted lexicographically.
    fn list(&self, prefix: &str) -> CoreResult<Vec<String>>;
}

/// Builds a fresh key for uploading `local_path` under `prefix`.
///
/// The key is `{prefix}{stem}_{uuid}{.ext}`, so uploading the same file
/// name twice never overwrites the earlier clip.
pub fn unique_upload_key(prefix: &str, local_path: &Path) -> CoreResult<String> {
    let stem = local_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            CoreError::PathError(format!("Cannot upload {}: no file name", local_path.display()))
        })?;
    let extension = local_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let id = uuid::Uuid::new_v4().simple();
    Ok(format!("{prefix}{stem}_{id}{extension}"))
}

/// The last `/`-separated segment of a key.
pub fn key_basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Keys under `prefix` that name clips (`.mp4`, any case), in listing order.
pub fn list_clip_keys<S: ObjectStore + ?Sized>(store: &S, prefix: &str) -> CoreResult<Vec<String>> {
    let keys = store.list(prefix)?;
    Ok(keys
        .into_iter()
        .filter(|key| has_clip_extension(key))
        .collect())
}

/// Downloads the selected keys into `dir`, preserving selection order.
///
/// Each key lands at `dir/<basename>`. Two different keys sharing a
/// basename would overwrite each other, so that is refused.
pub fn fetch_clips<S: ObjectStore + ?Sized>(
    store: &S,
    keys: &[String],
    dir: &Path,
) -> CoreResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut claimed: HashMap<&str, &str> = HashMap::new();
    let mut paths = Vec::with_capacity(keys.len());
    for key in keys {
        let basename = key_basename(key);
        if basename.is_empty() {
            return Err(CoreError::Storage(format!("Key '{key}' has no file name")));
        }
        if let Some(previous) = claimed.insert(basename, key.as_str()) {
            if previous != key.as_str() {
                return Err(CoreError::Storage(format!(
                    "Keys '{previous}' and '{key}' would both download to {basename}"
                )));
            }
        }

        let local_path = dir.join(basename);
        log::debug!("Downloading {key} -> {}", local_path.display());
        store.download(key, &local_path)?;
        paths.push(local_path);
    }

    log::info!("Fetched {} clip(s) into {}", paths.len(), dir.display());
    Ok(paths)
}
