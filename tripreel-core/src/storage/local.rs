//! Directory-backed object store.
//!
//! Each key maps to a file under the root directory, with `/` separators
//! becoming subdirectories.

use super::ObjectStore;
use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// An object store kept in a local directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> CoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            CoreError::Storage(format!("Cannot create store at {}: {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    /// Directory the store is rooted at.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of `key`, rejecting keys that would escape the root.
    fn object_path(&self, key: &str) -> CoreResult<PathBuf> {
        if key.is_empty() || key.ends_with('/') || key.contains('\\') {
            return Err(CoreError::Storage(format!("Invalid object key '{key}'")));
        }
        let relative = Path::new(key);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(CoreError::Storage(format!("Invalid object key '{key}'")));
        }
        Ok(self.root.join(relative))
    }

    fn collect_keys(&self, dir: &Path, keys: &mut Vec<String>) -> CoreResult<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                self.collect_keys(&path, keys)?;
            } else if let Ok(relative) = path.strip_prefix(&self.root) {
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                keys.push(key);
            }
        }
        Ok(())
    }
}

impl ObjectStore for LocalObjectStore {
    fn upload(&self, local_path: &Path, key: &str) -> CoreResult<String> {
        let target = self.object_path(key)?;
        if !local_path.is_file() {
            return Err(CoreError::Storage(format!(
                "Cannot upload {}: not a file",
                local_path.display()
            )));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(local_path, &target)?;
        log::info!("Uploaded {} as {key}", local_path.display());
        Ok(key.to_string())
    }

    fn download(&self, key: &str, local_path: &Path) -> CoreResult<()> {
        let source = self.object_path(key)?;
        if !source.is_file() {
            return Err(CoreError::ObjectNotFound(key.to_string()));
        }
        if let Some(parent) = local_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, local_path)?;
        Ok(())
    }

    fn list(&self, prefix: &str) -> CoreResult<Vec<String>> {
        let mut keys = Vec::new();
        self.collect_keys(&self.root, &mut keys)?;
        keys.retain(|key| key.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{fetch_clips, list_clip_keys};

    fn store_with(files: &[&str]) -> (tempfile::TempDir, LocalObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path().join("bucket")).unwrap();
        let scratch = dir.path().join("scratch.bin");
        for key in files {
            fs::write(&scratch, key.as_bytes()).unwrap();
            store.upload(&scratch, key).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_upload_then_list_sorted() {
        let (_dir, store) = store_with(&["uploaded/b.mp4", "uploaded/a.mp4", "merged/m.mp4"]);
        assert_eq!(
            store.list("uploaded/").unwrap(),
            vec!["uploaded/a.mp4", "uploaded/b.mp4"]
        );
        assert_eq!(store.list("").unwrap().len(), 3);
    }

    #[test]
    fn test_download_missing_is_object_not_found() {
        let (dir, store) = store_with(&[]);
        let result = store.download("uploaded/none.mp4", &dir.path().join("x.mp4"));
        assert!(matches!(result, Err(CoreError::ObjectNotFound(_))));
    }

    #[test]
    fn test_keys_cannot_escape_root() {
        let (dir, store) = store_with(&[]);
        let file = dir.path().join("f.mp4");
        fs::write(&file, b"x").unwrap();
        assert!(store.upload(&file, "../outside.mp4").is_err());
        assert!(store.upload(&file, "/abs.mp4").is_err());
        assert!(store.upload(&file, "uploaded/").is_err());
    }

    #[test]
    fn test_list_clip_keys_filters_extension() {
        let (_dir, store) =
            store_with(&["uploaded/a.mp4", "uploaded/B.MP4", "uploaded/notes.txt"]);
        assert_eq!(
            list_clip_keys(&store, "uploaded/").unwrap(),
            vec!["uploaded/B.MP4", "uploaded/a.mp4"]
        );
    }

    #[test]
    fn test_fetch_clips_keeps_selection_order() {
        let (dir, store) = store_with(&["uploaded/a.mp4", "uploaded/b.mp4"]);
        let target = dir.path().join("download");
        let keys = vec!["uploaded/b.mp4".to_string(), "uploaded/a.mp4".to_string()];
        let paths = fetch_clips(&store, &keys, &target).unwrap();

        assert_eq!(paths, vec![target.join("b.mp4"), target.join("a.mp4")]);
        assert_eq!(fs::read(&paths[0]).unwrap(), b"uploaded/b.mp4");
    }

    #[test]
    fn test_fetch_clips_rejects_basename_collision() {
        let (dir, store) = store_with(&["uploaded/x/a.mp4", "uploaded/y/a.mp4"]);
        let keys = vec!["uploaded/x/a.mp4".to_string(), "uploaded/y/a.mp4".to_string()];
        let result = fetch_clips(&store, &keys, &dir.path().join("download"));
        assert!(matches!(result, Err(CoreError::Storage(_))));
    }
}
