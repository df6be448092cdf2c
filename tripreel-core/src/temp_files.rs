//! Temporary file management utilities.
//!
//! Helpers for creating temporary files on top of the
//! tempfile crate, which removes them on drop, including on error paths.
//! The encoder renders into one of these and persists it over the output
//! path only after ffmpeg exits successfully. When the staging file lives on
//! another filesystem it is first copied next to the output, so the final
//! step is always a same-directory rename.

use crate::error::{CoreError, CoreResult};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, TempPath};

/// Reserves a temporary sibling for `output` inside `dir`.
///
/// The name keeps the output's extension so ffmpeg selects the same muxer
/// it would for the final path. The file is deleted when the returned
/// `TempPath` is dropped unless it is persisted first.
pub fn create_temp_output(dir: &Path, output: &Path) -> CoreResult<TempPath> {
    std::fs::create_dir_all(dir)?;
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CoreError::PathError(format!("Output path has no file name: {}", output.display()))
        })?;
    let suffix = output
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let file = TempFileBuilder::new()
        .prefix(&format!(".{stem}."))
        .suffix(&suffix)
        .tempfile_in(dir)?;
    Ok(file.into_temp_path())
}

/// Moves a finished temporary file over `output`, replacing any existing file.
pub fn persist_output(temp: TempPath, output: &Path) -> CoreResult<()> {
    match temp.persist(output) {
        Ok(()) => Ok(()),
        Err(e) if e.error.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!(
                "{} is on another filesystem than {}; copying",
                e.path.display(),
                output.display()
            );
            copy_then_persist(e.path, output)
        }
        Err(e) => Err(move_error(&e.path, output, &e.error)),
    }
}

/// Copies `staged` into a sibling temp file of `output` and renames that
/// into place. `staged` is deleted on return either way.
fn copy_then_persist(staged: TempPath, output: &Path) -> CoreResult<()> {
    let output_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let sibling = create_temp_output(&output_dir, output)?;
    std::fs::copy(&staged, &sibling).map_err(|e| move_error(&staged, output, &e))?;
    drop(staged);
    sibling
        .persist(output)
        .map_err(|e| move_error(&e.path, output, &e.error))
}

fn move_error(from: &Path, to: &Path, err: &io::Error) -> CoreError {
    CoreError::PathError(format!(
        "Failed to move {} to {}: {err}",
        from.display(),
        to.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_output_keeps_extension_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("merged_video.mp4");
        let temp = create_temp_output(dir.path(), &output).unwrap();
        let temp_path = temp.to_path_buf();

        assert!(temp_path.exists());
        assert_eq!(temp_path.extension().unwrap(), "mp4");
        assert_ne!(temp_path, output);

        drop(temp);
        assert!(!temp_path.exists());
    }

    #[test]
    fn test_persist_replaces_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        std::fs::write(&output, b"old").unwrap();

        let temp = create_temp_output(dir.path(), &output).unwrap();
        std::fs::write(&temp, b"new").unwrap();
        persist_output(temp, &output).unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"new");
    }

    #[test]
    fn test_staged_file_is_copied_next_to_output() {
        let staging = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let output = out_dir.path().join("final.mp4");
        std::fs::write(&output, b"old").unwrap();

        let temp = create_temp_output(staging.path(), &output).unwrap();
        let staged_path = temp.to_path_buf();
        std::fs::write(&temp, b"rendered").unwrap();
        copy_then_persist(temp, &output).unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"rendered");
        assert!(!staged_path.exists());
        let leftovers: Vec<_> = std::fs::read_dir(out_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|name| name.to_string_lossy().starts_with('.'))
            .collect();
        assert!(leftovers.is_empty());
    }

    /// Exercises a real cross-device rename when /dev/shm is a separate mount.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_persist_across_filesystems() {
        use std::os::unix::fs::MetadataExt;

        let shm = Path::new("/dev/shm");
        let out_dir = tempfile::tempdir().unwrap();
        let (Ok(shm_meta), Ok(out_meta)) = (shm.metadata(), out_dir.path().metadata()) else {
            return;
        };
        if shm_meta.dev() == out_meta.dev() {
            return;
        }
        let staging = tempfile::tempdir_in(shm).unwrap();
        let output = out_dir.path().join("final.mp4");

        let temp = create_temp_output(staging.path(), &output).unwrap();
        std::fs::write(&temp, b"rendered").unwrap();
        persist_output(temp, &output).unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"rendered");
        assert_eq!(std::fs::read_dir(staging.path()).unwrap().count(), 0);
    }
}
