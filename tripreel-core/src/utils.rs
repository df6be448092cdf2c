//! Utility functions for formatting and file operations.
//!
//! General-purpose helpers used throughout tripreel-core: duration and byte
//! formatting for reports, ffmpeg time parsing for progress, and the number
//! formatting used when writing filter graphs.

use std::path::Path;

/// Checks if the given path is a clip the tool accepts (.mp4, case-insensitive).
#[must_use]
pub fn is_clip_file(path: &Path) -> bool {
    path.is_file() && has_clip_extension(&path.to_string_lossy())
}

/// Checks whether a key or file name carries the clip extension.
#[must_use]
pub fn has_clip_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(crate::config::CLIP_EXTENSION))
}

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Parses FFmpeg time string (HH:MM:SS.MS) to seconds. Returns None if invalid.
#[must_use]
pub fn parse_ffmpeg_time(time: &str) -> Option<f64> {
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() == 3 {
        let hours = parts[0].parse::<f64>().ok()?;
        let minutes = parts[1].parse::<f64>().ok()?;
        let seconds = parts[2].parse::<f64>().ok()?;
        Some(hours * 3600.0 + minutes * 60.0 + seconds)
    } else {
        None
    }
}

/// Formats seconds for use inside an ffmpeg filter or `-t` option.
///
/// Millisecond precision with trailing zeros dropped, so `2.5` renders as
/// `"2.5"` and `3.0` as `"3"`. The output depends only on the value, which
/// keeps generated filter graphs stable across runs.
#[must_use]
pub fn format_seconds(seconds: f64) -> String {
    let rendered = format!("{seconds:.3}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" || trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Name of this machine, for notifications. Falls back to "unknown".
#[must_use]
pub fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| {
            std::process::Command::new("hostname")
                .output()
                .ok()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .filter(|name| !name.is_empty())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_clip_extension() {
        assert!(has_clip_extension("uploaded/beach_1a2b.mp4"));
        assert!(has_clip_extension("uploaded/BEACH.MP4"));
        assert!(!has_clip_extension("uploaded/notes.txt"));
        assert!(!has_clip_extension("uploaded/mp4"));
    }

    #[test]
    fn test_is_clip_file_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("clip.mp4");
        std::fs::write(&clip, b"x").unwrap();
        assert!(is_clip_file(&clip));
        assert!(!is_clip_file(&dir.path().join("missing.mp4")));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.9), "00:00:59");
        assert_eq!(format_duration(3725.0), "01:02:05");
        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KiB");
        assert_eq!(format_bytes(1536 * 1024), "1.50 MiB");
        assert_eq!(format_bytes(2 * 1024 * 1024 * 1024), "2.00 GiB");
    }

    #[test]
    fn test_parse_ffmpeg_time() {
        assert_eq!(parse_ffmpeg_time("00:00:05.50"), Some(5.5));
        assert_eq!(parse_ffmpeg_time("01:02:03.00"), Some(3723.0));
        assert_eq!(parse_ffmpeg_time("N/A"), None);
        assert_eq!(parse_ffmpeg_time("12:34"), None);
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(2.5), "2.5");
        assert_eq!(format_seconds(3.0), "3");
        assert_eq!(format_seconds(0.0), "0");
        assert_eq!(format_seconds(1.0 / 3.0), "0.333");
        assert_eq!(format_seconds(12.1004), "12.1");
    }
}
