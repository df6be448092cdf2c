use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

/// Scratch store, session and work dir for one test.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Result<Self, Box<dyn Error>> {
        Ok(Self { dir: tempdir()? })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn session_file(&self) -> PathBuf {
        self.path("session.json")
    }

    fn file(&self, name: &str) -> Result<PathBuf, Box<dyn Error>> {
        let path = self.path(name);
        std::fs::write(&path, b"dummy content")?;
        Ok(path)
    }

    /// The binary with every global path pointed into the workspace.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tripreel").expect("Failed to find tripreel binary");
        cmd.env_remove("TRIPREEL_STORE")
            .env_remove("TRIPREEL_SESSION")
            .env_remove("TRIPREEL_BUCKET")
            .env_remove("TRIPREEL_AUDIO")
            .env_remove("TRIPREEL_NTFY_TOPIC")
            .env_remove("RUST_LOG")
            .arg("--store")
            .arg(self.path("bucket"))
            .arg("--session")
            .arg(self.session_file())
            .arg("--work-dir")
            .arg(self.path("work"));
        cmd
    }

    fn upload(&self, category: &str, file: &Path) -> Result<(), Box<dyn Error>> {
        self.cmd()
            .arg("upload")
            .arg("--category")
            .arg(category)
            .arg(file)
            .assert()
            .success();
        Ok(())
    }
}

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("tripreel")
        .expect("Failed to find tripreel binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(
            contains("merge")
                .and(contains("upload"))
                .and(contains("finish"))
                .and(contains("session")),
        );
}

#[test]
fn test_upload_then_list() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let clip = ws.file("beach day.mp4")?;
    ws.upload("spot", &clip)?;

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("uploaded/beach day_").and(contains(".mp4")));

    let session = std::fs::read_to_string(ws.session_file())?;
    assert!(session.contains("\"progress\": 5"));
    assert!(session.contains("tourist_spot"));
    Ok(())
}

#[test]
fn test_same_file_uploaded_twice_gets_two_keys() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let clip = ws.file("market.mp4")?;
    ws.upload("food", &clip)?;
    ws.upload("food", &clip)?;

    let output = ws.cmd().arg("list").output()?;
    let stdout = String::from_utf8(output.stdout)?;
    let keys: Vec<&str> = stdout.lines().collect();
    assert_eq!(keys.len(), 2);
    assert_ne!(keys[0], keys[1]);
    Ok(())
}

#[test]
fn test_upload_rejects_non_clip() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let photo = ws.file("photo.jpg")?;

    ws.cmd()
        .arg("upload")
        .arg("--category")
        .arg("activity")
        .arg(&photo)
        .assert()
        .failure()
        .stderr(contains("not an .mp4 clip"));
    assert!(!ws.session_file().exists());
    Ok(())
}

#[test]
fn test_upload_invalid_category() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let clip = ws.file("clip.mp4")?;

    ws.cmd()
        .arg("upload")
        .arg("--category")
        .arg("museum")
        .arg(&clip)
        .assert()
        .failure()
        .stderr(contains("invalid value 'museum'"));
    Ok(())
}

#[test]
fn test_session_edits_are_saved() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    ws.cmd()
        .args(["session", "destination", "  Gangneung "])
        .assert()
        .success();
    ws.cmd()
        .args(["session", "attraction", "--category", "food", "Jungang Market"])
        .assert()
        .success();

    ws.cmd()
        .arg("session")
        .assert()
        .success()
        .stderr(contains("Gangneung").and(contains("Jungang Market")));

    ws.cmd()
        .args(["session", "request", "--category", "food"])
        .assert()
        .success()
        .stdout(contains("Gangneung"));
    Ok(())
}

#[test]
fn test_destination_request_needs_profile() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    ws.cmd()
        .args(["session", "request"])
        .assert()
        .failure()
        .stderr(contains("no traveler profile"));

    ws.cmd()
        .args([
            "session", "profile", "--party-size", "2", "--companions", "friends",
            "--transport", "train", "--budget", "moderate", "--ages", "20s", "--genders", "mixed",
        ])
        .assert()
        .success();

    ws.cmd()
        .args(["session", "request"])
        .assert()
        .success()
        .stdout(contains("2 people").and(contains("train")));
    Ok(())
}

#[test]
fn test_merge_missing_clip_is_resource_not_found() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let present = ws.file("a.mp4")?;
    let audio = ws.file("track.mp3")?;

    ws.cmd()
        .arg("merge")
        .arg("--clip")
        .arg(&present)
        .arg("--clip")
        .arg(ws.path("surely_missing.mp4"))
        .arg("--audio")
        .arg(&audio)
        .arg("--output")
        .arg(ws.path("out.mp4"))
        .assert()
        .failure()
        .stderr(contains("Resource not found").and(contains("surely_missing.mp4")));
    assert!(!ws.path("out.mp4").exists());
    Ok(())
}

#[test]
fn test_merge_requires_audio_track() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let clip = ws.file("a.mp4")?;

    ws.cmd()
        .arg("merge")
        .arg("--clip")
        .arg(&clip)
        .arg("--output")
        .arg(ws.path("out.mp4"))
        .assert()
        .failure()
        .stderr(contains("audio track"));
    Ok(())
}

#[test]
fn test_merge_writes_log_file() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let logs = ws.path("logs");

    ws.cmd()
        .arg("--log-dir")
        .arg(&logs)
        .arg("merge")
        .arg("--clip")
        .arg(ws.path("missing.mp4"))
        .arg("--output")
        .arg(ws.path("out.mp4"))
        .assert()
        .failure();

    let names: Vec<String> = std::fs::read_dir(&logs)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("tripreel_merge_"));
    let contents = std::fs::read_to_string(logs.join(&names[0]))?;
    assert!(contents.contains("Resource not found"));
    assert!(!contents.contains('\u{1b}'));
    Ok(())
}

#[test]
fn test_merge_rejects_unknown_audio_fit() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    ws.cmd()
        .args(["merge", "--clip", "a.mp4", "--output", "o.mp4", "--audio-fit", "stretch"])
        .assert()
        .failure()
        .stderr(contains("invalid value 'stretch'"));
    Ok(())
}

#[test]
fn test_finish_without_selection_fails() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let audio = ws.file("track.mp3")?;

    ws.cmd()
        .arg("finish")
        .arg("--audio")
        .arg(&audio)
        .assert()
        .failure()
        .stderr(contains("no clips were selected"));
    assert!(!ws.path("work").join("download").exists());
    Ok(())
}

#[test]
fn test_finish_before_quest_complete_fails() -> Result<(), Box<dyn Error>> {
    let ws = Workspace::new()?;
    let clip = ws.file("a.mp4")?;
    let audio = ws.file("track.mp3")?;
    ws.upload("food", &clip)?;

    ws.cmd()
        .arg("finish")
        .arg("--all")
        .arg("--audio")
        .arg(&audio)
        .assert()
        .failure()
        .stderr(contains("quest incomplete (5/30)").and(contains("--force")));
    Ok(())
}
