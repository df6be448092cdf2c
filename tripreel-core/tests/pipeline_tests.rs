// tripreel-core/tests/pipeline_tests.rs

use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};
use tripreel_core::assembly::{AssemblyRequest, AudioFit, AudioFitPolicy, Pipeline, PipelineState};
use tripreel_core::external::MediaInfo;
use tripreel_core::external::mocks::{MockFfmpegSpawner, MockFfprobeExecutor};
use tripreel_core::progress_reporting::NullProgressReporter;
use tripreel_core::CoreError;

struct Fixture {
    dir: TempDir,
    spawner: MockFfmpegSpawner,
    prober: MockFfprobeExecutor,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempdir().expect("tempdir"),
            spawner: MockFfmpegSpawner::new(),
            prober: MockFfprobeExecutor::new(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Creates a placeholder file and registers what ffprobe reports for it.
    fn media(&self, name: &str, info: MediaInfo) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, b"dummy content").expect("write dummy media");
        self.prober.expect_media_info(&path, info);
        path
    }

    fn pipeline(&self) -> Pipeline<MockFfmpegSpawner, MockFfprobeExecutor> {
        Pipeline::new(self.spawner.clone(), self.prober.clone())
    }

    fn leftover_files(&self, dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .expect("read dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with('.'))
            .collect()
    }
}

fn progress_at(time: &str) -> FfmpegEvent {
    FfmpegEvent::Progress(FfmpegProgress {
        frame: 0,
        fps: 30.0,
        q: 0.0,
        size_kb: 256,
        time: time.to_string(),
        bitrate_kbps: 1000.0,
        speed: 2.0,
        raw_log_message: String::new(),
    })
}

#[test]
fn test_two_clips_with_long_audio() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let b = fx.media("b.mp4", MediaInfo::video(2.0, 1280, 720));
    let audio = fx.media("track.mp3", MediaInfo::audio(10.0));
    let output = fx.path("out").join("merged_video.mp4");

    fx.spawner.add_success_expectation(
        "concat=n=2",
        vec![progress_at("00:00:02.50"), progress_at("00:00:05.00")],
        true,
    );

    let request = AssemblyRequest::new([a.clone(), b.clone()], audio.clone(), output.clone())
        .with_fade_secs(0.5);
    let mut pipeline = fx.pipeline();
    let result = pipeline.run(&request, &NullProgressReporter)?;

    assert!((result.duration - 5.0).abs() < 1e-9);
    assert_eq!(result.clip_count, 2);
    assert_eq!(result.audio_fit, AudioFit::Crop);
    assert_eq!(result.video_codec, "libx264");
    assert_eq!(result.audio_codec, "aac");
    assert!(output.is_file());
    assert_eq!(pipeline.state(), PipelineState::Done);
    assert_eq!(
        pipeline.history(),
        [
            PipelineState::Idle,
            PipelineState::Loading,
            PipelineState::Compositing,
            PipelineState::Concatenating,
            PipelineState::AudioBinding,
            PipelineState::Encoding,
            PipelineState::Done,
        ]
    );

    assert_eq!(fx.prober.probed_paths(), vec![a, b, audio]);
    assert_eq!(fx.spawner.pending_expectations(), 0);

    let calls = fx.spawner.get_received_calls();
    assert_eq!(calls.len(), 1);
    let args = &calls[0];
    let graph_pos = args.iter().position(|a| a == "-filter_complex").expect("filter_complex");
    let graph = &args[graph_pos + 1];
    // A fades out over its last half second; B, the last clip, never fades.
    assert!(graph.contains("[0:v]setpts=PTS-STARTPTS,fade=t=out:st=2.5:d=0.5,"));
    assert!(graph.contains("[1:v]setpts=PTS-STARTPTS,pad="));
    assert_eq!(graph.matches("fade=").count(), 1);
    // Audio cut to the first five seconds and the clip audio never mapped.
    assert!(graph.contains("[2:a]atrim=start=0:end=5,asetpts=PTS-STARTPTS[aout]"));
    assert!(!graph.contains("[0:a]"));
    assert!(args.windows(2).any(|w| w[0] == "-t" && w[1] == "5"));
    assert!(!args.iter().any(|a| a == "-stream_loop"));

    assert!(fx.leftover_files(&fx.path("out")).is_empty());
    Ok(())
}

#[test]
fn test_single_clip_is_identity() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new();
    let clip = fx.media("only.mp4", MediaInfo::video(7.25, 1920, 1080));
    let audio = fx.media("track.mp3", MediaInfo::audio(60.0));
    let output = fx.path("single.mp4");
    fx.spawner.add_success_expectation("concat=n=1", vec![], true);

    let request = AssemblyRequest::new([clip], audio, output.clone());
    let result = fx.pipeline().run(&request, &NullProgressReporter)?;

    assert!((result.duration - 7.25).abs() < 1e-9);
    let args = &fx.spawner.get_received_calls()[0];
    let graph = args.iter().find(|a| a.contains("concat=n=1")).expect("graph");
    assert!(!graph.contains("fade="));
    assert!(graph.contains("pad=1920:1080:"));
    Ok(())
}

#[test]
fn test_short_clip_gets_clamped_fade() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new();
    let short = fx.media("short.mp4", MediaInfo::video(0.3, 640, 480));
    let tail = fx.media("tail.mp4", MediaInfo::video(2.0, 640, 480));
    let audio = fx.media("track.mp3", MediaInfo::audio(5.0));

    let request = AssemblyRequest::new([short, tail], audio, fx.path("o.mp4")).with_fade_secs(0.5);
    let bound = fx.pipeline().compose(&request, &NullProgressReporter)?;

    assert!(bound.filter_complex().contains("fade=t=out:st=0:d=0.3"));
    assert!((bound.duration() - 2.3).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_fade_below_a_millisecond_is_not_rendered() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let b = fx.media("b.mp4", MediaInfo::video(2.0, 1280, 720));
    let audio = fx.media("track.mp3", MediaInfo::audio(10.0));

    let request =
        AssemblyRequest::new([a, b], audio, fx.path("o.mp4")).with_fade_secs(0.0004);
    let bound = fx.pipeline().compose(&request, &NullProgressReporter)?;

    let graph = bound.filter_complex();
    assert!(!graph.contains("fade="));
    assert!(!graph.contains("d=0,"));
    Ok(())
}

#[test]
fn test_empty_clip_list_is_resource_not_found() {
    let fx = Fixture::new();
    let audio = fx.media("track.mp3", MediaInfo::audio(5.0));
    let request = AssemblyRequest::new(Vec::<PathBuf>::new(), audio, fx.path("o.mp4"));

    let mut pipeline = fx.pipeline();
    let result = pipeline.run(&request, &NullProgressReporter);

    assert!(matches!(result, Err(CoreError::ResourceNotFound(_))));
    assert_eq!(pipeline.state(), PipelineState::Failed);
    assert_eq!(pipeline.failed_during(), Some(PipelineState::Loading));
    assert!(fx.spawner.get_received_calls().is_empty());
}

#[test]
fn test_missing_clip_is_resource_not_found() {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let audio = fx.media("track.mp3", MediaInfo::audio(5.0));
    let request = AssemblyRequest::new([a, fx.path("gone.mp4")], audio, fx.path("o.mp4"));

    let result = fx.pipeline().run(&request, &NullProgressReporter);
    match result {
        Err(CoreError::ResourceNotFound(msg)) => assert!(msg.contains("gone.mp4")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_missing_audio_fails_while_binding() {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let request = AssemblyRequest::new([a], fx.path("nope.mp3"), fx.path("o.mp4"));

    let mut pipeline = fx.pipeline();
    let result = pipeline.run(&request, &NullProgressReporter);

    assert!(matches!(result, Err(CoreError::ResourceNotFound(_))));
    assert_eq!(pipeline.failed_during(), Some(PipelineState::AudioBinding));
}

#[test]
fn test_clip_without_video_is_composition_error() {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let voice = fx.media("voice.mp4", MediaInfo::audio(3.0));
    let audio = fx.media("track.mp3", MediaInfo::audio(10.0));
    let request = AssemblyRequest::new([a, voice], audio, fx.path("o.mp4"));

    let mut pipeline = fx.pipeline();
    let result = pipeline.run(&request, &NullProgressReporter);

    assert!(matches!(result, Err(CoreError::CompositionError(_))));
    assert_eq!(pipeline.failed_during(), Some(PipelineState::Concatenating));
}

#[test]
fn test_short_audio_under_fail_policy() {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let b = fx.media("b.mp4", MediaInfo::video(2.0, 1280, 720));
    let audio = fx.media("track.mp3", MediaInfo::audio(4.0));
    let request = AssemblyRequest::new([a, b], audio, fx.path("o.mp4"))
        .with_audio_fit_policy(AudioFitPolicy::Fail);

    let mut pipeline = fx.pipeline();
    let result = pipeline.run(&request, &NullProgressReporter);

    assert!(matches!(
        result,
        Err(CoreError::AudioDurationMismatch { .. })
    ));
    assert_eq!(pipeline.failed_during(), Some(PipelineState::AudioBinding));
}

#[test]
fn test_short_audio_loops_by_default() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let b = fx.media("b.mp4", MediaInfo::video(2.0, 1280, 720));
    let audio = fx.media("track.mp3", MediaInfo::audio(4.0));
    fx.spawner.add_success_expectation("concat=n=2", vec![], true);

    let request = AssemblyRequest::new([a, b], audio.clone(), fx.path("o.mp4"));
    let result = fx.pipeline().run(&request, &NullProgressReporter)?;

    assert_eq!(result.audio_fit, AudioFit::Loop);
    let args = &fx.spawner.get_received_calls()[0];
    let loop_pos = args.iter().position(|a| a == "-stream_loop").expect("stream_loop");
    assert_eq!(args[loop_pos + 3], audio.to_string_lossy());
    Ok(())
}

#[test]
fn test_encoder_failure_leaves_no_output() {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let audio = fx.media("track.mp3", MediaInfo::audio(5.0));
    let out_dir = fx.path("out");
    fs::create_dir_all(&out_dir).expect("mkdir");
    let output = out_dir.join("final.mp4");

    fx.spawner.add_exit_error_expectation(
        "concat=n=1",
        vec![FfmpegEvent::Error("Unknown encoder 'libnope'".to_string())],
        1,
        true,
    );

    let request = AssemblyRequest::new([a], audio, output.clone()).with_codecs("libnope", "aac");
    let mut pipeline = fx.pipeline();
    let result = pipeline.run(&request, &NullProgressReporter);

    match result {
        Err(CoreError::EncodeError(msg)) => assert!(msg.contains("libnope")),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(pipeline.failed_during(), Some(PipelineState::Encoding));
    assert!(!output.exists());
    assert!(fx.leftover_files(&out_dir).is_empty());
}

#[test]
fn test_spawn_failure_is_encode_error() {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let audio = fx.media("track.mp3", MediaInfo::audio(5.0));
    fx.spawner.add_spawn_error_expectation(
        "concat=n=1",
        CoreError::CommandStart(
            "ffmpeg".to_string(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "ffmpeg not found"),
        ),
    );

    let request = AssemblyRequest::new([a], audio, fx.path("o.mp4"));
    let result = fx.pipeline().run(&request, &NullProgressReporter);
    assert!(matches!(result, Err(CoreError::EncodeError(_))));
}

#[test]
fn test_existing_output_is_replaced() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let audio = fx.media("track.mp3", MediaInfo::audio(5.0));
    let output = fx.path("final.mp4");
    fs::write(&output, b"stale")?;
    fx.spawner.add_success_expectation("concat=n=1", vec![], true);

    fx.pipeline()
        .run(&AssemblyRequest::new([a], audio, output.clone()), &NullProgressReporter)?;

    assert_eq!(fs::read(&output)?, b"mock ffmpeg output");
    Ok(())
}

#[test]
fn test_staging_happens_in_temp_dir() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let audio = fx.media("track.mp3", MediaInfo::audio(5.0));
    let staging = fx.path("staging");
    let output = fx.path("out").join("final.mp4");
    fx.spawner.add_success_expectation("concat=n=1", vec![], true);

    let request = AssemblyRequest::new([a], audio, output.clone()).with_temp_dir(&staging);
    fx.pipeline().run(&request, &NullProgressReporter)?;

    let calls = fx.spawner.get_received_calls();
    let target = PathBuf::from(calls[0].last().expect("output argument"));
    assert!(target.starts_with(&staging));
    assert!(output.is_file());
    assert!(fx.leftover_files(&staging).is_empty());
    Ok(())
}

#[test]
fn test_identical_requests_plan_identically() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let b = fx.media("b.mp4", MediaInfo::video(2.0, 640, 360));
    let audio = fx.media("track.mp3", MediaInfo::audio(10.0));
    let request = AssemblyRequest::new([a, b], audio, fx.path("o.mp4"));

    let mut pipeline = fx.pipeline();
    let first = pipeline.compose(&request, &NullProgressReporter)?;
    let second = pipeline.compose(&request, &NullProgressReporter)?;

    assert_eq!(first, second);
    assert_eq!(first.filter_complex(), second.filter_complex());
    assert_eq!(first.video.canvas.width, 1280);
    Ok(())
}

#[test]
fn test_pipeline_can_run_again_after_failure() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new();
    let a = fx.media("a.mp4", MediaInfo::video(3.0, 1280, 720));
    let audio = fx.media("track.mp3", MediaInfo::audio(5.0));
    let mut pipeline = fx.pipeline();

    let bad = AssemblyRequest::new(Vec::<PathBuf>::new(), audio.clone(), fx.path("o.mp4"));
    assert!(pipeline.run(&bad, &NullProgressReporter).is_err());

    fx.spawner.add_success_expectation("concat=n=1", vec![], true);
    let good = AssemblyRequest::new([a], audio, fx.path("o.mp4"));
    pipeline.run(&good, &NullProgressReporter)?;

    assert_eq!(pipeline.state(), PipelineState::Done);
    assert_eq!(pipeline.failed_during(), None);
    assert_eq!(pipeline.history().first(), Some(&PipelineState::Idle));
    Ok(())
}
