// tripreel-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tripreel_core::{AttractionCategory, AudioFitPolicy};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Tripreel: trip clip assembly tool",
    long_about = "Uploads trip clips per attraction, tracks quest progress, and assembles \
                  the selected clips into one video with a background track via tripreel-core."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory acting as the object store bucket
    #[arg(long, global = true, value_name = "DIR", env = "TRIPREEL_STORE", default_value = "tripreel-store")]
    pub store: PathBuf,

    /// S3 bucket to use as the object store instead of --store
    #[cfg(feature = "s3")]
    #[arg(long, global = true, value_name = "BUCKET", env = "TRIPREEL_BUCKET")]
    pub bucket: Option<String>,

    /// Trip session file
    #[arg(long, global = true, value_name = "FILE", env = "TRIPREEL_SESSION", default_value = "tripreel-session.json")]
    pub session: PathBuf,

    /// Working directory for downloads and assembled output
    #[arg(long, global = true, value_name = "DIR", default_value = "tripreel-work")]
    pub work_dir: PathBuf,

    /// Directory for log files (defaults to WORK_DIR/logs)
    #[arg(long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assembles local clips into one video with a background track
    Merge(MergeArgs),
    /// Uploads a clip for an attraction and advances the quest
    Upload(UploadArgs),
    /// Lists clip keys in the store
    List,
    /// Downloads selected clips, assembles them, and publishes the result
    Finish(FinishArgs),
    /// Shows or edits the trip session
    Session(SessionArgs),
    /// Prints duration and frame size of media files
    Probe(ProbeArgs),
}

/// Assembly options shared by `merge` and `finish`.
#[derive(Args, Debug, Clone, Default)]
pub struct AssemblyArgs {
    /// Background audio track
    #[arg(long, value_name = "AUDIO_PATH", env = "TRIPREEL_AUDIO")]
    pub audio: Option<PathBuf>,

    /// Fade-out length at the tail of every clip but the last (seconds)
    #[arg(long, value_name = "SECONDS")]
    pub fade: Option<f64>,

    /// Video codec passed to ffmpeg (default: libx264)
    #[arg(long, value_name = "CODEC")]
    pub video_codec: Option<String>,

    /// Audio codec passed to ffmpeg (default: aac)
    #[arg(long, value_name = "CODEC")]
    pub audio_codec: Option<String>,

    /// What to do when the audio track is shorter than the video: loop, pad or fail
    #[arg(long, value_name = "POLICY")]
    pub audio_fit: Option<AudioFitPolicy>,

    /// Directory ffmpeg renders into before the output is replaced
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Optional: ntfy.sh topic URL for sending notifications (e.g., https://ntfy.sh/your_topic)
    #[arg(long, value_name = "TOPIC_URL", env = "TRIPREEL_NTFY_TOPIC")]
    pub ntfy: Option<String>,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Clip to include, in playback order (repeatable)
    #[arg(short = 'c', long = "clip", required = true, value_name = "CLIP_PATH")]
    pub clips: Vec<PathBuf>,

    /// Output video file
    #[arg(short = 'o', long = "output", required = true, value_name = "OUTPUT_PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub assembly: AssemblyArgs,
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Attraction the clip was filmed at: food, activity or spot
    #[arg(long, value_name = "CATEGORY")]
    pub category: AttractionCategory,

    /// Clip to upload (.mp4)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct FinishArgs {
    /// Store key to include, in playback order (repeatable)
    #[arg(short = 's', long = "select", value_name = "KEY", conflicts_with = "all")]
    pub select: Vec<String>,

    /// Include every clip uploaded in this session, in upload order
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Output video file (defaults to WORK_DIR/merged/merged_video.mp4)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Assemble even though the quest is not complete
    #[arg(long, default_value_t = false)]
    pub force: bool,

    #[command(flatten)]
    pub assembly: AssemblyArgs,
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub action: Option<SessionAction>,
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Prints the session summary and quest progress (default)
    Show,
    /// Records the traveler profile
    Profile(ProfileArgs),
    /// Records the chosen destination
    Destination {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Records the recommended attraction for a category
    Attraction {
        #[arg(long, value_name = "CATEGORY")]
        category: AttractionCategory,
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Prints the recommendation request text for the destination or an attraction
    Request {
        /// Attraction category; without it the destination request is printed
        #[arg(long, value_name = "CATEGORY")]
        category: Option<AttractionCategory>,
    },
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[arg(long, value_name = "COUNT")]
    pub party_size: String,
    /// Who the traveler is going with (friends, family, ...)
    #[arg(long, value_name = "WHO")]
    pub companions: String,
    #[arg(long, value_name = "MODE")]
    pub transport: String,
    #[arg(long, value_name = "BUDGET")]
    pub budget: String,
    #[arg(long, value_name = "AGES")]
    pub ages: String,
    #[arg(long, value_name = "GENDERS")]
    pub genders: String,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Media files to probe
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Commands {
    /// Short name used in log file names.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Merge(_) => "merge",
            Commands::Upload(_) => "upload",
            Commands::List => "list",
            Commands::Finish(_) => "finish",
            Commands::Session(_) => "session",
            Commands::Probe(_) => "probe",
        }
    }

    /// Whether the command runs the assembly pipeline and gets a log file.
    pub fn writes_log_file(&self) -> bool {
        matches!(self, Commands::Merge(_) | Commands::Finish(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_merge_basic_args() {
        let cli = Cli::parse_from([
            "tripreel", "merge", "--clip", "a.mp4", "--clip", "b.mp4", "--output", "out.mp4",
            "--audio", "track.mp3",
        ]);

        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.clips, vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")]);
                assert_eq!(args.output, PathBuf::from("out.mp4"));
                assert_eq!(args.assembly.audio, Some(PathBuf::from("track.mp3")));
                assert!(args.assembly.fade.is_none());
                assert!(args.assembly.audio_fit.is_none());
            }
            other => panic!("Expected Merge command, got {other:?}"),
        }
        assert_eq!(cli.store, PathBuf::from("tripreel-store"));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_merge_with_overrides() {
        let cli = Cli::parse_from([
            "tripreel", "merge", "-c", "a.mp4", "-o", "out.mkv", "--fade", "0.25",
            "--video-codec", "libx265", "--audio-codec", "libopus", "--audio-fit", "pad",
        ]);

        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.assembly.fade, Some(0.25));
                assert_eq!(args.assembly.video_codec.as_deref(), Some("libx265"));
                assert_eq!(args.assembly.audio_codec.as_deref(), Some("libopus"));
                assert_eq!(args.assembly.audio_fit, Some(AudioFitPolicy::PadSilence));
            }
            other => panic!("Expected Merge command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_upload_category() {
        let cli = Cli::parse_from([
            "tripreel", "--store", "/bucket", "upload", "--category", "spot", "clip.mp4",
        ]);

        match cli.command {
            Commands::Upload(args) => {
                assert_eq!(args.category, AttractionCategory::TouristSpot);
                assert_eq!(args.file, PathBuf::from("clip.mp4"));
            }
            other => panic!("Expected Upload command, got {other:?}"),
        }
        assert_eq!(cli.store, PathBuf::from("/bucket"));
    }

    #[test]
    fn test_finish_select_conflicts_with_all() {
        let result = Cli::try_parse_from([
            "tripreel", "finish", "--select", "uploaded/a.mp4", "--all",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_session_defaults_to_no_action() {
        let cli = Cli::parse_from(["tripreel", "session"]);
        match cli.command {
            Commands::Session(args) => assert!(args.action.is_none()),
            other => panic!("Expected Session command, got {other:?}"),
        }
    }
}
