//! Core library for assembling trip clips into a single video using ffmpeg and ffprobe.
//!
//! This crate provides the clip assembly pipeline (load, fade, concatenate,
//! bind audio, encode), object storage for uploaded clips, the trip session
//! with its quest progress, and push notifications around assembly runs.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use tripreel_core::assembly::Pipeline;
//! use tripreel_core::external::{CrateFfprobeExecutor, SidecarSpawner};
//! use tripreel_core::finish::Assembler;
//! use tripreel_core::notifications::NtfyNotificationSender;
//! use tripreel_core::progress_reporting::NullProgressReporter;
//! use tripreel_core::storage::{LocalObjectStore, list_clip_keys};
//! use tripreel_core::{CoreConfigBuilder, TripSession};
//! use std::path::{Path, PathBuf};
//!
//! let config = CoreConfigBuilder::new()
//!     .store_dir(PathBuf::from("/srv/tripreel/bucket"))
//!     .work_dir(PathBuf::from("/srv/tripreel/work"))
//!     .audio_track(PathBuf::from("/srv/tripreel/audio/lost_found.mp3"))
//!     .build();
//! config.validate_for_assembly().unwrap();
//!
//! let store = LocalObjectStore::new(&config.store_dir).unwrap();
//! let keys = list_clip_keys(&store, &config.upload_prefix).unwrap();
//! let mut session = TripSession::load(Path::new("session.json")).unwrap();
//!
//! let sender = NtfyNotificationSender::new("https://ntfy.sh/my-trip").unwrap();
//! let pipeline = Pipeline::new(SidecarSpawner, CrateFfprobeExecutor::new());
//! let mut assembler = Assembler::new(pipeline, &NullProgressReporter).with_notifier(&sender);
//!
//! let report = assembler
//!     .finish(&store, &mut session, &config, &keys, &config.default_output_path())
//!     .unwrap();
//! println!("{:.1}s video published as {:?}", report.duration, report.uploaded_key);
//! ```

pub mod assembly;
pub mod config;
pub mod error;
pub mod external;
pub mod finish;
pub mod notifications;
pub mod progress_reporting;
pub mod session;
pub mod storage;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use assembly::{AssemblyRequest, AudioFitPolicy, OutputVideo, Pipeline, PipelineState};
pub use config::{CoreConfig, CoreConfigBuilder};
pub use error::{CoreError, CoreResult};
pub use external::{MediaInfo, check_dependency, check_media_tools};
pub use finish::{AssemblyReport, Assembler};
pub use session::{AttractionCategory, TravelerProfile, TripSession};
pub use storage::{LocalObjectStore, ObjectStore};
pub use utils::{format_bytes, format_duration, parse_ffmpeg_time};
