//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

pub mod finish;
pub mod list;
pub mod merge;
pub mod probe;
pub mod session;
pub mod upload;

pub use finish::run_finish;
pub use list::run_list;
pub use merge::run_merge;
pub use probe::run_probe;
pub use session::run_session;
pub use upload::run_upload;

use crate::cli::Cli;
use crate::error::CliResult;
use crate::terminal;
use tripreel_core::notifications::NtfyNotificationSender;
use tripreel_core::{LocalObjectStore, ObjectStore, TripSession};

/// Opens the S3 bucket named by `--bucket`, or the directory named by
/// `--store` when no bucket is given.
pub fn open_store(cli: &Cli) -> CliResult<Box<dyn ObjectStore>> {
    #[cfg(feature = "s3")]
    if let Some(bucket) = &cli.bucket {
        log::debug!("Using S3 bucket {bucket}");
        return Ok(Box::new(tripreel_core::storage::S3ObjectStore::new(bucket)?));
    }
    log::debug!("Using directory store {}", cli.store.display());
    Ok(Box::new(LocalObjectStore::new(&cli.store)?))
}

/// Human-readable name of the store `open_store` picks.
pub fn store_label(cli: &Cli) -> String {
    #[cfg(feature = "s3")]
    if let Some(bucket) = &cli.bucket {
        return format!("s3://{bucket}");
    }
    cli.store.display().to_string()
}

pub fn load_session(cli: &Cli) -> CliResult<TripSession> {
    TripSession::load(&cli.session)
}

/// Builds the ntfy sender for `topic`. An unusable topic is reported and
/// notifications are skipped; it never stops a run.
pub fn notification_sender(topic: Option<&str>) -> Option<NtfyNotificationSender> {
    let topic = topic?;
    match NtfyNotificationSender::new(topic) {
        Ok(sender) => {
            log::debug!("Notifications enabled for {}", sender.topic_url());
            Some(sender)
        }
        Err(e) => {
            terminal::print_warning(&format!("Notifications disabled: {e}"));
            None
        }
    }
}
