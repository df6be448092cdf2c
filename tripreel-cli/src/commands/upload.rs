//! Implementation of the 'upload' subcommand.

use crate::cli::{Cli, UploadArgs};
use crate::commands::{load_session, open_store};
use crate::config::base_config;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;

use tripreel_core::session::QUEST_MAX;
use tripreel_core::storage::unique_upload_key;
use tripreel_core::utils::is_clip_file;
use tripreel_core::{CoreError, ObjectStore};

/// Uploads one clip under a fresh key and records it on the session.
/// Returns the new key.
pub fn run_upload(cli: &Cli, args: &UploadArgs) -> CliResult<String> {
    if !args.file.is_file() {
        return Err(CoreError::ResourceNotFound(format!(
            "{} (no such file)",
            args.file.display()
        )));
    }
    if !is_clip_file(&args.file) {
        return Err(CoreError::OperationFailed(format!(
            "{} is not an .mp4 clip",
            args.file.display()
        )));
    }

    let config = base_config(cli);
    let store = open_store(cli)?;
    let mut session = load_session(cli)?;

    let key = unique_upload_key(&config.upload_prefix, &args.file)?;
    store.upload(&args.file, &key)?;
    let progress = session.record_upload(args.category, &key);
    session
        .save(&cli.session)
        .cli_with_context(|| format!("Uploaded {key} but could not save the session"))?;

    terminal::print_success(&format!("Uploaded {} as {key}", args.file.display()));
    terminal::print_status("Category", &args.category.to_string(), false);
    terminal::print_status("Quest", &terminal::quest_bar(progress, QUEST_MAX, 20), true);
    if session.quest_complete() {
        terminal::print_success("Quest complete: ready to finish");
    }
    Ok(key)
}
