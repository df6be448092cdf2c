//! Implementation of the 'finish' subcommand.
//!
//! Downloads the selected clips from the store, assembles them, publishes
//! the result under the merged key, and saves the session.

use crate::cli::{Cli, FinishArgs};
use crate::commands::merge::print_report;
use crate::commands::{load_session, notification_sender, open_store};
use crate::config::assembly_config;
use crate::error::{CliErrorContext, CliResult};
use crate::progress::TerminalReporter;
use crate::terminal;

use tripreel_core::assembly::Pipeline;
use tripreel_core::external::{CrateFfprobeExecutor, SidecarSpawner};
use tripreel_core::session::QUEST_MAX;
use tripreel_core::{AssemblyReport, Assembler, check_media_tools};

pub fn run_finish(cli: &Cli, args: &FinishArgs) -> CliResult<AssemblyReport> {
    let config = assembly_config(cli, &args.assembly)?;
    let store = open_store(cli)?;
    let mut session = load_session(cli)?;

    let selected = if args.all {
        session.uploaded_keys()
    } else {
        args.select.clone()
    };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.default_output_path());

    let reporter = TerminalReporter::new();
    let sender = notification_sender(config.ntfy_topic.as_deref());
    let pipeline = Pipeline::new(SidecarSpawner, CrateFfprobeExecutor::new());
    let mut assembler = Assembler::new(pipeline, &reporter).require_complete_quest(!args.force);
    if let Some(sender) = &sender {
        assembler = assembler.with_notifier(sender);
    }

    // Selection and quest problems are reported before looking for ffmpeg.
    assembler.check_ready(&session, &selected)?;
    config.validate_for_assembly()?;

    terminal::print_section("Initialization");
    terminal::print_status("Clips", &selected.len().to_string(), false);
    terminal::print_status("Output", &output.display().to_string(), false);
    terminal::print_status(
        "Quest",
        &terminal::quest_bar(session.progress, QUEST_MAX, 20),
        false,
    );
    if args.force && !session.quest_complete() {
        terminal::print_warning("Quest incomplete; assembling anyway (--force)");
    }

    check_media_tools()?;

    terminal::print_section("Assembly");
    let report = assembler.finish(store.as_ref(), &mut session, &config, &selected, &output)?;
    session
        .save(&cli.session)
        .cli_context("Video published but the session could not be saved")?;

    print_report(&report);
    Ok(report)
}
