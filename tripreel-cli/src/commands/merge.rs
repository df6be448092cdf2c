//! Implementation of the 'merge' subcommand.
//!
//! Runs the assembly pipeline over clips already on disk. Paths are checked
//! before ffmpeg is looked for, so a typo is reported as a missing resource
//! rather than a tooling problem.

use crate::cli::{Cli, MergeArgs};
use crate::commands::notification_sender;
use crate::config::assembly_config;
use crate::error::CliResult;
use crate::progress::TerminalReporter;
use crate::terminal;

use std::path::Path;

use tripreel_core::assembly::{AssemblyRequest, Pipeline};
use tripreel_core::external::{CrateFfprobeExecutor, SidecarSpawner};
use tripreel_core::{AssemblyReport, Assembler, CoreError, check_media_tools, format_bytes, format_duration};

/// Fails with `ResourceNotFound` for the first path that is not a file.
pub fn check_inputs_exist<'a>(paths: impl IntoIterator<Item = &'a Path>) -> CliResult<()> {
    for path in paths {
        if !path.is_file() {
            return Err(CoreError::ResourceNotFound(format!(
                "{} (no such file)",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Prints the summary of a finished assembly.
pub fn print_report(report: &AssemblyReport) {
    terminal::print_section("Assembly complete");
    terminal::print_status("Output", &report.output_path.display().to_string(), true);
    terminal::print_status("Clips", &report.clip_count.to_string(), false);
    terminal::print_status("Duration", &format!("{:.2}s", report.duration), false);
    terminal::print_status(
        "Codecs",
        &format!("{} / {}", report.video_codec, report.audio_codec),
        false,
    );
    terminal::print_status("Size", &format_bytes(report.output_size), false);
    terminal::print_status(
        "Total time",
        &format_duration(report.elapsed.as_secs_f64()),
        true,
    );
    if let Some(key) = &report.uploaded_key {
        terminal::print_status("Published as", key, true);
    }
}

pub fn run_merge(cli: &Cli, args: &MergeArgs) -> CliResult<AssemblyReport> {
    check_inputs_exist(args.clips.iter().map(|p| p.as_path()))?;
    let config = assembly_config(cli, &args.assembly)?;
    config.validate_for_assembly()?;
    if let Some(audio) = &config.audio_track {
        check_inputs_exist([audio.as_path()])?;
    }

    terminal::print_section("Initialization");
    terminal::print_status("Clips", &args.clips.len().to_string(), false);
    terminal::print_status("Output", &args.output.display().to_string(), false);
    if let Some(audio) = &config.audio_track {
        terminal::print_status("Audio track", &audio.display().to_string(), false);
    }
    terminal::print_status("Audio fit", &config.audio_fit_policy.to_string(), false);
    terminal::print_status("Fade", &format!("{}s", config.fade_secs), false);

    check_media_tools()?;

    let request = AssemblyRequest::from_config(&config, args.clips.iter(), &args.output)?;
    let sender = notification_sender(config.ntfy_topic.as_deref());
    let reporter = TerminalReporter::new();

    terminal::print_section("Assembly");
    let pipeline = Pipeline::new(SidecarSpawner, CrateFfprobeExecutor::new());
    let mut assembler = Assembler::new(pipeline, &reporter);
    if let Some(sender) = &sender {
        assembler = assembler.with_notifier(sender);
    }

    let report = assembler.merge(&request)?;
    print_report(&report);
    Ok(report)
}
