//! Implementation of the 'probe' subcommand.

use crate::cli::ProbeArgs;
use crate::commands::merge::check_inputs_exist;
use crate::error::CliResult;
use crate::terminal;

use tripreel_core::external::{CrateFfprobeExecutor, FfprobeExecutor};
use tripreel_core::{check_dependency, format_duration};

pub fn run_probe(args: &ProbeArgs) -> CliResult<()> {
    check_inputs_exist(args.files.iter().map(|p| p.as_path()))?;
    check_dependency("ffprobe")?;

    let prober = CrateFfprobeExecutor::new();
    let mut total = 0.0;
    for file in &args.files {
        let info = prober.probe(file)?;
        let duration = info.duration.unwrap_or(0.0);
        total += duration;

        let frame = match (info.width, info.height) {
            (Some(w), Some(h)) if info.has_video => format!("{w}x{h}"),
            _ => "no video".to_string(),
        };
        let audio = if info.has_audio { "audio" } else { "no audio" };
        terminal::print_status(
            &file.display().to_string(),
            &format!("{duration:.2}s ({}), {frame}, {audio}", format_duration(duration)),
            false,
        );
    }

    if args.files.len() > 1 {
        terminal::print_status("Total", &format!("{total:.2}s"), true);
    }
    Ok(())
}
