// tripreel-cli/src/main.rs
//
// Entry point for the tripreel command-line tool.
//
// Parses arguments, sets up logging (console, plus a per-run log file for
// the commands that run the assembly pipeline), dispatches to the command
// implementations, and turns errors into a red error block and exit code 1.

use clap::Parser;
use std::process;

use tripreel_cli::error::suggestion_for;
use tripreel_cli::{Cli, CliResult, Commands, commands, config, logging, terminal};

fn run(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Merge(args) => commands::run_merge(cli, args).map(|_| ()),
        Commands::Upload(args) => commands::run_upload(cli, args).map(|_| ()),
        Commands::List => commands::run_list(cli).map(|_| ()),
        Commands::Finish(args) => commands::run_finish(cli, args).map(|_| ()),
        Commands::Session(args) => commands::run_session(cli, args),
        Commands::Probe(args) => commands::run_probe(args),
    }
}

fn main() {
    let cli = Cli::parse();

    let log_dir = cli
        .command
        .writes_log_file()
        .then(|| config::log_dir(&cli));
    if let Err(e) = logging::init(cli.verbose, log_dir.as_deref(), cli.command.name()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    log::debug!("Run started: {}", chrono::Local::now());

    if let Err(e) = run(&cli) {
        terminal::print_error("Error", &e.to_string(), suggestion_for(&e));
        log::debug!("Run failed at: {}", chrono::Local::now());
        process::exit(1);
    }
    log::debug!("Finished at: {}", chrono::Local::now());
}
