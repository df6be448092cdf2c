// ============================================================================
// tripreel-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger to the terminal, optionally teed to a file
//
// Terminal output (sections, status lines, errors) goes through the `log`
// macros, so a single env_logger backend serves both the console and the
// per-run log file. Lines written to the file have ANSI styling stripped.
//
// USAGE:
// - RUST_LOG=info (default): Normal operation logs
// - RUST_LOG=debug or --verbose: Detailed debugging information
//
// AI-ASSISTANT-INFO: Logging initialisation and log file tee

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::CliResult;
use tripreel_core::CoreError;

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Log file name for one run of `command`.
pub fn log_file_name(command: &str) -> String {
    format!("tripreel_{command}_{}.log", get_timestamp())
}

/// Writes everything to stderr and an ANSI-free copy to a file.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(&strip_ansi_escapes::strip(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Initialises env_logger. With `log_dir`, a log file for `command` is
/// created there and its path returned.
pub fn init(verbose: bool, log_dir: Option<&Path>, command: &str) -> CliResult<Option<PathBuf>> {
    let env = env_logger::Env::default().default_filter_or(default_filter(verbose));
    let mut builder = env_logger::Builder::from_env(env);
    builder.format(|buf, record| {
        // Info lines are the terminal UI; everything else is labelled.
        if record.level() == log::Level::Info {
            writeln!(buf, "{}", record.args())
        } else {
            writeln!(buf, "[{}] {}", record.level(), record.args())
        }
    });

    let log_path = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| {
                CoreError::PathError(format!(
                    "Failed to create log directory '{}': {e}",
                    dir.display()
                ))
            })?;
            let path = dir.join(log_file_name(command));
            let file = File::create(&path)?;
            builder.target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
            Some(path)
        }
        None => None,
    };

    // A second init (tests calling run twice) keeps the first logger.
    if builder.try_init().is_err() {
        log::debug!("Logger already initialised");
    }
    if let Some(path) = &log_path {
        log::debug!("Log file: {}", path.display());
    }
    Ok(log_path)
}
