// ============================================================================
// tripreel-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: UI Components and Styling
//
// Consistent terminal styling for the CLI: sections, status lines,
// processing steps, success and error messages. Everything is emitted
// through `log::info!` so the same lines reach the per-run log file.
//
// Terminal UI components follow a visual hierarchy:
//
// 1. Sections (===== SECTION =====) for major phases
// 2. Processing steps (» Step description)
// 3. Status items (  Label:     Value)
// 4. Success messages (✓ Success message)
//
// AI-ASSISTANT-INFO: Terminal UI components and styling for the CLI

use console::style;
use log::info;

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const PROCESSING_SYMBOL: &str = "»";
    pub const WARNING_SYMBOL: &str = "⚠";
    pub const ERROR_SYMBOL: &str = "✗";

    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    pub const STATUS_INDENT: &str = "  ";

    /// Labels are padded to this width so values line up.
    pub const LABEL_WIDTH: usize = 15;
}

/// Formats a status line (key-value pair) without printing it.
pub fn format_status(label: &str, value: &str, highlight: bool) -> String {
    let padding = styling::LABEL_WIDTH.saturating_sub(label.len()).max(1);
    let value = if highlight {
        style(value).for_stderr().bold().to_string()
    } else {
        value.to_string()
    };
    format!("{}{label}:{}{value}", styling::STATUS_INDENT, " ".repeat(padding))
}

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    info!("");
    info!(
        "{}{}{}",
        styling::SECTION_PREFIX,
        style(title.to_uppercase()).for_stderr().cyan().bold(),
        styling::SECTION_SUFFIX
    );
    info!("");
}

/// Print a status line (key-value pair)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    info!("{}", format_status(label, value, highlight));
}

/// Print a processing step message
pub fn print_processing(message: &str) {
    info!(
        "{}{} {}",
        styling::STATUS_INDENT,
        styling::PROCESSING_SYMBOL,
        style(message).for_stderr().bold()
    );
}

/// Print a success message
pub fn print_success(message: &str) {
    info!(
        "{}{} {}",
        styling::STATUS_INDENT,
        style(styling::SUCCESS_SYMBOL).for_stderr().green().bold(),
        message
    );
}

/// Print a warning message
pub fn print_warning(message: &str) {
    info!(
        "{}{} {}",
        styling::STATUS_INDENT,
        style(styling::WARNING_SYMBOL).for_stderr().yellow().bold(),
        style(message).for_stderr().yellow()
    );
}

/// Print an error message with context
///
/// # Arguments
///
/// * `title` - The error title
/// * `message` - The error message
/// * `suggestion` - Optional suggestion for fixing the error
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    info!(
        "{} {}",
        styling::ERROR_SYMBOL,
        style(title).for_stderr().red().bold()
    );
    info!("");
    info!("  Message:  {message}");
    if let Some(suggestion) = suggestion {
        info!("");
        info!("  Suggestion: {suggestion}");
    }
    info!("");
}

/// Renders quest progress as a bar of `width` cells, e.g. `[####......] 10/30`.
pub fn quest_bar(progress: u32, max: u32, width: usize) -> String {
    let filled = if max == 0 {
        width
    } else {
        ((progress.min(max) as usize) * width) / max as usize
    };
    format!(
        "[{}{}] {progress}/{max}",
        "#".repeat(filled),
        ".".repeat(width - filled)
    )
}
