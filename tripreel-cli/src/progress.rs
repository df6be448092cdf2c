// ============================================================================
// tripreel-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: Terminal implementation of the core reporter trait
//
// Pipeline stages and messages are printed through the terminal module;
// encode progress drives an indicatif bar on stderr, hidden when stderr is
// not a terminal so redirected runs only see the log lines.
//
// AI-ASSISTANT-INFO: CLI progress reporter backed by indicatif

use std::cell::RefCell;
use std::io::IsTerminal;
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tripreel_core::PipelineState;
use tripreel_core::progress_reporting::{OutputLevel, ProgressReporter};

use crate::terminal;

/// Reporter printing pipeline stages and an encode progress bar.
#[derive(Default)]
pub struct TerminalReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar_style() -> ProgressStyle {
        let term_width = Term::stderr().size().1 as usize;
        let template = if term_width >= 80 {
            "  ⧖ Encoding: {percent:>3}% [{bar:30}] ({elapsed_precise} / eta {eta_precise})"
        } else {
            "  ⧖ {percent:>3}% [{bar:15}]"
        };
        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##.")
    }

    fn new_bar(total_secs: f64) -> ProgressBar {
        let bar = ProgressBar::new((total_secs.max(0.0) * 1000.0) as u64);
        bar.set_style(Self::bar_style());
        if !std::io::stderr().is_terminal() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }
}

impl ProgressReporter for TerminalReporter {
    fn output(&self, level: OutputLevel, text: &str) {
        match level {
            OutputLevel::Section => terminal::print_section(text),
            OutputLevel::Processing => terminal::print_processing(text),
            OutputLevel::Success => terminal::print_success(text),
            OutputLevel::Warning => terminal::print_warning(text),
            OutputLevel::Error => terminal::print_error(text, text, None),
            OutputLevel::Info => log::info!("  {text}"),
        }
    }

    fn stage(&self, state: PipelineState) {
        match state {
            PipelineState::Idle => {}
            PipelineState::Done => terminal::print_success(state.description()),
            // The error itself is printed by main.
            PipelineState::Failed => log::debug!("{}", state.description()),
            _ => terminal::print_processing(state.description()),
        }
    }

    fn progress(&self, percent: f32, elapsed_secs: f64, total_secs: f64) {
        let mut slot = self.bar.borrow_mut();
        let bar = slot.get_or_insert_with(|| Self::new_bar(total_secs));
        bar.set_position((elapsed_secs.max(0.0) * 1000.0) as u64);
        log::debug!("Encoding progress: {percent:.1}%");
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}
