//! Terminal output for install flows
//!
//! This module provides:
//! - Reporter for step events, warnings, errors, and the success line
//! - A spinner around the blocking installer invocation using indicatif
//!
//! Step events go to stdout; warnings and errors go to stderr. Quiet mode
//! suppresses everything except errors.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Step-event reporter for a single run
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    /// Print events in bold so they stand out from streamed installer output
    debug: bool,
    /// Suppress all non-error output
    quiet: bool,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(debug: bool, quiet: bool) -> Self {
        Self { debug, quiet }
    }

    /// Create a reporter that only prints errors
    pub fn silent() -> Self {
        Self::new(false, true)
    }

    /// Announce a step
    pub fn event(&self, text: &str) {
        if self.quiet {
            return;
        }
        if self.debug {
            println!("{}", text.bold());
        } else {
            println!("{}", text);
        }
    }

    /// Warn without failing the run
    pub fn warn(&self, text: &str) {
        if self.quiet {
            return;
        }
        eprintln!("{}", text.yellow());
    }

    /// Report a fatal condition
    pub fn error(&self, text: &str) {
        eprintln!("{}", text.red());
    }

    /// Report the final success line
    pub fn success(&self, text: &str) {
        if self.quiet {
            return;
        }
        println!("{}", text.green());
    }

    /// Spinner for an indeterminate blocking step. Disabled in quiet
    /// mode and in debug mode (streamed installer output would fight
    /// with the redraws).
    pub fn progress(&self, message: &str) -> Progress {
        Progress::spinner(!self.quiet && !self.debug, message)
    }
}

/// Spinner handle for an in-flight blocking operation
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Show a spinner with a message for an indeterminate operation
    pub fn spinner(enabled: bool, message: &str) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid template"),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(spinner) }
    }

    /// Stop the spinner and remove it from the terminal
    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
