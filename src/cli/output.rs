//! Console feedback for validator runs.
//!
//! Everything printed here is user facing and can be silenced with
//! `--nooutput`; diagnostics go through `tracing` instead.

use console::style;

/// Output handler for consistent CLI formatting
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    no_output: bool,
}

impl Output {
    pub fn new(no_output: bool) -> Self {
        Self { no_output }
    }

    pub fn is_enabled(&self) -> bool {
        !self.no_output
    }

    pub fn success(&self, message: &str) {
        if self.is_enabled() {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Errors go to stderr unless output is disabled.
    pub fn error(&self, message: &str) {
        if self.is_enabled() {
            eprintln!("{} {}", style("✖").red(), message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.is_enabled() {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn header(&self, title: &str) {
        if self.is_enabled() {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn category(&self, category: &str) {
        if self.is_enabled() {
            println!("\n{}", style(category).bold().cyan());
        }
    }

    pub fn key_value(&self, key: &str, value: &str, highlight: bool) {
        if self.is_enabled() {
            let styled_value = if highlight {
                style(value).green().bold()
            } else {
                style(value).white()
            };
            println!("  {} {}", style(key).dim(), styled_value);
        }
    }

    /// Unstyled text, printed as is.
    pub fn plain(&self, text: &str) {
        if self.is_enabled() {
            println!("{text}");
        }
    }

    pub fn blank_line(&self) {
        if self.is_enabled() {
            println!();
        }
    }
}
