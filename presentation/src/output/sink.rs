//! Live echo of classified tool output.

use buildrig_application::OutputSink;
use buildrig_domain::{LogLevel, OutputLine};
use colored::Colorize;
use std::io::Write;

/// Prints tool output lines as they arrive, colored by level.
///
/// Errors always go to stderr. Everything else goes to stdout unless
/// `to_stderr` is set, which keeps stdout clean for JSON reports.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleOutput {
    show_debug: bool,
    to_stderr: bool,
}

impl ConsoleOutput {
    pub fn new() -> Self {
        Self {
            show_debug: false,
            to_stderr: false,
        }
    }

    /// Also print lines classified as debug.
    pub fn with_debug(mut self, show: bool) -> Self {
        self.show_debug = show;
        self
    }

    pub fn with_stderr(mut self, to_stderr: bool) -> Self {
        self.to_stderr = to_stderr;
        self
    }

    /// Text to print for `line`, or `None` when it is filtered out.
    pub fn render(&self, line: &OutputLine) -> Option<String> {
        match line.level {
            LogLevel::Debug if !self.show_debug => None,
            LogLevel::Debug => Some(line.text.dimmed().to_string()),
            LogLevel::Information => Some(line.text.clone()),
            LogLevel::Warning => Some(line.text.yellow().to_string()),
            LogLevel::Error => Some(line.text.red().to_string()),
        }
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for ConsoleOutput {
    fn on_line(&self, line: &OutputLine) {
        let Some(text) = self.render(line) else {
            return;
        };
        // Write errors (e.g. a closed pipe) are ignored.
        if line.level == LogLevel::Error || self.to_stderr {
            let _ = writeln!(std::io::stderr().lock(), "{}", text);
        } else {
            let _ = writeln!(std::io::stdout().lock(), "{}", text);
        }
    }
}
