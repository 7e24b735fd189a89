//! Process executor port
//!
//! Defines how a resolved [`ProcessInvocation`] is actually started.
//! Executors deliver raw output lines; classification happens in
//! [`ProcessRunner`](crate::use_cases::run_process::ProcessRunner).

use async_trait::async_trait;
use buildrig_domain::{OutputLine, OutputStream, ProcessInvocation};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Invocation failures: the tool never produced an exit code.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Executable not found: {}", .0.display())]
    ExecutableMissing(PathBuf),

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running process: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Receives raw output lines from a running child, in arrival order.
pub trait LineSink: Send {
    fn line(&mut self, stream: OutputStream, text: &str);
}

/// Receives classified output lines (implemented by the presentation layer).
pub trait OutputSink: Send + Sync {
    fn on_line(&self, line: &OutputLine);
}

/// Sink that drops every line.
pub struct NoOutput;

impl OutputSink for NoOutput {
    fn on_line(&self, _line: &OutputLine) {}
}

impl LineSink for NoOutput {
    fn line(&mut self, _stream: OutputStream, _text: &str) {}
}

/// Starts processes, locally or elsewhere
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Whether `path` names an existing file where processes run.
    async fn file_exists(&self, path: &Path) -> bool;

    /// Run `invocation` to completion, streaming every output line to `sink`.
    ///
    /// Returns the exit code (`-1` when the child was killed by a signal).
    /// When the invocation carries an output file, stdout is written there
    /// instead of `sink`. Cancelling `cancel` kills the child and yields
    /// [`RunError::Cancelled`].
    async fn run(
        &self,
        invocation: &ProcessInvocation,
        sink: &mut dyn LineSink,
        cancel: &CancellationToken,
    ) -> Result<i32, RunError>;
}
