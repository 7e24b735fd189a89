//! Process runner use case.
//!
//! Runs a [`ProcessInvocation`] through a [`ProcessExecutor`], classifying
//! every output line and forwarding it to an [`OutputSink`] as it arrives.

use crate::ports::invocation_logger::{InvocationEvent, InvocationLogger, NoInvocationLogger};
use crate::ports::process_executor::{LineSink, OutputSink, ProcessExecutor, RunError};
use buildrig_domain::{OutputClassifier, OutputLine, OutputStream, ProcessInvocation, ProcessResult};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Classifies raw lines, forwards them, and keeps a copy for the result.
struct ClassifyingSink<'a> {
    classifier: &'a OutputClassifier,
    output: &'a dyn OutputSink,
    lines: Vec<OutputLine>,
}

impl LineSink for ClassifyingSink<'_> {
    fn line(&mut self, stream: OutputStream, text: &str) {
        let line = self.classifier.classify(stream, text);
        self.output.on_line(&line);
        self.lines.push(line);
    }
}

/// Executes resolved tools.
#[derive(Clone)]
pub struct ProcessRunner {
    executor: Arc<dyn ProcessExecutor>,
    invocation_logger: Arc<dyn InvocationLogger>,
}

impl ProcessRunner {
    pub fn new(executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            executor,
            invocation_logger: Arc::new(NoInvocationLogger),
        }
    }

    /// Create with an invocation logger.
    pub fn with_invocation_logger(mut self, logger: Arc<dyn InvocationLogger>) -> Self {
        self.invocation_logger = logger;
        self
    }

    pub fn executor(&self) -> &Arc<dyn ProcessExecutor> {
        &self.executor
    }

    /// Run `invocation` to completion.
    ///
    /// A missing executable is an invocation failure, reported before anything
    /// is started. A nonzero exit code is not an error here; callers decide
    /// what it means.
    pub async fn run(
        &self,
        invocation: &ProcessInvocation,
        classifier: &OutputClassifier,
        output: &dyn OutputSink,
        cancel: &CancellationToken,
    ) -> Result<ProcessResult, RunError> {
        if !self.executor.file_exists(invocation.executable()).await {
            return Err(RunError::ExecutableMissing(invocation.executable.clone()));
        }
        if cancel.is_cancelled() {
            return Err(RunError::Cancelled);
        }

        let command = invocation.display_command();
        info!("Running {}", command);
        debug!("Working directory: {}", invocation.working_dir.display());
        self.invocation_logger.log(InvocationEvent::new(
            "process_started",
            serde_json::json!({
                "command": command,
                "working_dir": invocation.working_dir.display().to_string(),
                "output_file": invocation.output_file.as_ref().map(|p| p.display().to_string()),
            }),
        ));

        let started = Instant::now();
        let mut sink = ClassifyingSink {
            classifier,
            output,
            lines: Vec::new(),
        };
        let outcome = self.executor.run(invocation, &mut sink, cancel).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(code) => {
                debug!("{} exited with {} after {}ms", command, code, elapsed_ms);
                self.invocation_logger.log(InvocationEvent::new(
                    "process_exited",
                    serde_json::json!({
                        "command": command,
                        "exit_code": code,
                        "duration_ms": elapsed_ms,
                        "lines": sink.lines.len(),
                    }),
                ));
            }
            Err(e) => {
                self.invocation_logger.log(InvocationEvent::new(
                    "process_failed",
                    serde_json::json!({
                        "command": command,
                        "error": e.to_string(),
                        "duration_ms": elapsed_ms,
                    }),
                ));
            }
        }

        Ok(ProcessResult {
            exit_code: outcome?,
            lines: sink.lines,
        })
    }
}
