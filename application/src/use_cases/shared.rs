//! Shared plumbing for the tool-driving use cases.
//!
//! Every operation follows the same shape: validate settings, locate the
//! tool, build a command line, run it and fold the result into an
//! [`OperationReport`].

use crate::config::Toolchain;
use crate::ports::file_system::FileSystemPort;
use crate::ports::process_executor::{OutputSink, RunError};
use crate::use_cases::locate_tool::{LocateError, ToolLocator};
use crate::use_cases::run_process::ProcessRunner;
use buildrig_domain::{
    CommandLine, Diagnostic, DomainError, LogLevel, OperationReport, OutputClassifier,
    ProcessInvocation, ProcessResult, ToolDescriptor, parse_test_run,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Failures that abort an operation before it can produce a report.
#[derive(Error, Debug)]
pub enum OperationError {
    #[error(transparent)]
    Config(#[from] DomainError),

    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OperationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            OperationError::Run(RunError::Cancelled) | OperationError::Locate(LocateError::Cancelled)
        )
    }
}

/// Everything an operation needs to find and run a tool.
#[derive(Clone)]
pub struct ToolServices {
    pub toolchain: Toolchain,
    pub locator: ToolLocator,
    pub runner: ProcessRunner,
    pub files: Arc<dyn FileSystemPort>,
}

impl ToolServices {
    pub fn new(
        toolchain: Toolchain,
        locator: ToolLocator,
        runner: ProcessRunner,
        files: Arc<dyn FileSystemPort>,
    ) -> Self {
        Self {
            toolchain,
            locator,
            runner,
            files,
        }
    }

    /// Resolve a well-known tool by name.
    pub async fn locate_named(&self, name: &str) -> Result<PathBuf, OperationError> {
        let descriptor = self.toolchain.descriptor(name)?;
        Ok(self.locator.locate(&descriptor).await?)
    }

    /// Locate `descriptor` and run it with `command` in `working_dir`.
    pub(crate) async fn run_tool(
        &self,
        descriptor: &ToolDescriptor,
        command: &CommandLine,
        working_dir: &Path,
        classifier: &OutputClassifier,
        output: &dyn OutputSink,
        cancel: &CancellationToken,
    ) -> Result<ProcessResult, OperationError> {
        let executable = self.locator.locate(descriptor).await?;
        let invocation = ProcessInvocation::new(executable, command, working_dir);
        Ok(self.runner.run(&invocation, classifier, output, cancel).await?)
    }
}

/// Fold a finished tool run into `report`.
///
/// Warning lines always become warning diagnostics. Error lines become
/// error diagnostics only when the tool failed, since several tools write
/// progress to stderr on success.
pub(crate) fn record_run(report: &mut OperationReport, tool: &str, result: &ProcessResult) {
    for line in &result.lines {
        match line.level {
            LogLevel::Warning => report.push(Diagnostic::warning(tool, line.text.trim())),
            LogLevel::Error if !result.is_success() => {
                report.push(Diagnostic::error(tool, line.text.trim()))
            }
            _ => {}
        }
    }
    report.record_exit(tool, result.exit_code);
}

/// Parse the newest `.trx` file written to `results_dir` since `started`.
///
/// A missing or unreadable results file is an error diagnostic, not an
/// aborted operation. Files left over from earlier runs do not count.
pub(crate) async fn collect_test_results(
    files: &dyn FileSystemPort,
    results_dir: &Path,
    started: SystemTime,
    report: &mut OperationReport,
) {
    let source = results_dir.display().to_string();
    let trx = match files
        .newest_file(results_dir, "trx", whole_second(started))
        .await
    {
        Ok(Some(path)) => path,
        Ok(None) => {
            report.push(Diagnostic::error(
                source,
                "no .trx results file was produced by this run",
            ));
            return;
        }
        Err(e) => {
            report.push(Diagnostic::error(source, format!("cannot list results: {}", e)));
            return;
        }
    };

    let source = trx.display().to_string();
    let text = match files.read_to_string(&trx).await {
        Ok(text) => text,
        Err(e) => {
            report.push(Diagnostic::error(source, format!("cannot read results: {}", e)));
            return;
        }
    };
    match parse_test_run(&text) {
        Ok(run) => report.tests = Some(run),
        Err(e) => {
            warn!("Failed to parse {}: {}", source, e);
            report.push(Diagnostic::error(source, e.to_string()));
        }
    }
}

/// `time` rounded down to a whole second, for coarse file timestamps.
fn whole_second(time: SystemTime) -> SystemTime {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| SystemTime::UNIX_EPOCH + Duration::from_secs(d.as_secs()))
        .unwrap_or(time)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ports::process_executor::ProcessExecutor;
    use crate::use_cases::locate_tool::tests::{FakeFiles, FakeProbe, FakeStore};
    use buildrig_domain::{OutputLine, OutputStream, ToolOverrides};

    /// Services whose tools are all overridden to `/tools/<name>`.
    pub(crate) fn services(executor: Arc<dyn ProcessExecutor>, files: Arc<FakeFiles>) -> ToolServices {
        let toolchain = Toolchain::new(
            Default::default(),
            ToolOverrides {
                msbuild: Some(PathBuf::from("/tools/msbuild")),
                dotnet: Some(PathBuf::from("/tools/dotnet")),
                vstest: Some(PathBuf::from("/tools/vstest")),
                ..Default::default()
            },
        );
        let runner = ProcessRunner::new(executor);
        let locator = ToolLocator::new(
            Arc::new(FakeStore::default()),
            Arc::new(FakeProbe::default()),
            files.clone(),
            runner.clone(),
        );
        ToolServices::new(toolchain, locator, runner, files)
    }

    fn line(level: LogLevel, text: &str) -> OutputLine {
        OutputLine {
            level,
            stream: OutputStream::Stdout,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_error_lines_ignored_on_success() {
        let result = ProcessResult {
            exit_code: 0,
            lines: vec![
                line(LogLevel::Error, "progress on stderr"),
                line(LogLevel::Warning, "warning NU1603: approximate match"),
            ],
        };
        let mut report = OperationReport::new("dotnet");
        record_run(&mut report, "dotnet", &result);
        assert!(report.succeeded());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_failed_run_records_errors_and_exit() {
        let result = ProcessResult {
            exit_code: 1,
            lines: vec![line(LogLevel::Error, "error CS1002: ; expected")],
        };
        let mut report = OperationReport::new("msbuild");
        record_run(&mut report, "msbuild", &result);
        assert!(!report.succeeded());
        assert_eq!(report.exit_code, Some(1));
        assert_eq!(report.errors().count(), 2);
    }

    #[tokio::test]
    async fn test_locate_named_uses_override() {
        let executor = Arc::new(crate::use_cases::run_process::tests::ScriptedExecutor::new(&[], &[], 0));
        let services = services(executor, Arc::new(FakeFiles::default()));
        assert_eq!(
            services.locate_named("vstest").await.unwrap(),
            PathBuf::from("/tools/vstest")
        );
        assert!(matches!(
            services.locate_named("nmake").await,
            Err(OperationError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_trx_is_error_diagnostic() {
        let files = FakeFiles::default();
        let mut report = OperationReport::new("vstest");
        collect_test_results(
            &files,
            Path::new("/work/TestResults"),
            SystemTime::now(),
            &mut report,
        )
        .await;
        assert!(!report.succeeded());
        assert!(report.tests.is_none());
    }

    #[tokio::test]
    async fn test_trx_from_previous_run_is_error_diagnostic() {
        let started = SystemTime::now();
        let files = FakeFiles {
            newest: Some(PathBuf::from("/work/TestResults/yesterday.trx")),
            newest_modified: Some(started - Duration::from_secs(86_400)),
            ..Default::default()
        }
        .with_file("/work/TestResults/yesterday.trx", "<TestRun><Results /></TestRun>");
        let mut report = OperationReport::new("vstest");

        collect_test_results(&files, Path::new("/work/TestResults"), started, &mut report).await;

        assert!(report.tests.is_none());
        assert!(!report.succeeded());
        assert!(report.diagnostics[0].message.contains("by this run"));
    }

    #[test]
    fn whole_second_rounds_down() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_millis(1_700_000_000_987);
        assert_eq!(
            whole_second(time),
            SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
        );
    }
}
