//! VSTest use case.
//!
//! Runs a test container through vstest.console with the trx logger, then
//! parses the `.trx` this run wrote to the results directory. A failed test makes
//! the report unsuccessful even when the runner exited with 0.

use crate::ports::process_executor::OutputSink;
use crate::use_cases::shared::{OperationError, ToolServices, collect_test_results, record_run};
use buildrig_domain::{OperationReport, TestOutcome, VsTestSettings};
use std::path::PathBuf;
use std::time::SystemTime;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Input for the [`RunVsTestUseCase`].
#[derive(Debug, Clone)]
pub struct RunVsTestInput {
    pub settings: VsTestSettings,
    pub working_dir: PathBuf,
}

pub struct RunVsTestUseCase {
    services: ToolServices,
}

impl RunVsTestUseCase {
    pub fn new(services: ToolServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        input: RunVsTestInput,
        output: &dyn OutputSink,
        cancel: &CancellationToken,
    ) -> Result<OperationReport, OperationError> {
        let results_dir = input.settings.results_dir(&input.working_dir);
        let command = input.settings.command_line(&results_dir)?;

        let descriptor = self.services.toolchain.vstest();
        let started = SystemTime::now();
        let result = self
            .services
            .run_tool(
                &descriptor,
                &command,
                &input.working_dir,
                &VsTestSettings::classifier(),
                output,
                cancel,
            )
            .await?;

        let mut report = OperationReport::new("vstest");
        record_run(&mut report, "vstest", &result);
        collect_test_results(
            self.services.files.as_ref(),
            &results_dir,
            started,
            &mut report,
        )
        .await;

        if let Some(tests) = &report.tests {
            info!(
                "{} passed, {} failed, {} inconclusive",
                tests.count(TestOutcome::Passed),
                tests.count(TestOutcome::Failed),
                tests.count(TestOutcome::Inconclusive)
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::process_executor::NoOutput;
    use crate::use_cases::locate_tool::tests::FakeFiles;
    use crate::use_cases::run_process::tests::ScriptedExecutor;
    use crate::use_cases::shared::tests::services;
    use std::sync::Arc;

    const PASSING_RUN: &str = r#"<TestRun>
  <Results>
    <UnitTestResult testName="Adds" outcome="Passed" duration="00:00:01.5" />
    <UnitTestResult testName="Skipped" outcome="NotExecuted" />
  </Results>
</TestRun>"#;

    fn input() -> RunVsTestInput {
        RunVsTestInput {
            settings: VsTestSettings {
                test_container: Some(PathBuf::from("bin/Tests.dll")),
                ..Default::default()
            },
            working_dir: PathBuf::from("/work"),
        }
    }

    #[tokio::test]
    async fn test_results_are_parsed_from_default_directory() {
        let executor = Arc::new(ScriptedExecutor::new(&["/tools/vstest"], &[], 0));
        let files = FakeFiles {
            newest: Some(PathBuf::from("/work/TestResults/a.trx")),
            ..Default::default()
        }
        .with_file("/work/TestResults/a.trx", PASSING_RUN);
        let use_case = RunVsTestUseCase::new(services(executor.clone(), Arc::new(files)));

        let report = use_case
            .execute(input(), &NoOutput, &CancellationToken::new())
            .await
            .unwrap();

        assert!(report.succeeded());
        let tests = report.tests.as_ref().unwrap();
        assert_eq!(tests.count(TestOutcome::Passed), 1);
        assert_eq!(tests.count(TestOutcome::Inconclusive), 1);
        assert_eq!(
            executor.invocations()[0].arguments,
            "bin/Tests.dll /logger:trx /ResultsDirectory:/work/TestResults "
        );
    }

    #[tokio::test]
    async fn test_missing_trx_fails_report() {
        let executor = Arc::new(ScriptedExecutor::new(&["/tools/vstest"], &[], 0));
        let use_case = RunVsTestUseCase::new(services(executor, Arc::new(FakeFiles::default())));

        let report = use_case
            .execute(input(), &NoOutput, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.exit_code, Some(0));
        assert!(!report.succeeded());
        assert!(report.errors().any(|d| d.message.contains(".trx")));
    }
}
