//! MSBuild use case.

use crate::ports::process_executor::OutputSink;
use crate::use_cases::shared::{OperationError, ToolServices, record_run};
use buildrig_domain::{MsBuildSettings, OperationReport};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Input for the [`RunMsBuildUseCase`].
#[derive(Debug, Clone)]
pub struct RunMsBuildInput {
    pub settings: MsBuildSettings,
    /// Directory MSBuild runs in
    pub working_dir: PathBuf,
}

/// Builds a project or solution with MSBuild.
pub struct RunMsBuildUseCase {
    services: ToolServices,
}

impl RunMsBuildUseCase {
    pub fn new(services: ToolServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        input: RunMsBuildInput,
        output: &dyn OutputSink,
        cancel: &CancellationToken,
    ) -> Result<OperationReport, OperationError> {
        let command = input.settings.command_line()?;
        info!(
            "MSBuild: {}",
            input
                .settings
                .project
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        );

        let descriptor = self.services.toolchain.msbuild();
        let result = self
            .services
            .run_tool(
                &descriptor,
                &command,
                &input.working_dir,
                &MsBuildSettings::classifier(),
                output,
                cancel,
            )
            .await?;

        let mut report = OperationReport::new("msbuild");
        record_run(&mut report, "msbuild", &result);
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
    use buildrig_domain::process::encode_structured;
    use buildrig_domain::{LogLevel, OutputStream};
    use std::sync::Arc;

    fn input() -> RunMsBuildInput {
        RunMsBuildInput {
            settings: MsBuildSettings {
                project: Some(PathBuf::from("App.sln")),
                configuration: Some("Release".to_string()),
                ..Default::default()
            },
            working_dir: PathBuf::from("/work"),
        }
    }

    #[tokio::test]
    async fn test_successful_build_collects_warnings() {
        let warning = encode_structured(LogLevel::Warning, "MSB3277: conflicting references");
        let executor = Arc::new(ScriptedExecutor::new(
            &["/tools/msbuild"],
            &[
                (OutputStream::Stdout, "Build started."),
                (OutputStream::Stdout, warning.as_str()),
            ],
            0,
        ));
        let use_case = RunMsBuildUseCase::new(services(executor.clone(), Arc::new(FakeFiles::default())));

        let report = use_case
            .execute(input(), &NoOutput, &CancellationToken::new())
            .await
            .unwrap();

        assert!(report.succeeded());
        assert_eq!(report.exit_code, Some(0));
        assert_eq!(report.warnings().count(), 1);

        let seen = executor.invocations();
        assert_eq!(seen[0].working_dir, PathBuf::from("/work"));
        assert!(seen[0].arguments.starts_with("App.sln "));
        assert!(seen[0].arguments.contains("/p:Configuration=Release"));
    }

    #[tokio::test]
    async fn test_missing_project_aborts_before_running() {
        let executor = Arc::new(ScriptedExecutor::new(&["/tools/msbuild"], &[], 0));
        let use_case = RunMsBuildUseCase::new(services(executor.clone(), Arc::new(FakeFiles::default())));
        let mut input = input();
        input.settings.project = None;

        let result = use_case
            .execute(input, &NoOutput, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(OperationError::Config(_))));
        assert!(executor.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_missing_executable_aborts() {
        let executor = Arc::new(ScriptedExecutor::new(&[], &[], 0));
        let use_case = RunMsBuildUseCase::new(services(executor, Arc::new(FakeFiles::default())));

        let result = use_case
            .execute(input(), &NoOutput, &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(OperationError::Run(crate::ports::process_executor::RunError::ExecutableMissing(_)))
        ));
    }
}
