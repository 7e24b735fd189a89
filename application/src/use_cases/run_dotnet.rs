//! dotnet CLI use case.
//!
//! `dotnet test` runs that request a results directory also get their
//! `.trx` file parsed into the report.

use crate::ports::process_executor::OutputSink;
use crate::use_cases::shared::{OperationError, ToolServices, collect_test_results, record_run};
use buildrig_domain::{DotNetSettings, DotNetVerb, OperationReport};
use std::path::PathBuf;
use std::time::SystemTime;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Input for the [`RunDotNetUseCase`].
#[derive(Debug, Clone)]
pub struct RunDotNetInput {
    pub settings: DotNetSettings,
    pub working_dir: PathBuf,
}

pub struct RunDotNetUseCase {
    services: ToolServices,
}

impl RunDotNetUseCase {
    pub fn new(services: ToolServices) -> Self {
        Self { services }
    }

    pub async fn execute(
        &self,
        input: RunDotNetInput,
        output: &dyn OutputSink,
        cancel: &CancellationToken,
    ) -> Result<OperationReport, OperationError> {
        let command = input.settings.command_line()?;
        let verb = input.settings.verb;
        info!("dotnet {}", verb);

        let descriptor = self.services.toolchain.dotnet();
        let started = SystemTime::now();
        let result = self
            .services
            .run_tool(
                &descriptor,
                &command,
                &input.working_dir,
                &DotNetSettings::classifier(),
                output,
                cancel,
            )
            .await?;

        let mut report = OperationReport::new(format!("dotnet {}", verb));
        record_run(&mut report, "dotnet", &result);

        if verb == DotNetVerb::Test
            && let Some(dir) = &input.settings.results_dir
        {
            let dir = input.working_dir.join(dir);
            collect_test_results(self.services.files.as_ref(), &dir, started, &mut report)
                .await;
        }
        Ok(report)
    }
}
