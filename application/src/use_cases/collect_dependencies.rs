//! Dependency collection use case.
//!
//! Scans a directory tree for NuGet manifests and merges every package they
//! reference into one [`DependencyMap`]. `packages.config` files are read
//! first, then project files; within each group files are taken in path
//! order, and a later file overrides an earlier one's version.

use crate::ports::file_system::FileSystemPort;
use crate::use_cases::shared::OperationError;
use buildrig_domain::{
    ArtifactError, DependencyMap, DependencySettings, Diagnostic, OperationReport,
    parse_package_references, parse_packages_config,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

const PACKAGES_CONFIG: &[&str] = &["**/packages.config"];
const PROJECT_FILES: &[&str] = &["**/*.csproj", "**/*.vbproj", "**/*.fsproj"];

pub struct CollectDependenciesUseCase {
    files: Arc<dyn FileSystemPort>,
}

impl CollectDependenciesUseCase {
    pub fn new(files: Arc<dyn FileSystemPort>) -> Self {
        Self { files }
    }

    pub async fn execute(&self, settings: &DependencySettings) -> Result<OperationReport, OperationError> {
        settings.validate()?;
        let Some(directory) = settings.directory.as_deref() else {
            return Err(buildrig_domain::DomainError::missing("dependencies", "directory").into());
        };

        let mut report = OperationReport::new("dependencies");
        let mut dependencies = DependencyMap::new();

        let configs = self.files.find_files(directory, PACKAGES_CONFIG).await?;
        let projects = self.files.find_files(directory, PROJECT_FILES).await?;
        info!(
            "Scanning {} packages.config and {} project files under {}",
            configs.len(),
            projects.len(),
            directory.display()
        );

        for path in &configs {
            self.merge_file(path, parse_packages_config, &mut dependencies, &mut report)
                .await;
        }
        for path in &projects {
            self.merge_file(path, parse_package_references, &mut dependencies, &mut report)
                .await;
        }

        report.dependencies = Some(dependencies);
        Ok(report)
    }

    async fn merge_file(
        &self,
        path: &Path,
        parse: fn(&str) -> Result<DependencyMap, ArtifactError>,
        dependencies: &mut DependencyMap,
        report: &mut OperationReport,
    ) {
        let source = path.display().to_string();
        let parsed = match self.files.read_to_string(path).await {
            Ok(text) => parse(&text).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match parsed {
            Ok(found) => {
                debug!("{}: {} packages", source, found.len());
                dependencies.merge(found);
            }
            Err(message) => {
                warn!("Skipping {}: {}", source, message);
                report.push(Diagnostic::warning(source, message));
            }
        }
    }
}
