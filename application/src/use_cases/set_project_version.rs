//! Project version stamping use case.

use crate::ports::file_system::FileSystemPort;
use crate::use_cases::shared::OperationError;
use buildrig_domain::{Diagnostic, DomainError, OperationReport, VersionSettings, apply_project_version};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct SetProjectVersionUseCase {
    files: Arc<dyn FileSystemPort>,
}

impl SetProjectVersionUseCase {
    pub fn new(files: Arc<dyn FileSystemPort>) -> Self {
        Self { files }
    }

    /// Stamp every project file matching the settings' pattern.
    ///
    /// Files that already carry the requested values are not rewritten. A
    /// file that cannot be read, parsed or written is reported and the
    /// remaining files are still processed.
    pub async fn execute(&self, settings: &VersionSettings) -> Result<OperationReport, OperationError> {
        settings.validate()?;
        let Some(directory) = settings.directory.as_deref() else {
            return Err(DomainError::missing("set-version", "directory").into());
        };

        let mut report = OperationReport::new("set-version");
        let projects = self
            .files
            .find_files(directory, &[settings.pattern.as_str()])
            .await?;
        if projects.is_empty() {
            report.push(Diagnostic::warning(
                directory.display().to_string(),
                format!("no files match '{}'", settings.pattern),
            ));
            return Ok(report);
        }

        for path in projects {
            let source = path.display().to_string();
            let text = match self.files.read_to_string(&path).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Cannot read {}: {}", source, e);
                    report.push(Diagnostic::error(source, format!("cannot read: {}", e)));
                    continue;
                }
            };
            match apply_project_version(&text, &settings.fields) {
                Ok(edit) if edit.changed => match self.files.write_string(&path, &edit.content).await {
                    Ok(()) => {
                        info!("Updated {}", source);
                        report.changed_files.push(source);
                    }
                    Err(e) => {
                        warn!("Cannot write {}: {}", source, e);
                        report.push(Diagnostic::error(source, format!("cannot write: {}", e)));
                    }
                },
                Ok(_) => debug!("{} already up to date", source),
                Err(e) => {
                    warn!("Cannot update {}: {}", source, e);
                    report.push(Diagnostic::error(source, e.to_string()));
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::locate_tool::tests::FakeFiles;
    use buildrig_domain::VersionFields;
    use std::path::PathBuf;

    const PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <!-- keep me -->
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <Version>1.0.0</Version>
  </PropertyGroup>
</Project>
"#;

    fn settings(version: &str) -> VersionSettings {
        VersionSettings {
            directory: Some(PathBuf::from("/src")),
            fields: VersionFields {
                version: Some(version.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_matching_projects_are_rewritten() {
        let files = Arc::new(
            FakeFiles {
                found: vec![PathBuf::from("/src/App/App.csproj"), PathBuf::from("/src/Lib/Lib.csproj")],
                ..Default::default()
            }
            .with_file("/src/App/App.csproj", PROJECT)
            .with_file("/src/Lib/Lib.csproj", "<Library />"),
        );
        let use_case = SetProjectVersionUseCase::new(files.clone());

        let report = use_case.execute(&settings("2.1.0")).await.unwrap();

        assert_eq!(report.changed_files, vec!["/src/App/App.csproj".to_string()]);
        let written = files.text("/src/App/App.csproj").unwrap();
        assert!(written.contains("<Version>2.1.0</Version>"));
        assert!(written.contains("<!-- keep me -->"));
        // Wrong root element is reported, not fatal
        assert_eq!(report.errors().count(), 1);
        assert_eq!(files.text("/src/Lib/Lib.csproj").unwrap(), "<Library />");
    }

    #[tokio::test]
    async fn test_io_failures_do_not_stop_remaining_files() {
        let files = Arc::new(
            FakeFiles {
                found: vec![
                    PathBuf::from("/src/A/A.csproj"),
                    PathBuf::from("/src/B/B.csproj"),
                    PathBuf::from("/src/C/C.csproj"),
                ],
                read_only: vec![PathBuf::from("/src/B/B.csproj")],
                ..Default::default()
            }
            .with_file("/src/B/B.csproj", PROJECT)
            .with_file("/src/C/C.csproj", PROJECT),
        );
        let use_case = SetProjectVersionUseCase::new(files.clone());

        let report = use_case.execute(&settings("3.0.0")).await.unwrap();

        // A.csproj has no content and cannot be read; B.csproj cannot be written
        let errors: Vec<_> = report.errors().map(|d| d.source.as_str()).collect();
        assert_eq!(errors, vec!["/src/A/A.csproj", "/src/B/B.csproj"]);
        assert_eq!(report.changed_files, vec!["/src/C/C.csproj".to_string()]);
        assert!(files.text("/src/C/C.csproj").unwrap().contains("<Version>3.0.0</Version>"));
        assert_eq!(files.text("/src/B/B.csproj").unwrap(), PROJECT);
    }

    #[tokio::test]
    async fn test_unchanged_file_is_not_reported() {
        let files = Arc::new(
            FakeFiles {
                found: vec![PathBuf::from("/src/App/App.csproj")],
                ..Default::default()
            }
            .with_file("/src/App/App.csproj", PROJECT),
        );
        let use_case = SetProjectVersionUseCase::new(files);

        let report = use_case.execute(&settings("1.0.0")).await.unwrap();
        assert!(report.changed_files.is_empty());
        assert!(report.succeeded());
    }

    #[tokio::test]
    async fn test_no_matches_is_a_warning() {
        let use_case = SetProjectVersionUseCase::new(Arc::new(FakeFiles::default()));
        let report = use_case.execute(&settings("1.0.0")).await.unwrap();
        assert!(report.succeeded());
        assert_eq!(report.warnings().count(), 1);
    }

    #[tokio::test]
    async fn test_fields_are_required() {
        let use_case = SetProjectVersionUseCase::new(Arc::new(FakeFiles::default()));
        let settings = VersionSettings {
            directory: Some(PathBuf::from("/src")),
            ..Default::default()
        };
        assert!(matches!(
            use_case.execute(&settings).await,
            Err(OperationError::Config(_))
        ));
    }
}
