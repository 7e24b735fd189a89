//! vstest.console invocation settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{path_arg, require};
use crate::command_line::CommandLine;
use crate::core::error::DomainError;
use crate::process::{LogLevel, OutputClassifier};

const OPERATION: &str = "vstest";

/// Settings for running a test container through vstest.console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VsTestSettings {
    /// Test assembly (required)
    pub test_container: Option<PathBuf>,
    /// Where the `.trx` file is written; defaults to `TestResults` under the working directory
    pub results_dir: Option<PathBuf>,
    /// `/TestCaseFilter:` expression
    pub filter: Option<String>,
    /// `.runsettings` file
    pub settings_file: Option<PathBuf>,
    /// `/Platform:` (x86, x64, ARM)
    pub platform: Option<String>,
    /// `/Framework:` (e.g. `.NETFramework,Version=v4.8`)
    pub framework: Option<String>,
    pub additional_arguments: Option<String>,
}

impl VsTestSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        require(self.test_container.as_ref(), OPERATION, "test_container")?;
        Ok(())
    }

    /// Results directory, resolved against `working_dir` when relative or unset.
    pub fn results_dir(&self, working_dir: &Path) -> PathBuf {
        match &self.results_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => working_dir.join(dir),
            None => working_dir.join("TestResults"),
        }
    }

    pub fn command_line(&self, results_dir: &Path) -> Result<CommandLine, DomainError> {
        self.validate()?;
        let container = require(self.test_container.as_ref(), OPERATION, "test_container")?;

        let mut cmd = CommandLine::new()
            .arg(path_arg(container))
            .arg("/logger:trx")
            .arg(format!("/ResultsDirectory:{}", path_arg(results_dir)));
        if let Some(filter) = self.filter.as_deref().filter(|f| !f.is_empty()) {
            cmd.append(format!("/TestCaseFilter:{}", filter));
        }
        if let Some(file) = &self.settings_file {
            cmd.append(format!("/Settings:{}", path_arg(file)));
        }
        if let Some(platform) = self.platform.as_deref().filter(|p| !p.is_empty()) {
            cmd.append(format!("/Platform:{}", platform));
        }
        if let Some(framework) = self.framework.as_deref().filter(|f| !f.is_empty()) {
            cmd.append(format!("/Framework:{}", framework));
        }
        Ok(cmd.raw(self.additional_arguments.as_deref()))
    }

    pub fn classifier() -> OutputClassifier {
        OutputClassifier::new(LogLevel::Information).with_warning_promotion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_with_filter() {
        let settings = VsTestSettings {
            test_container: Some(PathBuf::from("bin/Tests.dll")),
            filter: Some("TestCategory=Unit".to_string()),
            platform: Some("x64".to_string()),
            ..Default::default()
        };
        let results = PathBuf::from("/work/Test Results");
        assert_eq!(
            settings.command_line(&results).unwrap().render(),
            "bin/Tests.dll /logger:trx \"/ResultsDirectory:/work/Test Results\" /TestCaseFilter:TestCategory=Unit /Platform:x64 "
        );
    }

    #[test]
    fn results_dir_defaults_under_working_dir() {
        let settings = VsTestSettings::default();
        assert_eq!(
            settings.results_dir(Path::new("/work")),
            PathBuf::from("/work/TestResults")
        );

        let relative = VsTestSettings {
            results_dir: Some(PathBuf::from("out")),
            ..Default::default()
        };
        assert_eq!(relative.results_dir(Path::new("/work")), PathBuf::from("/work/out"));
    }

    #[test]
    fn container_is_required() {
        assert_eq!(
            VsTestSettings::default().validate().unwrap_err().field(),
            "test_container"
        );
    }
}
