//! `dotnet` CLI invocation settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use super::{path_arg, require};
use crate::command_line::CommandLine;
use crate::core::error::DomainError;
use crate::process::{LogLevel, OutputClassifier};

const OPERATION: &str = "dotnet";

/// The `dotnet` sub-command to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotNetVerb {
    #[default]
    Build,
    Publish,
    Pack,
    Test,
    Restore,
}

impl DotNetVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            DotNetVerb::Build => "build",
            DotNetVerb::Publish => "publish",
            DotNetVerb::Pack => "pack",
            DotNetVerb::Test => "test",
            DotNetVerb::Restore => "restore",
        }
    }

    /// `restore` takes no build options.
    fn builds(self) -> bool {
        !matches!(self, DotNetVerb::Restore)
    }
}

impl std::fmt::Display for DotNetVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DotNetVerb {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "build" => Ok(DotNetVerb::Build),
            "publish" => Ok(DotNetVerb::Publish),
            "pack" => Ok(DotNetVerb::Pack),
            "test" => Ok(DotNetVerb::Test),
            "restore" => Ok(DotNetVerb::Restore),
            other => Err(DomainError::invalid(
                OPERATION,
                "verb",
                format!("unknown verb '{}'", other),
            )),
        }
    }
}

/// Settings for a `dotnet build|publish|pack|test|restore` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotNetSettings {
    pub verb: DotNetVerb,
    /// Project, solution or directory (required)
    pub project: Option<PathBuf>,
    pub configuration: Option<String>,
    pub framework: Option<String>,
    pub runtime: Option<String>,
    pub output: Option<PathBuf>,
    /// Only meaningful for build, publish and pack
    pub version_suffix: Option<String>,
    pub no_restore: bool,
    /// For `test`: write a `.trx` log into this directory
    pub results_dir: Option<PathBuf>,
    pub additional_arguments: Option<String>,
}

impl DotNetSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        require(self.project.as_ref(), OPERATION, "project")?;
        if self.version_suffix.as_deref().is_some_and(|s| !s.is_empty())
            && matches!(self.verb, DotNetVerb::Test | DotNetVerb::Restore)
        {
            return Err(DomainError::invalid(
                OPERATION,
                "version_suffix",
                format!("not supported by 'dotnet {}'", self.verb),
            ));
        }
        if self.results_dir.is_some() && self.verb != DotNetVerb::Test {
            return Err(DomainError::invalid(
                OPERATION,
                "results_dir",
                format!("only supported by 'dotnet test', not '{}'", self.verb),
            ));
        }
        Ok(())
    }

    pub fn command_line(&self) -> Result<CommandLine, DomainError> {
        self.validate()?;
        let project = require(self.project.as_ref(), OPERATION, "project")?;

        let mut cmd = CommandLine::new()
            .arg(self.verb.as_str())
            .arg(path_arg(project));

        if self.verb.builds() {
            let output = self.output.as_deref().map(path_arg);
            cmd = cmd
                .option("-c", self.configuration.as_deref())
                .option("-f", self.framework.as_deref())
                .option("-r", self.runtime.as_deref())
                .option("-o", output.as_deref())
                .option("--version-suffix", self.version_suffix.as_deref())
                .flag("--no-restore", self.no_restore);
        } else {
            cmd = cmd.option("-r", self.runtime.as_deref());
        }

        if let Some(dir) = &self.results_dir {
            cmd = cmd
                .arg("--logger")
                .arg("trx")
                .arg("--results-directory")
                .arg(path_arg(dir));
        }

        Ok(cmd.raw(self.additional_arguments.as_deref()))
    }

    pub fn classifier() -> OutputClassifier {
        OutputClassifier::new(LogLevel::Debug).with_warning_promotion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(verb: DotNetVerb) -> DotNetSettings {
        DotNetSettings {
            verb,
            project: Some(PathBuf::from("src/App/App.csproj")),
            ..Default::default()
        }
    }

    #[test]
    fn publish_command_line() {
        let settings = DotNetSettings {
            configuration: Some("Release".to_string()),
            runtime: Some("win-x64".to_string()),
            output: Some(PathBuf::from("out dir")),
            version_suffix: Some("beta1".to_string()),
            no_restore: true,
            additional_arguments: Some("--self-contained".to_string()),
            ..project(DotNetVerb::Publish)
        };
        assert_eq!(
            settings.command_line().unwrap().render(),
            "publish src/App/App.csproj -c Release -r win-x64 -o \"out dir\" --version-suffix beta1 --no-restore --self-contained "
        );
    }

    #[test]
    fn restore_ignores_build_options() {
        let settings = DotNetSettings {
            configuration: Some("Release".to_string()),
            no_restore: true,
            ..project(DotNetVerb::Restore)
        };
        assert_eq!(
            settings.command_line().unwrap().render(),
            "restore src/App/App.csproj "
        );
    }

    #[test]
    fn test_with_results_dir_requests_trx_logger() {
        let settings = DotNetSettings {
            results_dir: Some(PathBuf::from("TestResults")),
            ..project(DotNetVerb::Test)
        };
        assert_eq!(
            settings.command_line().unwrap().render(),
            "test src/App/App.csproj --logger trx --results-directory TestResults "
        );
    }

    #[test]
    fn version_suffix_rejected_for_test() {
        let settings = DotNetSettings {
            version_suffix: Some("rc".to_string()),
            ..project(DotNetVerb::Test)
        };
        assert_eq!(settings.validate().unwrap_err().field(), "version_suffix");
    }

    #[test]
    fn results_dir_rejected_for_build() {
        let settings = DotNetSettings {
            results_dir: Some(PathBuf::from("r")),
            ..project(DotNetVerb::Build)
        };
        assert_eq!(settings.validate().unwrap_err().field(), "results_dir");
    }

    #[test]
    fn verb_parsing() {
        assert_eq!("Pack".parse::<DotNetVerb>().unwrap(), DotNetVerb::Pack);
        assert_eq!("deploy".parse::<DotNetVerb>().unwrap_err().field(), "verb");
    }

    #[test]
    fn project_is_required() {
        assert_eq!(
            DotNetSettings::default().validate().unwrap_err(),
            DomainError::missing("dotnet", "project")
        );
    }
}
