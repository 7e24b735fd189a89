//! MSBuild invocation settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use super::{dir_arg, path_arg, require};
use crate::command_line::CommandLine;
use crate::core::error::DomainError;
use crate::process::{LogLevel, OutputClassifier};

const OPERATION: &str = "msbuild";

/// MSBuild logger verbosity (`/v:`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    Minimal,
    Normal,
    Detailed,
    Diagnostic,
}

impl Verbosity {
    pub fn as_str(self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Minimal => "minimal",
            Verbosity::Normal => "normal",
            Verbosity::Detailed => "detailed",
            Verbosity::Diagnostic => "diagnostic",
        }
    }
}

impl FromStr for Verbosity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "q" | "quiet" => Ok(Verbosity::Quiet),
            "m" | "minimal" => Ok(Verbosity::Minimal),
            "n" | "normal" => Ok(Verbosity::Normal),
            "d" | "detailed" => Ok(Verbosity::Detailed),
            "diag" | "diagnostic" => Ok(Verbosity::Diagnostic),
            other => Err(DomainError::invalid(
                OPERATION,
                "verbosity",
                format!("unknown verbosity '{}'", other),
            )),
        }
    }
}

/// Settings for building a project or solution with MSBuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsBuildSettings {
    /// Project or solution file (required)
    pub project: Option<PathBuf>,
    /// Targets joined into `/t:`
    pub targets: Vec<String>,
    pub configuration: Option<String>,
    pub platform: Option<String>,
    /// Rendered as `/p:OutDir=` with a trailing separator
    pub output_dir: Option<PathBuf>,
    pub verbosity: Option<Verbosity>,
    /// Extra `/p:Name=Value` properties
    pub properties: BTreeMap<String, String>,
    /// Free-form arguments appended verbatim
    pub additional_arguments: Option<String>,
}

impl MsBuildSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        require(self.project.as_ref(), OPERATION, "project")?;
        if let Some(bad) = self
            .targets
            .iter()
            .find(|t| t.trim().is_empty() || t.contains(char::is_whitespace))
        {
            return Err(DomainError::invalid(
                OPERATION,
                "targets",
                format!("'{}' is not a valid target name", bad),
            ));
        }
        Ok(())
    }

    pub fn command_line(&self) -> Result<CommandLine, DomainError> {
        self.validate()?;
        let project = require(self.project.as_ref(), OPERATION, "project")?;

        let mut cmd = CommandLine::new().arg(path_arg(project));
        if !self.targets.is_empty() {
            cmd.append(format!("/t:{}", self.targets.join(";")));
        }
        cmd = cmd
            .msbuild_property("Configuration", self.configuration.as_deref())
            .msbuild_property("Platform", self.platform.as_deref())
            .msbuild_property(
                "OutDir",
                self.output_dir.as_deref().map(dir_arg).as_deref(),
            );
        for (name, value) in &self.properties {
            cmd = cmd.msbuild_property(name, Some(value));
        }
        if let Some(verbosity) = self.verbosity {
            cmd.append(format!("/v:{}", verbosity.as_str()));
        }
        Ok(cmd.raw(self.additional_arguments.as_deref()))
    }

    /// MSBuild lines are informational, with structured logger lines decoded.
    pub fn classifier() -> OutputClassifier {
        OutputClassifier::new(LogLevel::Information)
            .with_warning_promotion()
            .with_structured_lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_command_line() {
        let mut properties = BTreeMap::new();
        properties.insert("TreatWarningsAsErrors".to_string(), "true".to_string());
        let settings = MsBuildSettings {
            project: Some(PathBuf::from("src/My App.sln")),
            targets: vec!["Clean".to_string(), "Build".to_string()],
            configuration: Some("Release".to_string()),
            platform: Some("Any CPU".to_string()),
            output_dir: Some(PathBuf::from(r"C:\drop")),
            verbosity: Some(Verbosity::Minimal),
            properties,
            additional_arguments: Some("/m".to_string()),
        };

        assert_eq!(
            settings.command_line().unwrap().render(),
            "\"src/My App.sln\" /t:Clean;Build /p:Configuration=Release \"/p:Platform=Any CPU\" /p:OutDir=C:\\drop\\ /p:TreatWarningsAsErrors=true /v:minimal /m "
        );
    }

    #[test]
    fn project_is_required() {
        let error = MsBuildSettings::default().command_line().unwrap_err();
        assert_eq!(error, DomainError::missing("msbuild", "project"));
    }

    #[test]
    fn target_with_space_is_rejected() {
        let settings = MsBuildSettings {
            project: Some(PathBuf::from("a.csproj")),
            targets: vec!["Re build".to_string()],
            ..Default::default()
        };
        assert_eq!(settings.validate().unwrap_err().field(), "targets");
    }

    #[test]
    fn verbosity_accepts_short_names() {
        assert_eq!("diag".parse::<Verbosity>().unwrap(), Verbosity::Diagnostic);
        assert_eq!("M".parse::<Verbosity>().unwrap(), Verbosity::Minimal);
        assert!("loud".parse::<Verbosity>().is_err());
    }
}
