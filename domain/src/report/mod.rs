//! Diagnostics and operation reports.
//!
//! Components return what went wrong instead of logging it; the caller
//! decides how to surface each [`Diagnostic`].

use serde::{Deserialize, Serialize};

use crate::artifact::ParsedTestRun;
use crate::dependency::DependencyMap;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The operation did not achieve its goal.
    Error,
    /// Something was skipped or looked wrong, but the operation carried on.
    Warning,
}

/// A message attributed to the file or tool it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// File path or tool name the message is about
    pub source: String,
    pub message: String,
}

impl Diagnostic {
    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            source: source.into(),
            message: message.into(),
        }
    }

    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            source: source.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", label, self.source, self.message)
    }
}

/// What an operation produced, successful or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationReport {
    /// Name of the operation (e.g. "msbuild", "dotnet build")
    pub operation: String,
    /// Exit code of the tool, when one was run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests: Option<ParsedTestRun>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyMap>,
    /// Files written by the operation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed_files: Vec<String>,
}

impl OperationReport {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Record a tool exit code; nonzero codes add an error diagnostic.
    pub fn record_exit(&mut self, tool: &str, exit_code: i32) {
        self.exit_code = Some(exit_code);
        if exit_code != 0 {
            self.push(Diagnostic::error(
                tool,
                format!("process exited with code {}", exit_code),
            ));
        }
    }

    /// True when no error diagnostic was recorded and no test failed.
    pub fn succeeded(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_error)
            && !self.tests.as_ref().is_some_and(ParsedTestRun::has_failures)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonzero_exit_fails_report() {
        let mut report = OperationReport::new("msbuild");
        report.record_exit("msbuild", 1);
        assert!(!report.succeeded());
        assert_eq!(report.exit_code, Some(1));
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn warnings_alone_still_succeed() {
        let mut report = OperationReport::new("dependencies");
        report.push(Diagnostic::warning("bad.csproj", "malformed XML"));
        report.record_exit("dotnet", 0);
        assert!(report.succeeded());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn diagnostic_display_names_source() {
        let diagnostic = Diagnostic::error("vstest", "no .trx file produced");
        assert_eq!(diagnostic.to_string(), "error: vstest: no .trx file produced");
    }
}
