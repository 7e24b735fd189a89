//! A single execution of a resolved tool and what it produced.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::command_line::CommandLine;

/// Everything needed to start one child process.
///
/// Built right before execution and not reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInvocation {
    /// Resolved executable path
    pub executable: PathBuf,
    /// Rendered argument string
    pub arguments: String,
    /// The same arguments as separate tokens
    #[serde(default, skip_serializing)]
    pub argv: Vec<String>,
    /// Directory the child runs in
    pub working_dir: PathBuf,
    /// When set, stdout is written to this file instead of being streamed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
}

impl ProcessInvocation {
    pub fn new(
        executable: impl Into<PathBuf>,
        arguments: &CommandLine,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executable: executable.into(),
            arguments: arguments.render(),
            argv: arguments.argv(),
            working_dir: working_dir.into(),
            output_file: None,
        }
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Command line as it would be typed, for logs.
    pub fn display_command(&self) -> String {
        let exe = self.executable.display().to_string();
        let exe = if exe.contains(' ') {
            format!("\"{}\"", exe)
        } else {
            exe
        };
        format!("{} {}", exe, self.arguments).trim_end().to_string()
    }
}

/// Which pipe a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Severity assigned to an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Information,
    Warning,
    Error,
}

impl LogLevel {
    /// Level carried by a structured output line's level byte.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(LogLevel::Debug),
            1 => Some(LogLevel::Information),
            2 => Some(LogLevel::Warning),
            3 => Some(LogLevel::Error),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            LogLevel::Debug => 0,
            LogLevel::Information => 1,
            LogLevel::Warning => 2,
            LogLevel::Error => 3,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Debug => "debug",
            LogLevel::Information => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// One classified line of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLine {
    pub level: LogLevel,
    pub stream: OutputStream,
    pub text: String,
}

/// Outcome of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Exit code as reported by the child; `-1` when it was killed by a signal
    pub exit_code: i32,
    /// Output lines in the order they were delivered
    pub lines: Vec<OutputLine>,
}

impl ProcessResult {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn count_at(&self, level: LogLevel) -> usize {
        self.lines.iter().filter(|l| l.level == level).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_renders_arguments_once() {
        let args = CommandLine::new().arg("build").arg("My App.csproj");
        let invocation = ProcessInvocation::new("/usr/bin/dotnet", &args, "/src");
        assert_eq!(invocation.arguments, "build \"My App.csproj\" ");
        assert_eq!(invocation.argv, vec!["build", "My App.csproj"]);
        assert_eq!(
            invocation.display_command(),
            "/usr/bin/dotnet build \"My App.csproj\""
        );
        assert!(invocation.output_file.is_none());
    }

    #[test]
    fn display_quotes_executable_with_spaces() {
        let invocation =
            ProcessInvocation::new("C:/Program Files/dotnet/dotnet.exe", &CommandLine::new(), ".");
        assert_eq!(
            invocation.display_command(),
            "\"C:/Program Files/dotnet/dotnet.exe\""
        );
    }

    #[test]
    fn level_codes_round_trip() {
        for level in [
            LogLevel::Debug,
            LogLevel::Information,
            LogLevel::Warning,
            LogLevel::Error,
        ] {
            assert_eq!(LogLevel::from_code(level.code()), Some(level));
        }
        assert_eq!(LogLevel::from_code(9), None);
    }

    #[test]
    fn result_success_is_exit_code_zero() {
        let result = ProcessResult {
            exit_code: 0,
            lines: vec![OutputLine {
                level: LogLevel::Warning,
                stream: OutputStream::Stdout,
                text: "warning CS0168".to_string(),
            }],
        };
        assert!(result.is_success());
        assert_eq!(result.count_at(LogLevel::Warning), 1);
        assert!(!ProcessResult { exit_code: 2, lines: vec![] }.is_success());
    }
}
