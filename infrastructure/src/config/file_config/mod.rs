//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod msbuild;
mod output;
mod remote;
mod tools;

pub use logging::FileLoggingConfig;
pub use msbuild::FileMsBuildConfig;
pub use output::FileOutputConfig;
pub use remote::FileRemoteConfig;
pub use tools::FileToolsConfig;

use buildrig_domain::ToolOverrides;
use serde::{Deserialize, Serialize};

/// A problem found in an otherwise loadable configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted key the issue is about
    pub key: String,
    pub message: String,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Tool path overrides
    pub tools: FileToolsConfig,
    /// MSBuild discovery preferences
    pub msbuild: FileMsBuildConfig,
    /// Remote execution
    pub remote: FileRemoteConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Invocation history
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Overrides handed to the tool descriptors.
    pub fn tool_overrides(&self) -> ToolOverrides {
        ToolOverrides {
            msbuild: self.tools.msbuild.clone(),
            dotnet: self.tools.dotnet.clone(),
            vstest: self.tools.vstest.clone(),
            vswhere: self.tools.vswhere.clone(),
            windows_sdk: self.tools.windows_sdk.clone(),
            prefer_architecture: self
                .msbuild
                .prefer_architecture
                .clone()
                .filter(|a| !a.trim().is_empty()),
        }
    }

    /// Validate the configuration, returning all detected issues.
    ///
    /// Overrides are only checked when tools run locally; remote paths
    /// cannot be verified here.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.remote.host.is_some() && self.remote.host().is_none() {
            issues.push(ConfigIssue {
                key: "remote.host".to_string(),
                message: "remote.host is blank; tools will run locally".to_string(),
            });
        }
        if self.remote.host().is_some() && self.remote.ssh_program.trim().is_empty() {
            issues.push(ConfigIssue {
                key: "remote.ssh_program".to_string(),
                message: "remote.ssh_program cannot be empty".to_string(),
            });
        }

        if self.remote.host().is_none() {
            for (key, path) in self.tools.configured() {
                if !path.as_os_str().is_empty() && !path.is_file() {
                    issues.push(ConfigIssue {
                        key: format!("tools.{}", key),
                        message: format!("tools.{}: {} does not exist", key, path.display()),
                    });
                }
            }
        }

        issues
    }
}
