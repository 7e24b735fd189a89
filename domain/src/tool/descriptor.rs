//! Tool descriptor value objects

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Registry-style lookup of an install directory.
///
/// When `current_value` is set and present on `key`, its data is used as-is.
/// Otherwise the subkeys of `key` are ordered by the dotted version embedded
/// in their names (highest first) and `version_value` is read from the first
/// subkey that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryQuery {
    /// Key path relative to the local-machine hive
    pub key: String,
    /// Value holding the "current install" directory, if the key has one
    pub current_value: Option<String>,
    /// Value read from the highest-versioned subkey
    pub version_value: String,
    /// File joined onto the directory read from the store
    pub relative: Option<PathBuf>,
}

impl RegistryQuery {
    pub fn new(key: impl Into<String>, version_value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            current_value: None,
            version_value: version_value.into(),
            relative: None,
        }
    }

    pub fn with_current_value(mut self, name: impl Into<String>) -> Self {
        self.current_value = Some(name.into());
        self
    }

    pub fn with_relative(mut self, relative: impl Into<PathBuf>) -> Self {
        self.relative = Some(relative.into());
        self
    }
}

/// Query run through a helper executable that prints candidate paths as XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryQuery {
    /// How to find the helper itself
    pub helper: Box<ToolDescriptor>,
    /// Argument tokens passed to the helper
    pub arguments: Vec<String>,
    /// Candidates containing this text (case-insensitive) are preferred
    pub prefer: Option<String>,
    /// File joined onto the winning candidate's directory
    pub file_name: Option<String>,
}

impl AuxiliaryQuery {
    pub fn new<I, S>(helper: ToolDescriptor, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            helper: Box::new(helper),
            arguments: arguments.into_iter().map(Into::into).collect(),
            prefer: None,
            file_name: None,
        }
    }

    pub fn with_prefer(mut self, prefer: Option<impl Into<String>>) -> Self {
        self.prefer = prefer.map(Into::into);
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// One way of locating an external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveryStrategy {
    /// Configured path, returned as-is when non-empty
    ExplicitPath(PathBuf),
    /// Directory taken from an environment variable, joined with `relative`
    EnvironmentVariable { variable: String, relative: PathBuf },
    /// Registry-style key/value lookup
    Registry(RegistryQuery),
    /// Program looked up on `PATH`
    SearchPath { program: String },
    /// Fixed install location, used when the file exists
    WellKnownPath(PathBuf),
    /// Candidate paths printed by a helper executable
    AuxiliaryTool(AuxiliaryQuery),
}

impl DiscoveryStrategy {
    /// Short label used in log messages
    pub fn label(&self) -> &'static str {
        match self {
            DiscoveryStrategy::ExplicitPath(_) => "explicit path",
            DiscoveryStrategy::EnvironmentVariable { .. } => "environment variable",
            DiscoveryStrategy::Registry(_) => "registry",
            DiscoveryStrategy::SearchPath { .. } => "PATH",
            DiscoveryStrategy::WellKnownPath(_) => "well-known path",
            DiscoveryStrategy::AuxiliaryTool(_) => "discovery helper",
        }
    }
}

/// Which tool to find and how.
///
/// An explicit override, when given and non-empty, is always tried before
/// the configured strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    name: String,
    override_path: Option<PathBuf>,
    strategies: Vec<DiscoveryStrategy>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            override_path: None,
            strategies: Vec::new(),
        }
    }

    /// Set the override path; empty paths are ignored.
    pub fn with_override(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.override_path = path
            .map(Into::into)
            .filter(|p: &PathBuf| !p.as_os_str().is_empty());
        self
    }

    pub fn with_strategy(mut self, strategy: DiscoveryStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn override_path(&self) -> Option<&PathBuf> {
        self.override_path.as_ref()
    }

    /// Strategies in the order they must be tried.
    pub fn strategies(&self) -> Vec<DiscoveryStrategy> {
        self.override_path
            .iter()
            .map(|p| DiscoveryStrategy::ExplicitPath(p.clone()))
            .chain(self.strategies.iter().cloned())
            .collect()
    }

    /// Configuration key that overrides this tool's location.
    pub fn config_key(&self) -> String {
        self.name.replace('-', "_")
    }

    /// Text telling the user how to fix a failed lookup.
    pub fn remediation(&self) -> String {
        let key = self.config_key();
        format!(
            "set tools.{} in buildrig.toml or the BUILDRIG_TOOLS__{} environment variable",
            key,
            key.to_uppercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_comes_first() {
        let descriptor = ToolDescriptor::new("dotnet")
            .with_strategy(DiscoveryStrategy::SearchPath {
                program: "dotnet".to_string(),
            })
            .with_override(Some("/opt/dotnet/dotnet"));

        let strategies = descriptor.strategies();
        assert_eq!(strategies.len(), 2);
        assert_eq!(
            strategies[0],
            DiscoveryStrategy::ExplicitPath(PathBuf::from("/opt/dotnet/dotnet"))
        );
        assert_eq!(strategies[1].label(), "PATH");
    }

    #[test]
    fn empty_override_is_ignored() {
        let descriptor = ToolDescriptor::new("msbuild").with_override(Some(""));
        assert!(descriptor.override_path().is_none());
        assert!(descriptor.strategies().is_empty());
    }

    #[test]
    fn remediation_names_config_key() {
        let descriptor = ToolDescriptor::new("windows-sdk");
        let text = descriptor.remediation();
        assert!(text.contains("tools.windows_sdk"));
        assert!(text.contains("BUILDRIG_TOOLS__WINDOWS_SDK"));
    }
}
