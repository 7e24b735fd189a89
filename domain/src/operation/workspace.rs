//! Settings for operations that read or rewrite project files directly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::require;
use crate::artifact::VersionFields;
use crate::core::error::DomainError;

/// Collect NuGet dependencies under a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencySettings {
    /// Directory searched recursively (required)
    pub directory: Option<PathBuf>,
}

impl DependencySettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        require(self.directory.as_ref(), "dependencies", "directory")?;
        Ok(())
    }
}

/// Stamp version properties into project files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionSettings {
    /// Directory searched for project files (required)
    pub directory: Option<PathBuf>,
    /// Glob relative to `directory`
    pub pattern: String,
    pub fields: VersionFields,
}

impl Default for VersionSettings {
    fn default() -> Self {
        Self {
            directory: None,
            pattern: "**/*.csproj".to_string(),
            fields: VersionFields::default(),
        }
    }
}

impl VersionSettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        require(self.directory.as_ref(), "set-version", "directory")?;
        if self.pattern.trim().is_empty() {
            return Err(DomainError::missing("set-version", "pattern"));
        }
        if self.fields.is_empty() {
            return Err(DomainError::invalid(
                "set-version",
                "fields",
                "at least one of version, assembly_version, file_version or package_version is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_settings_need_a_field() {
        let settings = VersionSettings {
            directory: Some(PathBuf::from(".")),
            ..Default::default()
        };
        assert_eq!(settings.validate().unwrap_err().field(), "fields");
    }

    #[test]
    fn dependency_settings_need_a_directory() {
        assert_eq!(
            DependencySettings::default().validate().unwrap_err(),
            DomainError::missing("dependencies", "directory")
        );
    }
}
