//! Logging configuration (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Append one JSON line per tool invocation to this file
    pub invocation_log: Option<PathBuf>,
}
