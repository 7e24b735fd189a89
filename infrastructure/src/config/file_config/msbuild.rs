//! MSBuild discovery preferences (`[msbuild]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMsBuildConfig {
    /// Substring preferred among vswhere candidates (`amd64`, `arm64`, ...).
    /// Defaults to `amd64` on 64-bit hosts.
    pub prefer_architecture: Option<String>,
}
