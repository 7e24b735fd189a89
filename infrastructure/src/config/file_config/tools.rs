//! Tool location overrides from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! msbuild = 'C:\BuildTools\MSBuild\Current\Bin\amd64\MSBuild.exe'
//! dotnet = "/usr/share/dotnet/dotnet"
//! ```
//!
//! A configured path skips discovery for that tool entirely.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub msbuild: Option<PathBuf>,
    pub dotnet: Option<PathBuf>,
    pub vstest: Option<PathBuf>,
    pub vswhere: Option<PathBuf>,
    pub windows_sdk: Option<PathBuf>,
}

impl FileToolsConfig {
    /// `(config key, path)` for every configured override.
    pub fn configured(&self) -> Vec<(&'static str, &PathBuf)> {
        [
            ("msbuild", &self.msbuild),
            ("dotnet", &self.dotnet),
            ("vstest", &self.vstest),
            ("vswhere", &self.vswhere),
            ("windows_sdk", &self.windows_sdk),
        ]
        .into_iter()
        .filter_map(|(key, path)| path.as_ref().map(|p| (key, p)))
        .collect()
    }
}
