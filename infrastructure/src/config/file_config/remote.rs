//! Remote execution configuration (`[remote]` section)
//!
//! ```toml
//! [remote]
//! host = "build@win-agent-01"
//! ssh_program = "ssh"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRemoteConfig {
    /// When set, tools run on this host over ssh; its login shell must be POSIX
    pub host: Option<String>,
    /// ssh client used to reach `host`
    pub ssh_program: String,
}

impl Default for FileRemoteConfig {
    fn default() -> Self {
        Self {
            host: None,
            ssh_program: "ssh".to_string(),
        }
    }
}

impl FileRemoteConfig {
    /// The remote host, ignoring blank values.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }
}
