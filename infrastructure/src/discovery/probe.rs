//! `PATH` and file-existence probe.

use buildrig_application::ports::executable_probe::ExecutableProbe;
use std::path::{Path, PathBuf};

/// Probe backed by the `which` crate and the local file system.
#[derive(Debug, Default, Clone)]
pub struct WhichProbe;

impl WhichProbe {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutableProbe for WhichProbe {
    fn find_on_path(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
