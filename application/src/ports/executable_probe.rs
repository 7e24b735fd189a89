//! Executable probe port

use std::path::{Path, PathBuf};

/// Answers "where is this program" and "does this file exist" on the
/// machine that performs discovery.
pub trait ExecutableProbe: Send + Sync {
    /// Resolve `program` against `PATH`.
    fn find_on_path(&self, program: &str) -> Option<PathBuf>;

    fn is_file(&self, path: &Path) -> bool;
}
