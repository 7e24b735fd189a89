//! File system port

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A temporary file, removed when dropped.
pub trait ScratchFile: Send + Sync {
    fn path(&self) -> &Path;
}

/// File access needed by the operations
#[async_trait]
pub trait FileSystemPort: Send + Sync {
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    async fn write_string(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Files under `dir` matching any of the glob `patterns` (relative to
    /// `dir`), sorted by path.
    async fn find_files(&self, dir: &Path, patterns: &[&str]) -> io::Result<Vec<PathBuf>>;

    /// Most recently modified file in `dir` with the given extension,
    /// ignoring files last modified before `since`.
    async fn newest_file(
        &self,
        dir: &Path,
        extension: &str,
        since: SystemTime,
    ) -> io::Result<Option<PathBuf>>;

    /// A fresh, empty temporary file.
    fn scratch_file(&self) -> io::Result<Box<dyn ScratchFile>>;
}
