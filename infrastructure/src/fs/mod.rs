//! Local file system adapter.

use async_trait::async_trait;
use buildrig_application::ports::file_system::{FileSystemPort, ScratchFile};
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempPath;
use tracing::debug;

/// Temporary file removed on drop.
struct TempScratch(TempPath);

impl ScratchFile for TempScratch {
    fn path(&self) -> &Path {
        &self.0
    }
}

/// [`FileSystemPort`] over `tokio::fs` and `glob`.
#[derive(Debug, Default, Clone)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn glob_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
}

fn find_blocking(dir: &Path, patterns: &[String]) -> io::Result<Vec<PathBuf>> {
    let root = glob::Pattern::escape(&dir.to_string_lossy());
    let options = glob::MatchOptions {
        case_sensitive: false,
        ..Default::default()
    };
    let mut found = BTreeSet::new();
    for pattern in patterns {
        let full = format!("{}/{}", root.trim_end_matches(['/', '\\']), pattern);
        for entry in glob::glob_with(&full, options).map_err(glob_error)? {
            match entry {
                Ok(path) if path.is_file() => {
                    found.insert(path);
                }
                Ok(_) => {}
                Err(e) => debug!("Skipping unreadable entry: {}", e),
            }
        }
    }
    Ok(found.into_iter().collect())
}

#[async_trait]
impl FileSystemPort for LocalFileSystem {
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write_string(&self, path: &Path, contents: &str) -> io::Result<()> {
        tokio::fs::write(path, contents).await
    }

    async fn find_files(&self, dir: &Path, patterns: &[&str]) -> io::Result<Vec<PathBuf>> {
        if !tokio::fs::metadata(dir).await?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", dir.display()),
            ));
        }
        let dir = dir.to_path_buf();
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        tokio::task::spawn_blocking(move || find_blocking(&dir, &patterns))
            .await
            .map_err(io::Error::other)?
    }

    async fn newest_file(
        &self,
        dir: &Path,
        extension: &str,
        since: SystemTime,
    ) -> io::Result<Option<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let matches = path
                .extension()
                .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(extension));
            if !matches {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified()?;
            if modified < since {
                debug!("Skipping {}: older than the run", path.display());
                continue;
            }
            if newest.as_ref().is_none_or(|(time, _)| modified > *time) {
                newest = Some((modified, path));
            }
        }
        Ok(newest.map(|(_, path)| path))
    }

    fn scratch_file(&self) -> io::Result<Box<dyn ScratchFile>> {
        let path = tempfile::Builder::new()
            .prefix("buildrig-")
            .suffix(".xml")
            .tempfile()?
            .into_temp_path();
        Ok(Box::new(TempScratch(path)))
    }
}
