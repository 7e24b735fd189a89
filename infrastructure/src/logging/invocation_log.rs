//! JSONL history of tool invocations.
//!
//! Each [`InvocationEvent`] becomes one JSON line carrying `type`,
//! `timestamp` and the `run` it belongs to. The file is opened in append
//! mode so successive `buildrig` runs share one history.

use buildrig_application::ports::invocation_logger::{InvocationEvent, InvocationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Appends invocation events to a JSONL file.
pub struct JsonlInvocationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    run: String,
}

impl JsonlInvocationLogger {
    /// Open (or create) the log at `path`.
    ///
    /// Returns `None` and logs a warning if the file cannot be opened; an
    /// unwritable history never stops a build.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create invocation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open invocation log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            run: format!(
                "{}-{}",
                chrono::Utc::now().format("%Y%m%dT%H%M%S"),
                std::process::id()
            ),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier shared by every event this logger writes.
    pub fn run_id(&self) -> &str {
        &self.run
    }

    fn record(&self, event: InvocationEvent) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let mut map = match event.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::String(event.event_type.to_string()));
        map.insert("timestamp".to_string(), Value::String(timestamp));
        map.insert("run".to_string(), Value::String(self.run.clone()));
        Value::Object(map)
    }
}

impl InvocationLogger for JsonlInvocationLogger {
    fn log(&self, event: InvocationEvent) {
        let Ok(line) = serde_json::to_string(&self.record(event)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlInvocationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_events_become_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("invocations.jsonl");
        let logger = JsonlInvocationLogger::open(&path).unwrap();

        logger.log(InvocationEvent::new(
            "process_exited",
            serde_json::json!({ "command": "dotnet build", "exit_code": 0 }),
        ));
        logger.log(InvocationEvent::new("note", serde_json::json!("plain text")));
        let run = logger.run_id().to_string();
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "process_exited");
        assert_eq!(lines[0]["exit_code"], 0);
        assert_eq!(lines[0]["run"], run.as_str());
        assert!(lines[0].get("timestamp").is_some());
        assert_eq!(lines[1]["data"], "plain text");
    }

    #[test]
    fn test_successive_loggers_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invocations.jsonl");

        for code in [0, 1] {
            let logger = JsonlInvocationLogger::open(&path).unwrap();
            logger.log(InvocationEvent::new(
                "process_exited",
                serde_json::json!({ "exit_code": code }),
            ));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["exit_code"], 1);
    }
}
