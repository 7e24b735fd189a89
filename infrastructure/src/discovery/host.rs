//! Host layout detection.

use buildrig_domain::HostLayout;
use std::path::PathBuf;

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Install roots of the current machine.
pub fn detect_host_layout() -> HostLayout {
    HostLayout {
        program_files: env_path("ProgramW6432").or_else(|| env_path("ProgramFiles")),
        program_files_x86: env_path("ProgramFiles(x86)"),
        is_64bit: cfg!(target_pointer_width = "64")
            || std::env::var_os("PROCESSOR_ARCHITEW6432").is_some(),
        windows: cfg!(windows),
    }
}
