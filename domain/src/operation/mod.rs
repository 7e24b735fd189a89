//! Per-operation settings.
//!
//! Each settings struct is plain data deserialized from configuration or
//! command-line flags. `validate` catches configuration failures before any
//! tool is located or started, and `command_line` renders the tool's
//! arguments.

pub mod dotnet;
pub mod msbuild;
pub mod vstest;
pub mod workspace;

pub use dotnet::{DotNetSettings, DotNetVerb};
pub use msbuild::{MsBuildSettings, Verbosity};
pub use vstest::VsTestSettings;
pub use workspace::{DependencySettings, VersionSettings};

use std::path::Path;

/// Path as the tools expect it in an argument.
pub(crate) fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Directory argument with a trailing separator, as MSBuild's `OutDir` requires.
pub(crate) fn dir_arg(path: &Path) -> String {
    let mut text = path_arg(path);
    if !text.ends_with('\\') && !text.ends_with('/') {
        text.push(if text.contains('/') && !text.contains('\\') {
            '/'
        } else {
            '\\'
        });
    }
    text
}

/// Reject blank required values.
pub(crate) fn require<'a, T: AsRef<Path> + ?Sized>(
    value: Option<&'a T>,
    operation: &'static str,
    field: &'static str,
) -> Result<&'a Path, crate::core::error::DomainError> {
    value
        .map(<T as AsRef<Path>>::as_ref)
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| crate::core::error::DomainError::missing(operation, field))
}
