//! Domain layer for buildrig
//!
//! Pure types and logic for driving .NET build tooling. Nothing here performs
//! I/O: process execution, registry access and the file system are reached
//! through ports declared in `buildrig-application`.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! A [`ToolDescriptor`] names a tool and the ordered [`DiscoveryStrategy`]
//! list used to find it. An explicit override path always comes first.
//!
//! ## Invocations
//!
//! - [`CommandLine`]: quoted, space-joined argument text
//! - [`ProcessInvocation`]: executable + arguments + working directory
//! - [`OutputClassifier`]: assigns a [`LogLevel`] to every output line
//!
//! ## Artifacts
//!
//! `.trx` test results, NuGet manifests and project version properties are
//! parsed by [`artifact`] into [`ParsedTestRun`], [`DependencyMap`] and
//! [`ProjectVersionEdit`].

pub mod artifact;
pub mod command_line;
pub mod config;
pub mod core;
pub mod dependency;
pub mod operation;
pub mod process;
pub mod report;
pub mod tool;

// Re-export commonly used types
pub use artifact::{
    ArtifactError, ParsedTestRun, ProjectVersionEdit, TestOutcome, TestRecord, VersionFields,
    apply_project_version, parse_candidate_files, parse_package_references,
    parse_packages_config, parse_test_run, select_candidate,
};
pub use command_line::CommandLine;
pub use config::OutputFormat;
pub use core::error::DomainError;
pub use dependency::DependencyMap;
pub use operation::{
    DependencySettings, DotNetSettings, DotNetVerb, MsBuildSettings, Verbosity, VersionSettings,
    VsTestSettings,
};
pub use process::{
    LogLevel, OutputClassifier, OutputLine, OutputStream, ProcessInvocation, ProcessResult,
};
pub use report::{Diagnostic, OperationReport, Severity};
pub use tool::{
    AuxiliaryQuery, DiscoveryStrategy, HostLayout, RegistryQuery, ToolDescriptor, ToolOverrides,
    Version,
};
