//! Application layer for buildrig
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::Toolchain;
pub use ports::{
    executable_probe::ExecutableProbe,
    file_system::{FileSystemPort, ScratchFile},
    invocation_logger::{InvocationEvent, InvocationLogger, NoInvocationLogger},
    key_value_store::{KeyValueStore, StoreError},
    process_executor::{LineSink, NoOutput, OutputSink, ProcessExecutor, RunError},
};
pub use use_cases::collect_dependencies::CollectDependenciesUseCase;
pub use use_cases::locate_tool::{LocateError, ToolLocator};
pub use use_cases::run_dotnet::{RunDotNetInput, RunDotNetUseCase};
pub use use_cases::run_msbuild::{RunMsBuildInput, RunMsBuildUseCase};
pub use use_cases::run_process::ProcessRunner;
pub use use_cases::run_vstest::{RunVsTestInput, RunVsTestUseCase};
pub use use_cases::set_project_version::SetProjectVersionUseCase;
pub use use_cases::shared::{OperationError, ToolServices};
