//! Use cases (application business logic)

pub mod collect_dependencies;
pub mod locate_tool;
pub mod run_dotnet;
pub mod run_msbuild;
pub mod run_process;
pub mod run_vstest;
pub mod set_project_version;
pub mod shared;
