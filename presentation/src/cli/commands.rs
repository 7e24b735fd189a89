//! CLI command definitions

use buildrig_domain::{
    DependencySettings, DotNetSettings, DotNetVerb, MsBuildSettings, OutputFormat,
    VersionFields, VersionSettings, VsTestSettings, operation::Verbosity,
};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// CLI arguments for buildrig
#[derive(Parser, Debug)]
#[command(name = "buildrig")]
#[command(author, version, about = "Locate and drive .NET build tools")]
#[command(long_about = r#"
buildrig finds MSBuild, the dotnet host and vstest.console on the current
machine (or a remote one over ssh), runs them with properly quoted command
lines and turns their output into a structured report.

Configuration files are loaded from (in priority order):
1. BUILDRIG_* environment variables (e.g. BUILDRIG_TOOLS__MSBUILD)
2. --config <path>     Explicit config file
3. ./buildrig.toml     Project-level config (or ./.buildrig.toml)
4. ~/.config/buildrig/config.toml   Global config

Example:
  buildrig build App.sln -t Rebuild -c Release
  buildrig dotnet test tests/App.Tests.csproj --results-dir TestResults
  buildrig test bin/App.Tests.dll --filter "TestCategory=Fast"
  buildrig locate msbuild
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Do not echo tool output while it runs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Report format (text or json)
    #[arg(long, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Also write diagnostics to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a project or solution with MSBuild
    Build(BuildArgs),
    /// Run a dotnet CLI verb (build, publish, pack, test, restore)
    Dotnet(DotNetArgs),
    /// Run tests with vstest.console and parse the results
    Test(TestArgs),
    /// Collect NuGet package references under a directory
    Deps(DepsArgs),
    /// Stamp version properties into project files
    SetVersion(SetVersionArgs),
    /// Print the resolved path of a tool
    Locate(LocateArgs),
    /// Show configuration sources and effective values
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project or solution file
    pub project: PathBuf,

    /// Targets to run (can be specified multiple times)
    #[arg(short, long = "target", value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Build configuration (e.g. Debug, Release)
    #[arg(short, long)]
    pub configuration: Option<String>,

    /// Target platform (e.g. x64, "Any CPU")
    #[arg(long)]
    pub platform: Option<String>,

    /// Output directory, passed as OutDir
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Logger verbosity (quiet, minimal, normal, detailed, diagnostic)
    #[arg(long, value_name = "LEVEL")]
    pub verbosity: Option<Verbosity>,

    /// Extra MSBuild property (NAME=VALUE, can be specified multiple times)
    #[arg(short = 'p', long = "property", value_name = "NAME=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Additional arguments appended verbatim
    #[arg(short, long = "args", value_name = "TEXT", allow_hyphen_values = true)]
    pub additional_arguments: Option<String>,
}

impl BuildArgs {
    pub fn into_settings(self) -> MsBuildSettings {
        MsBuildSettings {
            project: Some(self.project),
            targets: self.targets,
            configuration: self.configuration,
            platform: self.platform,
            output_dir: self.output_dir,
            verbosity: self.verbosity,
            properties: self.properties.into_iter().collect::<BTreeMap<_, _>>(),
            additional_arguments: self.additional_arguments,
        }
    }
}

#[derive(Args, Debug)]
pub struct DotNetArgs {
    /// dotnet verb
    pub verb: DotNetVerb,

    /// Project or solution file
    pub project: PathBuf,

    /// Build configuration
    #[arg(short, long)]
    pub configuration: Option<String>,

    /// Target framework moniker
    #[arg(short, long)]
    pub framework: Option<String>,

    /// Runtime identifier
    #[arg(short, long)]
    pub runtime: Option<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Version suffix for build, publish and pack
    #[arg(long, value_name = "SUFFIX")]
    pub version_suffix: Option<String>,

    /// Skip the implicit restore
    #[arg(long)]
    pub no_restore: bool,

    /// Write a .trx file here and parse it (test only)
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Additional arguments appended verbatim
    #[arg(short, long = "args", value_name = "TEXT", allow_hyphen_values = true)]
    pub additional_arguments: Option<String>,
}

impl DotNetArgs {
    pub fn into_settings(self) -> DotNetSettings {
        DotNetSettings {
            verb: self.verb,
            project: Some(self.project),
            configuration: self.configuration,
            framework: self.framework,
            runtime: self.runtime,
            output: self.output,
            version_suffix: self.version_suffix,
            no_restore: self.no_restore,
            results_dir: self.results_dir,
            additional_arguments: self.additional_arguments,
        }
    }
}

#[derive(Args, Debug)]
pub struct TestArgs {
    /// Test assembly or container
    pub test_container: PathBuf,

    /// Directory for the .trx file (default: ./TestResults)
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Test case filter expression
    #[arg(long, value_name = "EXPR")]
    pub filter: Option<String>,

    /// .runsettings file
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Target platform (x86, x64, ARM)
    #[arg(long)]
    pub platform: Option<String>,

    /// Target framework version
    #[arg(long)]
    pub framework: Option<String>,

    /// Additional arguments appended verbatim
    #[arg(short, long = "args", value_name = "TEXT", allow_hyphen_values = true)]
    pub additional_arguments: Option<String>,
}

impl TestArgs {
    pub fn into_settings(self) -> VsTestSettings {
        VsTestSettings {
            test_container: Some(self.test_container),
            results_dir: self.results_dir,
            filter: self.filter,
            settings_file: self.settings,
            platform: self.platform,
            framework: self.framework,
            additional_arguments: self.additional_arguments,
        }
    }
}

#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub directory: PathBuf,
}

impl DepsArgs {
    pub fn into_settings(self) -> DependencySettings {
        DependencySettings {
            directory: Some(self.directory),
        }
    }
}

#[derive(Args, Debug)]
pub struct SetVersionArgs {
    /// Value for the Version property
    pub version: Option<String>,

    /// Directory containing the project files
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// Glob selecting project files, relative to the directory
    #[arg(long, default_value = "**/*.csproj")]
    pub pattern: String,

    /// Value for AssemblyVersion
    #[arg(long, value_name = "VERSION")]
    pub assembly_version: Option<String>,

    /// Value for FileVersion
    #[arg(long, value_name = "VERSION")]
    pub file_version: Option<String>,

    /// Value for PackageVersion
    #[arg(long, value_name = "VERSION")]
    pub package_version: Option<String>,
}

impl SetVersionArgs {
    pub fn into_settings(self) -> VersionSettings {
        VersionSettings {
            directory: Some(self.directory),
            pattern: self.pattern,
            fields: VersionFields {
                version: self.version,
                assembly_version: self.assembly_version,
                file_version: self.file_version,
                package_version: self.package_version,
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Tool name (msbuild, dotnet, vstest, vswhere, windows-sdk)
    pub tool: String,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// List every known configuration key instead
    #[arg(long)]
    pub keys: bool,
}

fn parse_property(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_arguments_map_to_settings() {
        let cli = Cli::parse_from([
            "buildrig",
            "build",
            "My App.sln",
            "-t",
            "Clean",
            "-t",
            "Build",
            "-c",
            "Release",
            "-p",
            "Version=1.2.3",
            "--verbosity",
            "minimal",
            "--args",
            "/m /nr:false",
        ]);
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };
        let settings = args.into_settings();
        assert_eq!(settings.project, Some(PathBuf::from("My App.sln")));
        assert_eq!(settings.targets, vec!["Clean", "Build"]);
        assert_eq!(settings.configuration.as_deref(), Some("Release"));
        assert_eq!(settings.verbosity, Some(Verbosity::Minimal));
        assert_eq!(
            settings.properties.get("Version").map(String::as_str),
            Some("1.2.3")
        );
        assert_eq!(settings.additional_arguments.as_deref(), Some("/m /nr:false"));
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::parse_from(["buildrig", "locate", "dotnet", "-vv", "--format", "json"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Command::Locate(LocateArgs { ref tool }) if tool == "dotnet"));
    }

    #[test]
    fn dotnet_verb_is_parsed() {
        let cli = Cli::parse_from([
            "buildrig",
            "dotnet",
            "test",
            "tests/App.Tests.csproj",
            "--results-dir",
            "out",
            "--no-restore",
        ]);
        let Command::Dotnet(args) = cli.command else {
            panic!("expected dotnet command");
        };
        let settings = args.into_settings();
        assert_eq!(settings.verb, DotNetVerb::Test);
        assert!(settings.no_restore);
        assert_eq!(settings.results_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn unknown_dotnet_verb_is_rejected() {
        assert!(Cli::try_parse_from(["buildrig", "dotnet", "deploy", "a.csproj"]).is_err());
    }

    #[test]
    fn set_version_defaults() {
        let cli = Cli::parse_from(["buildrig", "set-version", "2.0.0"]);
        let Command::SetVersion(args) = cli.command else {
            panic!("expected set-version command");
        };
        let settings = args.into_settings();
        assert_eq!(settings.pattern, "**/*.csproj");
        assert_eq!(settings.directory, Some(PathBuf::from(".")));
        assert_eq!(settings.fields.version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn property_requires_name_and_equals() {
        assert_eq!(
            parse_property("A=b=c"),
            Ok(("A".to_string(), "b=c".to_string()))
        );
        assert!(parse_property("novalue").is_err());
        assert!(parse_property("=x").is_err());
    }
}
