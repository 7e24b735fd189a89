//! Descriptors for the build tools this workspace drives.
//!
//! | Tool | Strategies after the configured override |
//! |------|-------------------------------------------|
//! | `vswhere` | Visual Studio installer directory, `PATH` |
//! | `msbuild` | vswhere, `MSBuild\ToolsVersions` registry key, `PATH` |
//! | `dotnet` | `DOTNET_ROOT`, `PATH`, `%ProgramFiles%\dotnet` |
//! | `vstest` | vswhere, `PATH` |
//! | `windows-sdk` | `Microsoft SDKs\Windows` registry key |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::descriptor::{AuxiliaryQuery, DiscoveryStrategy, RegistryQuery, ToolDescriptor};

pub const VSWHERE: &str = "vswhere";
pub const MSBUILD: &str = "msbuild";
pub const DOTNET: &str = "dotnet";
pub const VSTEST: &str = "vstest";
pub const WINDOWS_SDK: &str = "windows-sdk";

/// Every tool name [`descriptor_for`] knows about.
pub const KNOWN_TOOLS: [&str; 5] = [MSBUILD, DOTNET, VSTEST, VSWHERE, WINDOWS_SDK];

const MSBUILD_TOOLS_VERSIONS_KEY: &str = r"SOFTWARE\Microsoft\MSBuild\ToolsVersions";
const WINDOWS_SDK_KEY: &str = r"SOFTWARE\Microsoft\Microsoft SDKs\Windows";

/// Install roots of the machine the tools run on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostLayout {
    /// `%ProgramFiles%`
    pub program_files: Option<PathBuf>,
    /// `%ProgramFiles(x86)%`
    pub program_files_x86: Option<PathBuf>,
    /// Whether 64-bit tool builds should be preferred
    pub is_64bit: bool,
    /// Whether executables carry an `.exe` suffix
    pub windows: bool,
}

impl HostLayout {
    fn exe(&self, stem: &str) -> String {
        if self.windows {
            format!("{}.exe", stem)
        } else {
            stem.to_string()
        }
    }

    fn vswhere_install_path(&self) -> Option<PathBuf> {
        self.program_files_x86.as_ref().map(|root| {
            root.join("Microsoft Visual Studio")
                .join("Installer")
                .join("vswhere.exe")
        })
    }
}

/// Explicit tool paths supplied by configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolOverrides {
    pub msbuild: Option<PathBuf>,
    pub dotnet: Option<PathBuf>,
    pub vstest: Option<PathBuf>,
    pub vswhere: Option<PathBuf>,
    pub windows_sdk: Option<PathBuf>,
    /// Candidate substring preferred among vswhere results (e.g. `amd64`)
    pub prefer_architecture: Option<String>,
}

pub fn vswhere(layout: &HostLayout, override_path: Option<&Path>) -> ToolDescriptor {
    let mut descriptor = ToolDescriptor::new(VSWHERE).with_override(override_path);
    if let Some(path) = layout.vswhere_install_path() {
        descriptor = descriptor.with_strategy(DiscoveryStrategy::WellKnownPath(path));
    }
    descriptor.with_strategy(DiscoveryStrategy::SearchPath {
        program: VSWHERE.to_string(),
    })
}

fn vswhere_find(requires: &str, find: &str) -> Vec<String> {
    [
        "-products", "*", "-nologo", "-format", "xml", "-utf8", "-latest", "-sort", "-requires",
        requires, "-find", find,
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

pub fn msbuild(layout: &HostLayout, overrides: &ToolOverrides) -> ToolDescriptor {
    let prefer = overrides
        .prefer_architecture
        .clone()
        .or_else(|| layout.is_64bit.then(|| "amd64".to_string()));

    let query = AuxiliaryQuery::new(
        vswhere(layout, overrides.vswhere.as_deref()),
        vswhere_find("Microsoft.Component.MSBuild", r"MSBuild\**\Bin\MSBuild.exe"),
    )
    .with_prefer(prefer)
    .with_file_name("MSBuild.exe");

    ToolDescriptor::new(MSBUILD)
        .with_override(overrides.msbuild.as_deref())
        .with_strategy(DiscoveryStrategy::AuxiliaryTool(query))
        .with_strategy(DiscoveryStrategy::Registry(
            RegistryQuery::new(MSBUILD_TOOLS_VERSIONS_KEY, "MSBuildToolsPath")
                .with_relative("MSBuild.exe"),
        ))
        .with_strategy(DiscoveryStrategy::SearchPath {
            program: MSBUILD.to_string(),
        })
}

pub fn dotnet(layout: &HostLayout, overrides: &ToolOverrides) -> ToolDescriptor {
    let mut descriptor = ToolDescriptor::new(DOTNET)
        .with_override(overrides.dotnet.as_deref())
        .with_strategy(DiscoveryStrategy::EnvironmentVariable {
            variable: "DOTNET_ROOT".to_string(),
            relative: PathBuf::from(layout.exe(DOTNET)),
        })
        .with_strategy(DiscoveryStrategy::SearchPath {
            program: DOTNET.to_string(),
        });
    if let Some(root) = &layout.program_files {
        descriptor = descriptor.with_strategy(DiscoveryStrategy::WellKnownPath(
            root.join("dotnet").join(layout.exe(DOTNET)),
        ));
    }
    descriptor
}

pub fn vstest(layout: &HostLayout, overrides: &ToolOverrides) -> ToolDescriptor {
    let query = AuxiliaryQuery::new(
        vswhere(layout, overrides.vswhere.as_deref()),
        vswhere_find(
            "Microsoft.VisualStudio.PackageGroup.TestTools.Core",
            r"**\vstest.console.exe",
        ),
    )
    .with_file_name("vstest.console.exe");

    ToolDescriptor::new(VSTEST)
        .with_override(overrides.vstest.as_deref())
        .with_strategy(DiscoveryStrategy::AuxiliaryTool(query))
        .with_strategy(DiscoveryStrategy::SearchPath {
            program: "vstest.console".to_string(),
        })
}

pub fn windows_sdk(overrides: &ToolOverrides) -> ToolDescriptor {
    ToolDescriptor::new(WINDOWS_SDK)
        .with_override(overrides.windows_sdk.as_deref())
        .with_strategy(DiscoveryStrategy::Registry(
            RegistryQuery::new(WINDOWS_SDK_KEY, "InstallationFolder")
                .with_current_value("CurrentInstallFolder"),
        ))
}

/// Descriptor for a tool by its logical name.
pub fn descriptor_for(
    name: &str,
    layout: &HostLayout,
    overrides: &ToolOverrides,
) -> Option<ToolDescriptor> {
    match name {
        MSBUILD => Some(msbuild(layout, overrides)),
        DOTNET => Some(dotnet(layout, overrides)),
        VSTEST => Some(vstest(layout, overrides)),
        VSWHERE => Some(vswhere(layout, overrides.vswhere.as_deref())),
        WINDOWS_SDK => Some(windows_sdk(overrides)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows_layout() -> HostLayout {
        HostLayout {
            program_files: Some(PathBuf::from("C:/Program Files")),
            program_files_x86: Some(PathBuf::from("C:/Program Files (x86)")),
            is_64bit: true,
            windows: true,
        }
    }

    #[test]
    fn msbuild_prefers_amd64_on_64bit_hosts() {
        let descriptor = msbuild(&windows_layout(), &ToolOverrides::default());
        let strategies = descriptor.strategies();
        match &strategies[0] {
            DiscoveryStrategy::AuxiliaryTool(query) => {
                assert_eq!(query.prefer.as_deref(), Some("amd64"));
                assert_eq!(query.file_name.as_deref(), Some("MSBuild.exe"));
                assert!(query.arguments.contains(&"Microsoft.Component.MSBuild".to_string()));
                assert_eq!(query.helper.name(), VSWHERE);
            }
            other => panic!("expected discovery helper first, got {:?}", other),
        }
        assert_eq!(strategies[1].label(), "registry");
        assert_eq!(strategies[2].label(), "PATH");
    }

    #[test]
    fn configured_architecture_wins_over_host_default() {
        let overrides = ToolOverrides {
            prefer_architecture: Some("arm64".to_string()),
            ..Default::default()
        };
        let descriptor = msbuild(&windows_layout(), &overrides);
        match &descriptor.strategies()[0] {
            DiscoveryStrategy::AuxiliaryTool(query) => {
                assert_eq!(query.prefer.as_deref(), Some("arm64"))
            }
            other => panic!("unexpected strategy {:?}", other),
        }
    }

    #[test]
    fn dotnet_override_is_tried_first() {
        let overrides = ToolOverrides {
            dotnet: Some(PathBuf::from("D:/sdk/dotnet.exe")),
            ..Default::default()
        };
        let strategies = dotnet(&windows_layout(), &overrides).strategies();
        assert_eq!(
            strategies[0],
            DiscoveryStrategy::ExplicitPath(PathBuf::from("D:/sdk/dotnet.exe"))
        );
        assert_eq!(
            strategies.last(),
            Some(&DiscoveryStrategy::WellKnownPath(
                PathBuf::from("C:/Program Files").join("dotnet").join("dotnet.exe")
            ))
        );
    }

    #[test]
    fn dotnet_without_program_files_skips_well_known_path() {
        let layout = HostLayout::default();
        let strategies = dotnet(&layout, &ToolOverrides::default()).strategies();
        assert_eq!(strategies.len(), 2);
        assert_eq!(
            strategies[0],
            DiscoveryStrategy::EnvironmentVariable {
                variable: "DOTNET_ROOT".to_string(),
                relative: PathBuf::from("dotnet"),
            }
        );
    }

    #[test]
    fn windows_sdk_reads_current_install_folder() {
        let descriptor = windows_sdk(&ToolOverrides::default());
        match &descriptor.strategies()[0] {
            DiscoveryStrategy::Registry(query) => {
                assert_eq!(query.current_value.as_deref(), Some("CurrentInstallFolder"));
                assert_eq!(query.version_value, "InstallationFolder");
            }
            other => panic!("unexpected strategy {:?}", other),
        }
    }

    #[test]
    fn unknown_tool_has_no_descriptor() {
        assert!(descriptor_for("nuget", &HostLayout::default(), &ToolOverrides::default()).is_none());
        for name in KNOWN_TOOLS {
            assert!(
                descriptor_for(name, &HostLayout::default(), &ToolOverrides::default()).is_some()
            );
        }
    }
}
