//! Toolchain configuration: where tools live and how to find the rest.

use buildrig_domain::tool::well_known::{self, KNOWN_TOOLS};
use buildrig_domain::{DomainError, HostLayout, ToolDescriptor, ToolOverrides};

/// Host layout plus configured tool overrides.
///
/// Descriptors are built per invocation from this, never cached.
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    pub layout: HostLayout,
    pub overrides: ToolOverrides,
}

impl Toolchain {
    pub fn new(layout: HostLayout, overrides: ToolOverrides) -> Self {
        Self { layout, overrides }
    }

    pub fn msbuild(&self) -> ToolDescriptor {
        well_known::msbuild(&self.layout, &self.overrides)
    }

    pub fn dotnet(&self) -> ToolDescriptor {
        well_known::dotnet(&self.layout, &self.overrides)
    }

    pub fn vstest(&self) -> ToolDescriptor {
        well_known::vstest(&self.layout, &self.overrides)
    }

    /// Descriptor for a tool by name, rejecting unknown names.
    pub fn descriptor(&self, name: &str) -> Result<ToolDescriptor, DomainError> {
        well_known::descriptor_for(name, &self.layout, &self.overrides).ok_or_else(|| {
            DomainError::invalid(
                "locate",
                "tool",
                format!("unknown tool '{}' (known: {})", name, KNOWN_TOOLS.join(", ")),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_unknown_tool_is_rejected() {
        let error = Toolchain::default().descriptor("nmake").unwrap_err();
        assert_eq!(error.field(), "tool");
        assert!(error.to_string().contains("msbuild"));
    }

    #[test]
    fn test_override_flows_into_descriptor() {
        let toolchain = Toolchain::new(
            HostLayout::default(),
            ToolOverrides {
                dotnet: Some(PathBuf::from("/opt/dotnet/dotnet")),
                ..Default::default()
            },
        );
        let descriptor = toolchain.descriptor("dotnet").unwrap();
        assert_eq!(
            descriptor.override_path(),
            Some(&PathBuf::from("/opt/dotnet/dotnet"))
        );
    }
}
