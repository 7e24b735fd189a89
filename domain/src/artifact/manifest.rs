//! NuGet dependency manifests: legacy `packages.config` and SDK-style
//! `PackageReference` items.

use super::{ArtifactError, child, element_text, expect_root, parse_document};
use crate::dependency::DependencyMap;

/// Parse a `packages.config` document.
///
/// Each `<package id=".." version=".."/>` becomes one entry; packages missing
/// either attribute are skipped.
pub fn parse_packages_config(xml: &str) -> Result<DependencyMap, ArtifactError> {
    let doc = parse_document(xml)?;
    let root = expect_root(&doc, "packages")?;

    Ok(root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "package")
        .filter_map(|n| Some((n.attribute("id")?, n.attribute("version")?)))
        .collect())
}

/// Collect every `PackageReference` element in a project document.
///
/// Elements are matched by local name at any depth and in any namespace. The
/// version comes from the `Version` attribute or a nested `<Version>` element;
/// references without an `Include` or a version are skipped.
pub fn parse_package_references(xml: &str) -> Result<DependencyMap, ArtifactError> {
    let doc = parse_document(xml)?;

    Ok(doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "PackageReference")
        .filter_map(|n| {
            let id = n.attribute("Include")?.trim();
            let version = n
                .attribute("Version")
                .map(|v| v.trim().to_string())
                .or_else(|| child(n, "Version").and_then(element_text))?;
            (!id.is_empty()).then(|| (id.to_string(), version))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_packages_config() {
        let map = parse_packages_config(
            r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="A" version="1.0" targetFramework="net48" />
  <package id="NoVersion" />
</packages>"#,
        )
        .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some("1.0"));
    }

    #[test]
    fn reads_package_references_at_any_depth() {
        let map = parse_package_references(
            r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <PackageReference Include="Newtonsoft.Json" Version="12.0.3" />
  </ItemGroup>
  <Choose>
    <When Condition="'$(TargetFramework)' == 'net48'">
      <ItemGroup>
        <PackageReference Include="Moq">
          <Version>4.16.0</Version>
        </PackageReference>
      </ItemGroup>
    </When>
  </Choose>
  <ItemGroup>
    <PackageReference Include="Floating" />
  </ItemGroup>
</Project>"#,
        )
        .unwrap();

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![("Moq", "4.16.0"), ("Newtonsoft.Json", "12.0.3")]);
    }

    #[test]
    fn namespaced_legacy_project_is_matched_by_local_name() {
        let map = parse_package_references(
            r#"<Project ToolsVersion="15.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <ItemGroup>
    <PackageReference Include="Serilog" Version="2.10.0" />
  </ItemGroup>
</Project>"#,
        )
        .unwrap();
        assert_eq!(map.get("serilog"), Some("2.10.0"));
    }

    #[test]
    fn packages_config_with_wrong_root_is_rejected() {
        assert!(matches!(
            parse_packages_config("<Project />"),
            Err(ArtifactError::UnexpectedRoot { expected: "packages", .. })
        ));
    }

    #[test]
    fn malformed_project_is_an_error() {
        assert!(parse_package_references("<Project><ItemGroup></Project>").is_err());
    }
}
