//! Config key registry.
//!
//! Metadata for the keys `buildrig.toml` understands, listed by
//! `buildrig config --keys`.

/// Metadata for a single config key.
#[derive(Debug, Clone)]
pub struct ConfigKeyInfo {
    /// Dotted key path (e.g., `"tools.msbuild"`).
    pub key: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Valid string values (empty if freeform).
    pub valid_values: &'static [&'static str],
}

impl ConfigKeyInfo {
    /// Environment variable that overrides this key.
    pub fn env_var(&self) -> String {
        format!("BUILDRIG_{}", self.key.replace('.', "__").to_uppercase())
    }
}

/// All known config keys with their metadata.
pub fn known_keys() -> &'static [ConfigKeyInfo] {
    &KNOWN_KEYS
}

/// Look up a config key by its dotted path.
pub fn lookup_key(key: &str) -> Option<&'static ConfigKeyInfo> {
    KNOWN_KEYS.iter().find(|k| k.key == key)
}

static KNOWN_KEYS: [ConfigKeyInfo; 11] = [
    // ==================== Tool overrides ====================
    ConfigKeyInfo {
        key: "tools.msbuild",
        description: "Path to MSBuild.exe, skips discovery",
        valid_values: &[],
    },
    ConfigKeyInfo {
        key: "tools.dotnet",
        description: "Path to the dotnet host, skips discovery",
        valid_values: &[],
    },
    ConfigKeyInfo {
        key: "tools.vstest",
        description: "Path to vstest.console.exe, skips discovery",
        valid_values: &[],
    },
    ConfigKeyInfo {
        key: "tools.vswhere",
        description: "Path to vswhere.exe",
        valid_values: &[],
    },
    ConfigKeyInfo {
        key: "tools.windows_sdk",
        description: "Windows SDK installation folder",
        valid_values: &[],
    },
    // ==================== Remote execution ====================
    ConfigKeyInfo {
        key: "remote.host",
        description: "Run tools on this host over ssh",
        valid_values: &[],
    },
    ConfigKeyInfo {
        key: "remote.ssh_program",
        description: "ssh client used for remote execution",
        valid_values: &[],
    },
    // ==================== Output ====================
    ConfigKeyInfo {
        key: "output.format",
        description: "Report format",
        valid_values: &["text", "json"],
    },
    ConfigKeyInfo {
        key: "output.color",
        description: "Colorize console output",
        valid_values: &["true", "false"],
    },
    ConfigKeyInfo {
        key: "logging.invocation_log",
        description: "Append one JSON line per tool invocation to this file",
        valid_values: &[],
    },
    ConfigKeyInfo {
        key: "msbuild.prefer_architecture",
        description: "MSBuild flavor preferred among vswhere candidates",
        valid_values: &["amd64", "arm64", "x86"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_existing_key() {
        let info = lookup_key("output.format").unwrap();
        assert!(info.valid_values.contains(&"json"));
    }

    #[test]
    fn test_lookup_nonexistent_key() {
        assert!(lookup_key("nonexistent.key").is_none());
    }

    #[test]
    fn test_env_var_uses_double_underscore() {
        let info = lookup_key("tools.windows_sdk").unwrap();
        assert_eq!(info.env_var(), "BUILDRIG_TOOLS__WINDOWS_SDK");
    }

    #[test]
    fn test_every_tool_key_is_a_known_tool() {
        for info in known_keys().iter().filter(|k| k.key.starts_with("tools.")) {
            let name = info.key.trim_start_matches("tools.").replace('_', "-");
            assert!(crate::tool::well_known::KNOWN_TOOLS.contains(&name.as_str()), "{}", name);
        }
    }
}
