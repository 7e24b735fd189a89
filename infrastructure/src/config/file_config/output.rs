//! Output configuration from TOML (`[output]` section)

use buildrig_domain::OutputFormat;
use serde::{Deserialize, Serialize};

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Report format (uses domain type)
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Echo tool output lines to the console as they arrive
    pub show_tool_output: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            show_tool_output: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_deserialize() {
        let toml_str = r#"
[output]
format = "json"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.color);
    }
}
