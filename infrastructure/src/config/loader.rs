//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["buildrig.toml", ".buildrig.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `BUILDRIG_` environment variables (`__` separates nesting)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./buildrig.toml` or `./.buildrig.toml`
    /// 4. Global: `~/.config/buildrig/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let project_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::figment(Self::global_config_path().as_deref(), &project_dir, config_path)?
            .merge(Env::prefixed("BUILDRIG_").split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// File layers only, without the environment.
    fn figment(
        global: Option<&Path>,
        project_dir: &Path,
        explicit: Option<&Path>,
    ) -> Result<Figment, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(path) = Self::project_config_in(project_dir) {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Box::new(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))));
            }
            figment = figment.merge(Toml::file_exact(path));
        }

        Ok(figment)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("buildrig").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for `buildrig config`)
    pub fn describe_sources(explicit: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push("  [ENV  ] BUILDRIG_* environment variables".to_string());

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./buildrig.toml or ./.buildrig.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", mark, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildrig_domain::OutputFormat;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.tools.msbuild.is_none());
        assert!(config.output.color);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.ends_with("buildrig/config.toml"));
    }

    #[test]
    fn test_layers_override_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        fs::write(
            &global,
            "[output]\nformat = \"json\"\ncolor = false\n[tools]\ndotnet = \"/global/dotnet\"\n",
        )
        .unwrap();
        let project_dir = dir.path().join("project");
        fs::create_dir_all(&project_dir).unwrap();
        fs::write(
            project_dir.join(".buildrig.toml"),
            "[tools]\ndotnet = \"/project/dotnet\"\nmsbuild = \"/project/msbuild\"\n",
        )
        .unwrap();
        let explicit = dir.path().join("ci.toml");
        fs::write(&explicit, "[tools]\nmsbuild = \"/ci/msbuild\"\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(Some(&global), &project_dir, Some(&explicit))
            .unwrap()
            .extract()
            .unwrap();

        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.color);
        assert_eq!(config.tools.dotnet, Some(PathBuf::from("/project/dotnet")));
        assert_eq!(config.tools.msbuild, Some(PathBuf::from("/ci/msbuild")));
        assert_eq!(config.remote.ssh_program, "ssh");
    }

    #[test]
    fn test_buildrig_toml_wins_over_dotfile() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("buildrig.toml"), "[remote]\nhost = \"a\"\n").unwrap();
        fs::write(dir.path().join(".buildrig.toml"), "[remote]\nhost = \"b\"\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(None, dir.path(), None)
            .unwrap()
            .extract()
            .unwrap();
        assert_eq!(config.remote.host(), Some("a"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::figment(None, dir.path(), Some(&dir.path().join("nope.toml")));
        assert!(result.is_err());
    }
}
