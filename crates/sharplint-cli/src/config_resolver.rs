//! Configuration file resolution with global fallback.
//!
//! Resolution order:
//!
//! 1. `--config` flag (or `$SHARPLINT_CONFIG`)
//! 2. `{project}/sharplint.toml` or `.sharplint.toml`
//! 3. `~/.sharplint/config.toml`
//! 4. Built-in defaults

use anyhow::{Context, Result};
use sharplint_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line.
    Explicit(PathBuf),
    /// Found in the analyzed directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Loads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No configuration file found, using defaults");
            return Ok(Config::default());
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }
        Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["sharplint.toml", ".sharplint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file for a run over `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(project_dir, explicit, global_config_dir())
}

fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    // A file argument looks for its config next to it.
    let dir = if project_dir.is_file() {
        project_dir.parent().unwrap_or(project_dir)
    } else {
        project_dir
    };
    for name in PROJECT_CONFIG_NAMES {
        let candidate = dir.join(name);
        if candidate.exists() {
            tracing::debug!("Found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

/// `$SHARPLINT_CONFIG_DIR`, else `~/.sharplint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("SHARPLINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".sharplint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharplint_core::Severity;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_wins_without_existence_check() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sharplint.toml"), "").unwrap();

        let result = resolve_inner(tmp.path(), Some(Path::new("/missing.toml")), None);
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/missing.toml"))
        );
        assert!(result.load().is_err());
    }

    #[test]
    fn project_names_in_order() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".sharplint.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join(".sharplint.toml"))
        );

        fs::write(tmp.path().join("sharplint.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join("sharplint.toml"))
        );
    }

    #[test]
    fn file_argument_uses_its_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sharplint.toml"), "").unwrap();
        let file = tmp.path().join("Program.cs");
        fs::write(&file, "class Program { }\n").unwrap();

        assert_eq!(
            resolve_inner(&file, None, None),
            ConfigSource::Project(tmp.path().join("sharplint.toml"))
        );
    }

    #[test]
    fn global_is_the_fallback() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        assert_eq!(
            resolve_inner(project.path(), None, Some(global.path().to_path_buf())),
            ConfigSource::Default
        );

        fs::write(global.path().join("config.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(project.path(), None, Some(global.path().to_path_buf())),
            ConfigSource::Global(global.path().join("config.toml"))
        );

        fs::write(project.path().join("sharplint.toml"), "").unwrap();
        assert!(matches!(
            resolve_inner(project.path(), None, Some(global.path().to_path_buf())),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn load_reads_the_resolved_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sharplint.toml");
        fs::write(&path, "preset = \"minimal\"\nfail_on = \"warning\"\n").unwrap();

        let config = ConfigSource::Project(path).load().unwrap();
        assert_eq!(config.preset.as_deref(), Some("minimal"));
        assert_eq!(config.fail_threshold(), Severity::Warning);

        let defaults = ConfigSource::Default.load().unwrap();
        assert_eq!(defaults.fail_threshold(), Severity::Error);
    }
}
