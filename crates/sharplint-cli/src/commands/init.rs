//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# sharplint configuration

# Rule preset: recommended (default), minimal or naming
preset = "recommended"

# Lowest severity that makes `sharplint check` exit with status 1
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/bin/**",
    "**/obj/**",
]

# Respect .gitignore files
respect_gitignore = true

# Worker threads for analysis (default: one per core)
# parallelism = 4

# Rule configurations, keyed by name or code.
# Each rule can be enabled/disabled and have its severity overridden.

[rules.private-method-name]
enabled = true
# severity = "error"

[rules.prefer-implicit-type]
enabled = true
# Also report `for (int i = 0; ...)` initializers
for_loops = true

# [rules.BA00007]
# severity = "warning"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("sharplint.toml");
    write_config(config_path, force)?;

    println!("Created sharplint.toml");
    println!("\nNext steps:");
    println!("  1. Edit sharplint.toml to configure rules");
    println!("  2. Run: sharplint check");
    println!("  3. Run: sharplint fix --dry-run");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharplint_core::{Config, Severity};
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert_eq!(config.fail_threshold(), Severity::Error);
        assert!(config.analyzer.respect_gitignore);
        assert!(config
            .rule_config("prefer-implicit-type", "BA00005")
            .is_some_and(|r| r.get_bool("for_loops", false)));
    }

    #[test]
    fn existing_config_needs_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sharplint.toml");
        std::fs::write(&path, "preset = \"minimal\"\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "preset = \"minimal\"\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
