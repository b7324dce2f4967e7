//! Check command implementation.

use anyhow::{anyhow, bail, Context, Result};
use sharplint_core::{Analyzer, Config, RuleBox};
use sharplint_rules::{all_rules, Preset};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<&str>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = source.load()?;
    let analyzer = build_analyzer(path, config, rules_filter, exclude)?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format)?;

    if result.has_violations_at(analyzer.engine().config().fail_threshold()) {
        std::process::exit(1);
    }

    Ok(())
}

/// Builds an analyzer over `path` with the rules selected by `--rules` or
/// by the configured preset.
pub(crate) fn build_analyzer(
    path: &Path,
    config: Config,
    rules_filter: Option<&str>,
    exclude: Vec<String>,
) -> Result<Analyzer> {
    let rules = match rules_filter {
        Some(filter) => filter_rules(filter)?,
        None => preset(&config)?.rules(),
    };

    Analyzer::builder()
        .root(path)
        .config(config)
        .excludes(exclude)
        .rules(rules)
        .build()
        .context("Failed to build analyzer")
}

fn preset(config: &Config) -> Result<Preset> {
    match config.preset.as_deref() {
        Some(name) => name.parse().map_err(|e: String| anyhow!(e)),
        None => Ok(Preset::default()),
    }
}

/// Selects rules by name or code from a comma-separated list.
fn filter_rules(filter: &str) -> Result<Vec<RuleBox>> {
    let names: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect();

    for name in &names {
        if !all_rules()
            .iter()
            .any(|r| r.name() == *name || r.code() == *name)
        {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    let rules: Vec<RuleBox> = all_rules()
        .into_iter()
        .filter(|r| names.contains(&r.name()) || names.contains(&r.code()))
        .collect();
    if rules.is_empty() {
        bail!("No known rules in --rules {filter}");
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn codes(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.code()).collect()
    }

    #[test]
    fn filter_accepts_names_and_codes() {
        let rules = filter_rules("enum-zero-duplicate, BA00001").unwrap();
        assert_eq!(codes(&rules), vec!["BA00001", "BA00007"]);
    }

    #[test]
    fn filter_without_known_rules_fails() {
        assert!(filter_rules("no-such-rule").is_err());
        assert!(filter_rules(" , ").is_err());
    }

    #[test]
    fn preset_comes_from_config() {
        let config = Config::parse("preset = \"naming\"\n").unwrap();
        assert_eq!(preset(&config).unwrap(), Preset::Naming);
        assert_eq!(preset(&Config::default()).unwrap(), Preset::Recommended);

        let unknown = Config::parse("preset = \"strict\"\n").unwrap();
        assert!(preset(&unknown).is_err());
    }

    #[test]
    fn analyzer_honours_cli_excludes() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("legacy")).unwrap();
        fs::write(
            tmp.path().join("Keep.cs"),
            "class Keep\n{\n    private void Run() { }\n}\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("legacy/Old.cs"),
            "class Old\n{\n    private void Run() { }\n}\n",
        )
        .unwrap();

        let analyzer = build_analyzer(
            tmp.path(),
            Config::default(),
            Some("private-method-name"),
            vec!["**/legacy/**".to_string()],
        )
        .unwrap();
        let result = analyzer.analyze().unwrap();

        assert_eq!(result.files_checked, 1);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.diagnostics[0].location.file.ends_with("Keep.cs"));
    }
}
