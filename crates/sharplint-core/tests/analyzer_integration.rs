//! Integration test: discovery, configuration and analysis of an on-disk
//! project via Analyzer.
//!
//! Uses fixture files under `tests/fixtures/project/`; only `src/` is
//! included by the fixture config.

use sharplint_core::{Analyzer, Category, Config, Diagnostic, Rule, RuleContext, Severity};
use sharplint_syntax::ast::MethodDeclaration;
use sharplint_syntax::{SyntaxKind, SyntaxNode};
use std::path::PathBuf;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

/// Reports every method by name.
struct MethodNames;

impl Rule for MethodNames {
    fn name(&self) -> &'static str {
        "method-names"
    }

    fn code(&self) -> &'static str {
        "T001"
    }

    fn category(&self) -> Category {
        Category::Naming
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::MethodDeclaration]
    }

    fn check_node(&self, ctx: &RuleContext<'_>, node: &SyntaxNode) -> Vec<Diagnostic> {
        MethodDeclaration::cast(node.clone())
            .and_then(|m| m.identifier())
            .map(|name| vec![ctx.diagnostic(self, name.span(), name.text().to_string())])
            .unwrap_or_default()
    }
}

fn analyze(config: Config) -> sharplint_core::LintResult {
    Analyzer::builder()
        .root(fixture_root())
        .config(config)
        .rule(MethodNames)
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed")
}

#[test]
fn fixture_config_includes_and_overrides() {
    let config = Config::from_file(&fixture_root().join("sharplint.toml"))
        .expect("fixture config should parse");
    let result = analyze(config);

    assert_eq!(result.files_checked, 1, "scripts/ is not included");
    let found: Vec<(usize, usize, &str)> = result
        .diagnostics
        .iter()
        .map(|d| (d.location.line, d.location.column, d.message.as_str()))
        .collect();
    assert_eq!(found, vec![(3, 10, "Draw"), (4, 10, "Resize")]);
    assert!(result.diagnostics.iter().all(|d| d.severity == Severity::Error));
    assert!(result.diagnostics[0].location.file.ends_with("src/Widget.cs"));
    assert!(result.has_errors());
}

#[test]
fn defaults_walk_every_source_file() {
    let result = analyze(Config::default());

    assert_eq!(result.files_checked, 2);
    assert_eq!(result.diagnostics.len(), 3);
    assert!(result.diagnostics[0].location.file.ends_with("scripts/Tool.cs"));
    assert!(!result.has_errors());
    assert!(result.has_violations_at(Severity::Warning));
}

#[test]
fn disabled_rules_report_nothing() {
    let config = Config::parse("[rules.method-names]\nenabled = false\n").expect("config parses");
    let result = analyze(config);

    assert_eq!(result.files_checked, 2);
    assert!(result.diagnostics.is_empty());
}
