//! Integration test: the built-in catalog end-to-end via Analyzer and
//! FixEngine.
//!
//! Uses fixture files under `tests/fixtures/catalog/`; `obj/` holds a file
//! that the default excludes must skip.

use sharplint_core::fix::SyntacticRenamer;
use sharplint_core::{Analyzer, Config, Diagnostic, LintResult, Severity, Solution};
use sharplint_rules::{all_fixes, Preset};
use std::path::{Path, PathBuf};

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog")
}

fn analyzer(preset: Preset) -> Analyzer {
    let root = fixture_root();
    let config =
        Config::from_file(&root.join("sharplint.toml")).expect("fixture config should parse");
    Analyzer::builder()
        .root(&root)
        .config(config)
        .rules(preset.rules())
        .build()
        .expect("analyzer should build")
}

fn file_name(d: &Diagnostic) -> &str {
    d.location
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
}

fn render(result: &LintResult) -> String {
    result
        .diagnostics
        .iter()
        .map(|d| {
            format!(
                "{}:{} {} {} {}",
                file_name(d),
                d.location.line,
                d.severity,
                d.code,
                d.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn codes(result: &LintResult) -> Vec<&str> {
    result.diagnostics.iter().map(|d| d.code.as_str()).collect()
}

fn text_of(solution: &Solution, name: &str) -> String {
    solution
        .documents()
        .find(|d| d.path().file_name() == Some(Path::new(name).as_os_str()))
        .map(|d| d.text())
        .expect("fixture document")
}

// ── Analysis ──

#[test]
fn recommended_preset_reports_every_rule() {
    let result = analyzer(Preset::Recommended)
        .analyze()
        .expect("analysis should succeed");

    assert_eq!(result.files_checked, 2, "obj/ must be excluded");
    assert!(result.faults.is_empty());
    insta::assert_snapshot!(render(&result), @r#"
    Models.cs:7 info BA00007 Enum has multiple elements with value 0!
    Service.cs:5 warning BA00002 "Current" property summary should start with Gets or sets.
    Service.cs:8 warning BA00004 Comment "fix this" should start with an upper case letter.
    Service.cs:9 warning BA00003 Public method name "run" should begin with upper case letter.
    Service.cs:11 warning BA00005 Local variable declaration "int count = 5" should use the var keyword.
    Service.cs:12 warning BA00006 The following members are not initialized: 'Y ,Z'
    Service.cs:16 error BA00001 Private method name "Helper" should begin with lower case letter.
    "#);
    assert!(result.has_violations_at(Severity::Error));
}

#[test]
fn minimal_preset_keeps_structural_rules() {
    let result = analyzer(Preset::Minimal)
        .analyze()
        .expect("analysis should succeed");
    assert_eq!(codes(&result), vec!["BA00007", "BA00006"]);
    assert!(!result.has_errors());
}

// ── Fixing ──

#[tokio::test]
async fn fixes_apply_and_reanalysis_is_clean() {
    let analyzer = analyzer(Preset::Recommended);
    let fixes = all_fixes();
    let mut solution = analyzer.load_solution().expect("fixtures load");

    for code in ["BA00004", "BA00005", "BA00006", "BA00007"] {
        let result = analyzer.analyze_solution(&solution);
        let report = fixes
            .fix_all_documents(&solution, code, &result.diagnostics)
            .expect("fix-all should run");
        assert!(report.failures.is_empty(), "{code}: {:?}", report.failures);
        assert_eq!(report.applied, 1, "{code}");
        solution = report.solution;
    }

    let result = analyzer.analyze_solution(&solution);
    let rename = result
        .diagnostics
        .iter()
        .find(|d| d.code == "BA00003")
        .expect("public-method-name diagnostic");
    solution = fixes
        .fix_with_renamer(&solution, rename, &SyntacticRenamer::new())
        .await
        .expect("rename should succeed");

    assert_eq!(
        text_of(&solution, "Models.cs"),
        "namespace Demo\n{\n    public enum State\n    {\n        None = 0,\n        Unknown,\n        Ready = 1\n    }\n\n    public class Point\n    {\n        public int X;\n        public int Y;\n        public int Z;\n    }\n}\n"
    );
    let service = text_of(&solution, "Service.cs");
    assert!(service.contains("        // Fix this\n        public void Run()\n"));
    assert!(service.contains("            var count = 5;\n"));
    assert!(service.contains("new Point { X = 1, Y = default(int), Z = default(int) };"));
    assert!(service.contains("for (int i = 0; i < count; i++)"));

    let remaining = analyzer.analyze_solution(&solution);
    assert_eq!(codes(&remaining), vec!["BA00002", "BA00001"]);
}
