//! Helpers shared by the rule tests.

use sharplint_core::fix::{CodeFix, FixEngine};
use sharplint_core::{Diagnostic, Rule, RuleEngine, RuleRegistry, Solution};
use std::path::Path;

pub(crate) const PATH: &str = "Test.cs";

pub(crate) fn solution(source: &str) -> Solution {
    let mut solution = Solution::new();
    solution.add_source(PATH, source).expect("source parses");
    solution
}

pub(crate) fn check<R: Rule + 'static>(rule: R, source: &str) -> Vec<Diagnostic> {
    check_solution(rule, &solution(source))
}

pub(crate) fn check_solution<R: Rule + 'static>(rule: R, solution: &Solution) -> Vec<Diagnostic> {
    RuleEngine::new(RuleRegistry::new().with(rule))
        .analyze_solution(solution)
        .diagnostics
}

pub(crate) fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}

/// Runs fix-all for the first diagnostic's code and returns the new text.
pub(crate) fn fix_all<R, F>(rule: R, fix: F, source: &str) -> String
where
    R: Rule + 'static,
    F: CodeFix + 'static,
{
    let solution = solution(source);
    let diagnostics = check_solution(rule, &solution);
    let code = diagnostics.first().map(|d| d.code.clone()).expect("a diagnostic");
    let report = FixEngine::new()
        .with_fix(fix)
        .fix_all_documents(&solution, &code, &diagnostics)
        .expect("fix-all runs");
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    text(&report.solution)
}

pub(crate) fn text(solution: &Solution) -> String {
    solution
        .document_by_path(Path::new(PATH))
        .expect("document")
        .text()
}
