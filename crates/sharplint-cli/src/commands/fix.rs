//! Fix command implementation.
//!
//! Fixes are applied in passes. Each pass re-analyzes the solution and
//! applies the first fixable code that makes progress: a fix-all batch per
//! document for batchable fixes, or one rename otherwise. Files are written
//! once at the end.

use anyhow::{Context, Result};
use sharplint_core::fix::{FixEngine, FixError, RenameError, SymbolRenamer, SyntacticRenamer};
use sharplint_core::{Analyzer, Diagnostic, Solution};
use sharplint_rules::all_fixes;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config_resolver::ConfigSource;

/// Passes allowed beyond one per initially fixable diagnostic.
const EXTRA_PASSES: usize = 8;

/// Options of the fix command.
#[derive(Debug, Default)]
pub struct FixOptions {
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Report changes without writing.
    pub dry_run: bool,
    /// Upper bound for a single rename.
    pub rename_timeout: Option<Duration>,
}

/// Runs the fix command.
pub fn run(path: &Path, options: &FixOptions, source: &ConfigSource) -> Result<()> {
    let config = source.load()?;
    let analyzer = super::check::build_analyzer(
        path,
        config,
        options.rules.as_deref(),
        options.exclude.clone(),
    )?;
    let fixes = all_fixes();

    let original = analyzer.load_solution().context("Failed to load sources")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start the async runtime")?;
    let outcome = runtime.block_on(fix_solution(
        &analyzer,
        &fixes,
        &SyntacticRenamer::new(),
        original.clone(),
        options.rename_timeout,
    ));

    let changed = write_changes(&original, &outcome.solution, options.dry_run)?;
    let verb = if options.dry_run { "Would fix" } else { "Fixed" };
    for file in &changed {
        println!("{verb} {}", file.display());
    }
    for skipped in &outcome.skipped {
        println!("\x1b[33mskipped\x1b[0m {skipped}");
    }

    let remaining = analyzer.analyze_solution(&outcome.solution);
    println!(
        "Applied {} fix(es) and {} rename(s) in {} file(s); {} diagnostic(s) remain",
        outcome.applied,
        outcome.renamed,
        changed.len(),
        remaining.diagnostics.len()
    );
    Ok(())
}

/// Result of [`fix_solution`].
#[derive(Debug)]
pub struct FixOutcome {
    /// The fixed solution.
    pub solution: Solution,
    /// Edits applied through fix-all or single fixes.
    pub applied: usize,
    /// Renames completed.
    pub renamed: usize,
    /// Diagnostics given up on, with the reason.
    pub skipped: Vec<String>,
}

type DiagnosticKey = (String, PathBuf, usize);

fn key(diagnostic: &Diagnostic) -> DiagnosticKey {
    (
        diagnostic.code.clone(),
        diagnostic.location.file.clone(),
        diagnostic.location.offset,
    )
}

/// Applies every available fix until none makes progress.
pub async fn fix_solution<R: SymbolRenamer>(
    analyzer: &Analyzer,
    fixes: &FixEngine,
    renamer: &R,
    solution: Solution,
    rename_timeout: Option<Duration>,
) -> FixOutcome {
    let mut outcome = FixOutcome {
        solution,
        applied: 0,
        renamed: 0,
        skipped: Vec::new(),
    };
    let mut given_up: HashSet<DiagnosticKey> = HashSet::new();
    let mut max_passes: Option<usize> = None;
    let mut passes = 0;

    loop {
        let result = analyzer.analyze_solution(&outcome.solution);
        let pending: Vec<Diagnostic> = result
            .diagnostics
            .into_iter()
            .filter(|d| fixes.can_fix(&d.code) && !given_up.contains(&key(d)))
            .collect();
        if pending.is_empty() {
            debug!("Nothing left to fix after {passes} pass(es)");
            break;
        }
        let limit = *max_passes.get_or_insert(pending.len() + EXTRA_PASSES);
        if passes == limit {
            warn!("Stopping after {passes} fix passes with {} fixable diagnostic(s) left", pending.len());
            break;
        }
        passes += 1;

        let codes: BTreeSet<&str> = pending.iter().map(|d| d.code.as_str()).collect();
        let mut progressed = false;
        for code in codes {
            let batch: Vec<Diagnostic> = pending.iter().filter(|d| d.code == code).cloned().collect();
            let batchable = fixes
                .provider_for(code)
                .is_some_and(|provider| provider.supports_fix_all());
            progressed = if batchable {
                fix_all_pass(fixes, &mut outcome, code, &batch, &mut given_up)
            } else {
                rename_pass(fixes, renamer, &mut outcome, &batch[0], rename_timeout, &mut given_up)
                    .await
            };
            if progressed {
                break;
            }
        }
        if !progressed {
            break;
        }
    }

    info!(
        "Fixing finished: {} fix(es), {} rename(s), {} skipped",
        outcome.applied,
        outcome.renamed,
        outcome.skipped.len()
    );
    outcome
}

fn give_up(
    outcome: &mut FixOutcome,
    given_up: &mut HashSet<DiagnosticKey>,
    diagnostic: &Diagnostic,
    error: &FixError,
) {
    warn!("Giving up on {} at {}: {}", diagnostic.code, diagnostic.location.file.display(), error);
    outcome.skipped.push(format!(
        "{}:{}:{} [{}] {}",
        diagnostic.location.file.display(),
        diagnostic.location.line,
        diagnostic.location.column,
        diagnostic.code,
        error
    ));
    given_up.insert(key(diagnostic));
}

/// Runs fix-all for `code`. A document whose batch conflicts gets only its
/// first fix; the rest wait for the next pass.
fn fix_all_pass(
    fixes: &FixEngine,
    outcome: &mut FixOutcome,
    code: &str,
    batch: &[Diagnostic],
    given_up: &mut HashSet<DiagnosticKey>,
) -> bool {
    let report = match fixes.fix_all_documents(&outcome.solution, code, batch) {
        Ok(report) => report,
        Err(e) => {
            for diagnostic in batch {
                give_up(outcome, given_up, diagnostic, &e);
            }
            return false;
        }
    };

    let mut solution = report.solution;
    let mut applied = report.applied;
    for (path, error) in report.failures {
        let in_document: Vec<&Diagnostic> =
            batch.iter().filter(|d| d.location.file == path).collect();
        match error {
            FixError::Conflict(conflict) => {
                eprintln!("{:?}", miette::Report::new(*conflict));
                let Some(first) = in_document.first() else {
                    continue;
                };
                match fixes.fix(&solution, first) {
                    Ok(next) => {
                        solution = next;
                        applied += 1;
                    }
                    Err(e) => give_up(outcome, given_up, first, &e),
                }
            }
            other => {
                for diagnostic in in_document {
                    give_up(outcome, given_up, diagnostic, &other);
                }
            }
        }
    }

    outcome.solution = solution;
    outcome.applied += applied;
    applied > 0
}

async fn rename_pass<R: SymbolRenamer>(
    fixes: &FixEngine,
    renamer: &R,
    outcome: &mut FixOutcome,
    diagnostic: &Diagnostic,
    rename_timeout: Option<Duration>,
    given_up: &mut HashSet<DiagnosticKey>,
) -> bool {
    let rename = fixes.fix_with_renamer(&outcome.solution, diagnostic, renamer);
    let result = match rename_timeout {
        Some(limit) => tokio::time::timeout(limit, rename)
            .await
            .unwrap_or_else(|_| Err(FixError::Rename(RenameError::Cancelled))),
        None => rename.await,
    };

    match result {
        Ok(solution) => {
            outcome.solution = solution;
            outcome.renamed += 1;
            true
        }
        Err(e) => {
            give_up(outcome, given_up, diagnostic, &e);
            false
        }
    }
}

/// Writes every document whose text changed, unless `dry_run`.
fn write_changes(original: &Solution, fixed: &Solution, dry_run: bool) -> Result<Vec<PathBuf>> {
    let mut changed = Vec::new();
    for id in fixed.changed_since(original) {
        let Some(document) = fixed.document(id) else {
            continue;
        };
        let text = document.text();
        if original.document(id).is_some_and(|old| old.text() == text) {
            continue;
        }
        if !dry_run {
            std::fs::write(document.path(), &text)
                .with_context(|| format!("Failed to write {}", document.path().display()))?;
        }
        changed.push(document.path().to_path_buf());
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharplint_core::semantic::Symbol;
    use sharplint_core::Config;
    use std::fs;
    use std::future::Future;
    use tempfile::TempDir;

    const PROGRAM: &str = "class Program\n{\n    // run it\n    public void run() { }\n\n    void Go()\n    {\n        int n = 1;\n        run();\n    }\n}\n";

    const FIXED: &str = "class Program\n{\n    // Run it\n    public void Run() { }\n\n    void Go()\n    {\n        var n = 1;\n        Run();\n    }\n}\n";

    fn project(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for (name, text) in files {
            fs::write(tmp.path().join(name), text).unwrap();
        }
        tmp
    }

    fn analyzer(root: &Path, rules: Option<&str>) -> Analyzer {
        super::super::check::build_analyzer(root, Config::default(), rules, Vec::new()).unwrap()
    }

    #[tokio::test]
    async fn fixes_and_renames_until_clean() {
        let tmp = project(&[("Program.cs", PROGRAM)]);
        let analyzer = analyzer(tmp.path(), None);
        let original = analyzer.load_solution().unwrap();

        let outcome = fix_solution(
            &analyzer,
            &all_fixes(),
            &SyntacticRenamer::new(),
            original.clone(),
            None,
        )
        .await;

        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.renamed, 1);
        assert!(outcome.skipped.is_empty(), "{:?}", outcome.skipped);

        let changed = write_changes(&original, &outcome.solution, false).unwrap();
        assert_eq!(changed, vec![tmp.path().join("Program.cs")]);
        assert_eq!(fs::read_to_string(tmp.path().join("Program.cs")).unwrap(), FIXED);
        assert!(analyzer.analyze().unwrap().diagnostics.is_empty());
    }

    #[tokio::test]
    async fn dry_run_leaves_files_alone() {
        let tmp = project(&[("Program.cs", PROGRAM), ("Clean.cs", "class Clean { }\n")]);
        let analyzer = analyzer(tmp.path(), Some("comment-sentence-case"));
        let original = analyzer.load_solution().unwrap();

        let outcome = fix_solution(
            &analyzer,
            &all_fixes(),
            &SyntacticRenamer::new(),
            original.clone(),
            None,
        )
        .await;
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.renamed, 0);

        let changed = write_changes(&original, &outcome.solution, true).unwrap();
        assert_eq!(changed, vec![tmp.path().join("Program.cs")]);
        assert_eq!(fs::read_to_string(tmp.path().join("Program.cs")).unwrap(), PROGRAM);
    }

    #[tokio::test]
    async fn conflicting_batch_falls_back_to_single_fixes() {
        let source = "class A\n{\n    public int X;\n    public A Next;\n}\nclass B\n{\n    void M()\n    {\n        var a = new A { Next = new A { } };\n    }\n}\n";
        let tmp = project(&[("Nested.cs", source)]);
        let analyzer = analyzer(tmp.path(), Some("initializer-completeness"));
        let original = analyzer.load_solution().unwrap();

        let outcome = fix_solution(
            &analyzer,
            &all_fixes(),
            &SyntacticRenamer::new(),
            original.clone(),
            None,
        )
        .await;

        assert_eq!(outcome.applied, 2);
        assert!(outcome.skipped.is_empty(), "{:?}", outcome.skipped);
        let text = outcome
            .solution
            .documents()
            .next()
            .map(|d| d.text())
            .unwrap();
        assert!(text.contains(
            "new A { Next = new A { X = default(int), Next = default(A) }, X = default(int) };"
        ));
    }

    struct Stalled;

    impl SymbolRenamer for Stalled {
        fn rename_symbol(
            &self,
            _solution: &Solution,
            _symbol: &Symbol,
            _new_name: &str,
        ) -> impl Future<Output = Result<Solution, RenameError>> + Send {
            std::future::pending()
        }
    }

    #[tokio::test]
    async fn slow_rename_is_cancelled_and_skipped() {
        let tmp = project(&[("Program.cs", PROGRAM)]);
        let analyzer = analyzer(tmp.path(), Some("BA00003"));
        let original = analyzer.load_solution().unwrap();

        let outcome = fix_solution(
            &analyzer,
            &all_fixes(),
            &Stalled,
            original.clone(),
            Some(Duration::from_millis(20)),
        )
        .await;

        assert_eq!(outcome.renamed, 0);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].contains("BA00003"));
        assert!(outcome.skipped[0].contains("cancelled"));
        assert!(outcome.solution.changed_since(&original).is_empty());
    }
}
