//! Code fix providers and their application.

use super::edit::{apply_all, find_overlap, FixConflict, Replacement};
use super::rename::{RenameError, SymbolRenamer};
use crate::document::{Document, DocumentId, Solution};
use crate::semantic::{Compilation, SemanticModel, Symbol};
use crate::types::Diagnostic;
use rayon::prelude::*;
use sharplint_syntax::{ParseError, SyntaxNode, SyntaxTrivia};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Errors from computing or applying fixes.
#[derive(Debug, thiserror::Error)]
pub enum FixError {
    /// The diagnostic was computed against an older tree.
    #[error("diagnostic {code} in {path} was computed against an older version of the document")]
    StaleDocument {
        /// Diagnostic code.
        code: String,
        /// Document path.
        path: PathBuf,
    },

    /// The node or trivia the diagnostic points at could not be found.
    #[error("could not locate the target of {code} at offset {offset}")]
    TargetNotFound {
        /// Diagnostic code.
        code: String,
        /// Diagnostic offset.
        offset: usize,
    },

    /// Two edits of one fix-all batch overlap.
    #[error(transparent)]
    Conflict(Box<FixConflict>),

    /// No registered fix handles the code.
    #[error("no fix is registered for {0}")]
    NoFixProvider(String),

    /// The fix for this code cannot be batched.
    #[error("the fix for {0} does not support fix-all")]
    UnsupportedFixAll(String),

    /// The fix is a rename and needs a [`SymbolRenamer`].
    #[error("the fix for {0} renames a symbol and needs a renamer")]
    RenameRequired(String),

    /// The rename collaborator failed.
    #[error(transparent)]
    Rename(#[from] RenameError),

    /// A fix produced text that does not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<FixConflict> for FixError {
    fn from(conflict: FixConflict) -> Self {
        Self::Conflict(Box::new(conflict))
    }
}

/// What a fix applies to: the node or trivia that owns the diagnostic.
#[derive(Debug, Clone)]
pub enum FixTarget {
    /// A node matching the diagnostic's fix context.
    Node(SyntaxNode),
    /// The trivia piece the diagnostic covers.
    Trivia(SyntaxTrivia),
}

impl FixTarget {
    /// The target node, if this is a node target.
    #[must_use]
    pub fn node(&self) -> Option<&SyntaxNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Trivia(_) => None,
        }
    }

    /// The target trivia, if this is a trivia target.
    #[must_use]
    pub fn trivia(&self) -> Option<&SyntaxTrivia> {
        match self {
            Self::Trivia(trivia) => Some(trivia),
            Self::Node(_) => None,
        }
    }
}

/// Input to [`CodeFix::compute`].
pub struct FixRequest<'a> {
    /// Document being fixed.
    pub document: &'a Document,
    /// Semantic queries over the document's tree.
    pub model: &'a SemanticModel<'a>,
    /// Diagnostic being fixed.
    pub diagnostic: &'a Diagnostic,
    /// Located owner of the diagnostic.
    pub target: FixTarget,
}

impl FixRequest<'_> {
    /// Error for a target whose shape the fix does not recognise.
    #[must_use]
    pub fn not_found(&self) -> FixError {
        FixError::TargetNotFound {
            code: self.diagnostic.code.clone(),
            offset: self.diagnostic.location.offset,
        }
    }
}

/// The change a fix makes.
#[derive(Debug, Clone)]
pub enum FixAction {
    /// Replace one node, token or trivia piece.
    Replace(Replacement),
    /// Rename a symbol through a [`SymbolRenamer`].
    Rename {
        /// Symbol to rename.
        symbol: Symbol,
        /// New name.
        new_name: String,
    },
}

/// A fix for one or more diagnostic codes.
pub trait CodeFix: Send + Sync {
    /// Returns the kebab-case name of this fix.
    fn name(&self) -> &'static str;

    /// Human-readable title (e.g., "Use var").
    fn title(&self) -> &'static str;

    /// Diagnostic codes this fix handles.
    fn fixable_codes(&self) -> &'static [&'static str];

    /// Whether many occurrences can be fixed in one batch.
    fn supports_fix_all(&self) -> bool {
        true
    }

    /// Computes the change for one diagnostic.
    ///
    /// # Errors
    ///
    /// Returns [`FixError::TargetNotFound`] if the target does not have the
    /// expected shape.
    fn compute(&self, request: &FixRequest<'_>) -> Result<FixAction, FixError>;
}

/// Type alias for boxed `CodeFix` trait objects.
pub type CodeFixBox = Box<dyn CodeFix>;

/// Outcome of fixing many documents.
#[derive(Debug)]
pub struct FixAllReport {
    /// Solution with every successfully fixed document replaced.
    pub solution: Solution,
    /// Number of edits applied.
    pub applied: usize,
    /// Documents left unchanged because their batch failed.
    pub failures: Vec<(PathBuf, FixError)>,
}

/// Applies fixes to documents of a solution.
#[derive(Default)]
pub struct FixEngine {
    fixes: Vec<CodeFixBox>,
}

impl FixEngine {
    /// Creates an engine with no fixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fix.
    pub fn register(&mut self, fix: CodeFixBox) {
        self.fixes.push(fix);
    }

    /// Builder-style [`FixEngine::register`].
    #[must_use]
    pub fn with_fix<F: CodeFix + 'static>(mut self, fix: F) -> Self {
        self.register(Box::new(fix));
        self
    }

    /// All registered fixes.
    pub fn fixes(&self) -> impl Iterator<Item = &dyn CodeFix> {
        self.fixes.iter().map(AsRef::as_ref)
    }

    /// The first fix that handles `code`.
    #[must_use]
    pub fn provider_for(&self, code: &str) -> Option<&dyn CodeFix> {
        self.fixes()
            .find(|f| f.fixable_codes().contains(&code))
    }

    /// Returns true if some fix handles `code`.
    #[must_use]
    pub fn can_fix(&self, code: &str) -> bool {
        self.provider_for(code).is_some()
    }

    /// Applies the fix for one diagnostic.
    ///
    /// # Errors
    ///
    /// Returns [`FixError::RenameRequired`] for rename fixes; use
    /// [`FixEngine::fix_with_renamer`] for those. Also fails if the
    /// diagnostic is stale or its target cannot be located.
    pub fn fix(&self, solution: &Solution, diagnostic: &Diagnostic) -> Result<Solution, FixError> {
        match self.compute(solution, diagnostic)? {
            (id, FixAction::Replace(edit)) => {
                apply_one(solution, id, &edit, diagnostic)
            }
            (_, FixAction::Rename { .. }) => Err(FixError::RenameRequired(diagnostic.code.clone())),
        }
    }

    /// Applies the fix for one diagnostic, running renames through `renamer`.
    ///
    /// Dropping the returned future before it completes leaves nothing
    /// applied.
    ///
    /// # Errors
    ///
    /// As [`FixEngine::fix`], plus [`FixError::Rename`] if the renamer fails.
    pub async fn fix_with_renamer<R: SymbolRenamer>(
        &self,
        solution: &Solution,
        diagnostic: &Diagnostic,
        renamer: &R,
    ) -> Result<Solution, FixError> {
        match self.compute(solution, diagnostic)? {
            (id, FixAction::Replace(edit)) => apply_one(solution, id, &edit, diagnostic),
            (_, FixAction::Rename { symbol, new_name }) => {
                info!("Renaming {} to {}", symbol, new_name);
                Ok(renamer.rename_symbol(solution, &symbol, &new_name).await?)
            }
        }
    }

    fn compute(
        &self,
        solution: &Solution,
        diagnostic: &Diagnostic,
    ) -> Result<(DocumentId, FixAction), FixError> {
        let provider = self
            .provider_for(&diagnostic.code)
            .ok_or_else(|| FixError::NoFixProvider(diagnostic.code.clone()))?;
        let document = document_for(solution, diagnostic)?;
        let compilation = Compilation::new(solution);
        let model = compilation
            .model(document.id())
            .ok_or_else(|| target_not_found(diagnostic))?;
        let action = compute_action(provider, document, &model, diagnostic)?;
        Ok((document.id(), action))
    }

    /// Fixes every diagnostic with `code` in one document as a single batch.
    ///
    /// All edits are computed against the current tree. If any two overlap,
    /// nothing is applied and [`FixError::Conflict`] is returned.
    ///
    /// # Errors
    ///
    /// Fails if no fix handles `code`, if the fix cannot be batched, or if
    /// any diagnostic is stale, unlocatable or conflicting.
    pub fn fix_all(
        &self,
        solution: &Solution,
        document: DocumentId,
        code: &str,
        diagnostics: &[Diagnostic],
    ) -> Result<Solution, FixError> {
        let provider = self.batch_provider(code)?;
        let compilation = Compilation::new(solution);
        let (tree, applied) = fix_document(provider, &compilation, document, code, diagnostics)?;
        debug!("Applied {applied} fix(es) for {code}");
        Ok(solution.with_tree(document, tree))
    }

    /// Runs [`FixEngine::fix_all`] for `code` over every document that has
    /// matching diagnostics, in parallel.
    ///
    /// A document whose batch fails is left unchanged and reported in
    /// [`FixAllReport::failures`].
    ///
    /// # Errors
    ///
    /// Fails only if no batchable fix handles `code`.
    pub fn fix_all_documents(
        &self,
        solution: &Solution,
        code: &str,
        diagnostics: &[Diagnostic],
    ) -> Result<FixAllReport, FixError> {
        let provider = self.batch_provider(code)?;
        let compilation = Compilation::new(solution);

        let mut by_document: BTreeMap<DocumentId, Vec<Diagnostic>> = BTreeMap::new();
        for diagnostic in diagnostics.iter().filter(|d| d.code == code) {
            match solution.document_by_path(&diagnostic.location.file) {
                Some(document) => by_document
                    .entry(document.id())
                    .or_default()
                    .push(diagnostic.clone()),
                None => warn!(
                    "Skipping {} for unknown document {}",
                    code,
                    diagnostic.location.file.display()
                ),
            }
        }

        let outcomes: Vec<_> = by_document
            .into_par_iter()
            .map(|(id, diagnostics)| {
                (id, fix_document(provider, &compilation, id, code, &diagnostics))
            })
            .collect();

        let mut report = FixAllReport {
            solution: solution.clone(),
            applied: 0,
            failures: Vec::new(),
        };
        for (id, outcome) in outcomes {
            match outcome {
                Ok((tree, applied)) => {
                    report.solution = report.solution.with_tree(id, tree);
                    report.applied += applied;
                }
                Err(e) => {
                    let path = solution
                        .document(id)
                        .map(|d| d.path().to_path_buf())
                        .unwrap_or_default();
                    warn!("Fix-all for {} failed in {}: {}", code, path.display(), e);
                    report.failures.push((path, e));
                }
            }
        }
        Ok(report)
    }

    fn batch_provider(&self, code: &str) -> Result<&dyn CodeFix, FixError> {
        let provider = self
            .provider_for(code)
            .ok_or_else(|| FixError::NoFixProvider(code.to_string()))?;
        if !provider.supports_fix_all() {
            return Err(FixError::UnsupportedFixAll(code.to_string()));
        }
        Ok(provider)
    }
}

impl std::fmt::Debug for FixEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.fixes.iter().map(|fix| fix.name()))
            .finish()
    }
}

fn fix_document(
    provider: &dyn CodeFix,
    compilation: &Compilation,
    id: DocumentId,
    code: &str,
    diagnostics: &[Diagnostic],
) -> Result<(sharplint_syntax::SyntaxTree, usize), FixError> {
    let model = compilation.model(id).ok_or_else(|| FixError::TargetNotFound {
        code: code.to_string(),
        offset: 0,
    })?;
    let document = model.document();

    let mut edits = Vec::new();
    let mut sources = Vec::new();
    for diagnostic in diagnostics
        .iter()
        .filter(|d| d.code == code && d.location.file == document.path())
    {
        match compute_action(provider, document, &model, diagnostic)? {
            FixAction::Replace(edit) => {
                edits.push(edit);
                sources.push(diagnostic);
            }
            FixAction::Rename { .. } => return Err(FixError::UnsupportedFixAll(code.to_string())),
        }
    }

    if let Some((first, second)) = find_overlap(&edits) {
        return Err(FixConflict::new(
            code,
            document.path().display().to_string(),
            document.text(),
            first,
            second,
        )
        .into());
    }

    let root = apply_all(&model.root(), &edits).map_err(|missing| {
        warn!(
            "Edit at {} for {} found no target in {}",
            missing,
            code,
            document.path().display()
        );
        edits
            .iter()
            .position(|e| e.range() == missing)
            .and_then(|i| sources.get(i))
            .map_or_else(
                || FixError::TargetNotFound {
                    code: code.to_string(),
                    offset: missing.start,
                },
                |d| target_not_found(d),
            )
    })?;
    Ok((document.tree().with_root(&root), edits.len()))
}

fn compute_action(
    provider: &dyn CodeFix,
    document: &Document,
    model: &SemanticModel<'_>,
    diagnostic: &Diagnostic,
) -> Result<FixAction, FixError> {
    if diagnostic.version != Some(document.version()) {
        return Err(FixError::StaleDocument {
            code: diagnostic.code.clone(),
            path: document.path().to_path_buf(),
        });
    }
    let target = locate(&model.root(), diagnostic)?;
    provider.compute(&FixRequest {
        document,
        model,
        diagnostic,
        target,
    })
}

/// Finds the owner of a diagnostic: the trivia piece whose range is the fix
/// context range, or else the nearest ancestor of the token at the
/// diagnostic offset with the fix context kind and range.
fn locate(root: &SyntaxNode, diagnostic: &Diagnostic) -> Result<FixTarget, FixError> {
    let context = diagnostic
        .fix_context
        .as_ref()
        .ok_or_else(|| target_not_found(diagnostic))?;
    let offset = diagnostic.location.offset;

    if let Some(trivia) = root
        .trivia_at_offset(offset)
        .filter(|t| t.span() == context.range)
    {
        return Ok(FixTarget::Trivia(trivia));
    }

    root.token_at_offset(offset)
        .and_then(|token| {
            token
                .parent()
                .ancestors()
                .find(|n| n.kind() == context.kind && n.full_range() == context.range)
        })
        .map(FixTarget::Node)
        .ok_or_else(|| target_not_found(diagnostic))
}

fn document_for<'s>(solution: &'s Solution, diagnostic: &Diagnostic) -> Result<&'s Document, FixError> {
    solution
        .document_by_path(&diagnostic.location.file)
        .ok_or_else(|| target_not_found(diagnostic))
}

fn target_not_found(diagnostic: &Diagnostic) -> FixError {
    FixError::TargetNotFound {
        code: diagnostic.code.clone(),
        offset: diagnostic.location.offset,
    }
}

fn apply_one(
    solution: &Solution,
    id: DocumentId,
    edit: &Replacement,
    diagnostic: &Diagnostic,
) -> Result<Solution, FixError> {
    let document = solution
        .document(id)
        .ok_or_else(|| target_not_found(diagnostic))?;
    let root = edit
        .apply(&document.tree().root())
        .ok_or_else(|| target_not_found(diagnostic))?;
    Ok(solution.with_tree(id, document.tree().with_root(&root)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RuleContext;
    use crate::engine::RuleEngine;
    use crate::fix::rename::SyntacticRenamer;
    use crate::registry::RuleRegistry;
    use crate::rule::Rule;
    use crate::types::{Category, FixContext};
    use sharplint_syntax::{SyntaxKind, SyntaxToken, TextRange, TriviaKind};
    use std::path::Path;

    /// Flags lowercase method names; the fix uppercases the identifier.
    struct LowerMethod;

    impl Rule for LowerMethod {
        fn name(&self) -> &'static str {
            "lower-method"
        }
        fn code(&self) -> &'static str {
            "T100"
        }
        fn category(&self) -> Category {
            Category::Naming
        }
        fn node_kinds(&self) -> &'static [SyntaxKind] {
            &[SyntaxKind::MethodDeclaration]
        }
        fn check_node(&self, ctx: &RuleContext<'_>, node: &SyntaxNode) -> Vec<Diagnostic> {
            let Some(name) = node.child_token(SyntaxKind::Identifier) else {
                return Vec::new();
            };
            if !name.text().starts_with(char::is_lowercase) {
                return Vec::new();
            }
            vec![ctx
                .diagnostic(self, name.span(), name.text().to_string())
                .with_fix_context(FixContext::new(node.kind(), node.full_range()))]
        }
    }

    struct UpperToken;

    impl CodeFix for UpperToken {
        fn name(&self) -> &'static str {
            "upper-token"
        }
        fn title(&self) -> &'static str {
            "Uppercase the name"
        }
        fn fixable_codes(&self) -> &'static [&'static str] {
            &["T100"]
        }
        fn compute(&self, request: &FixRequest<'_>) -> Result<FixAction, FixError> {
            let name = request
                .target
                .node()
                .and_then(|n| n.child_token(SyntaxKind::Identifier))
                .ok_or_else(|| request.not_found())?;
            Ok(FixAction::Replace(Replacement::token(
                &name,
                name.green().with_text(crate::utils::first_char_to_upper(name.text())),
            )))
        }
    }

    /// Like `UpperToken`, but the edit for `stop` is built by `edit`.
    struct StopEdit(fn(&SyntaxNode, &SyntaxToken) -> Option<Replacement>);

    impl CodeFix for StopEdit {
        fn name(&self) -> &'static str {
            "stop-edit"
        }
        fn title(&self) -> &'static str {
            "Uppercase the name"
        }
        fn fixable_codes(&self) -> &'static [&'static str] {
            &["T100"]
        }
        fn compute(&self, request: &FixRequest<'_>) -> Result<FixAction, FixError> {
            let node = request.target.node().ok_or_else(|| request.not_found())?;
            let name = node
                .child_token(SyntaxKind::Identifier)
                .ok_or_else(|| request.not_found())?;
            let edit = if name.text() == "stop" {
                (self.0)(node, &name).ok_or_else(|| request.not_found())?
            } else {
                Replacement::token(
                    &name,
                    name.green().with_text(crate::utils::first_char_to_upper(name.text())),
                )
            };
            Ok(FixAction::Replace(edit))
        }
    }

    fn one_past_the_name(_: &SyntaxNode, name: &SyntaxToken) -> Option<Replacement> {
        Some(Replacement::Token {
            kind: SyntaxKind::Identifier,
            range: TextRange::at(name.full_range().start + 1, name.full_range().len()),
            with: name.green().with_text("Stop"),
        })
    }

    fn whole_class(method: &SyntaxNode, _: &SyntaxToken) -> Option<Replacement> {
        let class = method.parent()?;
        Some(Replacement::node(&class, class.green().clone()))
    }

    struct RenameMethod;

    impl CodeFix for RenameMethod {
        fn name(&self) -> &'static str {
            "rename-method"
        }
        fn title(&self) -> &'static str {
            "Rename the method"
        }
        fn fixable_codes(&self) -> &'static [&'static str] {
            &["T100"]
        }
        fn supports_fix_all(&self) -> bool {
            false
        }
        fn compute(&self, request: &FixRequest<'_>) -> Result<FixAction, FixError> {
            let node = request.target.node().ok_or_else(|| request.not_found())?;
            let symbol = request
                .model
                .declared_symbol(node)
                .ok_or_else(|| request.not_found())?;
            let new_name = crate::utils::first_char_to_upper(&symbol.name);
            Ok(FixAction::Rename { symbol, new_name })
        }
    }

    /// Flags `//` comments; the fix replaces them with an empty comment.
    struct AnyComment;

    impl Rule for AnyComment {
        fn name(&self) -> &'static str {
            "any-comment"
        }
        fn code(&self) -> &'static str {
            "T200"
        }
        fn category(&self) -> Category {
            Category::Commenting
        }
        fn trivia_kinds(&self) -> &'static [TriviaKind] {
            &[TriviaKind::SingleLineComment]
        }
        fn check_trivia(&self, ctx: &RuleContext<'_>, trivia: &SyntaxTrivia) -> Vec<Diagnostic> {
            vec![ctx
                .diagnostic(self, trivia.span(), "comment")
                .with_fix_context(FixContext::new(trivia.token().kind(), trivia.span()))]
        }
    }

    struct EmptyComment;

    impl CodeFix for EmptyComment {
        fn name(&self) -> &'static str {
            "empty-comment"
        }
        fn title(&self) -> &'static str {
            "Empty the comment"
        }
        fn fixable_codes(&self) -> &'static [&'static str] {
            &["T200"]
        }
        fn compute(&self, request: &FixRequest<'_>) -> Result<FixAction, FixError> {
            let trivia = request.target.trivia().ok_or_else(|| request.not_found())?;
            Ok(FixAction::Replace(Replacement::trivia(
                trivia,
                sharplint_syntax::Trivia::new(trivia.kind(), "//"),
            )))
        }
    }

    const SOURCE: &str = "class A {\n    // one\n    void run() { }\n    void stop() { run(); }\n}\n";

    fn analyze(solution: &Solution) -> Vec<Diagnostic> {
        RuleEngine::new(RuleRegistry::new().with(LowerMethod).with(AnyComment))
            .analyze_solution(solution)
            .diagnostics
    }

    fn solution() -> Solution {
        let mut solution = Solution::new();
        solution.add_source("A.cs", SOURCE).expect("parses");
        solution
    }

    fn text(solution: &Solution) -> String {
        solution
            .document_by_path(Path::new("A.cs"))
            .expect("document")
            .text()
    }

    fn of_code<'d>(diagnostics: &'d [Diagnostic], code: &str) -> Vec<&'d Diagnostic> {
        diagnostics.iter().filter(|d| d.code == code).collect()
    }

    #[test]
    fn single_fix_replaces_one_token() {
        let solution = solution();
        let diagnostics = analyze(&solution);
        let engine = FixEngine::new().with_fix(UpperToken);
        let fixed = engine
            .fix(&solution, of_code(&diagnostics, "T100")[0])
            .expect("fixed");
        assert_eq!(
            text(&fixed),
            "class A {\n    // one\n    void Run() { }\n    void stop() { run(); }\n}\n"
        );
    }

    #[test]
    fn stale_diagnostics_are_rejected() {
        let solution = solution();
        let diagnostics = analyze(&solution);
        let engine = FixEngine::new().with_fix(UpperToken);
        let t100 = of_code(&diagnostics, "T100");
        let fixed = engine.fix(&solution, t100[0]).expect("fixed");
        let err = engine.fix(&fixed, t100[1]).expect_err("stale");
        assert!(matches!(err, FixError::StaleDocument { .. }));
    }

    #[test]
    fn fix_all_applies_every_edit() {
        let solution = solution();
        let diagnostics = analyze(&solution);
        let engine = FixEngine::new().with_fix(UpperToken).with_fix(EmptyComment);
        let id = solution.documents().next().expect("doc").id();

        let fixed = engine
            .fix_all(&solution, id, "T100", &diagnostics)
            .expect("fixed");
        assert_eq!(
            text(&fixed),
            "class A {\n    // one\n    void Run() { }\n    void Stop() { run(); }\n}\n"
        );

        let report = engine
            .fix_all_documents(&solution, "T200", &diagnostics)
            .expect("report");
        assert_eq!(report.applied, 1);
        assert!(report.failures.is_empty());
        assert_eq!(
            text(&report.solution),
            "class A {\n    //\n    void run() { }\n    void stop() { run(); }\n}\n"
        );
    }

    #[test]
    fn a_missing_target_fails_the_whole_document() {
        let solution = solution();
        let diagnostics = analyze(&solution);
        let id = solution.documents().next().expect("doc").id();
        let engine = FixEngine::new().with_fix(StopEdit(one_past_the_name));

        let err = engine
            .fix_all(&solution, id, "T100", &diagnostics)
            .expect_err("missing target");
        let stop = SOURCE.find("stop").expect("stop");
        assert!(matches!(err, FixError::TargetNotFound { offset, .. } if offset == stop));

        let report = engine
            .fix_all_documents(&solution, "T100", &diagnostics)
            .expect("report");
        assert_eq!(report.applied, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(text(&report.solution), SOURCE);
    }

    #[test]
    fn nested_edits_conflict_and_change_nothing() {
        let solution = solution();
        let diagnostics = analyze(&solution);
        let id = solution.documents().next().expect("doc").id();
        let engine = FixEngine::new().with_fix(StopEdit(whole_class));

        let err = engine
            .fix_all(&solution, id, "T100", &diagnostics)
            .expect_err("conflict");
        assert!(matches!(&err, FixError::Conflict(c) if c.code == "T100"));

        let report = engine
            .fix_all_documents(&solution, "T100", &diagnostics)
            .expect("report");
        assert_eq!(report.applied, 0);
        assert!(matches!(report.failures.as_slice(), [(_, FixError::Conflict(_))]));
        assert_eq!(text(&report.solution), SOURCE);
    }

    #[test]
    fn missing_providers_and_batches() {
        let solution = solution();
        let diagnostics = analyze(&solution);
        let id = solution.documents().next().expect("doc").id();

        let err = FixEngine::new()
            .fix_all(&solution, id, "T100", &diagnostics)
            .expect_err("no provider");
        assert!(matches!(err, FixError::NoFixProvider(code) if code == "T100"));

        let engine = FixEngine::new().with_fix(RenameMethod);
        let err = engine
            .fix_all(&solution, id, "T100", &diagnostics)
            .expect_err("unsupported");
        assert!(matches!(err, FixError::UnsupportedFixAll(_)));

        let err = engine
            .fix(&solution, of_code(&diagnostics, "T100")[0])
            .expect_err("needs renamer");
        assert!(matches!(err, FixError::RenameRequired(_)));
    }

    #[tokio::test]
    async fn rename_fixes_go_through_the_renamer() {
        let solution = solution();
        let diagnostics = analyze(&solution);
        let engine = FixEngine::new().with_fix(RenameMethod);
        let fixed = engine
            .fix_with_renamer(&solution, of_code(&diagnostics, "T100")[0], &SyntacticRenamer)
            .await
            .expect("renamed");
        assert_eq!(
            text(&fixed),
            "class A {\n    // one\n    void Run() { }\n    void stop() { Run(); }\n}\n"
        );
    }

    struct CancellingRenamer;

    impl SymbolRenamer for CancellingRenamer {
        fn rename_symbol(
            &self,
            _solution: &Solution,
            _symbol: &Symbol,
            _new_name: &str,
        ) -> impl std::future::Future<Output = Result<Solution, RenameError>> + Send {
            std::future::ready(Err(RenameError::Cancelled))
        }
    }

    #[tokio::test]
    async fn cancelled_rename_leaves_solution_unchanged() {
        let solution = solution();
        let diagnostics = analyze(&solution);
        let engine = FixEngine::new().with_fix(RenameMethod);
        let err = engine
            .fix_with_renamer(&solution, of_code(&diagnostics, "T100")[0], &CancellingRenamer)
            .await
            .expect_err("cancelled");
        assert!(matches!(err, FixError::Rename(RenameError::Cancelled)));
        assert_eq!(text(&solution), SOURCE);
    }
}
