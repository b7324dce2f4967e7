//! The analysis pass: one walk over a tree, dispatching to subscribed rules.

use crate::config::Config;
use crate::context::RuleContext;
use crate::document::{DocumentId, Solution};
use crate::registry::RuleRegistry;
use crate::rule::Rule;
use crate::semantic::{Compilation, SemanticModel};
use crate::types::{Diagnostic, LintResult, RuleFault};
use rayon::prelude::*;
use sharplint_syntax::{SyntaxElement, SyntaxNode, SyntaxToken};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, trace};

/// Phase of an analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    /// Not started.
    Idle,
    /// Walking the tree.
    Traversing,
    /// Running rule callbacks for the current node or trivia.
    Dispatching,
    /// Sorting the collected diagnostics.
    Collecting,
    /// Finished; diagnostics are available.
    Done,
}

/// Diagnostics and faults from analyzing one document.
#[derive(Debug, Default)]
pub struct DocumentAnalysis {
    /// Diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Rule callbacks that panicked.
    pub faults: Vec<RuleFault>,
}

/// Runs registered rules over documents.
#[derive(Debug)]
pub struct RuleEngine {
    registry: RuleRegistry,
    config: Config,
}

impl RuleEngine {
    /// Creates an engine with default configuration.
    #[must_use]
    pub fn new(registry: RuleRegistry) -> Self {
        Self {
            registry,
            config: Config::default(),
        }
    }

    /// Sets the configuration used for rule enablement and severities.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// The registered rules.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyzes every document of `solution`, in parallel.
    #[must_use]
    pub fn analyze_solution(&self, solution: &Solution) -> LintResult {
        let compilation = Compilation::new(solution);
        let ids: Vec<DocumentId> = solution.documents().map(|d| d.id()).collect();
        let analyses: Vec<DocumentAnalysis> = ids
            .par_iter()
            .filter_map(|&id| compilation.model(id))
            .map(|model| self.analyze(&model))
            .collect();

        let mut result = LintResult::new();
        for analysis in analyses {
            result.diagnostics.extend(analysis.diagnostics);
            result.faults.extend(analysis.faults);
            result.files_checked += 1;
        }
        result.sort();
        result
    }

    /// Analyzes one document of a compilation.
    #[must_use]
    pub fn analyze_document(&self, compilation: &Compilation, id: DocumentId) -> DocumentAnalysis {
        compilation
            .model(id)
            .map(|model| self.analyze(&model))
            .unwrap_or_default()
    }

    /// Runs one pass over the document of `model`.
    #[must_use]
    pub fn analyze(&self, model: &SemanticModel<'_>) -> DocumentAnalysis {
        let ctx = RuleContext::new(model, &self.config);
        let active: Vec<bool> = self
            .registry
            .rules()
            .map(|rule| self.is_active(rule, &ctx))
            .collect();

        let mut pass = AnalysisPass {
            engine: self,
            ctx: &ctx,
            active,
            state: PassState::Idle,
            diagnostics: Vec::new(),
            faults: Vec::new(),
        };
        pass.run(&model.root());
        DocumentAnalysis {
            diagnostics: pass.diagnostics,
            faults: pass.faults,
        }
    }

    fn is_active(&self, rule: &dyn Rule, ctx: &RuleContext<'_>) -> bool {
        if !self.config.is_rule_enabled(rule.name(), rule.code()) {
            debug!("Skipping disabled rule: {}", rule.name());
            return false;
        }
        if ctx.is_generated() && !rule.analyze_generated_code() {
            debug!(
                "Skipping {} on generated file {}",
                rule.name(),
                ctx.path().display()
            );
            return false;
        }
        true
    }
}

struct AnalysisPass<'e, 'c> {
    engine: &'e RuleEngine,
    ctx: &'e RuleContext<'c>,
    active: Vec<bool>,
    state: PassState,
    diagnostics: Vec<Diagnostic>,
    faults: Vec<RuleFault>,
}

impl AnalysisPass<'_, '_> {
    fn transition(&mut self, next: PassState) {
        trace!(from = ?self.state, to = ?next, "analysis pass");
        self.state = next;
    }

    fn run(&mut self, root: &SyntaxNode) {
        self.transition(PassState::Traversing);
        self.visit(root);
        self.transition(PassState::Collecting);
        // Stable: equal offsets keep registration order.
        self.diagnostics
            .sort_by_key(|d| (d.location.offset, d.location.length));
        self.transition(PassState::Done);
    }

    fn visit(&mut self, node: &SyntaxNode) {
        self.dispatch_node(node);
        for child in node.children_with_tokens() {
            match child {
                SyntaxElement::Node(n) => self.visit(&n),
                SyntaxElement::Token(t) => self.visit_token(&t),
            }
        }
    }

    fn visit_token(&mut self, token: &SyntaxToken) {
        if !self.engine.registry.has_trivia_rules() {
            return;
        }
        for trivia in token.leading_trivia().into_iter().chain(token.trailing_trivia()) {
            let indices = self.engine.registry.trivia_rules(trivia.kind());
            if indices.is_empty() {
                continue;
            }
            self.transition(PassState::Dispatching);
            for &index in indices {
                let offset = trivia.span().start;
                self.invoke(index, offset, |rule, ctx| rule.check_trivia(ctx, &trivia));
            }
            self.transition(PassState::Traversing);
        }
    }

    fn dispatch_node(&mut self, node: &SyntaxNode) {
        let indices = self.engine.registry.node_rules(node.kind());
        if indices.is_empty() {
            return;
        }
        self.transition(PassState::Dispatching);
        for &index in indices {
            let offset = node.span().start;
            self.invoke(index, offset, |rule, ctx| rule.check_node(ctx, node));
        }
        self.transition(PassState::Traversing);
    }

    fn invoke<F>(&mut self, index: usize, offset: usize, check: F)
    where
        F: FnOnce(&dyn Rule, &RuleContext<'_>) -> Vec<Diagnostic>,
    {
        if !self.active.get(index).copied().unwrap_or(false) {
            return;
        }
        let Some(rule) = self.engine.registry.get(index) else {
            return;
        };
        let ctx = self.ctx;
        match catch_unwind(AssertUnwindSafe(|| check(rule, ctx))) {
            Ok(found) => {
                let severity = self
                    .engine
                    .config
                    .rule_severity(rule.name(), rule.code());
                self.diagnostics.extend(found.into_iter().map(|mut d| {
                    if let Some(severity) = severity {
                        d.severity = severity;
                    }
                    d
                }));
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(
                    rule = rule.name(),
                    file = %ctx.path().display(),
                    offset,
                    "rule failed: {message}"
                );
                self.faults.push(RuleFault {
                    code: rule.code().to_string(),
                    rule: rule.name().to_string(),
                    file: ctx.path().to_path_buf(),
                    offset,
                    message,
                });
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Severity};
    use sharplint_syntax::{SyntaxKind, SyntaxTrivia, TriviaKind};

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
            let token = node
                .child_tokens()
                .filter(|t| t.kind() == SyntaxKind::Identifier)
                .last();
            token
                .map(|t| vec![ctx.diagnostic(self, t.span(), t.text().to_string())])
                .unwrap_or_default()
        }
    }

    struct Comments;

    impl Rule for Comments {
        fn name(&self) -> &'static str {
            "comments"
        }
        fn code(&self) -> &'static str {
            "T002"
        }
        fn category(&self) -> Category {
            Category::Commenting
        }
        fn trivia_kinds(&self) -> &'static [TriviaKind] {
            &[TriviaKind::SingleLineComment]
        }
        fn check_trivia(&self, ctx: &RuleContext<'_>, trivia: &SyntaxTrivia) -> Vec<Diagnostic> {
            vec![ctx.diagnostic(self, trivia.span(), trivia.comment_text().trim().to_string())]
        }
    }

    struct Panics;

    impl Rule for Panics {
        fn name(&self) -> &'static str {
            "panics"
        }
        fn code(&self) -> &'static str {
            "T003"
        }
        fn category(&self) -> Category {
            Category::Structure
        }
        fn node_kinds(&self) -> &'static [SyntaxKind] {
            &[SyntaxKind::MethodDeclaration]
        }
        fn check_node(&self, _ctx: &RuleContext<'_>, _node: &SyntaxNode) -> Vec<Diagnostic> {
            panic!("boom")
        }
    }

    const SOURCE: &str = "class C {\n    // second\n    void B() { }\n    // first? no, third\n    void A() { }\n}\n";

    fn solution(path: &str, source: &str) -> Solution {
        let mut solution = Solution::new();
        solution.add_source(path, source).expect("parses");
        solution
    }

    #[test]
    fn diagnostics_come_back_in_source_order() {
        let engine = RuleEngine::new(RuleRegistry::new().with(MethodNames).with(Comments));
        let result = engine.analyze_solution(&solution("C.cs", SOURCE));
        let messages: Vec<_> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "B", "first? no, third", "A"]);
        assert!(result.diagnostics.iter().all(|d| d.version.is_some()));
    }

    #[test]
    fn a_panicking_rule_is_isolated() {
        let engine = RuleEngine::new(
            RuleRegistry::new()
                .with(Panics)
                .with(MethodNames),
        );
        let result = engine.analyze_solution(&solution("C.cs", SOURCE));
        assert_eq!(result.diagnostics.len(), 2);
        assert_eq!(result.faults.len(), 2);
        assert!(result.faults.iter().all(|f| f.code == "T003" && f.message == "boom"));
    }

    #[test]
    fn config_disables_and_overrides() {
        let config = Config::parse(
            "[rules.comments]\nenabled = false\n\n[rules.T001]\nseverity = \"error\"\n",
        )
        .expect("config");
        let engine =
            RuleEngine::new(RuleRegistry::new().with(MethodNames).with(Comments)).with_config(config);
        let result = engine.analyze_solution(&solution("C.cs", SOURCE));
        assert_eq!(result.diagnostics.len(), 2);
        assert!(result.diagnostics.iter().all(|d| d.severity == Severity::Error));
    }

    #[test]
    fn generated_documents_are_skipped() {
        let engine = RuleEngine::new(RuleRegistry::new().with(MethodNames));
        let result = engine.analyze_solution(&solution("C.Designer.cs", SOURCE));
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.files_checked, 1);
    }
}
