//! Rule trait for defining lint rules.

use crate::context::RuleContext;
use crate::types::{Category, Diagnostic, Severity};
use sharplint_syntax::{SyntaxKind, SyntaxNode, SyntaxTrivia, TriviaKind};

/// A lint rule that subscribes to syntax node and trivia kinds.
///
/// The engine walks each tree once and calls [`Rule::check_node`] for every
/// node whose kind appears in [`Rule::node_kinds`], and [`Rule::check_trivia`]
/// for every trivia piece whose kind appears in [`Rule::trivia_kinds`].
/// Rules hold no state between calls.
///
/// # Example
///
/// ```
/// use sharplint_core::{Category, Diagnostic, Rule, RuleContext};
/// use sharplint_syntax::{SyntaxKind, SyntaxNode};
///
/// pub struct NoEmptyClass;
///
/// impl Rule for NoEmptyClass {
///     fn name(&self) -> &'static str { "no-empty-class" }
///     fn code(&self) -> &'static str { "EX0001" }
///     fn category(&self) -> Category { Category::Structure }
///     fn node_kinds(&self) -> &'static [SyntaxKind] { &[SyntaxKind::ClassDeclaration] }
///
///     fn check_node(&self, ctx: &RuleContext<'_>, node: &SyntaxNode) -> Vec<Diagnostic> {
///         if node.children().next().is_some() {
///             return Vec::new();
///         }
///         vec![ctx.diagnostic(self, node.span(), "Class is empty")]
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "enum-zero-duplicate").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "BA00007").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for diagnostics from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Returns the rule category.
    fn category(&self) -> Category;

    /// Node kinds this rule inspects.
    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[]
    }

    /// Trivia kinds this rule inspects.
    fn trivia_kinds(&self) -> &'static [TriviaKind] {
        &[]
    }

    /// Whether the rule also runs on generated documents.
    fn analyze_generated_code(&self) -> bool {
        false
    }

    /// Checks one subscribed node.
    fn check_node(&self, _ctx: &RuleContext<'_>, _node: &SyntaxNode) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Checks one subscribed trivia piece.
    fn check_trivia(&self, _ctx: &RuleContext<'_>, _trivia: &SyntaxTrivia) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
        fn category(&self) -> Category {
            Category::Usage
        }
    }

    #[test]
    fn test_rule_defaults() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Warning);
        assert!(rule.node_kinds().is_empty());
        assert!(rule.trivia_kinds().is_empty());
        assert!(!rule.analyze_generated_code());
    }
}
