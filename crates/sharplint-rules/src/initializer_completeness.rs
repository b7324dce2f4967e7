//! Rule requiring object initializers to assign every member.
//!
//! # Rationale
//!
//! Object initializers are often used as a poor man's constructor. When a
//! field is added to the type, every initializer that is meant to be
//! complete silently leaves it at its default value. Listing every member,
//! even as `Name = default(T)`, makes the omission explicit.
//!
//! # Detected Patterns
//!
//! - `new Point { X = 1 }` where `Point` also declares `Y`
//!
//! Only instance fields and properties the initializer may access are
//! expected. Static and `const` members are never listed. Initializers of
//! nested members (`Inner = { ... }`) are not checked.
//!
//! # Fix
//!
//! [`InitializerCompletenessFix`] appends `Name = default(T)` for every
//! missing member. `T` is the member's type with the created type's generic
//! arguments filled in, qualified as far as the initializer's location needs.
//!
//! # Configuration
//!
//! None beyond the common `enabled` and `severity` keys.

use sharplint_core::fix::{CodeFix, FixAction, FixError, FixRequest, Replacement};
use sharplint_core::semantic::{SemanticModel, Symbol, SymbolKind};
use sharplint_core::{Category, Diagnostic, FixContext, Rule, RuleContext};
use sharplint_syntax::ast::{AssignmentExpression, InitializerExpression};
use sharplint_syntax::{parse_expression, SyntaxKind, SyntaxNode};
use std::collections::HashSet;
use tracing::debug;

/// Rule code for initializer-completeness.
pub const CODE: &str = "BA00006";

/// Rule name for initializer-completeness.
pub const NAME: &str = "initializer-completeness";

/// Reports object initializers that leave members unassigned.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitializerCompleteness;

impl InitializerCompleteness {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Instance fields and properties of the created type that `initializer`
/// does not assign, in declaration order.
fn missing_members(model: &SemanticModel<'_>, initializer: &SyntaxNode) -> Vec<Symbol> {
    let Some(creation) = initializer
        .parent()
        .filter(|p| p.kind() == SyntaxKind::ObjectCreationExpression)
    else {
        return Vec::new();
    };
    let ty = model.type_of_expression(&creation);

    let assigned: HashSet<String> = initializer
        .children()
        .filter_map(AssignmentExpression::cast)
        .filter_map(|a| a.left())
        .map(|left| left.text())
        .collect();

    let mut seen = HashSet::new();
    model
        .lookup_members(
            &ty,
            initializer.span().start,
            &[SymbolKind::Field, SymbolKind::Property],
        )
        .into_iter()
        .filter(|m| !m.is_static && !assigned.contains(&m.name))
        .filter(|m| seen.insert(m.name.clone()))
        .collect()
}

impl Rule for InitializerCompleteness {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "The initializer list is lacking some members"
    }

    fn category(&self) -> Category {
        Category::Structure
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::ObjectInitializerExpression]
    }

    fn analyze_generated_code(&self) -> bool {
        true
    }

    fn check_node(&self, ctx: &RuleContext<'_>, node: &SyntaxNode) -> Vec<Diagnostic> {
        let missing = missing_members(ctx.semantic(), node);
        if missing.is_empty() {
            return Vec::new();
        }

        let names: Vec<&str> = missing.iter().map(|m| m.name.as_str()).collect();
        vec![ctx
            .diagnostic(
                self,
                node.span(),
                format!(
                    "The following members are not initialized: '{}'",
                    names.join(" ,")
                ),
            )
            .with_fix_context(FixContext::new(node.kind(), node.full_range()))]
    }
}

/// Adds `Name = default(T)` for every unassigned member.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitializerCompletenessFix;

impl CodeFix for InitializerCompletenessFix {
    fn name(&self) -> &'static str {
        "complete-initializer"
    }

    fn title(&self) -> &'static str {
        "Add missing members to initializer list"
    }

    fn fixable_codes(&self) -> &'static [&'static str] {
        &[CODE]
    }

    fn compute(&self, request: &FixRequest<'_>) -> Result<FixAction, FixError> {
        let node = request.target.node().ok_or_else(|| request.not_found())?;
        let initializer =
            InitializerExpression::cast(node.clone()).ok_or_else(|| request.not_found())?;

        let position = node.span().start;
        let additions = missing_members(request.model, node)
            .iter()
            .map(|m| {
                request
                    .model
                    .type_name_at(&m.ty, position)
                    .map(|ty| format!("{} = default({ty})", m.name))
                    .ok_or_else(|| request.not_found())
            })
            .collect::<Result<Vec<_>, _>>()?;
        if additions.is_empty() {
            return Err(request.not_found());
        }
        let list = additions.join(", ");

        let (at, insert) = match initializer.expressions().last() {
            Some(last) => match initializer
                .separators()
                .last()
                .filter(|comma| comma.span().start >= last.span().end)
            {
                Some(comma) => (comma.span().end, format!(" {list}")),
                None => (last.span().end, format!(", {list}")),
            },
            None => {
                let open = node
                    .child_token(SyntaxKind::OpenBrace)
                    .ok_or_else(|| request.not_found())?;
                (open.span().end, format!(" {list}"))
            }
        };

        let mut text = node.full_text();
        text.insert_str(at - node.full_range().start, &insert);
        debug!("Completing initializer at {}: {}", node.span(), insert.trim());

        // Reparse behind a line break so the brace keeps its own leading trivia.
        let creation = parse_expression(&format!("new T\n{text}"))?;
        let replacement = creation
            .children()
            .iter()
            .filter_map(|c| c.as_node())
            .find(|n| n.kind() == SyntaxKind::ObjectInitializerExpression)
            .filter(|n| n.to_string() == text)
            .cloned()
            .ok_or_else(|| request.not_found())?;
        Ok(FixAction::Replace(Replacement::node(node, replacement)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, check_solution, fix_all, messages, solution, text};
    use sharplint_core::fix::FixEngine;

    const POINT: &str = "class P {\n    public int X;\n    public int Y, Z;\n    public static int Count;\n    private int hidden;\n}\n";

    fn with_usage(body: &str) -> String {
        format!("{POINT}class Q {{\n    void M() {{\n        {body}\n    }}\n}}\n")
    }

    #[test]
    fn lists_missing_members_in_order() {
        let source = with_usage("var p = new P { X = 1 };");
        let diagnostics = check(InitializerCompleteness::new(), &source);
        assert_eq!(
            messages(&diagnostics),
            vec!["The following members are not initialized: 'Y ,Z'"]
        );
        assert_eq!(diagnostics[0].location.length, "{ X = 1 }".len());
    }

    #[test]
    fn complete_and_collection_initializers_pass() {
        let source = with_usage(
            "var p = new P { X = 1, Y = 2, Z = 3 };\n        var xs = new List<int> { 1, 2 };",
        );
        assert!(check(InitializerCompleteness::new(), &source).is_empty());
    }

    #[test]
    fn properties_and_inherited_members_count() {
        let source = "class Base {\n    public string Name { get; set; }\n}\nclass Item : Base {\n    public int Size { get; set; }\n}\nclass Q {\n    void M() {\n        var i = new Item { Size = 1 };\n    }\n}\n";
        let diagnostics = check(InitializerCompleteness::new(), source);
        assert_eq!(
            messages(&diagnostics),
            vec!["The following members are not initialized: 'Name'"]
        );
    }

    #[test]
    fn runs_on_generated_documents() {
        let source = format!("// <auto-generated/>\n{}", with_usage("var p = new P { };"));
        let diagnostics = check(InitializerCompleteness::new(), &source);
        assert_eq!(
            messages(&diagnostics),
            vec!["The following members are not initialized: 'X ,Y ,Z'"]
        );
    }

    #[test]
    fn fix_appends_defaults() {
        let fixed = fix_all(
            InitializerCompleteness::new(),
            InitializerCompletenessFix,
            &with_usage("var p = new P { X = 1 };"),
        );
        assert_eq!(
            fixed,
            with_usage("var p = new P { X = 1, Y = default(int), Z = default(int) };")
        );
    }

    #[test]
    fn fix_fills_in_generic_arguments() {
        let source = "class Box<T> {\n    public T Value;\n    public T[] Items { get; set; }\n    public string Label;\n}\nclass Q {\n    void M() {\n        var b = new Box<int> { Label = \"x\" };\n    }\n}\n";
        let fixed = fix_all(InitializerCompleteness::new(), InitializerCompletenessFix, source);
        assert_eq!(
            fixed,
            source.replace(
                "{ Label = \"x\" }",
                "{ Label = \"x\", Value = default(int), Items = default(int[]) }"
            )
        );
    }

    #[test]
    fn fix_qualifies_types_from_other_namespaces() {
        let source = "namespace A {\n    public class Inner { }\n    public class P {\n        public Inner I;\n        public int N;\n    }\n}\nnamespace B {\n    class Inner { }\n    class Q {\n        void M() {\n            var p = new A.P { N = 1 };\n        }\n    }\n}\n";
        let fixed = fix_all(InitializerCompleteness::new(), InitializerCompletenessFix, source);
        assert_eq!(
            fixed,
            source.replace("{ N = 1 }", "{ N = 1, I = default(A.Inner) }")
        );
    }

    #[test]
    fn nested_initializers_conflict_and_change_nothing() {
        let source = format!(
            "{POINT}class Line {{\n    public P Start;\n    public P End;\n}}\nclass Q {{\n    void M() {{\n        var l = new Line {{ Start = new P {{ X = 1 }} }};\n    }}\n}}\n"
        );
        let solution = solution(&source);
        let diagnostics = check_solution(InitializerCompleteness::new(), &solution);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "The following members are not initialized: 'End'",
                "The following members are not initialized: 'Y ,Z'",
            ]
        );

        let engine = FixEngine::new().with_fix(InitializerCompletenessFix);
        let id = solution.documents().next().expect("document").id();
        let err = engine
            .fix_all(&solution, id, CODE, &diagnostics)
            .expect_err("nested edits overlap");
        assert!(matches!(err, FixError::Conflict(_)));

        let report = engine
            .fix_all_documents(&solution, CODE, &diagnostics)
            .expect("report");
        assert_eq!(report.applied, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(text(&report.solution), source);
    }

    #[test]
    fn fix_handles_empty_and_trailing_comma() {
        let fixed = fix_all(
            InitializerCompleteness::new(),
            InitializerCompletenessFix,
            &with_usage("var a = new P { };\n        var b = new P { X = 1, Y = 2, };"),
        );
        assert_eq!(
            fixed,
            with_usage(
                "var a = new P { X = default(int), Y = default(int), Z = default(int) };\n        var b = new P { X = 1, Y = 2, Z = default(int) };"
            )
        );
    }
}
