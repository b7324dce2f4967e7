//! Rule requiring private instance methods to start with a lowercase letter.
//!
//! # Rationale
//!
//! Lowercase private helpers make it visible at every call site that a
//! method is not part of the type's public surface.
//!
//! # Detected Patterns
//!
//! - `private void Helper()` (explicit `private`, not `static`)
//!
//! Methods without an explicit `private` modifier are not checked.
//!
//! # Configuration
//!
//! None beyond the common `enabled` and `severity` keys.

use sharplint_core::utils::starts_with_uppercase;
use sharplint_core::{Category, Diagnostic, Rule, RuleContext};
use sharplint_syntax::ast::{self, MethodDeclaration};
use sharplint_syntax::{SyntaxKind, SyntaxNode};

/// Rule code for private-method-name.
pub const CODE: &str = "BA00001";

/// Rule name for private-method-name.
pub const NAME: &str = "private-method-name";

/// Requires private instance method names to begin with a lowercase letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivateMethodName;

impl PrivateMethodName {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for PrivateMethodName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Private method name should begin with lowercase letter"
    }

    fn category(&self) -> Category {
        Category::Naming
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::MethodDeclaration]
    }

    fn check_node(&self, ctx: &RuleContext<'_>, node: &SyntaxNode) -> Vec<Diagnostic> {
        if ast::has_modifier(node, SyntaxKind::StaticKeyword)
            || !ast::has_modifier(node, SyntaxKind::PrivateKeyword)
        {
            return Vec::new();
        }
        let Some(name) = MethodDeclaration::cast(node.clone()).and_then(|m| m.identifier()) else {
            return Vec::new();
        };
        if !starts_with_uppercase(name.text()) {
            return Vec::new();
        }

        vec![ctx.diagnostic(
            self,
            name.span(),
            format!(
                "Private method name \"{}\" should begin with lower case letter.",
                name.text()
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, messages};

    #[test]
    fn flags_uppercase_private_methods() {
        let source = "class C {\n    private void Helper() { }\n    private void helper() { }\n}\n";
        let diagnostics = check(PrivateMethodName::new(), source);
        assert_eq!(
            messages(&diagnostics),
            vec!["Private method name \"Helper\" should begin with lower case letter."]
        );
        let d = &diagnostics[0];
        assert_eq!((d.location.line, d.location.column), (2, 18));
        assert_eq!(d.location.length, "Helper".len());
    }

    #[test]
    fn ignores_static_and_implicitly_private_methods() {
        let source = "class C {\n    private static void Helper() { }\n    void Other() { }\n    public void Run() { }\n}\n";
        assert!(check(PrivateMethodName::new(), source).is_empty());
    }

    #[test]
    fn async_modifier_is_not_the_name() {
        let source = "class C {\n    private async void Load() { }\n}\n";
        let diagnostics = check(PrivateMethodName::new(), source);
        assert_eq!(
            messages(&diagnostics),
            vec!["Private method name \"Load\" should begin with lower case letter."]
        );
    }

    #[test]
    fn skips_generated_documents() {
        let source = "// <auto-generated/>\nclass C {\n    private void Helper() { }\n}\n";
        assert!(check(PrivateMethodName::new(), source).is_empty());
    }
}
