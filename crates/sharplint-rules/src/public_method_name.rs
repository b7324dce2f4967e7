//! Rule requiring public methods to start with an uppercase letter.
//!
//! # Rationale
//!
//! Public methods are PascalCase in C#. A lowercase public method reads like
//! a private helper at the call site.
//!
//! # Fix
//!
//! [`PublicMethodNameFix`] renames the method and every call bound to it,
//! across the solution. Renames go one at a time, so the fix has no
//! fix-all batch.
//!
//! # Configuration
//!
//! None beyond the common `enabled` and `severity` keys.

use sharplint_core::fix::{CodeFix, FixAction, FixError, FixRequest};
use sharplint_core::utils::{first_char_to_upper, starts_with_lowercase};
use sharplint_core::{Category, Diagnostic, FixContext, Rule, RuleContext};
use sharplint_syntax::ast::{self, MethodDeclaration};
use sharplint_syntax::{SyntaxKind, SyntaxNode};

/// Rule code for public-method-name.
pub const CODE: &str = "BA00003";

/// Rule name for public-method-name.
pub const NAME: &str = "public-method-name";

/// Requires public method names to begin with an uppercase letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicMethodName;

impl PublicMethodName {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for PublicMethodName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Public method name should begin with uppercase letter"
    }

    fn category(&self) -> Category {
        Category::Naming
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::MethodDeclaration]
    }

    fn check_node(&self, ctx: &RuleContext<'_>, node: &SyntaxNode) -> Vec<Diagnostic> {
        if !ast::has_modifier(node, SyntaxKind::PublicKeyword) {
            return Vec::new();
        }
        let Some(name) = MethodDeclaration::cast(node.clone()).and_then(|m| m.identifier()) else {
            return Vec::new();
        };
        if !starts_with_lowercase(name.text()) {
            return Vec::new();
        }

        vec![ctx
            .diagnostic(
                self,
                name.span(),
                format!(
                    "Public method name \"{}\" should begin with upper case letter.",
                    name.text()
                ),
            )
            .with_fix_context(FixContext::new(node.kind(), node.full_range()))]
    }
}

/// Renames a lowercase public method to start with an uppercase letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicMethodNameFix;

impl CodeFix for PublicMethodNameFix {
    fn name(&self) -> &'static str {
        "uppercase-public-method"
    }

    fn title(&self) -> &'static str {
        "Replace first letter with uppercase"
    }

    fn fixable_codes(&self) -> &'static [&'static str] {
        &[CODE]
    }

    fn supports_fix_all(&self) -> bool {
        false
    }

    fn compute(&self, request: &FixRequest<'_>) -> Result<FixAction, FixError> {
        let method = request.target.node().ok_or_else(|| request.not_found())?;
        let symbol = request
            .model
            .declared_symbol(method)
            .ok_or_else(|| request.not_found())?;
        let new_name = first_char_to_upper(&symbol.name);
        Ok(FixAction::Rename { symbol, new_name })
    }
}
