//! Rule preferring `var` for locals whose type is already spelled out by the
//! initializer.
//!
//! # Rationale
//!
//! `Dictionary<string, int> counts = new Dictionary<string, int>();` says the
//! type twice. When the initializer's static type is exactly the declared
//! type, `var` loses nothing.
//!
//! # Detected Patterns
//!
//! - `int x = 5;`
//! - `Person p = new Person();`
//! - `for (int i = 0; ...)`
//!
//! # Allowed Patterns
//!
//! - `const` locals
//! - Declarations with several declarators or without an initializer
//! - `string s = null;`
//! - Declarations whose initializer has a different type (`long n = 5;`)
//!
//! # Fix
//!
//! [`PreferImplicitTypeFix`] replaces the type with `var`, keeping the
//! surrounding whitespace and comments.
//!
//! # Configuration
//!
//! - `for_loops`: also check `for` loop initializers (default: `true`)

use sharplint_core::fix::{CodeFix, FixAction, FixError, FixRequest, Replacement};
use sharplint_core::semantic::Type;
use sharplint_core::{Category, Diagnostic, FixContext, Rule, RuleContext};
use sharplint_syntax::ast::{ForStatement, LocalDeclarationStatement, VariableDeclaration};
use sharplint_syntax::{GreenElement, GreenNode, GreenToken, SyntaxKind, SyntaxNode};

/// Rule code for prefer-implicit-type.
pub const CODE: &str = "BA00005";

/// Rule name for prefer-implicit-type.
pub const NAME: &str = "prefer-implicit-type";

/// Suggests `var` where the declared type equals the initializer's type.
#[derive(Debug, Clone)]
pub struct PreferImplicitType {
    /// Whether `for` loop declarations are checked.
    pub check_for_loops: bool,
}

impl Default for PreferImplicitType {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferImplicitType {
    /// Creates the rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            check_for_loops: true,
        }
    }

    /// Sets whether `for` loop declarations are checked.
    #[must_use]
    pub fn check_for_loops(mut self, check: bool) -> Self {
        self.check_for_loops = check;
        self
    }

    fn declaration(&self, ctx: &RuleContext<'_>, node: &SyntaxNode) -> Option<VariableDeclaration> {
        match node.kind() {
            SyntaxKind::LocalDeclarationStatement => {
                let statement = LocalDeclarationStatement::cast(node.clone())?;
                if statement.is_const() {
                    return None;
                }
                statement.declaration()
            }
            SyntaxKind::ForStatement => {
                let for_loops = ctx
                    .rule_config(self)
                    .map_or(self.check_for_loops, |c| {
                        c.get_bool("for_loops", self.check_for_loops)
                    });
                if !for_loops {
                    return None;
                }
                ForStatement::cast(node.clone())?.declaration()
            }
            _ => None,
        }
    }
}

/// The declared type node if `declaration` can use `var`.
fn reportable_type(ctx: &RuleContext<'_>, declaration: &VariableDeclaration) -> Option<SyntaxNode> {
    let ty = declaration.ty()?;
    if is_var(&ty) {
        return None;
    }
    let declarators = declaration.declarators();
    let [declarator] = declarators.as_slice() else {
        return None;
    };
    let value = declarator.initializer()?.value()?;
    if is_null_literal(&value) {
        return None;
    }

    let model = ctx.semantic();
    let declared = model.resolve_type(&ty);
    let initialized = model.type_of_expression(&value);
    let comparable = |t: &Type| !matches!(t, Type::Unknown | Type::Null);
    (comparable(&declared) && comparable(&initialized) && declared == initialized).then_some(ty)
}

fn is_var(ty: &SyntaxNode) -> bool {
    ty.kind() == SyntaxKind::IdentifierName && ty.text() == "var"
}

fn is_null_literal(expr: &SyntaxNode) -> bool {
    expr.kind() == SyntaxKind::LiteralExpression
        && expr
            .first_token()
            .is_some_and(|t| t.kind() == SyntaxKind::NullKeyword)
}

impl Rule for PreferImplicitType {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Local variable should use implicit declaration where possible"
    }

    fn category(&self) -> Category {
        Category::Usage
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::LocalDeclarationStatement, SyntaxKind::ForStatement]
    }

    fn check_node(&self, ctx: &RuleContext<'_>, node: &SyntaxNode) -> Vec<Diagnostic> {
        let Some(declaration) = self.declaration(ctx, node) else {
            return Vec::new();
        };
        let Some(ty) = reportable_type(ctx, &declaration) else {
            return Vec::new();
        };

        vec![ctx
            .diagnostic(
                self,
                ty.span(),
                format!(
                    "Local variable declaration \"{}\" should use the var keyword.",
                    declaration.syntax().text()
                ),
            )
            .with_fix_context(FixContext::new(ty.kind(), ty.full_range()))]
    }
}

/// Replaces an explicit local type with `var`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferImplicitTypeFix;

impl CodeFix for PreferImplicitTypeFix {
    fn name(&self) -> &'static str {
        "use-var"
    }

    fn title(&self) -> &'static str {
        "Replace explicit type declaration with var keyword"
    }

    fn fixable_codes(&self) -> &'static [&'static str] {
        &[CODE]
    }

    fn compute(&self, request: &FixRequest<'_>) -> Result<FixAction, FixError> {
        let ty = request.target.node().ok_or_else(|| request.not_found())?;
        let (Some(first), Some(last)) = (ty.first_token(), ty.last_token()) else {
            return Err(request.not_found());
        };
        let var = GreenToken::with_trivia(
            SyntaxKind::Identifier,
            "var",
            first.green().leading().to_vec(),
            last.green().trailing().to_vec(),
        );
        let name = GreenNode::new(SyntaxKind::IdentifierName, vec![GreenElement::Token(var)]);
        Ok(FixAction::Replace(Replacement::node(ty, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, fix_all, messages};

    fn method(body: &str) -> String {
        format!("class Person {{ }}\nclass C {{\n    void M() {{\n{body}\n    }}\n}}\n")
    }

    #[test]
    fn flags_redundant_types() {
        let source = method(
            "        int x = 5;\n        Person p = new Person();\n        string s = \"a\" + \"b\";",
        );
        let diagnostics = check(PreferImplicitType::new(), &source);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "Local variable declaration \"int x = 5\" should use the var keyword.",
                "Local variable declaration \"Person p = new Person()\" should use the var keyword.",
                "Local variable declaration \"string s = \"a\" + \"b\"\" should use the var keyword.",
            ]
        );
        assert_eq!(diagnostics[0].location.length, "int".len());
    }

    #[test]
    fn allowed_declarations() {
        let source = method(
            "        var a = 1;\n        const int b = 2;\n        int c = 1, d = 2;\n        int e;\n        string f = null;\n        long g = 5;\n        object h = \"text\";",
        );
        assert!(check(PreferImplicitType::new(), &source).is_empty());
    }

    #[test]
    fn for_loops_are_configurable() {
        let source = method("        for (int i = 0; i < 3; i++) { }");
        assert_eq!(check(PreferImplicitType::new(), &source).len(), 1);
        assert!(check(PreferImplicitType::new().check_for_loops(false), &source).is_empty());
    }

    #[test]
    fn generic_types_compare_structurally() {
        let source = method(
            "        List<int> xs = new List<int>();\n        List<int> ys = new List<long>();",
        );
        let diagnostics = check(PreferImplicitType::new(), &source);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("xs"));
    }

    #[test]
    fn fix_replaces_type_keeping_trivia() {
        let fixed = fix_all(
            PreferImplicitType::new(),
            PreferImplicitTypeFix,
            &method("        int x = 5;\n        /* keep */ Person  p = new Person();"),
        );
        assert_eq!(
            fixed,
            method("        var x = 5;\n        /* keep */ var  p = new Person();")
        );
    }
}
