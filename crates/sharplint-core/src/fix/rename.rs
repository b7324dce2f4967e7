//! Symbol renaming across a solution.

use super::edit::{apply_all, Replacement};
use crate::document::{Document, Solution};
use crate::semantic::{Compilation, Symbol};
use sharplint_syntax::ast::{InvocationExpression, MethodDeclaration};
use sharplint_syntax::{SyntaxKind, SyntaxToken, SyntaxTree};
use std::future::Future;
use tracing::debug;

/// Errors from a rename.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenameError {
    /// The symbol's declaration is not in the solution.
    #[error("symbol `{0}` was not found in the solution")]
    SymbolNotFound(String),

    /// The new name is not a valid identifier.
    #[error("`{0}` is not a valid identifier")]
    InvalidName(String),

    /// A reference could not be rewritten, so no document was changed.
    #[error("no token to rename at offset {offset} in {path}")]
    Incomplete {
        /// Document path.
        path: String,
        /// Start of the edit that found no target.
        offset: usize,
    },

    /// The rename did not complete.
    #[error("rename was cancelled")]
    Cancelled,
}

/// Renames a symbol and every reference to it.
///
/// The returned future resolves to a new solution; the input solution is
/// never modified, so dropping the future cancels the rename with nothing
/// applied.
pub trait SymbolRenamer: Send + Sync {
    /// Renames `symbol` to `new_name` across `solution`.
    fn rename_symbol(
        &self,
        solution: &Solution,
        symbol: &Symbol,
        new_name: &str,
    ) -> impl Future<Output = Result<Solution, RenameError>> + Send;
}

/// Renames a method declaration and the invocations that bind to it.
///
/// References are found by resolving every invocation in every document,
/// so overloads with a different arity and same-named methods of unrelated
/// types are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntacticRenamer;

impl SyntacticRenamer {
    /// Creates a renamer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Performs the rename synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`RenameError::SymbolNotFound`] if the declaration cannot be
    /// located and [`RenameError::InvalidName`] for a malformed new name.
    /// Returns [`RenameError::Incomplete`] if any reference could not be
    /// rewritten; the rename is then not applied to any document.
    pub fn rename(
        &self,
        solution: &Solution,
        symbol: &Symbol,
        new_name: &str,
    ) -> Result<Solution, RenameError> {
        if !is_identifier(new_name) {
            return Err(RenameError::InvalidName(new_name.to_string()));
        }
        let not_found = || RenameError::SymbolNotFound(symbol.name.clone());
        let declaration = symbol.declaration.ok_or_else(not_found)?;

        let compilation = Compilation::new(solution);
        let declaring = compilation.declaring_node(symbol).ok_or_else(not_found)?;
        let name = MethodDeclaration::cast(declaring.clone())
            .and_then(|method| method.identifier())
            .or_else(|| declaring.child_token(SyntaxKind::Identifier))
            .filter(|t| t.text() == symbol.name)
            .ok_or_else(not_found)?;

        let mut next = solution.clone();
        for document in solution.documents() {
            let Some(model) = compilation.model(document.id()) else {
                continue;
            };
            let mut edits = Vec::new();
            if document.id() == declaration.document {
                edits.push(rename_token(&name, new_name));
            }
            for node in model.root().descendants() {
                if node.kind() != SyntaxKind::InvocationExpression {
                    continue;
                }
                let binds = model
                    .symbol_for_invocation(&node)
                    .is_some_and(|s| s.same_declaration(symbol));
                if !binds {
                    continue;
                }
                let token = InvocationExpression::cast(node)
                    .and_then(|inv| inv.name_token());
                if let Some(token) = token {
                    edits.push(rename_token(&token, new_name));
                }
            }
            if edits.is_empty() {
                continue;
            }

            debug!(
                "Renaming {} to {} in {}: {} edit(s)",
                symbol.name,
                new_name,
                document.path().display(),
                edits.len()
            );
            next = next.with_tree(document.id(), rewrite(document, &edits)?);
        }
        Ok(next)
    }
}

impl SymbolRenamer for SyntacticRenamer {
    fn rename_symbol(
        &self,
        solution: &Solution,
        symbol: &Symbol,
        new_name: &str,
    ) -> impl Future<Output = Result<Solution, RenameError>> + Send {
        std::future::ready(self.rename(solution, symbol, new_name))
    }
}

fn rewrite(document: &Document, edits: &[Replacement]) -> Result<SyntaxTree, RenameError> {
    let root = apply_all(&document.tree().root(), edits).map_err(|missing| {
        RenameError::Incomplete {
            path: document.path().display().to_string(),
            offset: missing.start,
        }
    })?;
    Ok(document.tree().with_root(&root))
}

fn rename_token(token: &SyntaxToken, new_name: &str) -> Replacement {
    Replacement::token(token, token.green().with_text(new_name))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && sharplint_syntax::keyword_kind(name).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::SymbolKind;
    use std::path::Path;

    const SERVICE: &str = "class Service {\n    public void run() { }\n    public void run(int times) { }\n}\n";
    const CALLER: &str = "class Caller {\n    void Go(Service s) {\n        s.run();\n        s.run(2);\n        run();\n    }\n    void run() { }\n}\n";

    fn solution() -> Solution {
        let mut solution = Solution::new();
        solution.add_source("Service.cs", SERVICE).expect("parses");
        solution.add_source("Caller.cs", CALLER).expect("parses");
        solution
    }

    fn parameterless_run(solution: &Solution) -> Symbol {
        let compilation = Compilation::new(solution);
        let info = compilation.type_info("Service").expect("Service");
        info.members
            .iter()
            .find(|m| m.kind == SymbolKind::Method && m.parameters.is_empty())
            .cloned()
            .expect("run()")
    }

    fn text(solution: &Solution, path: &str) -> String {
        solution
            .document_by_path(Path::new(path))
            .expect("document")
            .text()
    }

    #[test]
    fn renames_declaration_and_matching_calls() {
        let solution = solution();
        let symbol = parameterless_run(&solution);
        let renamed = SyntacticRenamer::new()
            .rename(&solution, &symbol, "Run")
            .expect("renamed");

        assert_eq!(
            text(&renamed, "Service.cs"),
            "class Service {\n    public void Run() { }\n    public void run(int times) { }\n}\n"
        );
        assert_eq!(
            text(&renamed, "Caller.cs"),
            "class Caller {\n    void Go(Service s) {\n        s.Run();\n        s.run(2);\n        run();\n    }\n    void run() { }\n}\n"
        );
        assert_eq!(text(&solution, "Service.cs"), SERVICE);
    }

    #[test]
    fn rejects_invalid_names() {
        let solution = solution();
        let symbol = parameterless_run(&solution);
        let renamer = SyntacticRenamer::new();
        assert!(matches!(
            renamer.rename(&solution, &symbol, "class"),
            Err(RenameError::InvalidName(name)) if name == "class"
        ));
        assert!(renamer.rename(&solution, &symbol, "1st").is_err());
    }

    #[test]
    fn a_stale_reference_fails_the_document() {
        let solution = solution();
        let document = solution
            .document_by_path(Path::new("Caller.cs"))
            .expect("document");
        let root = document.tree().root();
        let call = root
            .descendant_tokens()
            .into_iter()
            .find(|t| t.text() == "run")
            .expect("call");
        let stray = Replacement::Token {
            kind: SyntaxKind::Identifier,
            range: sharplint_syntax::TextRange::at(call.full_range().start + 1, 2),
            with: call.green().with_text("Run"),
        };
        let edits = [rename_token(&call, "Run"), stray];
        assert!(matches!(
            rewrite(document, &edits),
            Err(RenameError::Incomplete { path, .. }) if path == "Caller.cs"
        ));
    }

    #[tokio::test]
    async fn rename_through_the_trait() {
        let solution = solution();
        let symbol = parameterless_run(&solution);
        let renamed = SyntacticRenamer::new()
            .rename_symbol(&solution, &symbol, "Run")
            .await
            .expect("renamed");
        assert_eq!(renamed.changed_since(&solution).len(), 2);
    }
}
