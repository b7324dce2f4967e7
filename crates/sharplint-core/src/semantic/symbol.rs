//! Symbols: the resolved identity of declared entities.

use super::types::Type;
use crate::document::DocumentId;
use serde::{Deserialize, Serialize};
use sharplint_syntax::{SyntaxKind, SyntaxNode, SyntaxToken, TextRange};
use std::fmt;

/// What kind of entity a symbol names.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Type,
    Field,
    Property,
    Method,
    Local,
    Parameter,
    EnumMember,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Type => "type",
            Self::Field => "field",
            Self::Property => "property",
            Self::Method => "method",
            Self::Local => "local",
            Self::Parameter => "parameter",
            Self::EnumMember => "enum member",
        };
        f.write_str(name)
    }
}

/// Declared accessibility.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accessibility {
    Public,
    Internal,
    ProtectedInternal,
    Protected,
    PrivateProtected,
    Private,
}

impl Accessibility {
    /// Reads accessibility from modifier tokens, falling back to `default`.
    #[must_use]
    pub fn from_modifiers(modifiers: &[SyntaxToken], default: Self) -> Self {
        let has = |kind: SyntaxKind| modifiers.iter().any(|t| t.kind() == kind);
        match (
            has(SyntaxKind::PublicKeyword),
            has(SyntaxKind::ProtectedKeyword),
            has(SyntaxKind::InternalKeyword),
            has(SyntaxKind::PrivateKeyword),
        ) {
            (true, _, _, _) => Self::Public,
            (_, true, true, _) => Self::ProtectedInternal,
            (_, true, _, true) => Self::PrivateProtected,
            (_, true, _, _) => Self::Protected,
            (_, _, true, _) => Self::Internal,
            (_, _, _, true) => Self::Private,
            _ => default,
        }
    }
}

/// Where a symbol is declared: enough to find the node again in the tree
/// version the symbol was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolDeclaration {
    /// Declaring document.
    pub document: DocumentId,
    /// Kind of the declaring node.
    pub kind: SyntaxKind,
    /// Full range of the declaring node.
    pub range: TextRange,
}

impl SymbolDeclaration {
    /// Declaration reference for `node` in `document`.
    #[must_use]
    pub fn of(document: DocumentId, node: &SyntaxNode) -> Self {
        Self {
            document,
            kind: node.kind(),
            range: node.full_range(),
        }
    }
}

/// A resolved named entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Simple name.
    pub name: String,
    /// Entity kind.
    pub kind: SymbolKind,
    /// Declared type; the return type for methods.
    pub ty: Type,
    /// Parameter types, for methods.
    pub parameters: Vec<Type>,
    /// Declaring node.
    pub declaration: Option<SymbolDeclaration>,
    /// Declared accessibility.
    pub accessibility: Accessibility,
    /// True for `static` and `const` members.
    pub is_static: bool,
    /// Full name of the containing type.
    pub container: Option<String>,
}

impl Symbol {
    /// Returns true if two symbols denote the same declaration.
    #[must_use]
    pub fn same_declaration(&self, other: &Self) -> bool {
        self.declaration.is_some() && self.declaration == other.declaration
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.container {
            Some(container) => write!(f, "{} {container}.{}", self.kind, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharplint_syntax::{ast, SyntaxTree};

    fn method_modifiers(source: &str) -> Vec<SyntaxToken> {
        let tree = SyntaxTree::parse(source).expect("parses");
        let method = tree
            .root()
            .descendants()
            .into_iter()
            .find_map(ast::MethodDeclaration::cast)
            .expect("method");
        ast::modifiers(method.syntax())
    }

    #[test]
    fn accessibility_from_modifiers() {
        let mods = method_modifiers("class C { protected internal void M() { } }");
        assert_eq!(
            Accessibility::from_modifiers(&mods, Accessibility::Private),
            Accessibility::ProtectedInternal
        );
        let mods = method_modifiers("class C { static void M() { } }");
        assert_eq!(
            Accessibility::from_modifiers(&mods, Accessibility::Private),
            Accessibility::Private
        );
    }
}
