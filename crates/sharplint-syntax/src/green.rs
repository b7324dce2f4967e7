//! Position-independent, shareable tree storage.
//!
//! Green nodes know their kind, children and total text length but not their
//! absolute position or parent. They are reference counted, so an edit that
//! rebuilds one path of the tree shares every other subtree with the old
//! version.

use crate::kind::{SyntaxKind, TriviaKind};
use std::fmt;
use std::sync::Arc;

/// A single piece of trivia (whitespace, line break, comment, directive).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trivia {
    kind: TriviaKind,
    text: Arc<str>,
}

impl Trivia {
    /// Creates a trivia piece.
    #[must_use]
    pub fn new(kind: TriviaKind, text: impl Into<Arc<str>>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// A single space.
    #[must_use]
    pub fn space() -> Self {
        Self::new(TriviaKind::Whitespace, " ")
    }

    /// A `\n` line break.
    #[must_use]
    pub fn newline() -> Self {
        Self::new(TriviaKind::EndOfLine, "\n")
    }

    /// Trivia kind.
    #[must_use]
    pub fn kind(&self) -> TriviaKind {
        self.kind
    }

    /// Raw text, including comment delimiters.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true for zero-length trivia.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct GreenTokenData {
    kind: SyntaxKind,
    text: Arc<str>,
    leading: Vec<Trivia>,
    trailing: Vec<Trivia>,
}

/// A token together with its leading and trailing trivia.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GreenToken(Arc<GreenTokenData>);

impl GreenToken {
    /// Creates a token without trivia.
    #[must_use]
    pub fn new(kind: SyntaxKind, text: impl Into<Arc<str>>) -> Self {
        Self::with_trivia(kind, text, Vec::new(), Vec::new())
    }

    /// Creates a token with explicit trivia.
    #[must_use]
    pub fn with_trivia(
        kind: SyntaxKind,
        text: impl Into<Arc<str>>,
        leading: Vec<Trivia>,
        trailing: Vec<Trivia>,
    ) -> Self {
        Self(Arc::new(GreenTokenData {
            kind,
            text: text.into(),
            leading,
            trailing,
        }))
    }

    /// Token kind.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind
    }

    /// Token text without trivia.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.0.text
    }

    /// Leading trivia.
    #[must_use]
    pub fn leading(&self) -> &[Trivia] {
        &self.0.leading
    }

    /// Trailing trivia.
    #[must_use]
    pub fn trailing(&self) -> &[Trivia] {
        &self.0.trailing
    }

    /// Total length of leading trivia.
    #[must_use]
    pub fn leading_len(&self) -> usize {
        self.0.leading.iter().map(Trivia::len).sum()
    }

    /// Total length of trailing trivia.
    #[must_use]
    pub fn trailing_len(&self) -> usize {
        self.0.trailing.iter().map(Trivia::len).sum()
    }

    /// Length including trivia.
    #[must_use]
    pub fn full_len(&self) -> usize {
        self.leading_len() + self.0.text.len() + self.trailing_len()
    }

    /// Returns a copy with different text, keeping trivia.
    #[must_use]
    pub fn with_text(&self, text: impl Into<Arc<str>>) -> Self {
        Self::with_trivia(
            self.kind(),
            text,
            self.0.leading.clone(),
            self.0.trailing.clone(),
        )
    }

    /// Returns a copy with different leading trivia.
    #[must_use]
    pub fn with_leading(&self, leading: Vec<Trivia>) -> Self {
        Self::with_trivia(
            self.kind(),
            self.0.text.clone(),
            leading,
            self.0.trailing.clone(),
        )
    }

    /// Returns a copy with different trailing trivia.
    #[must_use]
    pub fn with_trailing(&self, trailing: Vec<Trivia>) -> Self {
        Self::with_trivia(
            self.kind(),
            self.0.text.clone(),
            self.0.leading.clone(),
            trailing,
        )
    }

    /// Returns a copy with one trivia piece replaced.
    ///
    /// Returns `None` when the index is out of bounds.
    #[must_use]
    pub fn with_replaced_trivia(&self, leading: bool, index: usize, trivia: Trivia) -> Option<Self> {
        let mut pieces = if leading {
            self.0.leading.clone()
        } else {
            self.0.trailing.clone()
        };
        *pieces.get_mut(index)? = trivia;
        Some(if leading {
            self.with_leading(pieces)
        } else {
            self.with_trailing(pieces)
        })
    }

    /// Returns true if both handles point at the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in &self.0.leading {
            f.write_str(t.text())?;
        }
        f.write_str(&self.0.text)?;
        for t in &self.0.trailing {
            f.write_str(t.text())?;
        }
        Ok(())
    }
}

/// A child slot of a green node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GreenElement {
    /// A nested node.
    Node(GreenNode),
    /// A token.
    Token(GreenToken),
}

impl GreenElement {
    /// Kind of the element.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::Node(n) => n.kind(),
            Self::Token(t) => t.kind(),
        }
    }

    /// Length including trivia.
    #[must_use]
    pub fn full_len(&self) -> usize {
        match self {
            Self::Node(n) => n.full_len(),
            Self::Token(t) => t.full_len(),
        }
    }

    /// Returns the node if this element is one.
    #[must_use]
    pub fn as_node(&self) -> Option<&GreenNode> {
        match self {
            Self::Node(n) => Some(n),
            Self::Token(_) => None,
        }
    }

    /// Returns the token if this element is one.
    #[must_use]
    pub fn as_token(&self) -> Option<&GreenToken> {
        match self {
            Self::Token(t) => Some(t),
            Self::Node(_) => None,
        }
    }

    /// First token in the element, if any.
    #[must_use]
    pub fn first_token(&self) -> Option<&GreenToken> {
        match self {
            Self::Token(t) => Some(t),
            Self::Node(n) => n.first_token(),
        }
    }

    /// Last token in the element, if any.
    #[must_use]
    pub fn last_token(&self) -> Option<&GreenToken> {
        match self {
            Self::Token(t) => Some(t),
            Self::Node(n) => n.last_token(),
        }
    }

    /// Replaces the leading trivia of the first token.
    #[must_use]
    pub fn with_leading_trivia(&self, leading: Vec<Trivia>) -> Self {
        match self {
            Self::Token(t) => Self::Token(t.with_leading(leading)),
            Self::Node(n) => Self::Node(n.with_leading_trivia(leading)),
        }
    }

    /// Replaces the trailing trivia of the last token.
    #[must_use]
    pub fn with_trailing_trivia(&self, trailing: Vec<Trivia>) -> Self {
        match self {
            Self::Token(t) => Self::Token(t.with_trailing(trailing)),
            Self::Node(n) => Self::Node(n.with_trailing_trivia(trailing)),
        }
    }
}

impl From<GreenNode> for GreenElement {
    fn from(node: GreenNode) -> Self {
        Self::Node(node)
    }
}

impl From<GreenToken> for GreenElement {
    fn from(token: GreenToken) -> Self {
        Self::Token(token)
    }
}

impl fmt::Display for GreenElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(n) => n.fmt(f),
            Self::Token(t) => t.fmt(f),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct GreenNodeData {
    kind: SyntaxKind,
    children: Vec<GreenElement>,
    full_len: usize,
}

/// An interior node: a kind plus ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GreenNode(Arc<GreenNodeData>);

impl GreenNode {
    /// Creates a node from its children.
    #[must_use]
    pub fn new(kind: SyntaxKind, children: Vec<GreenElement>) -> Self {
        let full_len = children.iter().map(GreenElement::full_len).sum();
        Self(Arc::new(GreenNodeData {
            kind,
            children,
            full_len,
        }))
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind
    }

    /// Ordered children.
    #[must_use]
    pub fn children(&self) -> &[GreenElement] {
        &self.0.children
    }

    /// Length including all trivia.
    #[must_use]
    pub fn full_len(&self) -> usize {
        self.0.full_len
    }

    /// First token in document order.
    #[must_use]
    pub fn first_token(&self) -> Option<&GreenToken> {
        self.0.children.iter().find_map(GreenElement::first_token)
    }

    /// Last token in document order.
    #[must_use]
    pub fn last_token(&self) -> Option<&GreenToken> {
        self.0.children.iter().rev().find_map(GreenElement::last_token)
    }

    /// Returns a copy with the child at `index` replaced.
    ///
    /// An out-of-bounds index returns an unchanged copy.
    #[must_use]
    pub fn replace_child(&self, index: usize, child: GreenElement) -> Self {
        let mut children = self.0.children.clone();
        if let Some(slot) = children.get_mut(index) {
            *slot = child;
        }
        Self::new(self.kind(), children)
    }

    /// Returns a copy with a different child list.
    #[must_use]
    pub fn with_children(&self, children: Vec<GreenElement>) -> Self {
        Self::new(self.kind(), children)
    }

    /// Replaces the leading trivia of the first token.
    #[must_use]
    pub fn with_leading_trivia(&self, leading: Vec<Trivia>) -> Self {
        let Some(index) = self
            .0
            .children
            .iter()
            .position(|c| c.first_token().is_some())
        else {
            return self.clone();
        };
        let child = self.0.children[index].with_leading_trivia(leading);
        self.replace_child(index, child)
    }

    /// Replaces the trailing trivia of the last token.
    #[must_use]
    pub fn with_trailing_trivia(&self, trailing: Vec<Trivia>) -> Self {
        let Some(index) = self
            .0
            .children
            .iter()
            .rposition(|c| c.last_token().is_some())
        else {
            return self.clone();
        };
        let child = self.0.children[index].with_trailing_trivia(trailing);
        self.replace_child(index, child)
    }

    /// Returns true if both handles point at the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for child in &self.0.children {
            child.fmt(f)?;
        }
        Ok(())
    }
}
