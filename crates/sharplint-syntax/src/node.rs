//! Positioned views over the green tree.
//!
//! A [`SyntaxNode`] pairs a green node with its absolute offset and a pointer
//! to its parent. Views are created lazily while walking down from the root
//! and are cheap to clone. Parents never own their red children, so a tree
//! version is kept alive only by the green root and whatever views callers
//! hold.

use crate::green::{GreenElement, GreenNode, GreenToken, Trivia};
use crate::kind::{SyntaxKind, TriviaKind};
use crate::text::TextRange;
use std::fmt;
use std::iter::successors;
use std::sync::Arc;

#[derive(Debug)]
struct NodeData {
    green: GreenNode,
    parent: Option<SyntaxNode>,
    index: usize,
    offset: usize,
}

/// A node at a concrete position in one tree version.
#[derive(Clone)]
pub struct SyntaxNode(Arc<NodeData>);

impl SyntaxNode {
    /// Creates the root view of a tree.
    #[must_use]
    pub fn new_root(green: GreenNode) -> Self {
        Self(Arc::new(NodeData {
            green,
            parent: None,
            index: 0,
            offset: 0,
        }))
    }

    fn new_child(green: GreenNode, parent: Self, index: usize, offset: usize) -> Self {
        Self(Arc::new(NodeData {
            green,
            parent: Some(parent),
            index,
            offset,
        }))
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.0.green.kind()
    }

    /// Underlying green node.
    #[must_use]
    pub fn green(&self) -> &GreenNode {
        &self.0.green
    }

    /// Parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<SyntaxNode> {
        self.0.parent.clone()
    }

    /// Index of this node among its parent's children.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0.index
    }

    /// Range including the trivia of the first and last tokens.
    #[must_use]
    pub fn full_range(&self) -> TextRange {
        TextRange::at(self.0.offset, self.0.green.full_len())
    }

    /// Range of the node's own text, excluding outer trivia.
    #[must_use]
    pub fn span(&self) -> TextRange {
        match (self.first_token(), self.last_token()) {
            (Some(first), Some(last)) => TextRange::new(first.span().start, last.span().end),
            _ => TextRange::empty(self.0.offset),
        }
    }

    /// Full text including outer trivia.
    #[must_use]
    pub fn full_text(&self) -> String {
        self.0.green.to_string()
    }

    /// Text of [`SyntaxNode::span`], without outer trivia.
    #[must_use]
    pub fn text(&self) -> String {
        let full = self.full_text();
        let span = self.span();
        let start = span.start - self.0.offset;
        let end = span.end - self.0.offset;
        full.get(start..end).unwrap_or_default().to_string()
    }

    /// Root of the tree this node belongs to.
    #[must_use]
    pub fn root(&self) -> SyntaxNode {
        self.ancestors().last().unwrap_or_else(|| self.clone())
    }

    /// This node followed by its parents up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> {
        successors(Some(self.clone()), SyntaxNode::parent)
    }

    /// Children nodes and tokens in order.
    #[must_use]
    pub fn children_with_tokens(&self) -> Vec<SyntaxElement> {
        let mut offset = self.0.offset;
        let mut out = Vec::with_capacity(self.0.green.children().len());
        for (index, child) in self.0.green.children().iter().enumerate() {
            let element = match child {
                GreenElement::Node(node) => {
                    SyntaxElement::Node(Self::new_child(node.clone(), self.clone(), index, offset))
                }
                GreenElement::Token(token) => SyntaxElement::Token(SyntaxToken {
                    parent: self.clone(),
                    index,
                    offset,
                    green: token.clone(),
                }),
            };
            offset += child.full_len();
            out.push(element);
        }
        out
    }

    /// Child nodes in order.
    pub fn children(&self) -> impl Iterator<Item = SyntaxNode> {
        self.children_with_tokens()
            .into_iter()
            .filter_map(SyntaxElement::into_node)
    }

    /// Child tokens in order.
    pub fn child_tokens(&self) -> impl Iterator<Item = SyntaxToken> {
        self.children_with_tokens()
            .into_iter()
            .filter_map(SyntaxElement::into_token)
    }

    /// First child token of the given kind.
    #[must_use]
    pub fn child_token(&self, kind: SyntaxKind) -> Option<SyntaxToken> {
        self.child_tokens().find(|t| t.kind() == kind)
    }

    /// This node and all nested nodes in pre-order.
    #[must_use]
    pub fn descendants(&self) -> Vec<SyntaxNode> {
        let mut out = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            let children: Vec<_> = node.children().collect();
            out.push(node);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// All tokens under this node in document order.
    #[must_use]
    pub fn descendant_tokens(&self) -> Vec<SyntaxToken> {
        let mut out = Vec::new();
        collect_tokens(self, &mut out);
        out
    }

    /// All trivia under this node in document order.
    #[must_use]
    pub fn descendant_trivia(&self) -> Vec<SyntaxTrivia> {
        self.descendant_tokens()
            .iter()
            .flat_map(|t| {
                let mut all = t.leading_trivia();
                all.extend(t.trailing_trivia());
                all
            })
            .collect()
    }

    /// First token in document order.
    #[must_use]
    pub fn first_token(&self) -> Option<SyntaxToken> {
        for child in self.children_with_tokens() {
            match child {
                SyntaxElement::Token(t) => return Some(t),
                SyntaxElement::Node(n) => {
                    if let Some(t) = n.first_token() {
                        return Some(t);
                    }
                }
            }
        }
        None
    }

    /// Last token in document order.
    #[must_use]
    pub fn last_token(&self) -> Option<SyntaxToken> {
        for child in self.children_with_tokens().into_iter().rev() {
            match child {
                SyntaxElement::Token(t) => return Some(t),
                SyntaxElement::Node(n) => {
                    if let Some(t) = n.last_token() {
                        return Some(t);
                    }
                }
            }
        }
        None
    }

    /// The token whose full range (trivia included) contains `offset`.
    ///
    /// An offset at the very end of the node resolves to the last token.
    #[must_use]
    pub fn token_at_offset(&self, offset: usize) -> Option<SyntaxToken> {
        if !self.full_range().contains_inclusive(offset) {
            return None;
        }
        let mut node = self.clone();
        loop {
            let children = node.children_with_tokens();
            let hit = children
                .iter()
                .find(|c| c.full_range().contains(offset))
                .or_else(|| children.iter().rev().find(|c| c.full_range().end == offset))
                .cloned();
            match hit? {
                SyntaxElement::Token(t) => return Some(t),
                SyntaxElement::Node(n) => node = n,
            }
        }
    }

    /// The trivia piece covering `offset`, if the offset falls inside trivia.
    #[must_use]
    pub fn trivia_at_offset(&self, offset: usize) -> Option<SyntaxTrivia> {
        let token = self.token_at_offset(offset)?;
        token
            .leading_trivia()
            .into_iter()
            .chain(token.trailing_trivia())
            .find(|t| t.span().contains(offset))
    }

    /// The deepest node whose full range contains `range`.
    #[must_use]
    pub fn covering_node(&self, range: TextRange) -> SyntaxNode {
        let mut node = self.clone();
        'descend: loop {
            for child in node.children() {
                if child.full_range().contains_range(range) {
                    node = child;
                    continue 'descend;
                }
            }
            return node;
        }
    }

    /// Finds the node of `kind` whose full range equals `range`.
    #[must_use]
    pub fn find_node(&self, kind: SyntaxKind, range: TextRange) -> Option<SyntaxNode> {
        let mut node = self.clone();
        loop {
            if node.kind() == kind && node.full_range() == range {
                return Some(node);
            }
            node = node
                .children()
                .find(|c| c.full_range().contains_range(range))?;
        }
    }

    /// Replaces this node and returns the root of the new tree.
    ///
    /// Only the ancestors of this node are rebuilt; every other subtree is
    /// shared with the current tree.
    #[must_use]
    pub fn replace_with(&self, replacement: GreenNode) -> SyntaxNode {
        SyntaxNode::new_root(self.rebuild_up(GreenElement::Node(replacement)))
    }

    fn rebuild_up(&self, replacement: GreenElement) -> GreenNode {
        let mut green = replacement;
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            green = GreenElement::Node(parent.green().replace_child(node.index(), green));
            node = parent;
        }
        match green {
            GreenElement::Node(root) => root,
            // A token can never be the root; keep the old tree.
            GreenElement::Token(_) => self.root().green().clone(),
        }
    }
}

fn collect_tokens(node: &SyntaxNode, out: &mut Vec<SyntaxToken>) {
    for child in node.children_with_tokens() {
        match child {
            SyntaxElement::Token(t) => out.push(t),
            SyntaxElement::Node(n) => collect_tokens(&n, out),
        }
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        self.0.offset == other.0.offset && self.0.green.ptr_eq(&other.0.green)
    }
}

impl Eq for SyntaxNode {}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.kind(), self.full_range())
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.green.fmt(f)
    }
}

/// A token at a concrete position.
#[derive(Clone)]
pub struct SyntaxToken {
    parent: SyntaxNode,
    index: usize,
    offset: usize,
    green: GreenToken,
}

impl SyntaxToken {
    /// Token kind.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    /// Token text without trivia.
    #[must_use]
    pub fn text(&self) -> &str {
        self.green.text()
    }

    /// Underlying green token.
    #[must_use]
    pub fn green(&self) -> &GreenToken {
        &self.green
    }

    /// Node that owns this token.
    #[must_use]
    pub fn parent(&self) -> SyntaxNode {
        self.parent.clone()
    }

    /// Index of this token among its parent's children.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Range including trivia.
    #[must_use]
    pub fn full_range(&self) -> TextRange {
        TextRange::at(self.offset, self.green.full_len())
    }

    /// Range of the token text.
    #[must_use]
    pub fn span(&self) -> TextRange {
        TextRange::at(self.offset + self.green.leading_len(), self.green.text().len())
    }

    /// Leading trivia with absolute positions.
    #[must_use]
    pub fn leading_trivia(&self) -> Vec<SyntaxTrivia> {
        self.trivia_views(true, self.offset, self.green.leading())
    }

    /// Trailing trivia with absolute positions.
    #[must_use]
    pub fn trailing_trivia(&self) -> Vec<SyntaxTrivia> {
        self.trivia_views(false, self.span().end, self.green.trailing())
    }

    fn trivia_views(&self, leading: bool, start: usize, pieces: &[Trivia]) -> Vec<SyntaxTrivia> {
        let mut offset = start;
        pieces
            .iter()
            .enumerate()
            .map(|(index, piece)| {
                let view = SyntaxTrivia {
                    token: self.clone(),
                    leading,
                    index,
                    offset,
                    green: piece.clone(),
                };
                offset += piece.len();
                view
            })
            .collect()
    }

    /// Replaces this token and returns the root of the new tree.
    #[must_use]
    pub fn replace_with(&self, replacement: GreenToken) -> SyntaxNode {
        let parent = self
            .parent
            .green()
            .replace_child(self.index, GreenElement::Token(replacement));
        self.parent.replace_with(parent)
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.green.ptr_eq(&other.green)
    }
}

impl Eq for SyntaxToken {}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{} {:?}", self.kind(), self.span(), self.text())
    }
}

impl fmt::Display for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A trivia piece at a concrete position, attached to a token.
#[derive(Clone)]
pub struct SyntaxTrivia {
    token: SyntaxToken,
    leading: bool,
    index: usize,
    offset: usize,
    green: Trivia,
}

impl SyntaxTrivia {
    /// Trivia kind.
    #[must_use]
    pub fn kind(&self) -> TriviaKind {
        self.green.kind()
    }

    /// Raw text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.green.text()
    }

    /// Underlying trivia value.
    #[must_use]
    pub fn green(&self) -> &Trivia {
        &self.green
    }

    /// Token the trivia is attached to.
    #[must_use]
    pub fn token(&self) -> &SyntaxToken {
        &self.token
    }

    /// True when the trivia precedes its token.
    #[must_use]
    pub fn is_leading(&self) -> bool {
        self.leading
    }

    /// Position within the token's leading or trailing list.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Absolute range.
    #[must_use]
    pub fn span(&self) -> TextRange {
        TextRange::at(self.offset, self.green.len())
    }

    /// Comment body without its delimiters.
    ///
    /// `// x` yields `" x"`, `/* x */` yields `" x "`; non-comment trivia
    /// yields an empty string. Doc comments are returned with their first
    /// `///` removed.
    #[must_use]
    pub fn comment_text(&self) -> &str {
        let text = self.text();
        match self.kind() {
            TriviaKind::SingleLineComment => text.get(2..).unwrap_or_default(),
            TriviaKind::SingleLineDocComment => text.get(3..).unwrap_or_default(),
            TriviaKind::MultiLineComment => text
                .get(2..text.len().saturating_sub(2))
                .unwrap_or_default(),
            _ => "",
        }
    }

    /// Replaces this trivia piece and returns the root of the new tree.
    #[must_use]
    pub fn replace_with(&self, replacement: Trivia) -> SyntaxNode {
        match self
            .token
            .green()
            .with_replaced_trivia(self.leading, self.index, replacement)
        {
            Some(token) => self.token.replace_with(token),
            None => self.token.parent().root(),
        }
    }
}

impl fmt::Debug for SyntaxTrivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{} {:?}", self.kind(), self.span(), self.text())
    }
}

/// A node or a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxElement {
    /// A node.
    Node(SyntaxNode),
    /// A token.
    Token(SyntaxToken),
}

impl SyntaxElement {
    /// Kind of the element.
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::Node(n) => n.kind(),
            Self::Token(t) => t.kind(),
        }
    }

    /// Range including trivia.
    #[must_use]
    pub fn full_range(&self) -> TextRange {
        match self {
            Self::Node(n) => n.full_range(),
            Self::Token(t) => t.full_range(),
        }
    }

    /// Range excluding outer trivia.
    #[must_use]
    pub fn span(&self) -> TextRange {
        match self {
            Self::Node(n) => n.span(),
            Self::Token(t) => t.span(),
        }
    }

    /// Returns the node, if any.
    #[must_use]
    pub fn into_node(self) -> Option<SyntaxNode> {
        match self {
            Self::Node(n) => Some(n),
            Self::Token(_) => None,
        }
    }

    /// Returns the token, if any.
    #[must_use]
    pub fn into_token(self) -> Option<SyntaxToken> {
        match self {
            Self::Token(t) => Some(t),
            Self::Node(_) => None,
        }
    }

    /// Green form of the element.
    #[must_use]
    pub fn to_green(&self) -> GreenElement {
        match self {
            Self::Node(n) => GreenElement::Node(n.green().clone()),
            Self::Token(t) => GreenElement::Token(t.green().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: SyntaxKind, text: &str, trailing: &str) -> GreenElement {
        let trailing = if trailing.is_empty() {
            Vec::new()
        } else {
            vec![Trivia::new(TriviaKind::Whitespace, trailing)]
        };
        GreenToken::with_trivia(kind, text, Vec::new(), trailing).into()
    }

    /// `a = b` as an assignment of two identifier names.
    fn sample() -> SyntaxNode {
        let left = GreenNode::new(
            SyntaxKind::IdentifierName,
            vec![token(SyntaxKind::Identifier, "a", " ")],
        );
        let right = GreenNode::new(
            SyntaxKind::IdentifierName,
            vec![token(SyntaxKind::Identifier, "b", "")],
        );
        SyntaxNode::new_root(GreenNode::new(
            SyntaxKind::AssignmentExpression,
            vec![left.into(), token(SyntaxKind::Equals, "=", " "), right.into()],
        ))
    }

    #[test]
    fn ranges_and_spans() {
        let root = sample();
        assert_eq!(root.full_range(), TextRange::new(0, 5));
        let left = root.children().next().map(|n| (n.full_range(), n.span()));
        assert_eq!(left, Some((TextRange::new(0, 2), TextRange::new(0, 1))));
        let eq = root.child_token(SyntaxKind::Equals).map(|t| t.span());
        assert_eq!(eq, Some(TextRange::new(2, 3)));
    }

    #[test]
    fn token_lookup_by_offset() {
        let root = sample();
        let kinds: Vec<_> = [0, 1, 2, 4, 5]
            .iter()
            .map(|&o| root.token_at_offset(o).map(|t| t.text().to_string()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some("a".into()),
                Some("a".into()),
                Some("=".into()),
                Some("b".into()),
                Some("b".into())
            ]
        );
    }

    #[test]
    fn replace_rebuilds_path_only() {
        let root = sample();
        let right = root.children().nth(1).expect("right operand");
        let replacement = GreenNode::new(
            SyntaxKind::IdentifierName,
            vec![token(SyntaxKind::Identifier, "c", "")],
        );
        let new_root = right.replace_with(replacement);
        assert_eq!(new_root.to_string(), "a = c");
        assert_eq!(root.to_string(), "a = b");

        let old_left = root.children().next().expect("left");
        let new_left = new_root.children().next().expect("left");
        assert!(old_left.green().ptr_eq(new_left.green()));
    }

    #[test]
    fn ancestors_reach_root() {
        let root = sample();
        let token = root.token_at_offset(4).expect("token");
        let kinds: Vec<_> = token.parent().ancestors().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![SyntaxKind::IdentifierName, SyntaxKind::AssignmentExpression]
        );
    }
}
