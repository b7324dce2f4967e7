//! Tree edits and their application.

use miette::{NamedSource, SourceSpan};
use sharplint_syntax::{
    GreenNode, GreenToken, SyntaxKind, SyntaxNode, SyntaxToken, SyntaxTrivia, TextRange, Trivia,
    TriviaKind,
};

/// One element of a tree replaced by a new value.
///
/// The target is named by kind and range rather than by a view, so an edit
/// computed on one tree can be located again after other edits were applied
/// further down the text.
#[derive(Debug, Clone)]
pub enum Replacement {
    /// Replace a node, identified by its full range.
    Node {
        /// Kind of the replaced node.
        kind: SyntaxKind,
        /// Full range of the replaced node.
        range: TextRange,
        /// New node.
        with: GreenNode,
    },
    /// Replace a token, identified by its full range.
    Token {
        /// Kind of the replaced token.
        kind: SyntaxKind,
        /// Full range of the replaced token.
        range: TextRange,
        /// New token.
        with: GreenToken,
    },
    /// Replace one trivia piece.
    Trivia {
        /// Kind of the replaced trivia.
        kind: TriviaKind,
        /// Range of the replaced trivia.
        range: TextRange,
        /// New trivia.
        with: Trivia,
    },
}

impl Replacement {
    /// Replaces `node` with `with`.
    #[must_use]
    pub fn node(node: &SyntaxNode, with: GreenNode) -> Self {
        Self::Node {
            kind: node.kind(),
            range: node.full_range(),
            with,
        }
    }

    /// Replaces `token` with `with`.
    #[must_use]
    pub fn token(token: &SyntaxToken, with: GreenToken) -> Self {
        Self::Token {
            kind: token.kind(),
            range: token.full_range(),
            with,
        }
    }

    /// Replaces `trivia` with `with`.
    #[must_use]
    pub fn trivia(trivia: &SyntaxTrivia, with: Trivia) -> Self {
        Self::Trivia {
            kind: trivia.kind(),
            range: trivia.span(),
            with,
        }
    }

    /// Range of the original text this edit replaces.
    #[must_use]
    pub fn range(&self) -> TextRange {
        match self {
            Self::Node { range, .. } | Self::Token { range, .. } | Self::Trivia { range, .. } => {
                *range
            }
        }
    }

    /// Applies the edit to the tree rooted at `root`, returning the new root.
    ///
    /// Returns `None` if the target no longer exists at its range.
    #[must_use]
    pub fn apply(&self, root: &SyntaxNode) -> Option<SyntaxNode> {
        match self {
            Self::Node { kind, range, with } => {
                let node = root.find_node(*kind, *range)?;
                Some(node.replace_with(with.clone()))
            }
            Self::Token { kind, range, with } => {
                let token = root
                    .token_at_offset(range.start)
                    .filter(|t| t.kind() == *kind && t.full_range() == *range)?;
                Some(token.replace_with(with.clone()))
            }
            Self::Trivia { kind, range, with } => {
                let trivia = root
                    .trivia_at_offset(range.start)
                    .filter(|t| t.kind() == *kind && t.span() == *range)?;
                Some(trivia.replace_with(with.clone()))
            }
        }
    }
}

/// Two edits of one fix-all batch touch the same text.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("conflicting fixes for {code}: edits at {first_range} and {second_range} overlap")]
#[diagnostic(
    code(sharplint::fix::conflict),
    help("apply the fixes one at a time and re-run analysis in between")
)]
pub struct FixConflict {
    /// Diagnostic code being fixed.
    pub code: String,
    /// Range of the first edit.
    pub first_range: TextRange,
    /// Range of the second edit.
    pub second_range: TextRange,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("first edit")]
    first: SourceSpan,
    #[label("overlaps this edit")]
    second: SourceSpan,
}

impl FixConflict {
    /// Creates a conflict report over `source`.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        file: impl AsRef<str>,
        source: String,
        first_range: TextRange,
        second_range: TextRange,
    ) -> Self {
        Self {
            code: code.into(),
            first_range,
            second_range,
            source_code: NamedSource::new(file, source),
            first: span(first_range),
            second: span(second_range),
        }
    }
}

fn span(range: TextRange) -> SourceSpan {
    SourceSpan::from((range.start, range.len()))
}

/// Finds the first pair of overlapping edits, in original order.
#[must_use]
pub fn find_overlap(edits: &[Replacement]) -> Option<(TextRange, TextRange)> {
    edits.iter().enumerate().find_map(|(i, a)| {
        edits[i + 1..]
            .iter()
            .find(|b| a.range().overlaps(b.range()))
            .map(|b| (a.range(), b.range()))
    })
}

/// Applies non-overlapping edits to one tree, last edit in the text first.
///
/// Either every edit applies or none does.
///
/// # Errors
///
/// Returns the range of the first edit whose target is missing; the tree
/// is left alone.
pub fn apply_all(root: &SyntaxNode, edits: &[Replacement]) -> Result<SyntaxNode, TextRange> {
    let mut ordered: Vec<&Replacement> = edits.iter().collect();
    ordered.sort_by(|a, b| {
        b.range()
            .start
            .cmp(&a.range().start)
            .then(a.range().len().cmp(&b.range().len()))
    });

    let mut root = root.clone();
    for edit in ordered {
        root = edit.apply(&root).ok_or_else(|| edit.range())?;
    }
    Ok(root)
}
