//! Versioned syntax trees.

use crate::green::GreenNode;
use crate::node::SyntaxNode;
use crate::parser::parse_compilation_unit;
use crate::text::LineIndex;
use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one tree value.
///
/// Every parse and every edit produces a fresh version, so a diagnostic
/// computed against one version can be recognised as stale later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TreeVersion(u64);

impl TreeVersion {
    fn next() -> Self {
        Self(NEXT_VERSION.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TreeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// An immutable compilation unit tree.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    green: GreenNode,
    version: TreeVersion,
}

impl SyntaxTree {
    /// Parses `source` into a new tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the text is not valid input.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let tree = Self::from_green(parse_compilation_unit(source)?);
        tracing::trace!(bytes = source.len(), version = %tree.version, "parsed compilation unit");
        Ok(tree)
    }

    /// Wraps an already built green root under a fresh version.
    #[must_use]
    pub fn from_green(green: GreenNode) -> Self {
        Self {
            green,
            version: TreeVersion::next(),
        }
    }

    /// Builds the tree produced by an edit, given the edited root view.
    #[must_use]
    pub fn with_root(&self, root: &SyntaxNode) -> Self {
        Self::from_green(root.green().clone())
    }

    /// Root view.
    #[must_use]
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Green root.
    #[must_use]
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// Version of this tree value.
    #[must_use]
    pub fn version(&self) -> TreeVersion {
        self.version
    }

    /// Full source text.
    #[must_use]
    pub fn text(&self) -> String {
        self.green.to_string()
    }

    /// Line index over the source text.
    #[must_use]
    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.text())
    }
}
