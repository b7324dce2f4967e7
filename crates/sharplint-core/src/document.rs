//! Documents and solutions: immutable snapshots of source files.

use serde::{Deserialize, Serialize};
use sharplint_syntax::{ParseError, SyntaxTree, TreeVersion};
use std::fmt;
use std::path::{Path, PathBuf};

/// Stable identity of a document within a [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(u32);

impl DocumentId {
    /// Raw index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One source file and its current tree.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    path: PathBuf,
    tree: SyntaxTree,
}

impl Document {
    /// Creates a document from an already parsed tree.
    #[must_use]
    pub fn new(id: DocumentId, path: impl Into<PathBuf>, tree: SyntaxTree) -> Self {
        Self {
            id,
            path: path.into(),
            tree,
        }
    }

    /// Document identity.
    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// File path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current tree.
    #[must_use]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Version of the current tree.
    #[must_use]
    pub fn version(&self) -> TreeVersion {
        self.tree.version()
    }

    /// Source text derived from the tree.
    #[must_use]
    pub fn text(&self) -> String {
        self.tree.text()
    }

    /// The same document with a new tree.
    #[must_use]
    pub fn with_tree(&self, tree: SyntaxTree) -> Self {
        Self {
            id: self.id,
            path: self.path.clone(),
            tree,
        }
    }
}

/// An immutable set of documents analyzed together.
///
/// Updating a solution returns a new value; older snapshots stay valid.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    documents: Vec<Document>,
}

impl Solution {
    /// Creates an empty solution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `source` and adds it as a new document.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `source` is not valid input.
    pub fn add_source(
        &mut self,
        path: impl Into<PathBuf>,
        source: &str,
    ) -> Result<DocumentId, ParseError> {
        let tree = SyntaxTree::parse(source)?;
        Ok(self.add_tree(path, tree))
    }

    /// Adds a parsed tree as a new document.
    pub fn add_tree(&mut self, path: impl Into<PathBuf>, tree: SyntaxTree) -> DocumentId {
        let id = DocumentId(u32::try_from(self.documents.len()).unwrap_or(u32::MAX));
        self.documents.push(Document::new(id, path, tree));
        id
    }

    /// Looks up a document.
    #[must_use]
    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(id.index())
    }

    /// Looks up a document by path.
    #[must_use]
    pub fn document_by_path(&self, path: &Path) -> Option<&Document> {
        self.documents.iter().find(|d| d.path() == path)
    }

    /// All documents in insertion order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the solution has no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// A new solution with one document's tree replaced.
    #[must_use]
    pub fn with_tree(&self, id: DocumentId, tree: SyntaxTree) -> Self {
        let mut next = self.clone();
        if let Some(doc) = next.documents.get_mut(id.index()) {
            *doc = doc.with_tree(tree);
        }
        next
    }

    /// Documents whose tree differs from the one in `previous`.
    #[must_use]
    pub fn changed_since(&self, previous: &Self) -> Vec<DocumentId> {
        self.documents
            .iter()
            .filter(|doc| {
                previous
                    .document(doc.id())
                    .map_or(true, |old| old.version() != doc.version())
            })
            .map(Document::id)
            .collect()
    }
}
