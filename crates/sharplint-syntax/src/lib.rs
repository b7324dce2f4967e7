//! # sharplint-syntax
//!
//! Lossless, persistent syntax trees for the C# subset analyzed by sharplint.
//!
//! - [`SyntaxTree`] holds an immutable green root and its [`TreeVersion`]
//! - [`SyntaxNode`], [`SyntaxToken`] and [`SyntaxTrivia`] are positioned views
//!   with parent pointers, created on demand
//! - [`ast`] provides typed views such as [`ast::EnumDeclaration`]
//! - edits go through `replace_with`, which rebuilds only the path to the root
//!
//! ## Example
//!
//! ```
//! use sharplint_syntax::{SyntaxKind, SyntaxTree};
//!
//! let tree = SyntaxTree::parse("enum E { A, B = 0 }").unwrap();
//! assert_eq!(tree.root().to_string(), "enum E { A, B = 0 }");
//! assert!(tree
//!     .root()
//!     .descendants()
//!     .iter()
//!     .any(|n| n.kind() == SyntaxKind::EnumDeclaration));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
mod green;
mod kind;
mod lexer;
mod node;
mod parser;
mod text;
mod tree;

pub use green::{GreenElement, GreenNode, GreenToken, Trivia};
pub use kind::{SyntaxKind, TriviaKind};
pub use lexer::{keyword_kind, tokenize};
pub use node::{SyntaxElement, SyntaxNode, SyntaxToken, SyntaxTrivia};
pub use parser::{parse_compilation_unit, parse_expression};
pub use text::{LineIndex, TextRange};
pub use tree::{SyntaxTree, TreeVersion};

/// Errors produced while lexing or parsing source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A character that starts no token.
    #[error("unexpected character `{found}` at offset {offset}")]
    UnexpectedCharacter {
        /// Byte offset of the character.
        offset: usize,
        /// The character.
        found: char,
    },

    /// A token that does not fit the grammar at its position.
    #[error("expected {expected} at offset {offset}, found {found:?}")]
    UnexpectedToken {
        /// Byte offset of the token.
        offset: usize,
        /// Description of what was expected.
        expected: String,
        /// Kind of the token found instead.
        found: SyntaxKind,
    },
}

impl ParseError {
    /// Byte offset the error points at.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { offset, .. } | Self::UnexpectedToken { offset, .. } => {
                *offset
            }
        }
    }
}
