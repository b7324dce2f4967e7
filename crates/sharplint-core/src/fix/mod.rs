//! Fix engine: single fixes, batch fix-all and symbol renames.
//!
//! Fixes never mutate a tree. Each edit builds a new tree that shares every
//! untouched subtree with the old one, and the [`Solution`](crate::Solution)
//! that holds it is replaced as a whole. A diagnostic remembers the tree
//! version it was computed against, so applying it to a newer tree fails
//! with [`FixError::StaleDocument`] instead of editing the wrong text.

mod edit;
mod engine;
mod rename;

pub use edit::{apply_all, find_overlap, FixConflict, Replacement};
pub use engine::{
    CodeFix, CodeFixBox, FixAction, FixAllReport, FixEngine, FixError, FixRequest, FixTarget,
};
pub use rename::{RenameError, SymbolRenamer, SyntacticRenamer};
