//! # sharplint-core
//!
//! Core framework for rule-based analysis and fixing of C# sources.
//!
//! This crate provides the foundational traits and types for building
//! analyzers on top of `sharplint-syntax` trees. It includes:
//!
//! - [`Rule`] trait for rules subscribed to node and trivia kinds
//! - [`RuleEngine`] running one pass per document over a [`Solution`]
//! - [`semantic`] queries: expression types, member and symbol lookup
//! - [`Analyzer`] for discovering and analyzing files on disk
//! - [`Diagnostic`] for representing findings
//! - [`fix`] for single fixes, batch fix-all and symbol renames
//!
//! ## Example
//!
//! ```ignore
//! use sharplint_core::{Analyzer, Rule, Severity};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! print!("{}", result.format_test_report(Severity::Error));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod document;
mod engine;
mod registry;
mod rule;
mod types;

pub mod fix;
pub mod semantic;

/// Utility modules for rule and fix implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{is_generated_document, RuleContext};
pub use document::{Document, DocumentId, Solution};
pub use engine::{DocumentAnalysis, PassState, RuleEngine};
pub use registry::RuleRegistry;
pub use rule::{Rule, RuleBox};
pub use types::{
    Category, Diagnostic, DiagnosticReport, FixContext, LintResult, Location, RuleFault, Severity,
};
