//! # sharplint-rules
//!
//! Built-in lint rules and code fixes for sharplint.
//!
//! ## Available Rules
//!
//! | Code | Name | Category | Fix |
//! |------|------|----------|-----|
//! | BA00001 | `private-method-name` | Naming | - |
//! | BA00002 | `property-summary-prefix` | Usage | - |
//! | BA00003 | `public-method-name` | Naming | rename (single only) |
//! | BA00004 | `comment-sentence-case` | Commenting | uppercase first letter |
//! | BA00005 | `prefer-implicit-type` | Usage | use `var` |
//! | BA00006 | `initializer-completeness` | Structure | add `Name = default(T)` |
//! | BA00007 | `enum-zero-duplicate` | Structure | move zero member first |
//!
//! ## Usage
//!
//! ```ignore
//! use sharplint_core::Analyzer;
//! use sharplint_rules::{EnumZeroDuplicate, PreferImplicitType};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(EnumZeroDuplicate::new())
//!     .rule(PreferImplicitType::new().check_for_loops(false))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod comment_sentence_case;
mod enum_zero_duplicate;
mod initializer_completeness;
mod prefer_implicit_type;
mod presets;
mod private_method_name;
mod property_summary_prefix;
mod public_method_name;

#[cfg(test)]
mod test_support;

pub use comment_sentence_case::{CommentSentenceCase, CommentSentenceCaseFix};
pub use enum_zero_duplicate::{EnumZeroDuplicate, EnumZeroDuplicateFix};
pub use initializer_completeness::{InitializerCompleteness, InitializerCompletenessFix};
pub use prefer_implicit_type::{PreferImplicitType, PreferImplicitTypeFix};
pub use presets::{all_fixes, all_rules, minimal_rules, naming_rules, recommended_rules, Preset};
pub use private_method_name::PrivateMethodName;
pub use property_summary_prefix::PropertySummaryPrefix;
pub use public_method_name::{PublicMethodName, PublicMethodNameFix};

/// Re-export core types for convenience.
pub use sharplint_core::{Diagnostic, Rule, Severity};
