//! Rule presets and the fix catalog.

use crate::{
    CommentSentenceCase, CommentSentenceCaseFix, EnumZeroDuplicate, EnumZeroDuplicateFix,
    InitializerCompleteness, InitializerCompletenessFix, PreferImplicitType, PreferImplicitTypeFix,
    PrivateMethodName, PropertySummaryPrefix, PublicMethodName, PublicMethodNameFix,
};
use sharplint_core::fix::FixEngine;
use sharplint_core::RuleBox;
use std::str::FromStr;

/// Preset configurations for sharplint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every rule.
    #[default]
    Recommended,
    /// Structural rules only, for gradual adoption.
    Minimal,
    /// Method naming rules.
    Naming,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Minimal => minimal_rules(),
            Self::Naming => naming_rules(),
        }
    }

    /// Name used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Minimal => "minimal",
            Self::Naming => "naming",
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "minimal" => Ok(Self::Minimal),
            "naming" => Ok(Self::Naming),
            other => Err(format!(
                "unknown preset `{other}` (expected recommended, minimal or naming)"
            )),
        }
    }
}

/// Returns the recommended set of rules: every built-in rule.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    all_rules()
}

/// Returns the minimal set of rules.
///
/// Includes:
/// - `enum-zero-duplicate` (BA00007)
/// - `initializer-completeness` (BA00006)
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(EnumZeroDuplicate::new()),
        Box::new(InitializerCompleteness::new()),
    ]
}

/// Returns the naming rules.
///
/// Includes:
/// - `private-method-name` (BA00001)
/// - `public-method-name` (BA00003)
#[must_use]
pub fn naming_rules() -> Vec<RuleBox> {
    vec![
        Box::new(PrivateMethodName::new()),
        Box::new(PublicMethodName::new()),
    ]
}

/// Returns all available rules, in code order.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(PrivateMethodName::new()),
        Box::new(PropertySummaryPrefix::new()),
        Box::new(PublicMethodName::new()),
        Box::new(CommentSentenceCase::new()),
        Box::new(PreferImplicitType::new()),
        Box::new(InitializerCompleteness::new()),
        Box::new(EnumZeroDuplicate::new()),
    ]
}

/// Returns a fix engine with every built-in fix registered.
#[must_use]
pub fn all_fixes() -> FixEngine {
    FixEngine::new()
        .with_fix(PublicMethodNameFix)
        .with_fix(CommentSentenceCaseFix)
        .with_fix(PreferImplicitTypeFix)
        .with_fix(InitializerCompletenessFix)
        .with_fix(EnumZeroDuplicateFix)
}
