//! Rule requiring `//` comments to start like a sentence.
//!
//! # Rationale
//!
//! Comments are prose. Starting them with a capital letter keeps them
//! consistent with doc comments and commit messages.
//!
//! # Allowed Patterns
//!
//! - Empty comments and comments that are only whitespace
//! - `// TODO ...` markers
//! - `////` and other comments whose content starts with `/`
//!
//! Spacing after `//` is not checked.
//!
//! # Fix
//!
//! [`CommentSentenceCaseFix`] uppercases the first letter of the comment.
//!
//! # Configuration
//!
//! None beyond the common `enabled` and `severity` keys.

use sharplint_core::fix::{CodeFix, FixAction, FixError, FixRequest, Replacement};
use sharplint_core::utils::{replace_first, starts_with_lowercase};
use sharplint_core::{Category, Diagnostic, FixContext, Rule, RuleContext};
use sharplint_syntax::{SyntaxTrivia, Trivia, TriviaKind};

/// Rule code for comment-sentence-case.
pub const CODE: &str = "BA00004";

/// Rule name for comment-sentence-case.
pub const NAME: &str = "comment-sentence-case";

/// Requires single-line comments to begin with an uppercase letter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentSentenceCase;

impl CommentSentenceCase {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn content(trivia: &SyntaxTrivia) -> &str {
    trivia.comment_text().trim()
}

fn is_ignored(content: &str) -> bool {
    content.is_empty() || content.starts_with('/') || content.starts_with("TODO")
}

impl Rule for CommentSentenceCase {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Comments should start with upper case letter"
    }

    fn category(&self) -> Category {
        Category::Commenting
    }

    fn trivia_kinds(&self) -> &'static [TriviaKind] {
        &[TriviaKind::SingleLineComment]
    }

    fn check_trivia(&self, ctx: &RuleContext<'_>, trivia: &SyntaxTrivia) -> Vec<Diagnostic> {
        let text = content(trivia);
        if is_ignored(text) || !starts_with_lowercase(text) {
            return Vec::new();
        }

        vec![ctx
            .diagnostic(
                self,
                trivia.span(),
                format!("Comment \"{text}\" should start with an upper case letter."),
            )
            .with_fix_context(FixContext::new(trivia.token().kind(), trivia.span()))]
    }
}

/// Uppercases the first letter of a comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentSentenceCaseFix;

impl CodeFix for CommentSentenceCaseFix {
    fn name(&self) -> &'static str {
        "uppercase-comment"
    }

    fn title(&self) -> &'static str {
        "Make first letter upper case"
    }

    fn fixable_codes(&self) -> &'static [&'static str] {
        &[CODE]
    }

    fn compute(&self, request: &FixRequest<'_>) -> Result<FixAction, FixError> {
        let trivia = request.target.trivia().ok_or_else(|| request.not_found())?;
        let first = content(trivia)
            .chars()
            .next()
            .ok_or_else(|| request.not_found())?;
        let upper: String = first.to_uppercase().collect();
        let text = replace_first(trivia.text(), first, &upper);
        Ok(FixAction::Replace(Replacement::trivia(
            trivia,
            Trivia::new(trivia.kind(), text),
        )))
    }
}
