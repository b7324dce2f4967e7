//! Rule detecting enums with two members of value 0.
//!
//! # Rationale
//!
//! The first member of an enum without an explicit value is 0. A later
//! member written as `= 0` is then a silent alias of the first one, which
//! is almost never intended: `default(E)` and zeroed fields read as the
//! first member's name.
//!
//! # Detected Patterns
//!
//! ```text
//! enum State { Unknown, Ready = 1, None = 0 }
//! ```
//!
//! Only the first later member with the literal value `0` is reported.
//!
//! # Fix
//!
//! [`EnumZeroDuplicateFix`] moves that member to the front. Comment lines
//! above a member move with it. Indentation, blank lines and trailing
//! trivia stay with the position, so the layout of the enum body does not
//! change.
//!
//! # Configuration
//!
//! None beyond the common `enabled` and `severity` keys.

use sharplint_core::fix::{CodeFix, FixAction, FixError, FixRequest, Replacement};
use sharplint_core::{Category, Diagnostic, FixContext, Rule, RuleContext, Severity};
use sharplint_syntax::ast::{EnumDeclaration, EnumMemberDeclaration};
use sharplint_syntax::{GreenElement, SyntaxKind, SyntaxNode, Trivia, TriviaKind};

/// Rule code for enum-zero-duplicate.
pub const CODE: &str = "BA00007";

/// Rule name for enum-zero-duplicate.
pub const NAME: &str = "enum-zero-duplicate";

/// Reports a second enum member with value 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumZeroDuplicate;

impl EnumZeroDuplicate {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Index of the first explicit zero member, when the first member is
/// implicitly zero.
fn duplicate_zero(members: &[EnumMemberDeclaration]) -> Option<usize> {
    let (first, rest) = members.split_first()?;
    if first.equals_value().is_some() {
        return None;
    }
    rest.iter()
        .position(|m| m.value().is_some_and(|v| is_zero_literal(&v)))
        .map(|i| i + 1)
}

fn is_zero_literal(expr: &SyntaxNode) -> bool {
    if expr.kind() != SyntaxKind::LiteralExpression {
        return false;
    }
    let Some(token) = expr.first_token().filter(|t| t.kind() == SyntaxKind::NumericLiteral) else {
        return false;
    };
    integer_value(token.text()) == Some(0)
}

/// Value of an integer literal such as `0`, `0x0`, `0b0` or `0UL`.
fn integer_value(text: &str) -> Option<u128> {
    let digits: String = text
        .trim_end_matches(['u', 'U', 'l', 'L'])
        .chars()
        .filter(|&c| c != '_')
        .collect();
    let lower = digits.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        u128::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u128::from_str_radix(bin, 2).ok()
    } else {
        lower.parse().ok()
    }
}

impl Rule for EnumZeroDuplicate {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enum has multiple elements with value 0"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn category(&self) -> Category {
        Category::Structure
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::EnumDeclaration]
    }

    fn analyze_generated_code(&self) -> bool {
        true
    }

    fn check_node(&self, ctx: &RuleContext<'_>, node: &SyntaxNode) -> Vec<Diagnostic> {
        let Some(members) = EnumDeclaration::cast(node.clone()).map(|e| e.members()) else {
            return Vec::new();
        };
        let Some(index) = duplicate_zero(&members) else {
            return Vec::new();
        };

        vec![ctx
            .diagnostic(
                self,
                members[index].syntax().span(),
                "Enum has multiple elements with value 0!",
            )
            .with_fix_context(FixContext::new(node.kind(), node.full_range()))]
    }
}

/// Moves the explicit zero member to the front of the enum.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumZeroDuplicateFix;

impl CodeFix for EnumZeroDuplicateFix {
    fn name(&self) -> &'static str {
        "zero-member-first"
    }

    fn title(&self) -> &'static str {
        "Put 0 value member first"
    }

    fn fixable_codes(&self) -> &'static [&'static str] {
        &[CODE]
    }

    fn compute(&self, request: &FixRequest<'_>) -> Result<FixAction, FixError> {
        let node = request.target.node().ok_or_else(|| request.not_found())?;
        let members = EnumDeclaration::cast(node.clone())
            .map(|e| e.members())
            .ok_or_else(|| request.not_found())?;
        let index = duplicate_zero(&members).ok_or_else(|| request.not_found())?;

        let green = node.green();
        let slots: Vec<usize> = green
            .children()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind() == SyntaxKind::EnumMemberDeclaration)
            .map(|(i, _)| i)
            .collect();
        let mut order = slots.clone();
        let moved = order.remove(index);
        order.insert(0, moved);

        let mut children = green.children().to_vec();
        for (&slot, &source) in slots.iter().zip(&order) {
            children[slot] = with_slot_trivia(&green.children()[source], &green.children()[slot]);
        }
        Ok(FixAction::Replace(Replacement::node(
            node,
            green.with_children(children),
        )))
    }
}

/// `member` placed at `slot`: the slot's blank lines, the member's own
/// comment lines, then the slot's indentation. Trailing trivia comes from
/// the slot.
fn with_slot_trivia(member: &GreenElement, slot: &GreenElement) -> GreenElement {
    let leading = |e: &GreenElement| {
        e.first_token()
            .map(|t| t.leading().to_vec())
            .unwrap_or_default()
    };
    let (member_lines, _) = split_lines(leading(member));
    let (slot_lines, indent) = split_lines(leading(slot));
    let (_, comments) = split_comments(member_lines);
    let (mut trivia, _) = split_comments(slot_lines);
    trivia.extend(comments);
    trivia.extend(indent);

    let trailing = slot
        .last_token()
        .map(|t| t.trailing().to_vec())
        .unwrap_or_default();
    member
        .with_leading_trivia(trivia)
        .with_trailing_trivia(trailing)
}

/// Splits leading trivia after its last line break: whole lines above the
/// token, then the indentation on the token's own line.
fn split_lines(mut trivia: Vec<Trivia>) -> (Vec<Trivia>, Vec<Trivia>) {
    let at = trivia
        .iter()
        .rposition(|t| t.kind() == TriviaKind::EndOfLine)
        .map_or(0, |i| i + 1);
    let indent = trivia.split_off(at);
    (trivia, indent)
}

/// Splits whole lines before the first comment line from the rest.
fn split_comments(mut lines: Vec<Trivia>) -> (Vec<Trivia>, Vec<Trivia>) {
    let Some(first) = lines.iter().position(|t| t.kind().is_comment()) else {
        return (lines, Vec::new());
    };
    let at = lines[..first]
        .iter()
        .rposition(|t| t.kind() == TriviaKind::EndOfLine)
        .map_or(0, |i| i + 1);
    let comments = lines.split_off(at);
    (lines, comments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, fix_all, messages};

    #[test]
    fn reports_once_at_the_explicit_zero() {
        let source = "enum E { A, B = 1, C = 0, D = 0 }\n";
        let diagnostics = check(EnumZeroDuplicate::new(), source);
        assert_eq!(
            messages(&diagnostics),
            vec!["Enum has multiple elements with value 0!"]
        );
        let d = &diagnostics[0];
        assert_eq!(d.severity, Severity::Info);
        assert_eq!(&source[d.location.offset..d.location.offset + d.location.length], "C = 0");
    }

    #[test]
    fn explicit_first_member_or_nonzero_values_pass() {
        for source in [
            "enum E { A = 0, B = 0 }\n",
            "enum E { A, B = 1, C = 2 }\n",
            "enum E { A, B = 1 - 1 }\n",
            "enum E { }\n",
        ] {
            assert!(check(EnumZeroDuplicate::new(), source).is_empty(), "{source}");
        }
    }

    #[test]
    fn zero_literal_spellings() {
        for literal in ["0", "0x0", "0b0", "0u", "0UL", "0_0"] {
            assert_eq!(integer_value(literal), Some(0), "{literal}");
        }
        assert_eq!(integer_value("0x10"), Some(16));
        assert_eq!(integer_value("1L"), Some(1));
    }

    #[test]
    fn fix_moves_zero_member_first() {
        let fixed = fix_all(
            EnumZeroDuplicate::new(),
            EnumZeroDuplicateFix,
            "enum E { A, B = 1, C = 0 }\n",
        );
        assert_eq!(fixed, "enum E { C = 0, A, B = 1 }\n");
    }

    #[test]
    fn fix_keeps_multiline_layout() {
        let fixed = fix_all(
            EnumZeroDuplicate::new(),
            EnumZeroDuplicateFix,
            "enum State\n{\n    Unknown,\n    Ready = 1,\n    // Nothing yet.\n    None = 0x0\n}\n",
        );
        assert_eq!(
            fixed,
            "enum State\n{\n    // Nothing yet.\n    None = 0x0,\n    Unknown,\n    Ready = 1\n}\n"
        );
    }

    #[test]
    fn fix_keeps_blank_lines_at_their_position() {
        let fixed = fix_all(
            EnumZeroDuplicate::new(),
            EnumZeroDuplicateFix,
            "enum Mode\n{\n    // Default.\n    Auto,\n\n    Manual = 1,\n    Off = 0\n}\n",
        );
        assert_eq!(
            fixed,
            "enum Mode\n{\n    Off = 0,\n\n    // Default.\n    Auto,\n    Manual = 1\n}\n"
        );
    }
}
