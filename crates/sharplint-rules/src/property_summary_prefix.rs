//! Rule checking the wording of property `<summary>` documentation.
//!
//! # Rationale
//!
//! Property summaries follow the .NET convention of describing what the
//! public accessors do: "Gets ...", "Sets ..." or "Gets or sets ...". The
//! prefix tells a reader whether the property can be written without
//! looking at its declaration.
//!
//! # Expected Prefix
//!
//! | Public accessors | Prefix |
//! |------------------|--------|
//! | expression body (`=> value`) | `Gets` |
//! | `get` and `set` | `Gets or sets` |
//! | `get` only | `Gets` |
//! | `set` only | `Sets` |
//!
//! An accessor is public unless it carries `private`, `protected` or
//! `internal`. Properties without public accessors, without a doc comment,
//! or without summary text are skipped. When several `///` blocks precede a
//! property, the last one is checked.
//!
//! # Configuration
//!
//! None beyond the common `enabled` and `severity` keys.

use sharplint_core::{Category, Diagnostic, Rule, RuleContext};
use sharplint_syntax::ast::{AccessorDeclaration, PropertyDeclaration};
use sharplint_syntax::{SyntaxKind, SyntaxNode, SyntaxTrivia, TextRange, TriviaKind};

/// Rule code for property-summary-prefix.
pub const CODE: &str = "BA00002";

/// Rule name for property-summary-prefix.
pub const NAME: &str = "property-summary-prefix";

const GETS: &str = "Gets";
const SETS: &str = "Sets";
const GETS_OR_SETS: &str = "Gets or sets";

/// Requires property summaries to start with `Gets`, `Sets` or
/// `Gets or sets`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertySummaryPrefix;

impl PropertySummaryPrefix {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_public(accessor: &AccessorDeclaration) -> bool {
    !accessor.modifiers().iter().any(|m| {
        matches!(
            m.kind(),
            SyntaxKind::PrivateKeyword | SyntaxKind::ProtectedKeyword | SyntaxKind::InternalKeyword
        )
    })
}

/// The prefix the summary must start with, or `None` if the property has no
/// public accessor.
fn expected_prefix(property: &PropertyDeclaration) -> Option<&'static str> {
    let Some(list) = property.accessor_list() else {
        return Some(GETS);
    };
    let public: Vec<String> = list
        .accessors()
        .iter()
        .filter(|a| is_public(a))
        .filter_map(AccessorDeclaration::keyword)
        .map(|k| k.text().to_string())
        .collect();
    if public.is_empty() {
        return None;
    }

    let has = |name: &str| public.iter().any(|k| k == name);
    Some(match (has("get"), has("set")) {
        (true, true) => GETS_OR_SETS,
        (true, false) => GETS,
        _ => SETS,
    })
}

fn documentation(node: &SyntaxNode) -> Option<SyntaxTrivia> {
    node.first_token()?
        .leading_trivia()
        .into_iter()
        .filter(|t| t.kind() == TriviaKind::SingleLineDocComment)
        .last()
}

/// Offset and text of the first run of words inside `<summary>`.
fn summary_text(doc: &str) -> Option<(usize, &str)> {
    let open = doc.find("<summary")?;
    let open_end = open + doc[open..].find('>')?;
    if doc[..open_end].ends_with('/') {
        return None;
    }
    let start = open_end + 1;
    let end = doc[start..]
        .find("</summary")
        .map_or(doc.len(), |i| start + i);
    first_text_run(&doc[start..end]).map(|(offset, text)| (start + offset, text))
}

/// First non-blank text outside XML tags and `///` line markers, up to the
/// next tag or line break.
fn first_text_run(content: &str) -> Option<(usize, &str)> {
    let mut chars = content.char_indices();
    let mut in_tag = false;
    let mut line_start = false;
    while let Some((i, c)) = chars.next() {
        if in_tag {
            in_tag = c != '>';
            continue;
        }
        match c {
            '\n' => {
                line_start = true;
                continue;
            }
            c if c.is_whitespace() => continue,
            '<' => in_tag = true,
            '/' if line_start && content[i..].starts_with("///") => {
                chars.nth(1);
            }
            _ => {
                let end = content[i..]
                    .find(['<', '\n'])
                    .map_or(content.len(), |n| i + n);
                return Some((i, content[i..end].trim_end()));
            }
        }
        line_start = false;
    }
    None
}

impl Rule for PropertySummaryPrefix {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Property summaries should use get or set comment format"
    }

    fn category(&self) -> Category {
        Category::Usage
    }

    fn node_kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::PropertyDeclaration]
    }

    fn check_node(&self, ctx: &RuleContext<'_>, node: &SyntaxNode) -> Vec<Diagnostic> {
        let Some(property) = PropertyDeclaration::cast(node.clone()) else {
            return Vec::new();
        };
        let Some(expected) = expected_prefix(&property) else {
            return Vec::new();
        };
        let Some(doc) = documentation(node) else {
            return Vec::new();
        };
        let Some((offset, text)) = summary_text(doc.text()) else {
            return Vec::new();
        };
        if text.starts_with(expected) {
            return Vec::new();
        }

        let name = property
            .identifier()
            .map(|t| t.text().to_string())
            .unwrap_or_default();
        let range = TextRange::at(doc.span().start + offset, text.len());
        vec![ctx.diagnostic(
            self,
            range,
            format!("\"{name}\" property summary should start with {expected}."),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, messages};

    fn class(members: &str) -> String {
        format!("class C {{\n{members}\n}}\n")
    }

    #[test]
    fn expects_prefix_by_accessors() {
        let source = class(
            "    /// <summary>\n    /// The name.\n    /// </summary>\n    public string Name { get; set; }\n\n    /// <summary>Sets the age.</summary>\n    public int Age { get; private set; }\n\n    /// <summary>Gets the secret.</summary>\n    public string Secret { private get; set; }\n\n    /// <summary>Returns one.</summary>\n    public int One => 1;",
        );
        let diagnostics = check(PropertySummaryPrefix::new(), &source);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "\"Name\" property summary should start with Gets or sets.",
                "\"Age\" property summary should start with Gets.",
                "\"Secret\" property summary should start with Sets.",
                "\"One\" property summary should start with Gets.",
            ]
        );

        let first = &diagnostics[0].location;
        assert_eq!((first.line, first.column), (3, 9));
        assert_eq!(first.length, "The name.".len());
    }

    #[test]
    fn accepts_correct_summaries() {
        let source = class(
            "    /// <summary>Gets or sets the name.</summary>\n    public string Name { get; set; }\n    /// <summary>\n    /// Gets the <see cref=\"Name\"/> length.\n    /// </summary>\n    public int Length => Name.Length;\n    /// <summary>Gets or sets the id, which still starts with Gets.</summary>\n    public int Id { get; }",
        );
        assert!(check(PropertySummaryPrefix::new(), &source).is_empty());
    }

    #[test]
    fn skips_undocumented_and_non_public_properties() {
        let source = class(
            "    public int A { get; set; }\n    /// <summary/>\n    public int B { get; set; }\n    /// <remarks>No summary.</remarks>\n    public int C { get; set; }\n    /// <summary>Whatever.</summary>\n    int D { private get; internal set; }",
        );
        assert!(check(PropertySummaryPrefix::new(), &source).is_empty());
    }

    #[test]
    fn last_doc_block_wins() {
        let source = class(
            "    /// <summary>Gets the old text.</summary>\n\n    /// <summary>Value.</summary>\n    public int V { get; }",
        );
        let diagnostics = check(PropertySummaryPrefix::new(), &source);
        assert_eq!(
            messages(&diagnostics),
            vec!["\"V\" property summary should start with Gets."]
        );
    }

    #[test]
    fn summary_text_skips_markers_and_tags() {
        let doc = "/// <summary>\n    /// <para>Gets it.</para>\n    /// </summary>";
        let (offset, text) = summary_text(doc).expect("text");
        assert_eq!(text, "Gets it.");
        assert_eq!(&doc[offset..offset + text.len()], "Gets it.");
        assert_eq!(summary_text("/// <summary>  </summary>"), None);
    }
}
