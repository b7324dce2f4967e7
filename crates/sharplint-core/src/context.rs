//! Context types for rule execution.

use crate::config::{Config, RuleConfig};
use crate::rule::Rule;
use crate::semantic::SemanticModel;
use crate::types::{Diagnostic, Location};
use sharplint_syntax::{LineIndex, TextRange};
use std::path::Path;

/// Context provided to rule callbacks during one analysis pass.
///
/// Everything reachable from here is bound to a single tree version and must
/// not be kept past the pass.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    model: &'a SemanticModel<'a>,
    line_index: LineIndex,
    config: &'a Config,
    is_generated: bool,
}

impl<'a> RuleContext<'a> {
    /// Creates a context for the document of `model`.
    #[must_use]
    pub fn new(model: &'a SemanticModel<'a>, config: &'a Config) -> Self {
        let document = model.document();
        let is_generated = is_generated_document(document.path(), &document.text());
        Self {
            model,
            line_index: document.tree().line_index(),
            config,
            is_generated,
        }
    }

    /// Semantic queries for the analyzed document.
    #[must_use]
    pub fn semantic(&self) -> &'a SemanticModel<'a> {
        self.model
    }

    /// Path of the analyzed document.
    #[must_use]
    pub fn path(&self) -> &'a Path {
        self.model.document().path()
    }

    /// Whether the document is generated code.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.is_generated
    }

    /// Configuration for `rule`, if any was given.
    #[must_use]
    pub fn rule_config<R: Rule + ?Sized>(&self, rule: &R) -> Option<&'a RuleConfig> {
        self.config.rule_config(rule.name(), rule.code())
    }

    /// Builds a diagnostic for `rule` at `range`, stamped with the tree
    /// version and the rule's default severity.
    #[must_use]
    pub fn diagnostic<R: Rule + ?Sized>(
        &self,
        rule: &R,
        range: TextRange,
        message: impl Into<String>,
    ) -> Diagnostic {
        let location = Location::from_range(self.path().to_path_buf(), &self.line_index, range);
        Diagnostic::new(
            rule.code(),
            rule.name(),
            rule.default_severity(),
            rule.category(),
            location,
            message,
        )
        .with_version(self.model.version())
    }
}

/// Detects generated documents by file name or by an `<auto-generated`
/// marker in the comments at the top of the file.
#[must_use]
pub fn is_generated_document(path: &Path, text: &str) -> bool {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let generated_name = [".g.cs", ".g.i.cs", ".designer.cs", ".generated.cs"]
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
        || file_name == "assemblyinfo.cs";
    if generated_name {
        return true;
    }

    has_generated_header(text)
}

fn has_generated_header(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .take_while(|line| line.is_empty() || line.starts_with("//") || line.starts_with("/*"))
        .any(|line| line.contains("<auto-generated"))
}
