//! Core types for diagnostics and analysis results.

use miette::SourceSpan;
use serde::{Deserialize, Serialize};
use sharplint_syntax::{LineIndex, SyntaxKind, TextRange, TreeVersion};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Rule category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Identifier casing conventions.
    Naming,
    /// Preferred language usage.
    Usage,
    /// Comment and documentation style.
    Commenting,
    /// Declaration and initializer structure.
    Structure,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Naming => write!(f, "naming"),
            Self::Usage => write!(f, "usage"),
            Self::Commenting => write!(f, "commenting"),
            Self::Structure => write!(f, "structure"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path as given to the analyzer.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file.
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Creates a location for a byte range.
    #[must_use]
    pub fn from_range(file: PathBuf, index: &LineIndex, range: TextRange) -> Self {
        let (line, column) = index.line_col(range.start);
        Self::new(file, line, column).with_span(range.start, range.len())
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    /// The byte range covered by this location.
    #[must_use]
    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, self.length)
    }
}

/// Data a fix needs to find its target again without re-running analysis.
///
/// Holds the kind and full range of the node that owns the violation plus
/// free-form string properties set by the rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixContext {
    /// Kind of the owning node.
    pub kind: SyntaxKind,
    /// Full range of the owning node.
    pub range: TextRange,
    /// Rule-specific values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl FixContext {
    /// Creates a context pointing at an owning node.
    #[must_use]
    pub fn new(kind: SyntaxKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            properties: BTreeMap::new(),
        }
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Reads a property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// A rule violation found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code (e.g., "BA00007").
    pub code: String,
    /// Rule name (e.g., "enum-zero-duplicate").
    pub rule: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Rule category.
    pub category: Category,
    /// Primary location of the diagnostic.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Tree version the diagnostic was computed against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<TreeVersion>,
    /// Payload for the fix engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_context: Option<FixContext>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        category: Category,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            category,
            location,
            message: message.into(),
            version: None,
            fix_context: None,
        }
    }

    /// Records the tree version the diagnostic belongs to.
    #[must_use]
    pub fn with_version(mut self, version: TreeVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Attaches fix data.
    #[must_use]
    pub fn with_fix_context(mut self, context: FixContext) -> Self {
        self.fix_context = Some(context);
        self
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if self.fix_context.is_some() {
            let _ = writeln!(output, "  = help: run `sharplint fix` to apply the suggested fix");
        }
        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Renders a [`Diagnostic`] against its source with miette.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
pub struct DiagnosticReport {
    message: String,
    #[source_code]
    source_code: miette::NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl DiagnosticReport {
    /// Pairs a diagnostic with the text it was computed on.
    #[must_use]
    pub fn new(diagnostic: &Diagnostic, source: String) -> Self {
        Self {
            message: format!("[{}] {}", diagnostic.code, diagnostic.message),
            source_code: miette::NamedSource::new(
                diagnostic.location.file.display().to_string(),
                source,
            ),
            span: SourceSpan::from((diagnostic.location.offset, diagnostic.location.length)),
            label_message: diagnostic.rule.clone(),
        }
    }
}

/// A rule callback that panicked while analyzing a node or trivia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFault {
    /// Code of the faulting rule.
    pub code: String,
    /// Name of the faulting rule.
    pub rule: String,
    /// Document being analyzed.
    pub file: PathBuf,
    /// Start of the node or trivia being analyzed.
    pub offset: usize,
    /// Panic message.
    pub message: String,
}

impl std::fmt::Display for RuleFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rule {} [{}] failed in {} at offset {}: {}",
            self.rule,
            self.code,
            self.file.display(),
            self.offset,
            self.message
        )
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All diagnostics found, in file then source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Rule callbacks that failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<RuleFault>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns true if there are any warnings or errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity >= Severity::Warning)
    }

    /// Returns diagnostics filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .collect()
    }

    /// Returns diagnostics reported by one rule code.
    #[must_use]
    pub fn by_code(&self, code: &str) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.code == code).collect()
    }

    /// Counts diagnostics by severity as (errors, warnings, infos).
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.diagnostics.iter().filter(|d| d.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Formats diagnostics as a test failure report.
    ///
    /// Produces a human-readable multi-line report suitable for `panic!()`
    /// messages in tests that lint fixture sources.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&Diagnostic> = self
            .diagnostics
            .iter()
            .filter(|d| d.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== sharplint: {} diagnostic(s) ===\n",
            failing.len()
        );

        for d in &failing {
            let _ = writeln!(
                report,
                "{} [{}] at {}:{}:{}",
                d.rule,
                d.code,
                d.location.file.display(),
                d.location.line,
                d.location.column,
            );
            let _ = writeln!(report, "  {}: {}", d.severity, d.message);
            let _ = writeln!(report);
        }
        for fault in &self.faults {
            let _ = writeln!(report, "fault: {fault}");
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} error(s), {} warning(s), {} info(s) in {} file(s)",
            errors, warnings, infos, self.files_checked
        );

        report
    }

    /// Checks if any diagnostics meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Adds diagnostics and faults from another result.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.faults.extend(other.faults);
        self.files_checked += other.files_checked;
    }

    /// Sorts diagnostics by file, then by position. The sort is stable, so
    /// diagnostics at the same position keep rule registration order.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.offset.cmp(&b.location.offset))
        });
    }
}
