//! Shared output formatting for lint results.

use anyhow::Result;
use serde::Serialize;
use sharplint_core::{LintResult, Severity};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for diagnostic in &result.diagnostics {
        let severity_indicator = match diagnostic.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            diagnostic.code,
            diagnostic.rule,
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.location.column,
        );
        println!("  {}: {}", severity_indicator, diagnostic.message);
        println!();
    }

    for fault in &result.faults {
        println!("\x1b[31mfault\x1b[0m {fault}");
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a LintResult,
    summary: Summary,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct Summary {
    errors: usize,
    warnings: usize,
    infos: usize,
}

impl Summary {
    fn of(result: &LintResult) -> Self {
        let (errors, warnings, infos) = result.count_by_severity();
        Self {
            errors,
            warnings,
            infos,
        }
    }
}

fn to_json(result: &LintResult) -> Result<String> {
    let report = JsonReport {
        result,
        summary: Summary::of(result),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn print_json(result: &LintResult) -> Result<()> {
    println!("{}", to_json(result)?);
    Ok(())
}

fn print_compact(result: &LintResult) {
    for diagnostic in &result.diagnostics {
        println!("{diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharplint_core::{Category, Diagnostic, Location};
    use std::path::PathBuf;

    fn result() -> LintResult {
        let mut result = LintResult::new();
        result.files_checked = 1;
        result.diagnostics.push(Diagnostic::new(
            "BA00007",
            "enum-zero-duplicate",
            Severity::Info,
            Category::Structure,
            Location::new(PathBuf::from("Models.cs"), 3, 9),
            "Enum has multiple elements with value 0!",
        ));
        result
    }

    #[test]
    fn json_carries_diagnostics_and_summary() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&result()).unwrap()).unwrap();

        assert_eq!(json["files_checked"], 1);
        assert_eq!(json["diagnostics"][0]["code"], "BA00007");
        assert_eq!(json["diagnostics"][0]["severity"], "info");
        assert_eq!(json["diagnostics"][0]["location"]["line"], 3);
        assert_eq!(json["summary"]["infos"], 1);
        assert_eq!(json["summary"]["errors"], 0);
    }
}
