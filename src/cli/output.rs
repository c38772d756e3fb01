//! CLI output: error mapping from domain errors to a stable exit-code
//! surface, plus check-report rendering. The engines never touch process
//! exit codes; this layer is the only place that policy lives.

use crate::check::CheckReport;
use crate::error::{CascadeError, CheckError, CliError, FilterError, RefactorError, StructureError, TabulateError};
use owo_colors::OwoColorize;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &CliError) -> String {
    e.to_string()
}

/// Stable exit codes: 1 for a missing root marker (and any other failure),
/// 2 for a missing or ambiguous template, 3 for a fatal parse error in an
/// ancestor file during cascade.
pub fn exit_code(e: &CliError) -> i32 {
    if matches!(
        e,
        CliError::Cascade(CascadeError::AncestorParse { .. })
            | CliError::Filter(FilterError::Cascade(CascadeError::AncestorParse { .. }))
    ) {
        return 3;
    }
    match structure_of(e) {
        Some(StructureError::MissingTemplate(_)) | Some(StructureError::AmbiguousTemplate(..)) => 2,
        _ => 1,
    }
}

fn structure_of(e: &CliError) -> Option<&StructureError> {
    match e {
        CliError::Filter(FilterError::Structure(s)) => Some(s),
        CliError::Check(CheckError::Structure(s)) => Some(s),
        CliError::Refactor(RefactorError::Structure(s)) => Some(s),
        CliError::Tabulate(TabulateError::Structure(s)) => Some(s),
        _ => None,
    }
}

/// Render a check report. Text mode groups findings per file; json mode
/// emits the full mapping plus the total count. A clean report renders
/// empty in text mode.
pub fn format_check_report(report: &CheckReport, format: &str) -> String {
    if format == "json" {
        let files: serde_json::Map<String, serde_json::Value> = report
            .errors
            .iter()
            .map(|(path, errors)| {
                (
                    path.to_string_lossy().into_owned(),
                    serde_json::json!(errors),
                )
            })
            .collect();
        let value = serde_json::json!({
            "errors": files,
            "error_count": report.error_count(),
        });
        return serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
    }

    let mut out = String::new();
    for (path, errors) in &report.errors {
        let heading = format!("Error(s) in {}:", path.display());
        out.push_str(&format!("{}\n", heading.bold()));
        for error in errors {
            out.push_str(&format!("\t{}\n", error));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}
