//! Diagnostic extraction from Rolldown errors.
//!
//! Rolldown reports failures as batched diagnostics whose structure changes
//! between releases, so we read what we need from their debug rendering into
//! a small stable type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Extracted diagnostic information from Rolldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub file: Option<String>,
    pub help: Option<String>,
}

/// Diagnostic kind (mirrors the Rolldown event kinds we can tell apart).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParseError,
    UnresolvedEntry,
    UnresolvedImport,
    MissingExport,
    InvalidOption,
    Other,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticKind::ParseError => "ParseError",
            DiagnosticKind::UnresolvedEntry => "UnresolvedEntry",
            DiagnosticKind::UnresolvedImport => "UnresolvedImport",
            DiagnosticKind::MissingExport => "MissingExport",
            DiagnosticKind::InvalidOption => "InvalidOption",
            DiagnosticKind::Other => "BuildError",
        })
    }
}

/// Extract diagnostics from a Rolldown error value.
pub fn extract_from_rolldown_error(error: &dyn fmt::Debug) -> Vec<ExtractedDiagnostic> {
    let rendered = format!("{error:?}");

    let parts: Vec<&str> = rendered
        .split("BuildDiagnostic")
        .map(str::trim)
        .filter(|part| part.len() > 2)
        .collect();

    if parts.len() > 1 {
        parts.into_iter().map(extract_single).collect()
    } else {
        vec![extract_single(&rendered)]
    }
}

fn extract_single(text: &str) -> ExtractedDiagnostic {
    let kind = classify(text);
    let help = match kind {
        DiagnosticKind::UnresolvedImport => Some(
            "Extensions are bundled into a single file. Install the imported package or fix the import path."
                .to_string(),
        ),
        DiagnosticKind::UnresolvedEntry => {
            Some("Check the `entry` field of your sammi.config file.".to_string())
        }
        DiagnosticKind::MissingExport => {
            Some("Check that the imported name is exported by the target module.".to_string())
        }
        DiagnosticKind::InvalidOption => {
            Some("Check the `bundlerConfig` section of your sammi.config file.".to_string())
        }
        _ => None,
    };

    ExtractedDiagnostic {
        kind,
        message: text.to_string(),
        file: extract_file_path(text),
        help,
    }
}

fn classify(text: &str) -> DiagnosticKind {
    if text.contains("UnresolvedEntry") {
        DiagnosticKind::UnresolvedEntry
    } else if text.contains("UnresolvedImport") || text.contains("Could not resolve") {
        DiagnosticKind::UnresolvedImport
    } else if text.contains("MissingExport") {
        DiagnosticKind::MissingExport
    } else if text.contains("Parse")
        || text.contains("Syntax")
        || text.contains("Unexpected token")
        || text.contains("Expected")
    {
        DiagnosticKind::ParseError
    } else if text.contains("InvalidOption") {
        DiagnosticKind::InvalidOption
    } else {
        DiagnosticKind::Other
    }
}

/// First quoted path with a script extension.
fn extract_file_path(text: &str) -> Option<String> {
    const EXTENSIONS: [&str; 6] = [".ts", ".js", ".mts", ".mjs", ".tsx", ".jsx"];

    text.split(['"', '\''])
        .map(|candidate| candidate.trim_end_matches('\\'))
        .find(|candidate| {
            !candidate.contains(char::is_whitespace)
                && EXTENSIONS.iter().any(|ext| candidate.ends_with(ext))
        })
        .map(str::to_string)
}
