// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error reporting for `coolc check`.
//!
//! Core diagnostics carry a file name and line but no source text, so the
//! miette form has no snippets: each semantic error becomes a related
//! diagnostic of one [`CheckFailure`] report. The plain form is the classic
//! one-error-per-line listing.

// Suppress unused_assignments for struct fields used by derive macros
#![allow(unused_assignments)]

use coolc_core::diagnostic::Diagnostic as CoreDiagnostic;
use miette::Diagnostic;
use std::fmt::Write as _;

/// Printed after the diagnostics of a failed check.
pub const HALTED: &str = "Compilation halted due to static semantic errors.";

/// A single semantic error.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(coolc::semantic))]
pub struct SemanticDiagnostic {
    /// `file:line: message`, or just the message for program-wide errors
    pub message: String,
    #[help]
    pub hint: Option<String>,
}

impl SemanticDiagnostic {
    pub fn from_core_diagnostic(diagnostic: &CoreDiagnostic) -> Self {
        Self {
            message: diagnostic.to_string(),
            hint: diagnostic.hint.as_ref().map(ToString::to_string),
        }
    }
}

/// All semantic errors of one program.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{count} static semantic error{plural} in {path}")]
#[diagnostic(code(coolc::check))]
pub struct CheckFailure {
    pub path: String,
    pub count: usize,
    plural: &'static str,
    #[related]
    pub errors: Vec<SemanticDiagnostic>,
}

impl CheckFailure {
    pub fn new(path: &str, diagnostics: &[CoreDiagnostic]) -> Self {
        Self {
            path: path.to_string(),
            count: diagnostics.len(),
            plural: if diagnostics.len() == 1 { "" } else { "s" },
            errors: diagnostics
                .iter()
                .map(SemanticDiagnostic::from_core_diagnostic)
                .collect(),
        }
    }
}

/// Renders diagnostics one per line.
pub fn render_plain(diagnostics: &[CoreDiagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        let _ = writeln!(out, "{diagnostic}");
    }
    out
}
