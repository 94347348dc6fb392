// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostics produced by semantic analysis.
//!
//! A [`Diagnostic`] is a message plus the place it was found. The analysis
//! pushes them into a [`Diagnostics`] sink in traversal order; the number of
//! entries is the error count the driver reports.

use ecow::EcoString;
use std::fmt;

/// A position in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub filename: EcoString,
    pub line: u32,
}

impl Location {
    /// Creates a location.
    #[must_use]
    pub fn new(filename: impl Into<EcoString>, line: u32) -> Self {
        Self {
            filename: filename.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

/// A single semantic error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The error message.
    pub message: EcoString,
    /// Where the error was found. Program-wide errors (a missing `Main`
    /// class) have no location.
    pub location: Option<Location>,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    /// Creates an error diagnostic at a location.
    #[must_use]
    pub fn error(message: impl Into<EcoString>, location: Location) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
            hint: None,
        }
    }

    /// Creates an error diagnostic that applies to the whole program.
    #[must_use]
    pub fn global(message: impl Into<EcoString>) -> Self {
        Self {
            message: message.into(),
            location: None,
            hint: None,
        }
    }

    /// Attaches a hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Renders as `file:line: message`, the classic compiler error line.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Ordered, append-only collection of diagnostics for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(%diagnostic, "semantic error");
        self.entries.push(diagnostic);
    }

    /// Number of errors reported so far.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no error has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The diagnostics in the order they were reported.
    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Consumes the sink, returning the diagnostics.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
