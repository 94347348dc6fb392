// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `coolc check`: run semantic analysis on a program file.
//!
//! The program is loaded, analysed, and either passes or fails with the
//! collected semantic errors. With `--emit-types` every annotated
//! expression is listed on stdout after analysis.

use crate::diagnostic::{CheckFailure, HALTED, render_plain};
use crate::program_file::load_program;
use camino::Utf8Path;
use coolc_core::ast::Program;
use coolc_core::ast_walker::walk_program;
use coolc_core::semantic_analysis::analyse;
use coolc_core::symbol::Interner;
use miette::Result;
use std::fmt::Write as _;
use tracing::{debug, info, instrument};

/// How semantic errors are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// miette report with one related entry per error (default).
    #[default]
    Human,
    /// One `file:line: message` line per error.
    Plain,
}

/// Options for a single check run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    pub emit_types: bool,
    pub format: OutputFormat,
}

/// Result of a check that got as far as analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Halted { errors: usize },
}

/// Check a program file, printing diagnostics to stderr.
///
/// Load failures are returned as errors; semantic errors are printed and
/// reported through the [`Verdict`].
#[instrument(skip_all, fields(path = %path))]
pub fn check(path: &Utf8Path, options: CheckOptions) -> Result<Verdict> {
    let mut interner = Interner::new();
    let mut program = load_program(path, &mut interner)?;

    let result = analyse(&mut program, &mut interner);
    debug!(errors = result.error_count(), "analysis finished");

    if options.emit_types {
        print!("{}", render_types(&program, &interner));
    }

    if result.is_ok() {
        info!("no semantic errors");
        return Ok(Verdict::Passed);
    }

    match options.format {
        OutputFormat::Human => {
            let failure = CheckFailure::new(path.as_str(), &result.diagnostics);
            eprintln!("{:?}", miette::Report::new(failure));
        }
        OutputFormat::Plain => eprint!("{}", render_plain(&result.diagnostics)),
    }
    eprintln!("{HALTED}");

    Ok(Verdict::Halted {
        errors: result.error_count(),
    })
}

/// Lists every annotated expression as `file:line: <kind> : <Type>`.
pub fn render_types(program: &Program, interner: &Interner) -> String {
    let mut out = String::new();
    walk_program(program, &mut |class, expr| {
        if let Some(ty) = expr.ty {
            let _ = writeln!(
                out,
                "{}:{}: {} : {}",
                class.filename,
                expr.line,
                expr.kind.name(),
                interner.resolve(ty)
            );
        }
    });
    out
}
