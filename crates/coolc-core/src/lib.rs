// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Cool compiler core.
//!
//! This crate contains the static semantics of Cool:
//! - Interned names and the predefined symbols (`symbol`)
//! - The typed abstract syntax tree handed over by the parser (`ast`)
//! - Class registration, declaration and type checking (`semantic_analysis`)
//! - Diagnostics with file and line information (`diagnostic`)
//!
//! Lexing, parsing and code generation live outside this crate.

pub mod ast;
pub mod ast_walker;
pub mod diagnostic;
pub mod semantic_analysis;
pub mod symbol;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{ClassDecl, ExprKind, Expression, Feature, Program};
    pub use crate::diagnostic::{Diagnostic, Location};
    pub use crate::semantic_analysis::{AnalysisResult, analyse};
    pub use crate::symbol::{Interner, Symbol, WellKnown};
}
