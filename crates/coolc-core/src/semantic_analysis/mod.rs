// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis for Cool programs.
//!
//! This module checks a parsed program and annotates it with static types:
//! - Class registration and the inheritance tree (via `class_hierarchy`)
//! - Method and attribute tables (via `declarations`)
//! - Program-wide checks: `Main.main()` and undefined parents
//! - Expression typing with `SELF_TYPE` (via `type_checker`)
//!
//! Each phase only runs if every earlier phase was clean. The diagnostics
//! are returned in the order they were found; a non-empty list means the
//! program must not be compiled further.

use crate::ast::Program;
use crate::diagnostic::{Diagnostic, Diagnostics, Location};
use crate::symbol::{Interner, WellKnown};

pub mod class_hierarchy;
mod declarations;
pub mod error;
pub mod scope;
mod type_checker;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use class_hierarchy::{ClassHierarchy, ClassInfo, MethodSignature};
pub use error::{SemanticError, SemanticErrorKind};

/// Result of semantic analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Every error found, in traversal order.
    pub diagnostics: Vec<Diagnostic>,

    /// The class table built during analysis.
    pub hierarchy: ClassHierarchy,
}

impl AnalysisResult {
    /// Number of semantic errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if the program passed every check.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Analyse a program, annotating every expression with its static type.
///
/// Annotations are only written when registration and the program-wide
/// checks pass; otherwise the tree is left untouched.
pub fn analyse(program: &mut Program, interner: &mut Interner) -> AnalysisResult {
    let well_known = WellKnown::new(interner);
    let interner = &*interner;

    let (hierarchy, mut diagnostics) = ClassHierarchy::build(program, &well_known, interner);
    tracing::debug!(
        classes = program.classes.len(),
        errors = diagnostics.error_count(),
        "registration finished"
    );

    if diagnostics.is_empty() {
        check_main(&hierarchy, &mut diagnostics);
    }

    if diagnostics.is_empty() {
        check_parents(&hierarchy, interner, &mut diagnostics);
    }

    if diagnostics.is_empty() {
        for class in &mut program.classes {
            type_checker::check_class(class, &hierarchy, interner, &mut diagnostics);
        }
        tracing::debug!(errors = diagnostics.error_count(), "type checking finished");
    }

    AnalysisResult {
        diagnostics: diagnostics.into_vec(),
        hierarchy,
    }
}

/// Requires a class `Main` declaring a parameterless `main` method.
///
/// A missing `Main` has no location; a missing `main` is reported at the
/// `Main` declaration.
fn check_main(hierarchy: &ClassHierarchy, diagnostics: &mut Diagnostics) {
    let wk = *hierarchy.well_known();
    let Some(main_class) = hierarchy.get_class(wk.Main) else {
        diagnostics.push(SemanticError::global(SemanticErrorKind::MissingMainClass).into());
        return;
    };
    match hierarchy.get_method(wk.Main, wk.main) {
        None => {
            let location = Location::new(main_class.filename.clone(), main_class.line);
            diagnostics.push(SemanticError::new(SemanticErrorKind::MissingMainMethod, location).into());
        }
        Some(main) if main.arity() != 0 => {
            let location = Location::new(main_class.filename.clone(), main.line);
            diagnostics.push(SemanticError::new(SemanticErrorKind::MainHasParameters, location).into());
        }
        Some(_) => {}
    }
}

/// Reports every class whose declared parent was never defined.
fn check_parents(hierarchy: &ClassHierarchy, interner: &Interner, diagnostics: &mut Diagnostics) {
    let wk = *hierarchy.well_known();
    for (child, parent) in hierarchy.parent_edges() {
        if parent == wk.No_class || hierarchy.has_class(parent) {
            continue;
        }
        let Some(info) = hierarchy.get_class(child) else {
            continue;
        };
        let kind = SemanticErrorKind::UndefinedParent {
            class: interner.resolve(child).into(),
            parent: interner.resolve(parent).into(),
        };
        let location = Location::new(info.filename.clone(), info.line);
        diagnostics.push(SemanticError::new(kind, location).into());
    }
}
