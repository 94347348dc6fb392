// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis error types.
//!
//! Each [`SemanticErrorKind`] variant is one rule of the language; its
//! `Display` text is the message shown to the user.

use crate::diagnostic::{Diagnostic, Location};
use ecow::EcoString;
use thiserror::Error;

/// A semantic error discovered during analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    /// `None` for program-wide errors.
    pub location: Option<Location>,
}

/// Types of semantic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    // --- Class registration ---
    #[error("Redefinition of basic class {name}")]
    InvalidClassName { name: EcoString },

    #[error("Class {class} cannot inherit class {parent}")]
    InvalidParentClass { class: EcoString, parent: EcoString },

    #[error("Class {name} was previously defined")]
    ClassRedefinition { name: EcoString },

    #[error("Class {class}, or an ancestor of {class}, is involved in an inheritance cycle")]
    CircularInheritance { class: EcoString },

    // --- Declaration pass ---
    #[error("Method {method} is multiply defined in class {class}")]
    MethodRedefinition { class: EcoString, method: EcoString },

    #[error("Attribute {attr} is multiply defined in class {class}")]
    AttributeRedefinition { class: EcoString, attr: EcoString },

    #[error("'self' cannot be the name of an attribute")]
    SelfAttribute,

    // --- Program-wide checks ---
    #[error("Class Main is not defined")]
    MissingMainClass,

    #[error("No 'main' method in class Main")]
    MissingMainMethod,

    #[error("'main' method in class Main should have no arguments")]
    MainHasParameters,

    #[error("Class {class} inherits from an undefined class {parent}")]
    UndefinedParent { class: EcoString, parent: EcoString },

    // --- Features ---
    #[error("Attribute {attr} is an attribute of an inherited class")]
    InheritedAttributeRedefinition { attr: EcoString },

    #[error("Class {ty} of attribute {attr} is undefined")]
    UndefinedAttributeType { attr: EcoString, ty: EcoString },

    #[error(
        "Inferred type {actual} of initialization of attribute {attr} does not conform to declared type {declared}"
    )]
    AttributeInitMismatch {
        attr: EcoString,
        declared: EcoString,
        actual: EcoString,
    },

    #[error("'self' cannot be the name of a formal parameter")]
    SelfFormal,

    #[error("Formal parameter {name} is multiply defined")]
    DuplicateFormal { name: EcoString },

    #[error("Formal parameter {name} cannot have type {ty}")]
    InvalidFormalType { name: EcoString, ty: EcoString },

    #[error("Undefined return type {ty} in method {method}")]
    UndefinedReturnType { method: EcoString, ty: EcoString },

    #[error("In redefined method {method}, {detail}")]
    OverrideSignature { method: EcoString, detail: EcoString },

    #[error(
        "Inferred return type {actual} of method {method} does not conform to declared return type {declared}"
    )]
    ReturnTypeMismatch {
        method: EcoString,
        declared: EcoString,
        actual: EcoString,
    },

    // --- Expressions ---
    #[error("Cannot assign to 'self'")]
    AssignToSelf,

    #[error("Undeclared identifier {name}")]
    UndeclaredIdentifier { name: EcoString },

    #[error(
        "Type {actual} of assigned expression does not conform to declared type {declared} of identifier {name}"
    )]
    AssignMismatch {
        name: EcoString,
        declared: EcoString,
        actual: EcoString,
    },

    #[error("Dispatch on undefined class {ty}")]
    UndefinedDispatchClass { ty: EcoString },

    #[error("Dispatch to undefined method {method}")]
    UndefinedMethod { method: EcoString },

    #[error("Method {method} called with wrong number of arguments: expected {expected}, found {found}")]
    ArityMismatch {
        method: EcoString,
        expected: usize,
        found: usize,
    },

    #[error(
        "In call of method {method}, type {actual} of parameter {param} does not conform to declared type {expected}"
    )]
    ArgumentMismatch {
        method: EcoString,
        param: EcoString,
        expected: EcoString,
        actual: EcoString,
    },

    #[error("Return type {ty} of method {method} is not a defined class")]
    UndefinedReturnClass { method: EcoString, ty: EcoString },

    #[error("Static dispatch to undefined class {ty}")]
    InvalidStaticType { ty: EcoString },

    #[error("Expression type {actual} does not conform to declared static dispatch type {declared}")]
    StaticDispatchMismatch {
        declared: EcoString,
        actual: EcoString,
    },

    #[error("Predicate of '{construct}' does not have type Bool")]
    NonBoolPredicate { construct: &'static str },

    #[error("Duplicate branch {ty} in case statement")]
    DuplicateCaseBranch { ty: EcoString },

    #[error("Class {ty} of case branch is undefined")]
    UndefinedCaseType { ty: EcoString },

    #[error("'self' bound in 'case'")]
    SelfInCaseBranch,

    #[error("Class {ty} of let-bound identifier {name} is undefined")]
    UndefinedLetType { name: EcoString, ty: EcoString },

    #[error("'self' cannot be bound in a 'let' expression")]
    SelfInLet,

    #[error(
        "Inferred type {actual} of initialization of {name} does not conform to identifier's declared type {declared}"
    )]
    LetInitMismatch {
        name: EcoString,
        declared: EcoString,
        actual: EcoString,
    },

    #[error("non-Int arguments: {lhs} {op} {rhs}")]
    NonIntOperands {
        op: &'static str,
        lhs: EcoString,
        rhs: EcoString,
    },

    #[error("Argument of '~' has type {actual} instead of Int")]
    NonIntNegation { actual: EcoString },

    #[error("Illegal comparison with a basic type: {lhs} = {rhs}")]
    IllegalComparison { lhs: EcoString, rhs: EcoString },

    #[error("Argument of 'not' has type {actual} instead of Bool")]
    NonBoolNot { actual: EcoString },

    #[error("'new' used with undefined class {ty}")]
    UndefinedNewType { ty: EcoString },
}

impl SemanticErrorKind {
    /// A suggestion for fixing the error, where one is obvious.
    #[must_use]
    pub fn hint(&self) -> Option<EcoString> {
        match self {
            Self::InvalidParentClass { .. } => {
                Some("Only Object, IO and user-defined classes can be inherited".into())
            }
            Self::MissingMainMethod | Self::MainHasParameters => {
                Some("Declare `main(): Object { ... };` in class Main".into())
            }
            Self::OverrideSignature { .. } => Some(
                "An overriding method must repeat the inherited parameter and return types exactly"
                    .into(),
            ),
            Self::IllegalComparison { .. } => {
                Some("Int, Bool and String can only be compared with the same type".into())
            }
            _ => None,
        }
    }
}

impl SemanticError {
    /// Create a new semantic error at a source location.
    #[must_use]
    pub fn new(kind: SemanticErrorKind, location: Location) -> Self {
        Self {
            kind,
            location: Some(location),
        }
    }

    /// Create a program-wide semantic error.
    #[must_use]
    pub fn global(kind: SemanticErrorKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// Converts the error into a user-facing diagnostic.
    #[must_use]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = self.kind.to_string();
        let diagnostic = match &self.location {
            Some(location) => Diagnostic::error(message, location.clone()),
            None => Diagnostic::global(message),
        };
        match self.kind.hint() {
            Some(hint) => diagnostic.with_hint(hint),
            None => diagnostic,
        }
    }
}

impl From<SemanticError> for Diagnostic {
    fn from(error: SemanticError) -> Self {
        error.to_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_interpolates_names() {
        let kind = SemanticErrorKind::AssignMismatch {
            name: "x".into(),
            declared: "Int".into(),
            actual: "String".into(),
        };
        assert_eq!(
            kind.to_string(),
            "Type String of assigned expression does not conform to declared type Int of identifier x"
        );
    }

    #[test]
    fn located_error_becomes_located_diagnostic() {
        let error = SemanticError::new(
            SemanticErrorKind::UndeclaredIdentifier { name: "y".into() },
            Location::new("a.cl", 4),
        );
        let diag = error.to_diagnostic();
        assert_eq!(diag.to_string(), "a.cl:4: Undeclared identifier y");
        assert!(diag.hint.is_none());
    }

    #[test]
    fn global_error_carries_hint() {
        let diag: Diagnostic = SemanticError::global(SemanticErrorKind::MissingMainMethod).into();
        assert_eq!(diag.message, "No 'main' method in class Main");
        assert!(diag.location.is_none());
        assert!(diag.hint.is_some());
    }
}
