// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Built-in class definitions for the class hierarchy.
//!
//! **DDD Context:** Semantic Analysis
//!
//! `Object`, `IO`, `Int`, `Bool` and `String` are registered before any user
//! class. They have no method bodies (the runtime provides them); only their
//! signatures matter to the checker. They are built as ordinary
//! [`ClassDecl`]s so the declaration pass can record them the same way it
//! records user classes.

use crate::ast::{Attribute, ClassDecl, Expression, Feature, Formal, Method};
use crate::symbol::{Symbol, WellKnown};

/// File name reported for anything declared by a basic class.
pub(crate) const BASIC_CLASS_FILENAME: &str = "<basic class>";

/// Returns true if `name` may not be used for a user-defined class.
pub(crate) fn is_reserved_class_name(wk: &WellKnown, name: Symbol) -> bool {
    name == wk.Object
        || name == wk.IO
        || name == wk.Int
        || name == wk.Bool
        || name == wk.String
        || name == wk.SELF_TYPE
}

/// Returns true if a user class may not declare `parent` as its parent.
///
/// Only `Object` and `IO` among the basic classes can be extended.
pub(crate) fn is_sealed_parent(wk: &WellKnown, parent: Symbol) -> bool {
    parent == wk.SELF_TYPE || parent == wk.Int || parent == wk.Bool || parent == wk.String
}

fn method(name: Symbol, formals: &[(Symbol, Symbol)], return_type: Symbol) -> Feature {
    Feature::Method(Method {
        name,
        formals: formals
            .iter()
            .map(|&(name, type_decl)| Formal {
                name,
                type_decl,
                line: 0,
            })
            .collect(),
        return_type,
        body: Expression::no_expr(0),
        line: 0,
    })
}

fn attr(name: Symbol, type_decl: Symbol) -> Feature {
    Feature::Attribute(Attribute {
        name,
        type_decl,
        init: Expression::no_expr(0),
        line: 0,
    })
}

fn class(name: Symbol, parent: Symbol, features: Vec<Feature>) -> ClassDecl {
    ClassDecl {
        name,
        parent,
        features,
        filename: BASIC_CLASS_FILENAME.into(),
        line: 0,
    }
}

/// Returns all basic class definitions in installation order:
/// `Object`, `Int`, `IO`, `Bool`, `String`.
pub(crate) fn basic_classes(wk: &WellKnown) -> Vec<ClassDecl> {
    // Object has no parent. abort() halts the program, type_name() returns
    // the dynamic class name, copy() returns a shallow copy.
    let object = class(
        wk.Object,
        wk.No_class,
        vec![
            method(wk.abort, &[], wk.Object),
            method(wk.type_name, &[], wk.String),
            method(wk.copy, &[], wk.SELF_TYPE),
        ],
    );

    // Int and Bool only carry the raw value slot.
    let int = class(wk.Int, wk.Object, vec![attr(wk.val, wk.prim_slot)]);

    let io = class(
        wk.IO,
        wk.Object,
        vec![
            method(wk.out_string, &[(wk.arg, wk.String)], wk.SELF_TYPE),
            method(wk.out_int, &[(wk.arg, wk.Int)], wk.SELF_TYPE),
            method(wk.in_string, &[], wk.String),
            method(wk.in_int, &[], wk.Int),
        ],
    );

    let bool_ = class(wk.Bool, wk.Object, vec![attr(wk.val, wk.prim_slot)]);

    // String stores its length in `_val` and the characters in `_str_field`.
    let string = class(
        wk.String,
        wk.Object,
        vec![
            attr(wk.val, wk.Int),
            attr(wk.str_field, wk.prim_slot),
            method(wk.length, &[], wk.Int),
            method(wk.concat, &[(wk.arg, wk.String)], wk.String),
            method(wk.substr, &[(wk.arg, wk.Int), (wk.arg2, wk.Int)], wk.String),
        ],
    );

    vec![object, int, io, bool_, string]
}
