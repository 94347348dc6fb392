// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shared pre-order expression walker.
//!
//! **DDD Context:** Compilation
//!
//! - [`walk_expression`] visits every node of one expression tree.
//! - [`walk_program`] visits every expression of every feature of every class,
//!   passing the owning class along so callers can report file names.
//!
//! The type checker keeps its own recursive traversal because it threads a
//! scope through the tree; this walker serves read-only consumers such as
//! annotation listings and tests that assert full coverage.

use crate::ast::{ClassDecl, ExprKind, Expression, Feature, Program};

/// Recursively walks an expression tree in pre-order, calling `f` on every node.
pub fn walk_expression<F>(expr: &Expression, f: &mut F)
where
    F: FnMut(&Expression),
{
    f(expr);
    match &expr.kind {
        ExprKind::Assign { value, .. } => walk_expression(value, f),
        ExprKind::Dispatch { receiver, args, .. }
        | ExprKind::StaticDispatch { receiver, args, .. } => {
            walk_expression(receiver, f);
            for arg in args {
                walk_expression(arg, f);
            }
        }
        ExprKind::Cond {
            pred,
            then_branch,
            else_branch,
        } => {
            walk_expression(pred, f);
            walk_expression(then_branch, f);
            walk_expression(else_branch, f);
        }
        ExprKind::Loop { pred, body } => {
            walk_expression(pred, f);
            walk_expression(body, f);
        }
        ExprKind::Case {
            scrutinee,
            branches,
        } => {
            walk_expression(scrutinee, f);
            for branch in branches {
                walk_expression(&branch.body, f);
            }
        }
        ExprKind::Block(body) => {
            for e in body {
                walk_expression(e, f);
            }
        }
        ExprKind::Let { init, body, .. } => {
            walk_expression(init, f);
            walk_expression(body, f);
        }
        ExprKind::Arith { lhs, rhs, .. }
        | ExprKind::Compare { lhs, rhs, .. }
        | ExprKind::Eq { lhs, rhs } => {
            walk_expression(lhs, f);
            walk_expression(rhs, f);
        }
        ExprKind::Neg(operand) | ExprKind::Not(operand) | ExprKind::IsVoid(operand) => {
            walk_expression(operand, f);
        }
        // Leaf nodes.
        ExprKind::IntConst(_)
        | ExprKind::StringConst(_)
        | ExprKind::BoolConst(_)
        | ExprKind::New(_)
        | ExprKind::Identifier(_)
        | ExprKind::NoExpr => {}
    }
}

/// Walks every expression in the program (method bodies and attribute
/// initializers), in source order.
pub fn walk_program<F>(program: &Program, f: &mut F)
where
    F: FnMut(&ClassDecl, &Expression),
{
    for class in &program.classes {
        for feature in &class.features {
            let root = match feature {
                Feature::Method(method) => &method.body,
                Feature::Attribute(attr) => &attr.init,
            };
            walk_expression(root, &mut |expr| f(class, expr));
        }
    }
}
