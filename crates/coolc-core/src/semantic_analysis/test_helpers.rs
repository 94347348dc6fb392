// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shared test helpers for `semantic_analysis` tests.
//!
//! [`TestBuilder`] owns an interner and builds AST nodes from plain strings.
//! Every node defaults to line 1 of `test.cl`; use [`at`] or the `*_at`
//! builders where a test checks reported lines.

use crate::ast::{
    ArithOp, Attribute, CaseBranch, ClassDecl, CompareOp, ExprKind, Expression, Feature, Formal,
    Method,
};
use crate::symbol::{Interner, Symbol, WellKnown};
use std::cell::{Ref, RefCell};

pub const TEST_FILE: &str = "test.cl";

pub struct TestBuilder {
    interner: RefCell<Interner>,
    pub wk: WellKnown,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Moves an expression to `line`.
pub fn at(mut expr: Expression, line: u32) -> Expression {
    expr.line = line;
    expr
}

fn boxed(expr: Expression) -> Box<Expression> {
    Box::new(expr)
}

fn expr(kind: ExprKind) -> Expression {
    Expression::new(kind, 1)
}

impl TestBuilder {
    pub fn new() -> Self {
        let mut interner = Interner::new();
        let wk = WellKnown::new(&mut interner);
        Self {
            interner: RefCell::new(interner),
            wk,
        }
    }

    pub fn sym(&self, name: &str) -> Symbol {
        self.interner.borrow_mut().intern(name)
    }

    pub fn interner(&self) -> Ref<'_, Interner> {
        self.interner.borrow()
    }

    pub fn into_interner(self) -> Interner {
        self.interner.into_inner()
    }

    // --- Declarations ---

    pub fn class(&self, name: &str, parent: &str, features: Vec<Feature>) -> ClassDecl {
        self.class_at(name, parent, features, 1)
    }

    pub fn class_at(&self, name: &str, parent: &str, features: Vec<Feature>, line: u32) -> ClassDecl {
        ClassDecl {
            name: self.sym(name),
            parent: self.sym(parent),
            features,
            filename: TEST_FILE.into(),
            line,
        }
    }

    pub fn method(
        &self,
        name: &str,
        formals: &[(&str, &str)],
        return_type: &str,
        body: Expression,
    ) -> Feature {
        self.method_at(name, formals, return_type, body, 1)
    }

    pub fn method_at(
        &self,
        name: &str,
        formals: &[(&str, &str)],
        return_type: &str,
        body: Expression,
        line: u32,
    ) -> Feature {
        Feature::Method(Method {
            name: self.sym(name),
            formals: formals
                .iter()
                .map(|(name, ty)| Formal {
                    name: self.sym(name),
                    type_decl: self.sym(ty),
                    line,
                })
                .collect(),
            return_type: self.sym(return_type),
            body,
            line,
        })
    }

    pub fn attr(&self, name: &str, type_decl: &str, init: Option<Expression>) -> Feature {
        self.attr_at(name, type_decl, init, 1)
    }

    pub fn attr_at(
        &self,
        name: &str,
        type_decl: &str,
        init: Option<Expression>,
        line: u32,
    ) -> Feature {
        Feature::Attribute(Attribute {
            name: self.sym(name),
            type_decl: self.sym(type_decl),
            init: init.unwrap_or_else(|| Expression::no_expr(line)),
            line,
        })
    }

    /// `class Main { main(): Object { body }; }`
    pub fn main_class(&self, body: Expression) -> ClassDecl {
        self.class("Main", "Object", vec![self.method("main", &[], "Object", body)])
    }

    // --- Expressions ---

    pub fn int(&self, value: i64) -> Expression {
        expr(ExprKind::IntConst(value))
    }

    pub fn string(&self, value: &str) -> Expression {
        expr(ExprKind::StringConst(value.into()))
    }

    pub fn bool_(&self, value: bool) -> Expression {
        expr(ExprKind::BoolConst(value))
    }

    pub fn id(&self, name: &str) -> Expression {
        expr(ExprKind::Identifier(self.sym(name)))
    }

    pub fn new_(&self, ty: &str) -> Expression {
        expr(ExprKind::New(self.sym(ty)))
    }

    pub fn no_expr(&self) -> Expression {
        Expression::no_expr(1)
    }

    pub fn arith(&self, op: ArithOp, lhs: Expression, rhs: Expression) -> Expression {
        expr(ExprKind::Arith {
            op,
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        })
    }

    pub fn plus(&self, lhs: Expression, rhs: Expression) -> Expression {
        self.arith(ArithOp::Add, lhs, rhs)
    }

    pub fn lt(&self, lhs: Expression, rhs: Expression) -> Expression {
        expr(ExprKind::Compare {
            op: CompareOp::Lt,
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        })
    }

    pub fn le(&self, lhs: Expression, rhs: Expression) -> Expression {
        expr(ExprKind::Compare {
            op: CompareOp::Le,
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        })
    }

    pub fn eq(&self, lhs: Expression, rhs: Expression) -> Expression {
        expr(ExprKind::Eq {
            lhs: boxed(lhs),
            rhs: boxed(rhs),
        })
    }

    pub fn neg(&self, operand: Expression) -> Expression {
        expr(ExprKind::Neg(boxed(operand)))
    }

    pub fn not(&self, operand: Expression) -> Expression {
        expr(ExprKind::Not(boxed(operand)))
    }

    pub fn isvoid(&self, operand: Expression) -> Expression {
        expr(ExprKind::IsVoid(boxed(operand)))
    }

    pub fn assign(&self, name: &str, value: Expression) -> Expression {
        expr(ExprKind::Assign {
            name: self.sym(name),
            value: boxed(value),
        })
    }

    pub fn dispatch(&self, receiver: Expression, method: &str, args: Vec<Expression>) -> Expression {
        expr(ExprKind::Dispatch {
            receiver: boxed(receiver),
            method: self.sym(method),
            args,
        })
    }

    /// `method(args)` with an implicit `self` receiver.
    pub fn call(&self, method: &str, args: Vec<Expression>) -> Expression {
        self.dispatch(self.id("self"), method, args)
    }

    pub fn static_dispatch(
        &self,
        receiver: Expression,
        type_name: &str,
        method: &str,
        args: Vec<Expression>,
    ) -> Expression {
        expr(ExprKind::StaticDispatch {
            receiver: boxed(receiver),
            type_name: self.sym(type_name),
            method: self.sym(method),
            args,
        })
    }

    pub fn cond(&self, pred: Expression, then_branch: Expression, else_branch: Expression) -> Expression {
        expr(ExprKind::Cond {
            pred: boxed(pred),
            then_branch: boxed(then_branch),
            else_branch: boxed(else_branch),
        })
    }

    pub fn loop_(&self, pred: Expression, body: Expression) -> Expression {
        expr(ExprKind::Loop {
            pred: boxed(pred),
            body: boxed(body),
        })
    }

    pub fn case(&self, scrutinee: Expression, branches: Vec<CaseBranch>) -> Expression {
        expr(ExprKind::Case {
            scrutinee: boxed(scrutinee),
            branches,
        })
    }

    pub fn branch(&self, name: &str, type_decl: &str, body: Expression) -> CaseBranch {
        CaseBranch {
            name: self.sym(name),
            type_decl: self.sym(type_decl),
            body,
            line: 1,
        }
    }

    pub fn block(&self, body: Vec<Expression>) -> Expression {
        expr(ExprKind::Block(body))
    }

    pub fn let_(&self, name: &str, type_decl: &str, init: Option<Expression>, body: Expression) -> Expression {
        expr(ExprKind::Let {
            name: self.sym(name),
            type_decl: self.sym(type_decl),
            init: boxed(init.unwrap_or_else(|| Expression::no_expr(1))),
            body: boxed(body),
        })
    }
}
