// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type checking for class bodies.
//!
//! **DDD Context:** Semantic Analysis
//!
//! Walks every feature of a user class, infers a static type for each
//! expression and writes it to [`Expression::ty`]. The hierarchy is read-only
//! here; the only outputs are the annotations and pushed diagnostics.
//!
//! **Key design decisions:**
//! - Every rule violation reports one diagnostic and yields a fallback type
//!   (usually `Object`) so the enclosing expression can still be checked
//! - Sub-expressions are always checked, even when the enclosing construct
//!   has already failed, so every node ends up annotated
//! - A declared type that was already reported as undefined is treated as
//!   `Object` from then on, so joins never see a type outside the tree

use super::class_hierarchy::{ClassHierarchy, MethodSignature};
use super::error::{SemanticError, SemanticErrorKind};
use super::scope::{Scope, lookup_object_type};
use crate::ast::{Attribute, CaseBranch, ClassDecl, ExprKind, Expression, Feature, Method};
use crate::diagnostic::{Diagnostics, Location};
use crate::symbol::{Interner, Symbol, WellKnown};
use ecow::EcoString;
use std::collections::HashSet;

/// Type checks every feature of `class`, annotating its expressions.
pub(crate) fn check_class(
    class: &mut ClassDecl,
    hierarchy: &ClassHierarchy,
    interner: &Interner,
    diagnostics: &mut Diagnostics,
) {
    let errors_before = diagnostics.error_count();
    let mut checker = TypeChecker::new(class, hierarchy, interner, diagnostics);
    for feature in &mut class.features {
        checker.scope.push();
        match feature {
            Feature::Method(method) => checker.check_method(method),
            Feature::Attribute(attr) => checker.check_attribute(attr),
        }
        checker.scope.pop();
    }
    tracing::trace!(
        class = interner.resolve(class.name),
        errors = diagnostics.error_count() - errors_before,
        "class checked"
    );
}

/// Type checking domain service for one class.
///
/// **DDD Context:** Semantic Analysis - Domain Service
struct TypeChecker<'a> {
    hierarchy: &'a ClassHierarchy,
    interner: &'a Interner,
    diagnostics: &'a mut Diagnostics,
    wk: WellKnown,
    /// The class being checked; what `SELF_TYPE` stands for.
    current: Symbol,
    filename: EcoString,
    scope: Scope,
}

impl<'a> TypeChecker<'a> {
    fn new(
        class: &ClassDecl,
        hierarchy: &'a ClassHierarchy,
        interner: &'a Interner,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        let wk = *hierarchy.well_known();
        let mut scope = Scope::new();
        scope.define(wk.self_, wk.SELF_TYPE);
        Self {
            hierarchy,
            interner,
            diagnostics,
            wk,
            current: class.name,
            filename: class.filename.clone(),
            scope,
        }
    }

    fn error(&mut self, kind: SemanticErrorKind, line: u32) {
        let location = Location::new(self.filename.clone(), line);
        self.diagnostics.push(SemanticError::new(kind, location).into());
    }

    fn name(&self, sym: Symbol) -> EcoString {
        self.interner.resolve(sym).into()
    }

    /// True for registered classes and `SELF_TYPE`.
    fn is_known_type(&self, ty: Symbol) -> bool {
        ty == self.wk.SELF_TYPE || self.hierarchy.has_class(ty)
    }

    /// Maps an undefined type to `Object`.
    fn sanitize(&self, ty: Symbol) -> Symbol {
        if self.is_known_type(ty) || ty == self.wk.No_type {
            ty
        } else {
            self.wk.Object
        }
    }

    fn conforms(&self, ancestor: Symbol, descendant: Symbol) -> bool {
        self.hierarchy.conforms(self.current, ancestor, descendant)
    }

    fn join(&self, a: Symbol, b: Symbol) -> Symbol {
        self.hierarchy.join(self.current, a, b)
    }

    // --- Features ---

    fn check_attribute(&mut self, attr: &mut Attribute) {
        if attr.name != self.wk.self_
            && self
                .hierarchy
                .get_inherited_attr(self.current, attr.name)
                .is_some()
        {
            self.error(
                SemanticErrorKind::InheritedAttributeRedefinition {
                    attr: self.name(attr.name),
                },
                attr.line,
            );
        }

        let declared = if self.is_known_type(attr.type_decl) {
            attr.type_decl
        } else {
            self.error(
                SemanticErrorKind::UndefinedAttributeType {
                    attr: self.name(attr.name),
                    ty: self.name(attr.type_decl),
                },
                attr.line,
            );
            self.wk.Object
        };

        self.scope.push();
        let init_ty = self.check_expr(&mut attr.init);
        self.scope.pop();

        if !self.conforms(declared, init_ty) {
            self.error(
                SemanticErrorKind::AttributeInitMismatch {
                    attr: self.name(attr.name),
                    declared: self.name(declared),
                    actual: self.name(init_ty),
                },
                attr.line,
            );
        }
    }

    fn check_method(&mut self, method: &mut Method) {
        if let Some(inherited) = self
            .hierarchy
            .get_inherited_method(self.current, method.name)
        {
            if let Some(detail) = self.override_mismatch(method, inherited) {
                self.error(
                    SemanticErrorKind::OverrideSignature {
                        method: self.name(method.name),
                        detail,
                    },
                    method.line,
                );
            }
        }

        let declared = if self.is_known_type(method.return_type) {
            method.return_type
        } else {
            self.error(
                SemanticErrorKind::UndefinedReturnType {
                    method: self.name(method.name),
                    ty: self.name(method.return_type),
                },
                method.line,
            );
            self.wk.Object
        };

        self.scope.push();
        for formal in &method.formals {
            if formal.name == self.wk.self_ {
                self.error(SemanticErrorKind::SelfFormal, formal.line);
                continue;
            }
            if self.scope.probe(formal.name).is_some() {
                self.error(
                    SemanticErrorKind::DuplicateFormal {
                        name: self.name(formal.name),
                    },
                    formal.line,
                );
            }
            let ty = if formal.type_decl != self.wk.SELF_TYPE
                && self.hierarchy.has_class(formal.type_decl)
            {
                formal.type_decl
            } else {
                self.error(
                    SemanticErrorKind::InvalidFormalType {
                        name: self.name(formal.name),
                        ty: self.name(formal.type_decl),
                    },
                    formal.line,
                );
                self.wk.Object
            };
            self.scope.define(formal.name, ty);
        }

        self.scope.push();
        let body_ty = self.check_expr(&mut method.body);
        self.scope.pop();
        self.scope.pop();

        if !self.conforms(declared, body_ty) {
            self.error(
                SemanticErrorKind::ReturnTypeMismatch {
                    method: self.name(method.name),
                    declared: self.name(declared),
                    actual: self.name(body_ty),
                },
                method.line,
            );
        }
    }

    /// Describes the first way `method` fails to repeat `inherited`'s
    /// signature exactly, or `None` if the signatures are identical.
    fn override_mismatch(&self, method: &Method, inherited: &MethodSignature) -> Option<EcoString> {
        if method.formals.len() != inherited.arity() {
            return Some(EcoString::from(format!(
                "number of formal parameters {} is different from original number {}",
                method.formals.len(),
                inherited.arity()
            )));
        }
        for (formal, original) in method.formals.iter().zip(inherited.formal_types()) {
            if formal.type_decl != original {
                return Some(EcoString::from(format!(
                    "parameter type {} is different from original type {}",
                    self.name(formal.type_decl),
                    self.name(original)
                )));
            }
        }
        if method.return_type != inherited.return_type {
            return Some(EcoString::from(format!(
                "return type {} is different from original return type {}",
                self.name(method.return_type),
                self.name(inherited.return_type)
            )));
        }
        None
    }

    // --- Expressions ---

    /// Infers the static type of `expr`, records it on the node and returns it.
    #[allow(clippy::too_many_lines)] // one arm per expression form
    fn check_expr(&mut self, expr: &mut Expression) -> Symbol {
        let line = expr.line;
        let wk = self.wk;
        let ty = match &mut expr.kind {
            ExprKind::Assign { name, value } => {
                let name = *name;
                self.check_assign(name, value, line)
            }

            ExprKind::Dispatch {
                receiver,
                method,
                args,
            } => {
                let method = *method;
                let receiver_ty = self.check_expr(receiver);
                let arg_tys = self.check_args(args);
                if self.hierarchy.has_class(self.dispatch_class(receiver_ty)) {
                    let class = self.dispatch_class(receiver_ty);
                    self.resolve_call(class, method, receiver_ty, &arg_tys, line)
                } else {
                    self.error(
                        SemanticErrorKind::UndefinedDispatchClass {
                            ty: self.name(receiver_ty),
                        },
                        line,
                    );
                    wk.Object
                }
            }

            ExprKind::StaticDispatch {
                receiver,
                type_name,
                method,
                args,
            } => {
                let (type_name, method) = (*type_name, *method);
                let receiver_ty = self.check_expr(receiver);
                let arg_tys = self.check_args(args);
                if type_name == wk.SELF_TYPE || !self.hierarchy.has_class(type_name) {
                    self.error(
                        SemanticErrorKind::InvalidStaticType {
                            ty: self.name(type_name),
                        },
                        line,
                    );
                    wk.Object
                } else if !self.conforms(type_name, receiver_ty) {
                    self.error(
                        SemanticErrorKind::StaticDispatchMismatch {
                            declared: self.name(type_name),
                            actual: self.name(receiver_ty),
                        },
                        line,
                    );
                    wk.Object
                } else {
                    self.resolve_call(type_name, method, receiver_ty, &arg_tys, line)
                }
            }

            ExprKind::Cond {
                pred,
                then_branch,
                else_branch,
            } => {
                self.check_predicate(pred, "if");
                let then_ty = self.check_expr(then_branch);
                let else_ty = self.check_expr(else_branch);
                self.join(then_ty, else_ty)
            }

            ExprKind::Loop { pred, body } => {
                self.check_predicate(pred, "while");
                self.check_expr(body);
                wk.Object
            }

            ExprKind::Case {
                scrutinee,
                branches,
            } => {
                self.check_expr(scrutinee);
                self.check_case(branches)
            }

            ExprKind::Block(body) => body
                .iter_mut()
                .fold(wk.No_type, |_, expr| self.check_expr(expr)),

            ExprKind::Let {
                name,
                type_decl,
                init,
                body,
            } => {
                let (name, type_decl) = (*name, *type_decl);
                self.check_let(name, type_decl, init, body, line)
            }

            ExprKind::Arith { op, lhs, rhs } => {
                let op = op.as_str();
                self.check_int_operands(op, lhs, rhs, line, wk.Int)
            }

            ExprKind::Compare { op, lhs, rhs } => {
                let op = op.as_str();
                self.check_int_operands(op, lhs, rhs, line, wk.Bool)
            }

            ExprKind::Eq { lhs, rhs } => {
                let lhs_ty = self.check_expr(lhs);
                let rhs_ty = self.check_expr(rhs);
                if (wk.is_primitive(lhs_ty) || wk.is_primitive(rhs_ty)) && lhs_ty != rhs_ty {
                    self.error(
                        SemanticErrorKind::IllegalComparison {
                            lhs: self.name(lhs_ty),
                            rhs: self.name(rhs_ty),
                        },
                        line,
                    );
                    wk.Object
                } else {
                    wk.Bool
                }
            }

            ExprKind::Neg(operand) => {
                let operand_ty = self.check_expr(operand);
                if operand_ty == wk.Int {
                    wk.Int
                } else {
                    self.error(
                        SemanticErrorKind::NonIntNegation {
                            actual: self.name(operand_ty),
                        },
                        line,
                    );
                    wk.Object
                }
            }

            ExprKind::Not(operand) => {
                let operand_ty = self.check_expr(operand);
                if operand_ty == wk.Bool {
                    wk.Bool
                } else {
                    self.error(
                        SemanticErrorKind::NonBoolNot {
                            actual: self.name(operand_ty),
                        },
                        line,
                    );
                    wk.Object
                }
            }

            ExprKind::IntConst(_) => wk.Int,
            ExprKind::StringConst(_) => wk.String,
            ExprKind::BoolConst(_) => wk.Bool,

            ExprKind::New(type_name) => {
                let type_name = *type_name;
                if self.is_known_type(type_name) {
                    type_name
                } else {
                    self.error(
                        SemanticErrorKind::UndefinedNewType {
                            ty: self.name(type_name),
                        },
                        line,
                    );
                    wk.Object
                }
            }

            ExprKind::IsVoid(operand) => {
                self.check_expr(operand);
                wk.Bool
            }

            ExprKind::Identifier(name) => {
                let name = *name;
                if name == wk.self_ {
                    wk.SELF_TYPE
                } else if let Some(ty) =
                    lookup_object_type(name, self.current, &self.scope, self.hierarchy)
                {
                    self.sanitize(ty)
                } else {
                    self.error(
                        SemanticErrorKind::UndeclaredIdentifier {
                            name: self.name(name),
                        },
                        line,
                    );
                    wk.Object
                }
            }

            ExprKind::NoExpr => wk.No_type,
        };
        expr.ty = Some(ty);
        ty
    }

    fn check_args(&mut self, args: &mut [Expression]) -> Vec<Symbol> {
        args.iter_mut().map(|arg| self.check_expr(arg)).collect()
    }

    fn check_predicate(&mut self, pred: &mut Expression, construct: &'static str) {
        let line = pred.line;
        if self.check_expr(pred) != self.wk.Bool {
            self.error(SemanticErrorKind::NonBoolPredicate { construct }, line);
        }
    }

    fn check_assign(&mut self, name: Symbol, value: &mut Expression, line: u32) -> Symbol {
        let value_ty = self.check_expr(value);
        if name == self.wk.self_ {
            self.error(SemanticErrorKind::AssignToSelf, line);
            return self.wk.Object;
        }
        let Some(declared) = lookup_object_type(name, self.current, &self.scope, self.hierarchy)
        else {
            self.error(
                SemanticErrorKind::UndeclaredIdentifier {
                    name: self.name(name),
                },
                line,
            );
            return self.wk.Object;
        };
        let declared = self.sanitize(declared);
        if self.conforms(declared, value_ty) {
            value_ty
        } else {
            self.error(
                SemanticErrorKind::AssignMismatch {
                    name: self.name(name),
                    declared: self.name(declared),
                    actual: self.name(value_ty),
                },
                line,
            );
            declared
        }
    }

    /// Class whose method table serves a dispatch on `receiver_ty`.
    fn dispatch_class(&self, receiver_ty: Symbol) -> Symbol {
        if receiver_ty == self.wk.SELF_TYPE {
            self.current
        } else {
            receiver_ty
        }
    }

    /// Resolves `method` on `class` and checks the call's arguments.
    ///
    /// A `SELF_TYPE` return type becomes the receiver's static type.
    fn resolve_call(
        &mut self,
        class: Symbol,
        method: Symbol,
        receiver_ty: Symbol,
        arg_tys: &[Symbol],
        line: u32,
    ) -> Symbol {
        let Some(signature) = self.hierarchy.find_method(class, method) else {
            self.error(
                SemanticErrorKind::UndefinedMethod {
                    method: self.name(method),
                },
                line,
            );
            return self.wk.Object;
        };

        if signature.arity() != arg_tys.len() {
            self.error(
                SemanticErrorKind::ArityMismatch {
                    method: self.name(method),
                    expected: signature.arity(),
                    found: arg_tys.len(),
                },
                line,
            );
            return self.wk.Object;
        }

        let mut args_ok = true;
        for (formal, &actual) in signature.formals.iter().zip(arg_tys) {
            if !self.conforms(formal.type_decl, actual) {
                args_ok = false;
                self.error(
                    SemanticErrorKind::ArgumentMismatch {
                        method: self.name(method),
                        param: self.name(formal.name),
                        expected: self.name(formal.type_decl),
                        actual: self.name(actual),
                    },
                    line,
                );
            }
        }
        if !args_ok {
            return self.wk.Object;
        }

        let return_type = signature.return_type;
        if return_type == self.wk.SELF_TYPE {
            receiver_ty
        } else if self.hierarchy.has_class(return_type) {
            return_type
        } else {
            self.error(
                SemanticErrorKind::UndefinedReturnClass {
                    method: self.name(method),
                    ty: self.name(return_type),
                },
                line,
            );
            self.wk.Object
        }
    }

    fn check_case(&mut self, branches: &mut [CaseBranch]) -> Symbol {
        let mut seen = HashSet::new();
        let mut result = self.wk.No_type;

        for branch in branches {
            if !seen.insert(branch.type_decl) {
                self.error(
                    SemanticErrorKind::DuplicateCaseBranch {
                        ty: self.name(branch.type_decl),
                    },
                    branch.line,
                );
            }

            let defined = self.is_known_type(branch.type_decl);
            if !defined {
                self.error(
                    SemanticErrorKind::UndefinedCaseType {
                        ty: self.name(branch.type_decl),
                    },
                    branch.line,
                );
            }

            self.scope.push();
            if branch.name == self.wk.self_ {
                self.error(SemanticErrorKind::SelfInCaseBranch, branch.line);
            } else {
                let bound = if defined {
                    branch.type_decl
                } else {
                    self.wk.Object
                };
                self.scope.define(branch.name, bound);
            }
            let body_ty = self.check_expr(&mut branch.body);
            self.scope.pop();

            let branch_ty = if defined { body_ty } else { self.wk.Object };
            result = self.join(result, branch_ty);
        }

        result
    }

    fn check_let(
        &mut self,
        name: Symbol,
        type_decl: Symbol,
        init: &mut Expression,
        body: &mut Expression,
        line: u32,
    ) -> Symbol {
        let declared = if self.is_known_type(type_decl) {
            type_decl
        } else {
            self.error(
                SemanticErrorKind::UndefinedLetType {
                    name: self.name(name),
                    ty: self.name(type_decl),
                },
                line,
            );
            self.wk.Object
        };

        if name == self.wk.self_ {
            self.error(SemanticErrorKind::SelfInLet, line);
        }

        let init_ty = self.check_expr(init);
        if !self.conforms(declared, init_ty) {
            self.error(
                SemanticErrorKind::LetInitMismatch {
                    name: self.name(name),
                    declared: self.name(declared),
                    actual: self.name(init_ty),
                },
                line,
            );
        }

        self.scope.push();
        if name != self.wk.self_ {
            self.scope.define(name, declared);
        }
        let body_ty = self.check_expr(body);
        self.scope.pop();
        body_ty
    }

    fn check_int_operands(
        &mut self,
        op: &'static str,
        lhs: &mut Expression,
        rhs: &mut Expression,
        line: u32,
        result: Symbol,
    ) -> Symbol {
        let lhs_ty = self.check_expr(lhs);
        let rhs_ty = self.check_expr(rhs);
        if lhs_ty == self.wk.Int && rhs_ty == self.wk.Int {
            result
        } else {
            self.error(
                SemanticErrorKind::NonIntOperands {
                    op,
                    lhs: self.name(lhs_ty),
                    rhs: self.name(rhs_ty),
                },
                line,
            );
            self.wk.Object
        }
    }
}
