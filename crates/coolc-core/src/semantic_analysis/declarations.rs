// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration pass: records each class's methods and attributes.
//!
//! **DDD Context:** Semantic Analysis
//!
//! Runs once per class right after it is registered, so every class's tables
//! exist before any method body is type checked. Only duplicates within one
//! class are reported here; conflicts with inherited members need the whole
//! tree and are checked by the type checker.

use super::class_hierarchy::{ClassHierarchy, MethodSignature};
use super::error::{SemanticError, SemanticErrorKind};
use crate::ast::{ClassDecl, Feature};
use crate::diagnostic::{Diagnostics, Location};
use crate::symbol::Interner;

/// Declares every feature of `class` in the hierarchy's member tables.
///
/// A repeated method name is reported and the later declaration replaces the
/// earlier one. A repeated attribute name, or an attribute called `self`, is
/// reported and the attribute is still recorded.
pub(crate) fn declare_features(
    hierarchy: &mut ClassHierarchy,
    class: &ClassDecl,
    interner: &Interner,
    diagnostics: &mut Diagnostics,
) {
    let self_ = hierarchy.well_known().self_;
    let at = |line: u32| Location::new(class.filename.clone(), line);

    for feature in &class.features {
        let location = at(feature.line());
        match feature {
            Feature::Method(method) => {
                if hierarchy.get_method(class.name, method.name).is_some() {
                    diagnostics.push(
                        SemanticError::new(
                            SemanticErrorKind::MethodRedefinition {
                                class: interner.resolve(class.name).into(),
                                method: interner.resolve(method.name).into(),
                            },
                            location,
                        )
                        .into(),
                    );
                }
                hierarchy.add_method(
                    class.name,
                    MethodSignature {
                        name: method.name,
                        formals: method.formals.clone(),
                        return_type: method.return_type,
                        defined_in: class.name,
                        line: method.line,
                    },
                );
            }
            Feature::Attribute(attr) => {
                if attr.name == self_ {
                    diagnostics.push(
                        SemanticError::new(SemanticErrorKind::SelfAttribute, location).into(),
                    );
                } else if hierarchy.get_attr(class.name, attr.name).is_some() {
                    diagnostics.push(
                        SemanticError::new(
                            SemanticErrorKind::AttributeRedefinition {
                                class: interner.resolve(class.name).into(),
                                attr: interner.resolve(attr.name).into(),
                            },
                            location,
                        )
                        .into(),
                    );
                }
                hierarchy.add_attribute(class.name, attr.name, attr.type_decl);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Program;
    use crate::semantic_analysis::class_hierarchy::ClassHierarchy;
    use crate::semantic_analysis::test_helpers::TestBuilder;

    #[test]
    fn duplicate_method_reported_and_last_wins() {
        let b = TestBuilder::new();
        let program = Program::new(vec![b.class(
            "A",
            "Object",
            vec![
                b.method("f", &[], "Int", b.int(1)),
                b.method_at("f", &[("x", "Int")], "String", b.string("s"), 9),
            ],
        )]);
        let (h, diags) = ClassHierarchy::build(&program, &b.wk, &b.interner());
        assert_eq!(diags.error_count(), 1);
        let diag = &diags.as_slice()[0];
        assert_eq!(diag.message, "Method f is multiply defined in class A");
        assert_eq!(diag.location.as_ref().unwrap().line, 9);
        let sig = h.get_method(b.sym("A"), b.sym("f")).unwrap();
        assert_eq!(sig.arity(), 1);
        assert_eq!(sig.return_type, b.wk.String);
    }

    #[test]
    fn duplicate_attribute_reported() {
        let b = TestBuilder::new();
        let program = Program::new(vec![b.class(
            "A",
            "Object",
            vec![b.attr("x", "Int", None), b.attr("x", "Bool", None)],
        )]);
        let (_, diags) = ClassHierarchy::build(&program, &b.wk, &b.interner());
        assert_eq!(diags.error_count(), 1);
        assert!(diags.as_slice()[0].message.contains("multiply defined"));
    }

    #[test]
    fn self_attribute_reported() {
        let b = TestBuilder::new();
        let program = Program::new(vec![b.class(
            "A",
            "Object",
            vec![b.attr("self", "A", None)],
        )]);
        let (_, diags) = ClassHierarchy::build(&program, &b.wk, &b.interner());
        assert_eq!(diags.error_count(), 1);
        assert_eq!(
            diags.as_slice()[0].message,
            "'self' cannot be the name of an attribute"
        );
    }

    #[test]
    fn method_and_attribute_may_share_a_name() {
        let b = TestBuilder::new();
        let program = Program::new(vec![b.class(
            "A",
            "Object",
            vec![
                b.attr("size", "Int", None),
                b.method("size", &[], "Int", b.id("size")),
            ],
        )]);
        let (h, diags) = ClassHierarchy::build(&program, &b.wk, &b.interner());
        assert!(diags.is_empty());
        assert!(h.get_method(b.sym("A"), b.sym("size")).is_some());
        assert_eq!(h.get_attr(b.sym("A"), b.sym("size")), Some(b.wk.Int));
    }

    #[test]
    fn methods_record_declaring_class() {
        let b = TestBuilder::new();
        let program = Program::new(vec![
            b.class("A", "IO", vec![b.method("f", &[], "Object", b.int(0))]),
        ]);
        let (h, _) = ClassHierarchy::build(&program, &b.wk, &b.interner());
        assert_eq!(h.get_method(b.sym("A"), b.sym("f")).unwrap().defined_in, b.sym("A"));
    }
}
