// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Static class hierarchy and per-class member tables.
//!
//! **DDD Context:** Semantic Analysis
//!
//! The hierarchy is an explicit adjacency map keyed by class name: each
//! [`ClassInfo`] records its parent's *name*, never a reference to the parent
//! node, so every traversal is a sequence of map lookups. It is consumed by:
//! - **Declaration pass**: method and attribute tables per class
//! - **Type checker**: conformance, joins, inherited member lookup
//! - **Later phases**: the finished table is returned with the analysis result
//!
//! The hierarchy uses single inheritance rooted at `Object`. The tree
//! invariant (no cycles, one parent each) is enforced incrementally by
//! [`ClassHierarchy::register`].

use crate::ast::{ClassDecl, Formal, Program};
use crate::diagnostic::{Diagnostics, Location};
use crate::semantic_analysis::declarations;
use crate::semantic_analysis::error::{SemanticError, SemanticErrorKind};
use crate::symbol::{Interner, Symbol, WellKnown};
use ecow::EcoString;
use std::collections::{HashMap, HashSet};

pub(crate) mod builtins;
mod lattice;

/// Signature of a method as recorded by the declaration pass.
///
/// **DDD Context:** Semantic Analysis, Value Object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: Symbol,
    /// Formal parameters in declaration order.
    pub formals: Vec<Formal>,
    pub return_type: Symbol,
    /// Class that declares this method.
    pub defined_in: Symbol,
    pub line: u32,
}

impl MethodSignature {
    /// Number of formal parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.formals.len()
    }

    /// Declared formal types in order.
    pub fn formal_types(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.formals.iter().map(|formal| formal.type_decl)
    }
}

/// Information about a class in the hierarchy.
///
/// **DDD Context:** Semantic Analysis, Value Object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: Symbol,
    /// Parent class name (`No_class` for `Object`). May name a class that was
    /// never declared; the driver reports those after registration.
    pub parent: Symbol,
    /// Methods declared directly on this class.
    pub methods: HashMap<Symbol, MethodSignature>,
    /// Attributes declared directly on this class (name → declared type).
    pub attributes: HashMap<Symbol, Symbol>,
    pub filename: EcoString,
    pub line: u32,
}

/// Static class hierarchy built during semantic analysis.
///
/// Populated once by [`ClassHierarchy::build`]; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHierarchy {
    classes: HashMap<Symbol, ClassInfo>,
    /// Class names in registration order (basic classes first).
    order: Vec<Symbol>,
    well_known: WellKnown,
}

impl ClassHierarchy {
    /// Build a class hierarchy from the basic classes and a parsed program.
    ///
    /// Basic classes are installed first, then every user class is registered
    /// and immediately has its features declared. The first structural error
    /// (invalid name or parent, redefinition, cycle) stops registration: later
    /// classes are not added because their position in the tree is unreliable.
    #[must_use]
    pub fn build(
        program: &Program,
        well_known: &WellKnown,
        interner: &Interner,
    ) -> (Self, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let mut hierarchy = Self::with_builtins(well_known, interner, &mut diagnostics);

        for class in &program.classes {
            if let Err(kind) = hierarchy.register(class, interner) {
                tracing::debug!(
                    class = interner.resolve(class.name),
                    "class registration stopped"
                );
                diagnostics.push(
                    SemanticError::new(kind, Location::new(class.filename.clone(), class.line))
                        .into(),
                );
                break;
            }
            declarations::declare_features(&mut hierarchy, class, interner, &mut diagnostics);
        }

        tracing::debug!(
            classes = hierarchy.order.len(),
            errors = diagnostics.error_count(),
            "class hierarchy built"
        );
        (hierarchy, diagnostics)
    }

    /// Create a hierarchy holding only the basic classes.
    #[must_use]
    pub fn with_builtins(
        well_known: &WellKnown,
        interner: &Interner,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut hierarchy = Self {
            classes: HashMap::new(),
            order: Vec::new(),
            well_known: *well_known,
        };
        for class in builtins::basic_classes(well_known) {
            hierarchy.add_inheritance(&class);
            declarations::declare_features(&mut hierarchy, &class, interner, diagnostics);
        }
        hierarchy
    }

    /// Adds a user class's parent edge, rejecting anything that would break
    /// the tree invariant.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule: a reserved class name, a parent that
    /// may not be extended (`SELF_TYPE`, `Int`, `Bool`, `String`), a
    /// redefinition, or an edge that closes a cycle.
    pub fn register(
        &mut self,
        class: &ClassDecl,
        interner: &Interner,
    ) -> Result<(), SemanticErrorKind> {
        let wk = self.well_known;
        let (name, parent) = (class.name, class.parent);

        if builtins::is_reserved_class_name(&wk, name) {
            return Err(SemanticErrorKind::InvalidClassName {
                name: interner.resolve(name).into(),
            });
        }
        if builtins::is_sealed_parent(&wk, parent) {
            return Err(SemanticErrorKind::InvalidParentClass {
                class: interner.resolve(name).into(),
                parent: interner.resolve(parent).into(),
            });
        }
        if self.has_class(name) {
            return Err(SemanticErrorKind::ClassRedefinition {
                name: interner.resolve(name).into(),
            });
        }
        if self.would_create_cycle(name, parent) {
            return Err(SemanticErrorKind::CircularInheritance {
                class: interner.resolve(name).into(),
            });
        }

        self.add_inheritance(class);
        Ok(())
    }

    /// Returns true if making `parent` the parent of `child` closes a cycle,
    /// i.e. `child` already appears on `parent`'s ancestor chain.
    fn would_create_cycle(&self, child: Symbol, parent: Symbol) -> bool {
        child == parent || self.superclass_chain(parent).contains(&child)
    }

    fn add_inheritance(&mut self, class: &ClassDecl) {
        debug_assert!(!self.classes.contains_key(&class.name));
        self.order.push(class.name);
        self.classes.insert(
            class.name,
            ClassInfo {
                name: class.name,
                parent: class.parent,
                methods: HashMap::new(),
                attributes: HashMap::new(),
                filename: class.filename.clone(),
                line: class.line,
            },
        );
    }

    /// The predefined names this hierarchy was built with.
    #[must_use]
    pub fn well_known(&self) -> &WellKnown {
        &self.well_known
    }

    /// Check if a class exists in the hierarchy.
    #[must_use]
    pub fn has_class(&self, name: Symbol) -> bool {
        self.classes.contains_key(&name)
    }

    /// Look up a class by name.
    #[must_use]
    pub fn get_class(&self, name: Symbol) -> Option<&ClassInfo> {
        self.classes.get(&name)
    }

    /// Returns the declared parent of a registered class.
    #[must_use]
    pub fn parent_of(&self, name: Symbol) -> Option<Symbol> {
        self.classes.get(&name).map(|info| info.parent)
    }

    /// Class names in registration order.
    pub fn class_names(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.order.iter().copied()
    }

    /// Every `(child, parent)` edge in registration order.
    pub fn parent_edges(&self) -> impl Iterator<Item = (Symbol, Symbol)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.classes.get(name).map(|info| (info.name, info.parent)))
    }

    /// Returns the ordered superclass chain for a class (excluding the class
    /// itself), nearest parent first. The chain of `Object` is empty.
    ///
    /// A parent that is not (yet) registered ends the chain but is still
    /// included, so cycle detection sees edges to classes declared later.
    ///
    /// Handles cycles gracefully by tracking visited classes.
    #[must_use]
    pub fn superclass_chain(&self, class_name: Symbol) -> Vec<Symbol> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([class_name]);
        let mut current = class_name;

        while let Some(info) = self.classes.get(&current) {
            let parent = info.parent;
            if parent == self.well_known.No_class || !visited.insert(parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }

        chain
    }

    /// Exact lookup of a method declared directly on `class_name`.
    #[must_use]
    pub fn get_method(&self, class_name: Symbol, method: Symbol) -> Option<&MethodSignature> {
        self.classes.get(&class_name)?.methods.get(&method)
    }

    /// Finds `method` on the nearest strict ancestor of `class_name`.
    ///
    /// The search starts at the parent, never the class itself.
    #[must_use]
    pub fn get_inherited_method(
        &self,
        class_name: Symbol,
        method: Symbol,
    ) -> Option<&MethodSignature> {
        self.registered_ancestors(class_name)
            .find_map(|ancestor| self.get_method(ancestor, method))
    }

    /// Finds `method` on `class_name` itself or its nearest ancestor.
    #[must_use]
    pub fn find_method(&self, class_name: Symbol, method: Symbol) -> Option<&MethodSignature> {
        self.get_method(class_name, method)
            .or_else(|| self.get_inherited_method(class_name, method))
    }

    /// Exact lookup of an attribute declared directly on `class_name`.
    #[must_use]
    pub fn get_attr(&self, class_name: Symbol, attr: Symbol) -> Option<Symbol> {
        self.classes.get(&class_name)?.attributes.get(&attr).copied()
    }

    /// Finds `attr` on the nearest strict ancestor of `class_name`.
    #[must_use]
    pub fn get_inherited_attr(&self, class_name: Symbol, attr: Symbol) -> Option<Symbol> {
        self.registered_ancestors(class_name)
            .find_map(|ancestor| self.get_attr(ancestor, attr))
    }

    /// Records a method signature, replacing any earlier one of the same name.
    ///
    /// Returns the replaced signature.
    pub fn add_method(
        &mut self,
        class_name: Symbol,
        signature: MethodSignature,
    ) -> Option<MethodSignature> {
        self.classes
            .get_mut(&class_name)?
            .methods
            .insert(signature.name, signature)
    }

    /// Records an attribute's declared type, replacing any earlier one.
    ///
    /// Returns the replaced type.
    pub fn add_attribute(
        &mut self,
        class_name: Symbol,
        attr: Symbol,
        type_decl: Symbol,
    ) -> Option<Symbol> {
        self.classes
            .get_mut(&class_name)?
            .attributes
            .insert(attr, type_decl)
    }

    /// Registered strict ancestors, nearest first.
    fn registered_ancestors(&self, class_name: Symbol) -> impl Iterator<Item = Symbol> + '_ {
        self.superclass_chain(class_name)
            .into_iter()
            .filter(|name| self.classes.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic_analysis::test_helpers::TestBuilder;

    fn build(b: &TestBuilder, classes: Vec<ClassDecl>) -> (ClassHierarchy, Diagnostics) {
        let program = Program::new(classes);
        let interner = b.interner();
        ClassHierarchy::build(&program, &b.wk, &interner)
    }

    // --- Basic classes ---

    #[test]
    fn builtins_form_two_level_tree() {
        let b = TestBuilder::new();
        let (h, diags) = build(&b, vec![]);
        assert!(diags.is_empty());
        let wk = b.wk;
        assert_eq!(h.parent_of(wk.Object), Some(wk.No_class));
        for basic in [wk.IO, wk.Int, wk.Bool, wk.String] {
            assert_eq!(h.parent_of(basic), Some(wk.Object));
        }
        assert!(!h.has_class(wk.SELF_TYPE));
        assert!(!h.has_class(wk.No_class));
    }

    #[test]
    fn builtin_method_tables() {
        let b = TestBuilder::new();
        let (h, _) = build(&b, vec![]);
        let wk = b.wk;
        let copy = h.get_method(wk.Object, wk.copy).unwrap();
        assert_eq!(copy.return_type, wk.SELF_TYPE);
        let substr = h.get_method(wk.String, wk.substr).unwrap();
        assert_eq!(substr.formal_types().collect::<Vec<_>>(), vec![wk.Int, wk.Int]);
        assert!(h.get_method(wk.IO, wk.copy).is_none(), "get_method is exact");
        assert_eq!(h.find_method(wk.IO, wk.copy).unwrap().defined_in, wk.Object);
        assert_eq!(h.get_attr(wk.String, wk.val), Some(wk.Int));
    }

    // --- Registration ---

    #[test]
    fn user_class_registered_under_parent() {
        let b = TestBuilder::new();
        let a = b.class("A", "Object", vec![]);
        let bb = b.class("B", "A", vec![]);
        let (h, diags) = build(&b, vec![a, bb]);
        assert!(diags.is_empty());
        assert_eq!(
            h.superclass_chain(b.sym("B")),
            vec![b.sym("A"), b.wk.Object]
        );
        assert_eq!(h.class_names().count(), 7);
    }

    #[test]
    fn reserved_class_names_rejected() {
        for reserved in ["Int", "Bool", "String", "SELF_TYPE", "Object", "IO"] {
            let b = TestBuilder::new();
            let (_, diags) = build(&b, vec![b.class(reserved, "Object", vec![])]);
            assert_eq!(diags.error_count(), 1, "{reserved} should be rejected");
            assert!(diags.as_slice()[0].message.contains("basic class"));
        }
    }

    #[test]
    fn sealed_parents_rejected() {
        for parent in ["Int", "Bool", "String", "SELF_TYPE"] {
            let b = TestBuilder::new();
            let (_, diags) = build(&b, vec![b.class("A", parent, vec![])]);
            assert_eq!(diags.error_count(), 1, "inheriting {parent} should fail");
            assert!(diags.as_slice()[0].message.contains("cannot inherit"));
        }
    }

    #[test]
    fn object_and_io_parents_accepted() {
        let b = TestBuilder::new();
        let (h, diags) = build(
            &b,
            vec![b.class("A", "Object", vec![]), b.class("B", "IO", vec![])],
        );
        assert!(diags.is_empty());
        assert!(h.has_class(b.sym("A")));
        assert!(h.has_class(b.sym("B")));
    }

    #[test]
    fn redefinition_rejected_and_stops_registration() {
        let b = TestBuilder::new();
        let (h, diags) = build(
            &b,
            vec![
                b.class("A", "Object", vec![]),
                b.class("A", "IO", vec![]),
                b.class("C", "Object", vec![]),
            ],
        );
        assert_eq!(diags.error_count(), 1);
        assert!(diags.as_slice()[0].message.contains("previously defined"));
        assert_eq!(h.parent_of(b.sym("A")), Some(b.wk.Object));
        assert!(!h.has_class(b.sym("C")));
    }

    #[test]
    fn self_inheritance_rejected() {
        let b = TestBuilder::new();
        let (h, diags) = build(&b, vec![b.class("A", "A", vec![])]);
        assert_eq!(diags.error_count(), 1);
        assert!(diags.as_slice()[0].message.contains("inheritance cycle"));
        assert!(!h.has_class(b.sym("A")));
    }

    #[test]
    fn two_class_cycle_rejected() {
        let b = TestBuilder::new();
        let (_, diags) = build(
            &b,
            vec![b.class("A", "B", vec![]), b.class("B", "A", vec![])],
        );
        assert_eq!(diags.error_count(), 1);
        assert!(diags.as_slice()[0].message.starts_with("Class B"));
    }

    #[test]
    fn long_chain_accepted() {
        let b = TestBuilder::new();
        let mut classes = vec![b.class("C0", "Object", vec![])];
        for i in 1..20 {
            classes.push(b.class(&format!("C{i}"), &format!("C{}", i - 1), vec![]));
        }
        let (h, diags) = build(&b, classes);
        assert!(diags.is_empty());
        assert_eq!(h.superclass_chain(b.sym("C19")).len(), 20);
    }

    #[test]
    fn undefined_parent_is_recorded_not_rejected() {
        let b = TestBuilder::new();
        let (h, diags) = build(&b, vec![b.class("A", "Missing", vec![])]);
        assert!(diags.is_empty());
        assert_eq!(h.parent_of(b.sym("A")), Some(b.sym("Missing")));
        assert_eq!(h.superclass_chain(b.sym("A")), vec![b.sym("Missing")]);
    }

    // --- Inherited lookup ---

    #[test]
    fn inherited_lookup_skips_the_class_itself() {
        let b = TestBuilder::new();
        let a = b.class(
            "A",
            "Object",
            vec![
                b.method("f", &[], "Int", b.int(1)),
                b.attr("x", "Int", None),
            ],
        );
        let bb = b.class(
            "B",
            "A",
            vec![b.method("f", &[], "Int", b.int(2))],
        );
        let (h, diags) = build(&b, vec![a, bb]);
        assert!(diags.is_empty());
        let f = b.sym("f");
        assert_eq!(h.get_method(b.sym("B"), f).unwrap().defined_in, b.sym("B"));
        assert_eq!(
            h.get_inherited_method(b.sym("B"), f).unwrap().defined_in,
            b.sym("A")
        );
        assert!(h.get_inherited_method(b.sym("A"), f).is_none());
        assert_eq!(h.get_inherited_attr(b.sym("B"), b.sym("x")), Some(b.wk.Int));
        assert_eq!(h.get_attr(b.sym("B"), b.sym("x")), None);
    }

    #[test]
    fn nearest_ancestor_shadows_farther_ones() {
        let b = TestBuilder::new();
        let a = b.class("A", "Object", vec![b.attr("x", "Int", None)]);
        let bb = b.class("B", "A", vec![b.attr("x", "String", None)]);
        let c = b.class("C", "B", vec![]);
        let (h, _) = build(&b, vec![a, bb, c]);
        assert_eq!(
            h.get_inherited_attr(b.sym("C"), b.sym("x")),
            Some(b.wk.String)
        );
    }
}
