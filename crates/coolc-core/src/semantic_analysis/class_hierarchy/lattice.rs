// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Conformance and least-upper-bound over the class tree.
//!
//! **DDD Context:** Semantic Analysis
//!
//! Both operations take the class currently being checked so that
//! `SELF_TYPE` can stand for it where a concrete comparison is needed.

use super::ClassHierarchy;
use crate::symbol::Symbol;
use std::collections::HashSet;

impl ClassHierarchy {
    /// Returns true if a value of static type `descendant` may be used where
    /// `ancestor` is declared, inside class `current`.
    ///
    /// - `No_type` conforms to everything.
    /// - A declared `SELF_TYPE` only accepts `SELF_TYPE` itself.
    /// - A `SELF_TYPE` value is treated as `current`.
    /// - Otherwise `ancestor` must be `descendant` or on its superclass chain.
    #[must_use]
    pub fn conforms(&self, current: Symbol, ancestor: Symbol, descendant: Symbol) -> bool {
        let wk = &self.well_known;
        if descendant == wk.No_type {
            return true;
        }
        if ancestor == wk.SELF_TYPE {
            return descendant == wk.SELF_TYPE;
        }
        if descendant == wk.SELF_TYPE {
            return self.conforms(current, ancestor, current);
        }
        ancestor == descendant || self.superclass_chain(descendant).contains(&ancestor)
    }

    /// Least common ancestor of `a` and `b` inside class `current`.
    ///
    /// `No_type` is the identity; two identical types join to themselves
    /// (so two `SELF_TYPE` branches stay `SELF_TYPE`); any other `SELF_TYPE`
    /// operand is replaced by `current` first.
    ///
    /// # Panics
    ///
    /// Panics if the two types share no ancestor, which only happens when a
    /// type outside the class tree is passed in.
    #[must_use]
    pub fn join(&self, current: Symbol, a: Symbol, b: Symbol) -> Symbol {
        let wk = &self.well_known;
        if a == wk.No_type {
            return b;
        }
        if b == wk.No_type || a == b {
            return a;
        }

        let resolve = |ty: Symbol| if ty == wk.SELF_TYPE { current } else { ty };
        let (a, b) = (resolve(a), resolve(b));

        let a_chain: HashSet<Symbol> = self.ancestors_inclusive(a).into_iter().collect();
        self.ancestors_inclusive(b)
            .into_iter()
            .find(|ty| a_chain.contains(ty))
            .unwrap_or_else(|| {
                panic!("no common ancestor for {a} and {b}: type outside the class tree")
            })
    }

    /// `ty` followed by its superclass chain, restricted to registered classes.
    fn ancestors_inclusive(&self, ty: Symbol) -> Vec<Symbol> {
        if !self.has_class(ty) {
            return Vec::new();
        }
        std::iter::once(ty)
            .chain(
                self.superclass_chain(ty)
                    .into_iter()
                    .filter(|name| self.has_class(*name)),
            )
            .collect()
    }
}
