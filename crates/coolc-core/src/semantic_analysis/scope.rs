// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Scope tracking for type checking.
//!
//! Scopes are organized hierarchically:
//! - Class (depth 0): `self : SELF_TYPE`
//! - Feature (depth 1): formals of a method
//! - Expression (depth 2+): `let` bindings and `case` branches
//!
//! **DDD Context:** Semantic Analysis

use super::class_hierarchy::ClassHierarchy;
use crate::symbol::Symbol;
use std::collections::HashMap;

/// Maps identifiers to their declared types across nested scopes.
#[derive(Debug, Clone)]
pub struct Scope {
    levels: Vec<HashMap<Symbol, Symbol>>,
}

impl Scope {
    /// Creates a scope with a single, empty outermost level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: vec![HashMap::new()],
        }
    }

    /// Enters a new nested scope.
    pub fn push(&mut self) {
        self.levels.push(HashMap::new());
    }

    /// Exits the current scope.
    ///
    /// Returns `false` (and does nothing) at the outermost level.
    pub fn pop(&mut self) -> bool {
        if self.levels.len() > 1 {
            self.levels.pop();
            true
        } else {
            false
        }
    }

    /// Binds `name` in the innermost scope, shadowing any outer binding.
    pub fn define(&mut self, name: Symbol, ty: Symbol) {
        if let Some(level) = self.levels.last_mut() {
            level.insert(name, ty);
        }
    }

    /// Looks up `name` from innermost to outermost scope.
    #[must_use]
    pub fn lookup(&self, name: Symbol) -> Option<Symbol> {
        self.levels
            .iter()
            .rev()
            .find_map(|level| level.get(&name).copied())
    }

    /// Looks up `name` in the innermost scope only.
    #[must_use]
    pub fn probe(&self, name: Symbol) -> Option<Symbol> {
        self.levels.last()?.get(&name).copied()
    }

    /// Current nesting depth (0 = outermost).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the declared type of an identifier inside `class`.
///
/// Local bindings win, then attributes declared on `class`, then the nearest
/// inherited attribute.
#[must_use]
pub fn lookup_object_type(
    name: Symbol,
    class: Symbol,
    scope: &Scope,
    hierarchy: &ClassHierarchy,
) -> Option<Symbol> {
    scope
        .lookup(name)
        .or_else(|| hierarchy.get_attr(class, name))
        .or_else(|| hierarchy.get_inherited_attr(class, name))
}
