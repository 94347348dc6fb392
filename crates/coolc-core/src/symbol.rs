// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Interned identifiers.
//!
//! **DDD Context:** Shared Kernel
//!
//! Every name in a Cool program (classes, methods, attributes, locals and
//! declared types) is interned once and handled as a [`Symbol`]. Symbols
//! compare by identity of the intern, never by string content, so the
//! semantic passes can key their tables on a `Copy` handle.

use ecow::EcoString;
use std::collections::HashMap;
use std::fmt;

/// An opaque handle to an interned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues [`Symbol`]s and resolves them back to their text.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    map: HashMap<EcoString, Symbol>,
    strings: Vec<EcoString>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `name`, returning the existing symbol if it was seen before.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` distinct names are interned.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.map.get(name) {
            return sym;
        }
        let index = u32::try_from(self.strings.len()).expect("interner overflowed u32 symbols");
        let sym = Symbol(index);
        let owned = EcoString::from(name);
        self.strings.push(owned.clone());
        self.map.insert(owned, sym);
        sym
    }

    /// Looks up a name without interning it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.map.get(name).copied()
    }

    /// Returns the text of a symbol issued by this interner.
    ///
    /// Symbols from a different interner resolve to `"<unknown>"`.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.strings
            .get(sym.0 as usize)
            .map_or("<unknown>", EcoString::as_str)
    }

    /// Returns the number of distinct names interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Predefined names the semantic passes refer to directly.
///
/// Built once per run with [`WellKnown::new`] and passed by reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct WellKnown {
    pub Object: Symbol,
    pub IO: Symbol,
    pub Int: Symbol,
    pub Bool: Symbol,
    pub String: Symbol,
    pub SELF_TYPE: Symbol,
    /// Parent of `Object`; can never name a user class.
    pub No_class: Symbol,
    /// Type of an absent expression; bottom of the conformance relation.
    pub No_type: Symbol,
    pub self_: Symbol,
    pub Main: Symbol,
    pub main: Symbol,
    pub prim_slot: Symbol,
    pub val: Symbol,
    pub str_field: Symbol,
    pub arg: Symbol,
    pub arg2: Symbol,
    pub abort: Symbol,
    pub type_name: Symbol,
    pub copy: Symbol,
    pub out_string: Symbol,
    pub out_int: Symbol,
    pub in_string: Symbol,
    pub in_int: Symbol,
    pub length: Symbol,
    pub concat: Symbol,
    pub substr: Symbol,
}

impl WellKnown {
    /// Interns every predefined name.
    pub fn new(interner: &mut Interner) -> Self {
        Self {
            Object: interner.intern("Object"),
            IO: interner.intern("IO"),
            Int: interner.intern("Int"),
            Bool: interner.intern("Bool"),
            String: interner.intern("String"),
            SELF_TYPE: interner.intern("SELF_TYPE"),
            No_class: interner.intern("_no_class"),
            No_type: interner.intern("_no_type"),
            self_: interner.intern("self"),
            Main: interner.intern("Main"),
            main: interner.intern("main"),
            prim_slot: interner.intern("_prim_slot"),
            val: interner.intern("_val"),
            str_field: interner.intern("_str_field"),
            arg: interner.intern("arg"),
            arg2: interner.intern("arg2"),
            abort: interner.intern("abort"),
            type_name: interner.intern("type_name"),
            copy: interner.intern("copy"),
            out_string: interner.intern("out_string"),
            out_int: interner.intern("out_int"),
            in_string: interner.intern("in_string"),
            in_int: interner.intern("in_int"),
            length: interner.intern("length"),
            concat: interner.intern("concat"),
            substr: interner.intern("substr"),
        }
    }

    /// Returns true for `Int`, `Bool` and `String`, the types compared by value.
    #[must_use]
    pub fn is_primitive(&self, ty: Symbol) -> bool {
        ty == self.Int || ty == self.Bool || ty == self.String
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_returns_same_symbol() {
        let mut interner = Interner::new();
        let a = interner.intern("Counter");
        let b = interner.intern("Counter");
        let c = interner.intern("Point");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn resolve_round_trips_text() {
        let mut interner = Interner::new();
        let sym = interner.intern("out_string");
        assert_eq!(interner.resolve(sym), "out_string");
        assert_eq!(interner.get("out_string"), Some(sym));
        assert_eq!(interner.get("missing"), None);
    }

    #[test]
    fn foreign_symbol_resolves_to_placeholder() {
        let mut big = Interner::new();
        big.intern("a");
        let foreign = big.intern("b");
        let small = Interner::new();
        assert_eq!(small.resolve(foreign), "<unknown>");
    }

    #[test]
    fn well_known_names_are_distinct_from_user_names() {
        let mut interner = Interner::new();
        let wk = WellKnown::new(&mut interner);
        assert_eq!(interner.resolve(wk.SELF_TYPE), "SELF_TYPE");
        assert_eq!(interner.intern("Object"), wk.Object);
        assert_ne!(interner.intern("Foo"), wk.Object);
        assert!(wk.is_primitive(wk.Int));
        assert!(wk.is_primitive(wk.String));
        assert!(!wk.is_primitive(wk.IO));
    }
}
