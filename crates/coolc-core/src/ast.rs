// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Cool programs.
//!
//! The tree is produced by the parser (outside this crate) and handed to
//! [`semantic_analysis::analyse`](crate::semantic_analysis::analyse), which
//! never restructures it: the only mutation is filling in
//! [`Expression::ty`] on every expression node.
//!
//! All names are interned [`Symbol`]s. Every node carries the source line it
//! came from; the file name lives on the enclosing [`ClassDecl`].
//!
//! # Example
//!
//! ```ignore
//! // Source: class Main inherits IO { main(): Object { out_int(1 + 2) }; };
//! ClassDecl {
//!     name: Main,
//!     parent: IO,
//!     features: vec![Feature::Method(Method {
//!         name: main,
//!         formals: vec![],
//!         return_type: Object,
//!         body: Expression::new(ExprKind::Dispatch {
//!             receiver: Box::new(Expression::new(ExprKind::Identifier(self_), 1)),
//!             method: out_int,
//!             args: vec![/* 1 + 2 */],
//!         }, 1),
//!         line: 1,
//!     })],
//!     ..
//! }
//! ```

use crate::symbol::Symbol;
use ecow::EcoString;

/// A whole program: every class declared across all input files.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Classes in source order.
    pub classes: Vec<ClassDecl>,
}

impl Program {
    /// Creates a program from its classes.
    #[must_use]
    pub fn new(classes: Vec<ClassDecl>) -> Self {
        Self { classes }
    }
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Symbol,
    /// Declared parent; the parser fills in `Object` when `inherits` is omitted.
    pub parent: Symbol,
    /// Attributes and methods in declaration order.
    pub features: Vec<Feature>,
    /// Source file this class was read from.
    pub filename: EcoString,
    pub line: u32,
}

impl ClassDecl {
    /// Iterates over the methods of this class in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.features.iter().filter_map(|feature| match feature {
            Feature::Method(method) => Some(method),
            Feature::Attribute(_) => None,
        })
    }

    /// Iterates over the attributes of this class in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.features.iter().filter_map(|feature| match feature {
            Feature::Attribute(attr) => Some(attr),
            Feature::Method(_) => None,
        })
    }
}

/// A class member.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Method(Method),
    Attribute(Attribute),
}

impl Feature {
    /// Returns the source line of the member.
    #[must_use]
    pub fn line(&self) -> u32 {
        match self {
            Self::Method(method) => method.line,
            Self::Attribute(attr) => attr.line,
        }
    }
}

/// A method definition: `name(formals): return_type { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: Symbol,
    pub formals: Vec<Formal>,
    pub return_type: Symbol,
    pub body: Expression,
    pub line: u32,
}

/// A formal parameter: `name : type_decl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formal {
    pub name: Symbol,
    pub type_decl: Symbol,
    pub line: u32,
}

/// An attribute: `name : type_decl [<- init]`.
///
/// A missing initializer is represented by [`ExprKind::NoExpr`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Symbol,
    pub type_decl: Symbol,
    pub init: Expression,
    pub line: u32,
}

/// One `name : type_decl => body` arm of a `case` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    pub name: Symbol,
    pub type_decl: Symbol,
    pub body: Expression,
    pub line: u32,
}

/// Integer arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    /// The operator as written in source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Integer ordering operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
}

impl CompareOp {
    /// The operator as written in source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

/// An expression node together with its static type annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub line: u32,
    /// Static type inferred by the type checker; `None` until checked.
    pub ty: Option<Symbol>,
}

impl Expression {
    /// Creates an unannotated expression.
    #[must_use]
    pub fn new(kind: ExprKind, line: u32) -> Self {
        Self {
            kind,
            line,
            ty: None,
        }
    }

    /// Creates the placeholder for an absent initializer.
    #[must_use]
    pub fn no_expr(line: u32) -> Self {
        Self::new(ExprKind::NoExpr, line)
    }

    /// Returns true if this is the absent-expression placeholder.
    #[must_use]
    pub fn is_no_expr(&self) -> bool {
        matches!(self.kind, ExprKind::NoExpr)
    }
}

/// The closed set of Cool expression forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `name <- value`
    Assign { name: Symbol, value: Box<Expression> },

    /// `receiver.method(args)`, or `method(args)` with an implicit `self`.
    Dispatch {
        receiver: Box<Expression>,
        method: Symbol,
        args: Vec<Expression>,
    },

    /// `receiver@type_name.method(args)`
    StaticDispatch {
        receiver: Box<Expression>,
        type_name: Symbol,
        method: Symbol,
        args: Vec<Expression>,
    },

    /// `if pred then then_branch else else_branch fi`
    Cond {
        pred: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },

    /// `while pred loop body pool`
    Loop {
        pred: Box<Expression>,
        body: Box<Expression>,
    },

    /// `case scrutinee of branches esac`
    Case {
        scrutinee: Box<Expression>,
        branches: Vec<CaseBranch>,
    },

    /// `{ e1; e2; ... }`; never empty.
    Block(Vec<Expression>),

    /// `let name : type_decl [<- init] in body`
    Let {
        name: Symbol,
        type_decl: Symbol,
        init: Box<Expression>,
        body: Box<Expression>,
    },

    /// `lhs op rhs` for `+ - * /`
    Arith {
        op: ArithOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },

    /// `lhs op rhs` for `< <=`
    Compare {
        op: CompareOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },

    /// `lhs = rhs`
    Eq {
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },

    /// `~operand`
    Neg(Box<Expression>),

    /// `not operand`
    Not(Box<Expression>),

    IntConst(i64),
    StringConst(EcoString),
    BoolConst(bool),

    /// `new type_name`
    New(Symbol),

    /// `isvoid operand`
    IsVoid(Box<Expression>),

    /// A reference to a local, formal, attribute or `self`.
    Identifier(Symbol),

    /// An absent expression (e.g. a `let` or attribute without initializer).
    NoExpr,
}

impl ExprKind {
    /// Short lowercase name of the expression form, used in listings.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "assign",
            Self::Dispatch { .. } => "dispatch",
            Self::StaticDispatch { .. } => "static_dispatch",
            Self::Cond { .. } => "cond",
            Self::Loop { .. } => "loop",
            Self::Case { .. } => "case",
            Self::Block(_) => "block",
            Self::Let { .. } => "let",
            Self::Arith { .. } => "arith",
            Self::Compare { .. } => "compare",
            Self::Eq { .. } => "eq",
            Self::Neg(_) => "neg",
            Self::Not(_) => "not",
            Self::IntConst(_) => "int",
            Self::StringConst(_) => "string",
            Self::BoolConst(_) => "bool",
            Self::New(_) => "new",
            Self::IsVoid(_) => "isvoid",
            Self::Identifier(_) => "object",
            Self::NoExpr => "no_expr",
        }
    }
}
