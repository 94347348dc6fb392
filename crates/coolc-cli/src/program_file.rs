// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Program file loading.
//!
//! **DDD Context:** Build System
//!
//! `coolc` reads programs that have already been parsed, stored as JSON.
//! Names are plain strings in the file and are interned while lowering
//! into the core AST. Lines are optional on expressions: a node without
//! one takes the line of its parent.
//!
//! ```json
//! { "classes": [ { "name": "Main", "parent": "IO", "line": 1, "features": [
//!     { "feature": "method", "name": "main", "return_type": "Object", "line": 2,
//!       "body": { "expr": "dispatch", "method": "out_int",
//!                 "args": [ { "expr": "int", "value": 42 } ] } } ] } ] }
//! ```

use camino::Utf8Path;
use coolc_core::ast::{
    ArithOp, Attribute, CaseBranch, ClassDecl, CompareOp, ExprKind, Expression, Feature, Formal,
    Method, Program,
};
use coolc_core::symbol::Interner;
use ecow::EcoString;
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;
use std::fs;

/// A whole program file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramFile {
    pub classes: Vec<ClassFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassFile {
    pub name: String,
    /// Defaults to `Object`.
    #[serde(default)]
    pub parent: Option<String>,
    /// Source file the class came from; defaults to the program file name.
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default = "first_line")]
    pub line: u32,
    #[serde(default)]
    pub features: Vec<FeatureFile>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "feature", rename_all = "snake_case", deny_unknown_fields)]
pub enum FeatureFile {
    Method {
        name: String,
        #[serde(default)]
        formals: Vec<FormalFile>,
        return_type: String,
        body: ExprFile,
        #[serde(default)]
        line: Option<u32>,
    },
    Attribute {
        name: String,
        #[serde(rename = "type")]
        type_decl: String,
        #[serde(default)]
        init: Option<ExprFile>,
        #[serde(default)]
        line: Option<u32>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormalFile {
    pub name: String,
    #[serde(rename = "type")]
    pub type_decl: String,
}

#[derive(Debug, Deserialize)]
pub struct ExprFile {
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(flatten)]
    pub kind: ExprKindFile,
}

#[derive(Debug, Deserialize)]
pub struct BranchFile {
    pub name: String,
    #[serde(rename = "type")]
    pub type_decl: String,
    pub body: ExprFile,
    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum ArithOpFile {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum CompareOpFile {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum ExprKindFile {
    Assign {
        name: String,
        value: Box<ExprFile>,
    },
    /// A missing receiver means `self`.
    Dispatch {
        #[serde(default)]
        receiver: Option<Box<ExprFile>>,
        method: String,
        #[serde(default)]
        args: Vec<ExprFile>,
    },
    StaticDispatch {
        receiver: Box<ExprFile>,
        #[serde(rename = "type")]
        type_name: String,
        method: String,
        #[serde(default)]
        args: Vec<ExprFile>,
    },
    Cond {
        pred: Box<ExprFile>,
        #[serde(rename = "then")]
        then_branch: Box<ExprFile>,
        #[serde(rename = "else")]
        else_branch: Box<ExprFile>,
    },
    Loop {
        pred: Box<ExprFile>,
        body: Box<ExprFile>,
    },
    Case {
        scrutinee: Box<ExprFile>,
        branches: Vec<BranchFile>,
    },
    Block {
        body: Vec<ExprFile>,
    },
    Let {
        name: String,
        #[serde(rename = "type")]
        type_decl: String,
        #[serde(default)]
        init: Option<Box<ExprFile>>,
        body: Box<ExprFile>,
    },
    Arith {
        op: ArithOpFile,
        lhs: Box<ExprFile>,
        rhs: Box<ExprFile>,
    },
    Compare {
        op: CompareOpFile,
        lhs: Box<ExprFile>,
        rhs: Box<ExprFile>,
    },
    Eq {
        lhs: Box<ExprFile>,
        rhs: Box<ExprFile>,
    },
    Neg {
        operand: Box<ExprFile>,
    },
    Not {
        operand: Box<ExprFile>,
    },
    Isvoid {
        operand: Box<ExprFile>,
    },
    Int {
        value: i64,
    },
    String {
        value: String,
    },
    Bool {
        value: bool,
    },
    New {
        #[serde(rename = "type")]
        type_name: String,
    },
    Object {
        name: String,
    },
    NoExpr,
}

fn first_line() -> u32 {
    1
}

/// Structural problems the JSON schema cannot express.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LoadError {
    #[error("{filename}:{line}: block expression has no body")]
    #[diagnostic(code(coolc::load::empty_block), help("a block needs at least one expression"))]
    EmptyBlock { filename: EcoString, line: u32 },

    #[error("{filename}:{line}: case expression has no branches")]
    #[diagnostic(code(coolc::load::empty_case))]
    EmptyCase { filename: EcoString, line: u32 },
}

/// Reads and lowers a program file.
///
/// # Errors
///
/// Fails if the file cannot be read, is not a valid program document, or
/// contains an empty block or case.
pub fn load_program(path: &Utf8Path, interner: &mut Interner) -> Result<Program> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read program '{path}'"))?;

    let file: ProgramFile = serde_json::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to parse program '{path}'"))?;

    let default_filename = path.file_name().unwrap_or(path.as_str());
    let program = Lowering {
        interner,
        filename: EcoString::new(),
    }
    .program(file, default_filename)?;

    tracing::debug!(%path, classes = program.classes.len(), "program loaded");
    Ok(program)
}

/// Interns names and fills in defaulted lines while building the core AST.
struct Lowering<'a> {
    interner: &'a mut Interner,
    /// File of the class being lowered.
    filename: EcoString,
}

impl Lowering<'_> {
    fn program(mut self, file: ProgramFile, default_filename: &str) -> Result<Program, LoadError> {
        let classes = file
            .classes
            .into_iter()
            .map(|class| self.class(class, default_filename))
            .collect::<Result<_, _>>()?;
        Ok(Program::new(classes))
    }

    fn class(&mut self, class: ClassFile, default_filename: &str) -> Result<ClassDecl, LoadError> {
        self.filename = class
            .filename
            .as_deref()
            .unwrap_or(default_filename)
            .into();
        let features = class
            .features
            .into_iter()
            .map(|feature| self.feature(feature, class.line))
            .collect::<Result<_, _>>()?;
        Ok(ClassDecl {
            name: self.interner.intern(&class.name),
            parent: self
                .interner
                .intern(class.parent.as_deref().unwrap_or("Object")),
            features,
            filename: self.filename.clone(),
            line: class.line,
        })
    }

    fn feature(&mut self, feature: FeatureFile, class_line: u32) -> Result<Feature, LoadError> {
        Ok(match feature {
            FeatureFile::Method {
                name,
                formals,
                return_type,
                body,
                line,
            } => {
                let line = line.unwrap_or(class_line);
                Feature::Method(Method {
                    name: self.interner.intern(&name),
                    formals: formals
                        .iter()
                        .map(|formal| Formal {
                            name: self.interner.intern(&formal.name),
                            type_decl: self.interner.intern(&formal.type_decl),
                            line,
                        })
                        .collect(),
                    return_type: self.interner.intern(&return_type),
                    body: self.expr(body, line)?,
                    line,
                })
            }
            FeatureFile::Attribute {
                name,
                type_decl,
                init,
                line,
            } => {
                let line = line.unwrap_or(class_line);
                Feature::Attribute(Attribute {
                    name: self.interner.intern(&name),
                    type_decl: self.interner.intern(&type_decl),
                    init: self.optional(init, line)?,
                    line,
                })
            }
        })
    }

    fn optional(&mut self, expr: Option<ExprFile>, line: u32) -> Result<Expression, LoadError> {
        match expr {
            Some(expr) => self.expr(expr, line),
            None => Ok(Expression::no_expr(line)),
        }
    }

    fn boxed(&mut self, expr: Box<ExprFile>, line: u32) -> Result<Box<Expression>, LoadError> {
        self.expr(*expr, line).map(Box::new)
    }

    fn list(&mut self, exprs: Vec<ExprFile>, line: u32) -> Result<Vec<Expression>, LoadError> {
        exprs.into_iter().map(|expr| self.expr(expr, line)).collect()
    }

    fn expr(&mut self, expr: ExprFile, parent_line: u32) -> Result<Expression, LoadError> {
        let line = expr.line.unwrap_or(parent_line);
        let kind = match expr.kind {
            ExprKindFile::Assign { name, value } => ExprKind::Assign {
                name: self.interner.intern(&name),
                value: self.boxed(value, line)?,
            },
            ExprKindFile::Dispatch {
                receiver,
                method,
                args,
            } => ExprKind::Dispatch {
                receiver: match receiver {
                    Some(receiver) => self.boxed(receiver, line)?,
                    None => Box::new(Expression::new(
                        ExprKind::Identifier(self.interner.intern("self")),
                        line,
                    )),
                },
                method: self.interner.intern(&method),
                args: self.list(args, line)?,
            },
            ExprKindFile::StaticDispatch {
                receiver,
                type_name,
                method,
                args,
            } => ExprKind::StaticDispatch {
                receiver: self.boxed(receiver, line)?,
                type_name: self.interner.intern(&type_name),
                method: self.interner.intern(&method),
                args: self.list(args, line)?,
            },
            ExprKindFile::Cond {
                pred,
                then_branch,
                else_branch,
            } => ExprKind::Cond {
                pred: self.boxed(pred, line)?,
                then_branch: self.boxed(then_branch, line)?,
                else_branch: self.boxed(else_branch, line)?,
            },
            ExprKindFile::Loop { pred, body } => ExprKind::Loop {
                pred: self.boxed(pred, line)?,
                body: self.boxed(body, line)?,
            },
            ExprKindFile::Case {
                scrutinee,
                branches,
            } => {
                if branches.is_empty() {
                    return Err(LoadError::EmptyCase {
                        filename: self.filename.clone(),
                        line,
                    });
                }
                ExprKind::Case {
                    scrutinee: self.boxed(scrutinee, line)?,
                    branches: branches
                        .into_iter()
                        .map(|branch| self.branch(branch, line))
                        .collect::<Result<_, _>>()?,
                }
            }
            ExprKindFile::Block { body } => {
                if body.is_empty() {
                    return Err(LoadError::EmptyBlock {
                        filename: self.filename.clone(),
                        line,
                    });
                }
                ExprKind::Block(self.list(body, line)?)
            }
            ExprKindFile::Let {
                name,
                type_decl,
                init,
                body,
            } => ExprKind::Let {
                name: self.interner.intern(&name),
                type_decl: self.interner.intern(&type_decl),
                init: Box::new(self.optional(init.map(|init| *init), line)?),
                body: self.boxed(body, line)?,
            },
            ExprKindFile::Arith { op, lhs, rhs } => ExprKind::Arith {
                op: match op {
                    ArithOpFile::Add => ArithOp::Add,
                    ArithOpFile::Sub => ArithOp::Sub,
                    ArithOpFile::Mul => ArithOp::Mul,
                    ArithOpFile::Div => ArithOp::Div,
                },
                lhs: self.boxed(lhs, line)?,
                rhs: self.boxed(rhs, line)?,
            },
            ExprKindFile::Compare { op, lhs, rhs } => ExprKind::Compare {
                op: match op {
                    CompareOpFile::Lt => CompareOp::Lt,
                    CompareOpFile::Le => CompareOp::Le,
                },
                lhs: self.boxed(lhs, line)?,
                rhs: self.boxed(rhs, line)?,
            },
            ExprKindFile::Eq { lhs, rhs } => ExprKind::Eq {
                lhs: self.boxed(lhs, line)?,
                rhs: self.boxed(rhs, line)?,
            },
            ExprKindFile::Neg { operand } => ExprKind::Neg(self.boxed(operand, line)?),
            ExprKindFile::Not { operand } => ExprKind::Not(self.boxed(operand, line)?),
            ExprKindFile::Isvoid { operand } => ExprKind::IsVoid(self.boxed(operand, line)?),
            ExprKindFile::Int { value } => ExprKind::IntConst(value),
            ExprKindFile::String { value } => ExprKind::StringConst(value.into()),
            ExprKindFile::Bool { value } => ExprKind::BoolConst(value),
            ExprKindFile::New { type_name } => ExprKind::New(self.interner.intern(&type_name)),
            ExprKindFile::Object { name } => ExprKind::Identifier(self.interner.intern(&name)),
            ExprKindFile::NoExpr => ExprKind::NoExpr,
        };
        Ok(Expression::new(kind, line))
    }

    fn branch(&mut self, branch: BranchFile, parent_line: u32) -> Result<CaseBranch, LoadError> {
        let line = branch.line.unwrap_or(parent_line);
        Ok(CaseBranch {
            name: self.interner.intern(&branch.name),
            type_decl: self.interner.intern(&branch.type_decl),
            body: self.expr(branch.body, line)?,
            line,
        })
    }
}
