//! The abstract syntax tree (AST).
//!
//! The most important definitions are [`Expr`], [`Stmt`] and the
//! declarations [`Func`] and [`Structure`].

pub use decl::{Func, FuncIdx, Member, Param, Params, Program, StructIdx, Structure};
pub use expr::{Assign, BareExpr, BinOp, BinOpKind, Call, Expr, Proj};
pub use ident::Ident;
pub use stmt::{BareStmt, Block, IfStmt, LetStmt, Stmt, WhileStmt};

mod decl;
mod expr;
mod ident;
mod stmt;
