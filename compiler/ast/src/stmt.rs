use crate::{Expr, Ident};
use span::Spanned;

/// A statement.
pub type Stmt = Spanned<BareStmt>;

/// A location-less statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BareStmt {
    Block(Block),
    Empty,
    Let(Box<LetStmt>),
    If(Box<IfStmt>),
    While(Box<WhileStmt>),
    Return(Option<Expr>),
    Expr(Expr),
}

impl From<LetStmt> for BareStmt {
    fn from(let_: LetStmt) -> Self {
        Self::Let(Box::new(let_))
    }
}

impl From<IfStmt> for BareStmt {
    fn from(if_: IfStmt) -> Self {
        Self::If(Box::new(if_))
    }
}

impl From<WhileStmt> for BareStmt {
    fn from(while_: WhileStmt) -> Self {
        Self::While(Box::new(while_))
    }
}

/// A sequence of statements delimited by curly brackets.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

/// A let-statement: `let x: Int = 0;`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetStmt {
    pub binder: Ident,
    /// The declared type, absent if it is to be inferred from the initializer.
    pub ty: Option<Expr>,
    pub init: Expr,
}

/// An if-statement.
///
/// The parser substitutes an [`Empty`](BareStmt::Empty) statement for an
/// absent else arm, so the arm is always present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then: Stmt,
    pub alt: Stmt,
}

/// A while-statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Stmt,
}
