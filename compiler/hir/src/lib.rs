//! The high-level intermediate representation.
//!
//! The typed, monomorphic program produced by the analyzer: every
//! expression carries a resolved type, every call a resolved function
//! id, and every type and function instantiation lives in an arena
//! addressed by a stable, creation-ordered id.

use span::Span;
use utility::Atom;

pub use ast::BinOpKind;

mod fmt;

/// The id of a [type](Ty) inside a [`Program`].
///
/// Ids are positive and assigned in strictly increasing order of
/// creation. Two types are equal if and only if their ids are: the
/// instantiation memo guarantees that a template applied to the same
/// arguments is only ever materialized once.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TyId(u32);

impl TyId {
    /// The 1-based id, the `N` in the emitted C name `tN`.
    pub fn number(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize - 1
    }
}

/// The id of a [function instantiation](FuncInst) inside a [`Program`].
///
/// The same contract as [`TyId`], for the emitted C name `fN`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct FuncId(u32);

impl FuncId {
    pub fn number(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize - 1
    }
}

/// The semantic program: all reachable instantiations plus the entry point.
#[derive(Default)]
pub struct Program {
    /// All types in creation (= id) order.
    tys: Vec<Ty>,
    /// All types in member-completion order.
    ///
    /// A structure is listed after the types of its members (cycles
    /// excepted), which is the order C requires for by-value members.
    pub ty_order: Vec<TyId>,
    /// All function instantiations in demand (= id) order.
    funcs: Vec<FuncInst>,
    /// The instantiation of `main`, absent if the lookup failed.
    pub entry: Option<FuncId>,
}

impl Program {
    pub fn ty(&self, id: TyId) -> &Ty {
        &self.tys[id.index()]
    }

    pub fn ty_mut(&mut self, id: TyId) -> &mut Ty {
        &mut self.tys[id.index()]
    }

    pub fn func(&self, id: FuncId) -> &FuncInst {
        &self.funcs[id.index()]
    }

    pub fn func_mut(&mut self, id: FuncId) -> &mut FuncInst {
        &mut self.funcs[id.index()]
    }

    /// Add a type, assigning the next id.
    ///
    /// The caller is responsible for also recording the id in
    /// [`ty_order`](Self::ty_order) once the type's members are complete.
    pub fn add_ty(&mut self, ty: Ty) -> TyId {
        self.tys.push(ty);
        TyId(self.tys.len() as u32)
    }

    /// Add a function instantiation, assigning the next id.
    pub fn add_func(&mut self, func: FuncInst) -> FuncId {
        self.funcs.push(func);
        FuncId(self.funcs.len() as u32)
    }

    pub fn tys(&self) -> impl Iterator<Item = (TyId, &Ty)> {
        self.tys
            .iter()
            .zip(1..)
            .map(|(ty, number)| (TyId(number), ty))
    }

    pub fn funcs(&self) -> impl Iterator<Item = (FuncId, &FuncInst)> {
        self.funcs
            .iter()
            .zip(1..)
            .map(|(func, number)| (FuncId(number), func))
    }
}

/// A fully instantiated type.
pub enum Ty {
    Void,
    Int,
    Struct(StructTy),
}

impl Ty {
    pub fn struct_(&self) -> Option<&StructTy> {
        match self {
            Self::Struct(ty) => Some(ty),
            _ => None,
        }
    }
}

/// A structure template applied to concrete type arguments.
pub struct StructTy {
    /// The declaration this instantiation specializes.
    pub template: ast::StructIdx,
    /// The template's name, kept for unification and display.
    pub binder: Atom,
    pub args: Vec<TyId>,
    /// The members, resolved after the instantiation is memoized so
    /// that recursive references observe the type under construction.
    pub members: Vec<Member>,
}

/// A member of a structure instantiation.
pub struct Member {
    pub binder: Atom,
    /// `None` when the member's type failed to resolve; such programs
    /// never reach the emitter.
    pub ty: Option<TyId>,
}

/// A function template applied to concrete type arguments.
pub struct FuncInst {
    /// The declaration this instantiation specializes.
    pub template: ast::FuncIdx,
    pub binder: Atom,
    pub ty_args: Vec<TyId>,
    pub params: Vec<Param>,
    /// The return type, `None` when it failed to resolve.
    pub ty: Option<TyId>,
    /// The body, walked after the instantiation is memoized so that
    /// recursive calls observe the signature.
    pub body: Block,
}

/// A parameter of a function instantiation.
pub struct Param {
    pub binder: Atom,
    /// `None` when the parameter's type failed to resolve.
    pub ty: Option<TyId>,
}

/// A typed expression.
pub struct Expr {
    pub span: Span,
    pub ty: TyId,
    pub bare: BareExpr,
}

pub enum BareExpr {
    NumLit(i32),
    Name(Atom),
    BinOp(Box<BinOp>),
    Assign(Box<Assign>),
    Call(Box<Call>),
    Proj(Box<Proj>),
}

impl From<BinOp> for BareExpr {
    fn from(binary: BinOp) -> Self {
        Self::BinOp(Box::new(binary))
    }
}

impl From<Assign> for BareExpr {
    fn from(assign: Assign) -> Self {
        Self::Assign(Box::new(assign))
    }
}

impl From<Call> for BareExpr {
    fn from(call: Call) -> Self {
        Self::Call(Box::new(call))
    }
}

impl From<Proj> for BareExpr {
    fn from(proj: Proj) -> Self {
        Self::Proj(Box::new(proj))
    }
}

pub struct BinOp {
    pub op: BinOpKind,
    pub lhs: Expr,
    pub rhs: Expr,
}

pub struct Assign {
    pub lhs: Expr,
    pub rhs: Expr,
}

/// A call with its overload resolved.
///
/// The syntactic callee is gone: only the id of the selected
/// instantiation and the typed arguments remain.
pub struct Call {
    pub func: FuncId,
    pub args: Vec<Expr>,
}

pub struct Proj {
    pub basis: Expr,
    pub field: Atom,
}

pub enum Stmt {
    Block(Block),
    Empty,
    Let(Box<LetStmt>),
    If(Box<IfStmt>),
    While(Box<WhileStmt>),
    Return(Option<Expr>),
    Expr(Expr),
}

#[derive(Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

/// A checked let-statement; the initializer's type equals `ty`.
pub struct LetStmt {
    pub binder: Atom,
    pub ty: TyId,
    pub init: Expr,
}

/// A checked if-statement; the condition's type is `Int` and the
/// alternative is always present (`Empty` stands in for an absent one).
pub struct IfStmt {
    pub cond: Expr,
    pub then: Stmt,
    pub alt: Stmt,
}

pub struct WhileStmt {
    pub cond: Expr,
    pub body: Stmt,
}
