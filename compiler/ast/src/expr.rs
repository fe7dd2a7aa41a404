use crate::Ident;
use span::Spanned;

/// An expression.
///
/// Type expressions share this representation: a type is either a plain
/// [`Name`](BareExpr::Name) or a template application encoded as a
/// [`Call`](BareExpr::Call) whose callee is the structure name.
pub type Expr = Spanned<BareExpr>;

/// A location-less expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BareExpr {
    NumLit(i32),
    Name(Ident),
    BinOp(Box<BinOp>),
    Assign(Box<Assign>),
    Call(Box<Call>),
    Proj(Box<Proj>),
}

impl From<Ident> for BareExpr {
    fn from(ident: Ident) -> Self {
        Self::Name(ident)
    }
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

/// A binary expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinOp {
    pub op: BinOpKind,
    pub lhs: Expr,
    pub rhs: Expr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinOpKind {
    /// The operator's spelling in the surface language (and in C).
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// An assignment expression.
///
/// The grammar permits arbitrary expressions on the left-hand side;
/// the analyzer restricts them to names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assign {
    pub lhs: Expr,
    pub rhs: Expr,
}

/// A call expression.
///
/// The callee is only meaningful in the syntactic tree: overload
/// resolution replaces it with a function id in the semantic IR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub callee: Expr,
    pub args: Vec<Expr>,
}

/// A member access: a projection from a structure to one of its fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proj {
    pub basis: Expr,
    pub field: Ident,
}
