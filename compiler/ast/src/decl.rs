use crate::{Block, Expr, Ident};
use utility::SmallVec;

/// The syntactic root: all top-level declarations of a source file.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Program {
    pub funcs: Vec<Func>,
    pub structs: Vec<Structure>,
}

impl Program {
    pub fn func(&self, index: FuncIdx) -> &Func {
        &self.funcs[index.0 as usize]
    }

    pub fn structure(&self, index: StructIdx) -> &Structure {
        &self.structs[index.0 as usize]
    }

    pub fn func_indices(&self) -> impl Iterator<Item = (FuncIdx, &Func)> {
        self.funcs
            .iter()
            .enumerate()
            .map(|(index, func)| (FuncIdx(index as u32), func))
    }

    pub fn struct_indices(&self) -> impl Iterator<Item = (StructIdx, &Structure)> {
        self.structs
            .iter()
            .enumerate()
            .map(|(index, structure)| (StructIdx(index as u32), structure))
    }
}

/// The index of a function declaration inside a [`Program`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FuncIdx(u32);

/// The index of a structure declaration inside a [`Program`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StructIdx(u32);

/// A list of parameters.
pub type Params = SmallVec<Param, 1>;

/// A function declaration.
///
/// # Examples
///
/// ```mica
/// func id<T>(x: T): T { return x; }
/// ```
///
/// * `id` is the *binder*
/// * `T` is the only *template parameter*
/// * `x: T` is the only *parameter*
/// * `T` following the colon is the *return type* (the parser substitutes
///   `Void` when it is absent from the source)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Func {
    pub binder: Ident,
    pub ty_params: Vec<Ident>,
    pub params: Params,
    pub ty: Expr,
    pub body: Block,
}

/// A parameter of a function declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub binder: Ident,
    pub ty: Expr,
}

/// A structure declaration.
///
/// # Examples
///
/// ```mica
/// struct Pair<A, B> { first: A, second: B }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Structure {
    pub binder: Ident,
    pub ty_params: Vec<Ident>,
    pub members: Vec<Member>,
}

/// A member of a structure declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub binder: Ident,
    pub ty: Expr,
}
