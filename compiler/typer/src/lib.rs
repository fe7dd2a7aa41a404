//! The semantic analyzer and monomorphizer.
//!
//! Lowers the syntactic program into the typed, monomorphic IR by
//! demand: starting from `main`, every call site deduces type arguments
//! for its callee by unification and instantiates the callee's template,
//! memoized so that a template applied to the same arguments yields the
//! same instantiation. Type checking, overload resolution and uniform
//! function call syntax rewriting happen in the same walk.
//!
//! Fallible operations return the usual already-reported witness on
//! failure; callers skip further work on the affected subtree without
//! re-reporting.

use ast::{BareExpr, BareStmt};
use diagnostics::{
    error::{Health, Result},
    reporter::ErasedReportedError,
    Diag, Reporter,
};
use hir::{FuncId, TyId};
use scope::ScopeStack;
use span::Span;
use std::{mem, path::Path};
use utility::{pluralize, Atom, HashMap, QuoteExt, Str, PROGRAM_ENTRY};

mod scope;
mod unify;


/// Check the program and lower it to the typed IR.
///
/// All diagnostics are reported on the way; an `Err` means at least one
/// of them was an error and compilation must not proceed to the backend.
pub fn check(ast: &ast::Program, path: &Path, rep: &Reporter) -> Result<hir::Program> {
    let mut typer = Typer::new(ast, path, rep);
    typer.run();

    let health = typer.health;
    let program = typer.program;
    Result::from(health).map(|()| program)
}

/// The state of the analyzer.
pub(crate) struct Typer<'a> {
    ast: &'a ast::Program,
    path: &'a Path,
    rep: &'a Reporter,
    pub(crate) program: hir::Program,
    health: Health,
    void_ty: Option<TyId>,
    int_ty: Option<TyId>,
    struct_memo: HashMap<(ast::StructIdx, Vec<TyId>), TyId>,
    func_memo: HashMap<(ast::FuncIdx, Vec<TyId>), FuncId>,
    vars: ScopeStack,
    ty_vars: ScopeStack,
}

impl<'a> Typer<'a> {
    fn new(ast: &'a ast::Program, path: &'a Path, rep: &'a Reporter) -> Self {
        Self {
            ast,
            path,
            rep,
            program: hir::Program::default(),
            health: Health::default(),
            void_ty: None,
            int_ty: None,
            struct_memo: HashMap::default(),
            func_memo: HashMap::default(),
            vars: ScopeStack::default(),
            ty_vars: ScopeStack::default(),
        }
    }

    /// Resolve the program entry: `main` with no arguments returning `Void`.
    fn run(&mut self) {
        let void = self.void_ty();

        if let Ok(entry) = self.resolve_func(PROGRAM_ENTRY, &[], Some(void), Span::default()) {
            self.program.entry = Some(entry);
        }
    }

    /// Report an error, at the given location if it is known.
    fn error(&mut self, span: Span, message: impl Into<Str>) -> ErasedReportedError {
        let diag = Diag::error().message(message);
        let diag = if span == Span::default() {
            diag.path(self.path.to_owned())
        } else {
            diag.primary_span(span)
        };

        let error = diag.report(self.rep);
        self.health.taint(error);
        error
    }

    /// The `Void` singleton, created on first use.
    pub(crate) fn void_ty(&mut self) -> TyId {
        match self.void_ty {
            Some(ty) => ty,
            None => {
                let ty = self.program.add_ty(hir::Ty::Void);
                self.program.ty_order.push(ty);
                self.void_ty = Some(ty);
                ty
            }
        }
    }

    /// The `Int` singleton, created on first use.
    pub(crate) fn int_ty(&mut self) -> TyId {
        match self.int_ty {
            Some(ty) => ty,
            None => {
                let ty = self.program.add_ty(hir::Ty::Int);
                self.program.ty_order.push(ty);
                self.int_ty = Some(ty);
                ty
            }
        }
    }

    /// Extract the name of a name expression, anything else is an error.
    pub(crate) fn name_of(&mut self, expr: &ast::Expr) -> Result<Atom> {
        match &expr.bare {
            BareExpr::Name(ident) => Ok(ident.bare()),
            _ => Err(self.error(expr.span, "invalid expression, expected a name")),
        }
    }

    /// Evaluate a type expression to a type.
    ///
    /// A name is first looked up among the template parameters in scope,
    /// then as a named type; a call applies a structure template.
    pub(crate) fn eval_ty(&mut self, expr: &ast::Expr) -> Result<TyId> {
        match &expr.bare {
            BareExpr::Name(ident) => {
                if let Some(ty) = self.ty_vars.look_up(ident.bare()) {
                    return Ok(ty);
                }

                self.resolve_ty(ident.bare(), Vec::new(), expr.span)
            }
            BareExpr::Call(call) => {
                let name = self.name_of(&call.callee);
                let args: Vec<_> = call.args.iter().map(|arg| self.eval_ty(arg)).collect();
                let args = args.into_iter().collect::<Result<Vec<_>, _>>()?;

                self.resolve_ty(name?, args, expr.span)
            }
            _ => Err(self.error(expr.span, "invalid type expression")),
        }
    }

    /// Resolve a type name applied to evaluated arguments.
    pub(crate) fn resolve_ty(&mut self, name: Atom, args: Vec<TyId>, span: Span) -> Result<TyId> {
        if name == Atom::VOID && args.is_empty() {
            return Ok(self.void_ty());
        }
        if name == Atom::INT && args.is_empty() {
            return Ok(self.int_ty());
        }

        let ast = self.ast;
        let mut matches = ast
            .struct_indices()
            .filter(|(_, structure)| structure.binder.bare() == name);

        let Some((index, structure)) = matches.next() else {
            return Err(self.error(span, format!("struct {} not found", name.quote())));
        };

        let count = 1 + matches.count();
        if count > 1 {
            return Err(self.error(
                span,
                format!("{count} structs named {} found", name.quote()),
            ));
        }

        if structure.ty_params.len() != args.len() {
            let amount = structure.ty_params.len();
            return Err(self.error(
                span,
                format!(
                    "invalid number of template arguments for struct {}, expected {amount} {}",
                    name.quote(),
                    pluralize!(amount, "template argument"),
                ),
            ));
        }

        Ok(self.instantiate_struct(index, args))
    }

    /// Specialize a structure template for the given type arguments.
    ///
    /// The instantiation is memoized *before* its members are resolved:
    /// recursive member references observe the type under construction,
    /// making template recursion terminate.
    fn instantiate_struct(&mut self, index: ast::StructIdx, args: Vec<TyId>) -> TyId {
        let key = (index, args.clone());
        if let Some(&ty) = self.struct_memo.get(&key) {
            return ty;
        }

        let structure = self.ast.structure(index);
        let ty = self.program.add_ty(hir::Ty::Struct(hir::StructTy {
            template: index,
            binder: structure.binder.bare(),
            args: args.clone(),
            members: Vec::new(),
        }));
        self.struct_memo.insert(key, ty);

        let outer_ty_vars = mem::take(&mut self.ty_vars);
        self.ty_vars.push_frame();
        for (param, &arg) in structure.ty_params.iter().zip(&args) {
            self.ty_vars.insert(param.bare(), arg);
        }

        let members = structure
            .members
            .iter()
            .map(|member| hir::Member {
                binder: member.binder.bare(),
                ty: self.eval_ty(&member.ty).ok(),
            })
            .collect();

        self.ty_vars = outer_ty_vars;

        let hir::Ty::Struct(struct_ty) = self.program.ty_mut(ty) else {
            unreachable!()
        };
        struct_ty.members = members;
        self.program.ty_order.push(ty);

        ty
    }

    /// Resolve an overloaded call target.
    ///
    /// Every top-level function with the given name is a candidate; one
    /// survives if unification binds all of its template parameters.
    /// Exactly one surviving candidate is instantiated, any other count
    /// is an error.
    pub(crate) fn resolve_func(
        &mut self,
        name: Atom,
        args: &[Option<TyId>],
        expected: Option<TyId>,
        span: Span,
    ) -> Result<FuncId> {
        let ast = self.ast;
        let mut candidate = None;
        let mut count = 0_usize;

        for (index, func) in ast.func_indices() {
            if func.binder.bare() != name {
                continue;
            }

            if let Some(ty_args) = self.unify(func, args, expected) {
                candidate = Some((index, ty_args));
                count += 1;
            }
        }

        match (count, candidate) {
            (1, Some((index, ty_args))) => Ok(self.instantiate_func(index, ty_args)),
            (0, _) => Err(self.error(
                span,
                format!("no matching function {} found", name.quote()),
            )),
            _ => Err(self.error(
                span,
                format!("{count} matching functions {} found", name.quote()),
            )),
        }
    }

    /// Specialize a function template for the given type arguments.
    ///
    /// The instantiation is memoized *before* its body is walked so that
    /// recursive calls observe it, making every concrete monomorphization
    /// of a recursive function terminate.
    fn instantiate_func(&mut self, index: ast::FuncIdx, ty_args: Vec<TyId>) -> FuncId {
        let key = (index, ty_args.clone());
        if let Some(&func) = self.func_memo.get(&key) {
            return func;
        }

        let decl = self.ast.func(index);

        let outer_ty_vars = mem::take(&mut self.ty_vars);
        let outer_vars = mem::take(&mut self.vars);

        self.ty_vars.push_frame();
        for (param, &arg) in decl.ty_params.iter().zip(&ty_args) {
            self.ty_vars.insert(param.bare(), arg);
        }

        self.vars.push_frame();
        let params: Vec<_> = decl
            .params
            .iter()
            .map(|param| {
                let ty = self.eval_ty(&param.ty).ok();
                if let Some(ty) = ty {
                    self.vars.insert(param.binder.bare(), ty);
                }
                hir::Param {
                    binder: param.binder.bare(),
                    ty,
                }
            })
            .collect();

        let ty = self.eval_ty(&decl.ty).ok();

        let func = self.program.add_func(hir::FuncInst {
            template: index,
            binder: decl.binder.bare(),
            ty_args,
            params,
            ty,
            body: hir::Block::default(),
        });
        self.func_memo.insert(key, func);

        let body = self.handle_block(&decl.body);
        self.program.func_mut(func).body = body;

        self.vars = outer_vars;
        self.ty_vars = outer_ty_vars;

        func
    }

    /// Look up a member of a structure type.
    fn member_ty(&mut self, ty: TyId, field: Atom, span: Span) -> Result<TyId> {
        let Some(structure) = self.program.ty(ty).struct_() else {
            let name = self.program.ty_name(ty).to_string();
            return Err(self.error(span, format!("invalid type {name}, expected a struct type")));
        };

        match structure.members.iter().find(|member| member.binder == field) {
            Some(member) => match member.ty {
                Some(ty) => Ok(ty),
                // the member's type failed to resolve, which has been
                // reported at its declaration
                None => Err(ErasedReportedError::new_unchecked()),
            },
            None => {
                let name = self.program.ty_name(ty).to_string();
                Err(self.error(
                    span,
                    format!("struct {name} does not have a field named {}", field.quote()),
                ))
            }
        }
    }

    /// Type-check an expression, producing its typed counterpart.
    ///
    /// The expected type, if any, only informs overload resolution of
    /// calls; it is the callers that enforce it.
    fn handle_expr(&mut self, expr: &ast::Expr, expected: Option<TyId>) -> Result<hir::Expr> {
        match &expr.bare {
            BareExpr::NumLit(value) => Ok(hir::Expr {
                span: expr.span,
                ty: self.int_ty(),
                bare: hir::BareExpr::NumLit(*value),
            }),
            BareExpr::Name(ident) => match self.vars.look_up(ident.bare()) {
                Some(ty) => Ok(hir::Expr {
                    span: expr.span,
                    ty,
                    bare: hir::BareExpr::Name(ident.bare()),
                }),
                None => Err(self.error(
                    expr.span,
                    format!("undefined variable {}", ident.bare().quote()),
                )),
            },
            BareExpr::BinOp(binary) => {
                let lhs = self.handle_expr(&binary.lhs, None);
                let rhs = self.handle_expr(&binary.rhs, None);
                let int = self.int_ty();

                let (lhs, rhs) = match (lhs, rhs) {
                    (Ok(lhs), Ok(rhs)) => (lhs, rhs),
                    (Err(error), _) | (_, Err(error)) => return Err(error),
                };

                if !(lhs.ty == int && rhs.ty == int) {
                    return Err(self.error(expr.span, "invalid binary expression"));
                }

                let ty = lhs.ty;
                Ok(hir::Expr {
                    span: expr.span,
                    ty,
                    bare: hir::BinOp {
                        op: binary.op,
                        lhs,
                        rhs,
                    }
                    .into(),
                })
            }
            BareExpr::Assign(assign) => {
                let lhs = self.handle_expr(&assign.lhs, None);
                let rhs = self.handle_expr(&assign.rhs, None);

                let mut failed = lhs.is_err() || rhs.is_err();

                if let Ok(lhs) = &lhs {
                    if !matches!(lhs.bare, hir::BareExpr::Name(_)) {
                        self.error(lhs.span, "invalid expression, expected a name");
                        failed = true;
                    }
                }

                if let (Ok(lhs), Ok(rhs)) = (&lhs, &rhs) {
                    if rhs.ty != lhs.ty {
                        let found = self.program.ty_name(rhs.ty).to_string();
                        let expected = self.program.ty_name(lhs.ty).to_string();
                        self.error(
                            rhs.span,
                            format!("invalid type {found}, expected type {expected}"),
                        );
                        failed = true;
                    }
                }

                match (failed, lhs, rhs) {
                    (false, Ok(lhs), Ok(rhs)) => Ok(hir::Expr {
                        span: expr.span,
                        ty: lhs.ty,
                        bare: hir::Assign { lhs, rhs }.into(),
                    }),
                    _ => Err(ErasedReportedError::new_unchecked()),
                }
            }
            BareExpr::Call(call) => {
                let mut args = Vec::new();

                let name = match &call.callee.bare {
                    // uniform function call syntax:
                    // `x.f(y)` resolves like `f(x, y)`
                    BareExpr::Proj(proj) => {
                        let receiver = self.handle_expr(&proj.basis, None);
                        args.push(receiver);
                        Ok(proj.field.bare())
                    }
                    _ => self.name_of(&call.callee),
                };

                for arg in &call.args {
                    let arg = self.handle_expr(arg, None);
                    args.push(arg);
                }

                let name = name?;

                let arg_tys: Vec<_> = args
                    .iter()
                    .map(|arg| arg.as_ref().ok().map(|arg| arg.ty))
                    .collect();
                let func = self.resolve_func(name, &arg_tys, expected, expr.span)?;

                let Some(ty) = self.program.func(func).ty else {
                    // the return type failed to resolve, which has been
                    // reported at the instantiation
                    return Err(ErasedReportedError::new_unchecked());
                };
                let args = args.into_iter().collect::<Result<Vec<_>, _>>()?;

                Ok(hir::Expr {
                    span: expr.span,
                    ty,
                    bare: hir::Call { func, args }.into(),
                })
            }
            BareExpr::Proj(proj) => {
                let basis = self.handle_expr(&proj.basis, None);
                let field = proj.field.bare();

                let ty = match &basis {
                    Ok(basis) => self.member_ty(basis.ty, field, expr.span),
                    Err(error) => Err(*error),
                };

                match (basis, ty) {
                    (Ok(basis), Ok(ty)) => Ok(hir::Expr {
                        span: expr.span,
                        ty,
                        bare: hir::Proj { basis, field }.into(),
                    }),
                    (Err(error), _) | (_, Err(error)) => Err(error),
                }
            }
        }
    }

    /// Type-check a block, opening a fresh variable scope.
    ///
    /// Statements that failed to check are dropped; their diagnostics
    /// have already been reported.
    fn handle_block(&mut self, block: &ast::Block) -> hir::Block {
        self.vars.push_frame();
        let stmts = block
            .stmts
            .iter()
            .filter_map(|stmt| self.handle_stmt(stmt).ok())
            .collect();
        self.vars.pop_frame();

        hir::Block { stmts }
    }

    fn handle_stmt(&mut self, stmt: &ast::Stmt) -> Result<hir::Stmt> {
        match &stmt.bare {
            BareStmt::Block(block) => Ok(hir::Stmt::Block(self.handle_block(block))),
            BareStmt::Empty => Ok(hir::Stmt::Empty),
            BareStmt::Let(let_) => {
                let declared = let_.ty.as_ref().and_then(|ty| self.eval_ty(ty).ok());
                let init = self.handle_expr(&let_.init, declared);
                let ty = declared.or_else(|| init.as_ref().ok().map(|init| init.ty));

                let mut failed = ty.is_none() || init.is_err();

                if let (Ok(init), Some(ty)) = (&init, ty) {
                    if init.ty != ty {
                        let found = self.program.ty_name(init.ty).to_string();
                        let expected = self.program.ty_name(ty).to_string();
                        self.error(
                            init.span,
                            format!("invalid type {found}, expected type {expected}"),
                        );
                        failed = true;
                    }
                }

                // bind the name even if the initializer did not check so
                // that subsequent uses do not re-report
                if let Some(ty) = ty {
                    self.vars.insert(let_.binder.bare(), ty);
                }

                match (failed, ty, init) {
                    (false, Some(ty), Ok(init)) => Ok(hir::Stmt::Let(Box::new(hir::LetStmt {
                        binder: let_.binder.bare(),
                        ty,
                        init,
                    }))),
                    _ => Err(ErasedReportedError::new_unchecked()),
                }
            }
            BareStmt::If(if_) => {
                let int = self.int_ty();
                let cond = self.check_cond(&if_.cond, int);
                let then = self.handle_stmt(&if_.then);
                let alt = self.handle_stmt(&if_.alt);

                match (cond, then, alt) {
                    (Ok(cond), Ok(then), Ok(alt)) => Ok(hir::Stmt::If(Box::new(hir::IfStmt {
                        cond,
                        then,
                        alt,
                    }))),
                    (Err(error), ..) | (_, Err(error), _) | (.., Err(error)) => Err(error),
                }
            }
            BareStmt::While(while_) => {
                let int = self.int_ty();
                let cond = self.check_cond(&while_.cond, int);
                let body = self.handle_stmt(&while_.body);

                match (cond, body) {
                    (Ok(cond), Ok(body)) => {
                        Ok(hir::Stmt::While(Box::new(hir::WhileStmt { cond, body })))
                    }
                    (Err(error), _) | (_, Err(error)) => Err(error),
                }
            }
            BareStmt::Return(expr) => Ok(hir::Stmt::Return(
                expr.as_ref()
                    .and_then(|expr| self.handle_expr(expr, None).ok()),
            )),
            BareStmt::Expr(expr) => {
                let expr = self.handle_expr(expr, None)?;
                Ok(hir::Stmt::Expr(expr))
            }
        }
    }

    /// Type-check an if/while condition and require it to be `Int`.
    fn check_cond(&mut self, cond: &ast::Expr, int: TyId) -> Result<hir::Expr> {
        let cond = self.handle_expr(cond, Some(int))?;

        if cond.ty != int {
            let found = self.program.ty_name(cond.ty).to_string();
            let expected = self.program.ty_name(int).to_string();
            return Err(self.error(
                cond.span,
                format!("invalid type {found}, expected type {expected}"),
            ));
        }

        Ok(cond)
    }
}
