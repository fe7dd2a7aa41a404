//! Unification of type expression patterns against concrete types.

use crate::Typer;
use ast::BareExpr;
use hir::TyId;

impl Typer<'_> {
    /// Unify a candidate's parameter type patterns against the actual
    /// argument types and, if an expected type is known, its return type
    /// pattern against that as well.
    ///
    /// On success every template parameter is bound to a concrete type;
    /// the bindings are returned in declaration order. A `None` argument
    /// type (an argument that failed to check) never matches.
    pub(crate) fn unify(
        &mut self,
        func: &ast::Func,
        args: &[Option<TyId>],
        expected: Option<TyId>,
    ) -> Option<Vec<TyId>> {
        if func.params.len() != args.len() {
            return None;
        }

        let mut slots = vec![None; func.ty_params.len()];

        for (param, &arg) in func.params.iter().zip(args) {
            if !self.unify_pat(func, &mut slots, &param.ty, arg?) {
                return None;
            }
        }

        if let Some(expected) = expected {
            if !self.unify_pat(func, &mut slots, &func.ty, expected) {
                return None;
            }
        }

        // every template parameter must have been determined
        slots.into_iter().collect()
    }

    /// Match one type expression pattern against one concrete type.
    ///
    /// Matching is invariant: a template parameter that is already bound
    /// must be bound to exactly the same type again.
    fn unify_pat(
        &mut self,
        func: &ast::Func,
        slots: &mut Vec<Option<TyId>>,
        pattern: &ast::Expr,
        actual: TyId,
    ) -> bool {
        match &pattern.bare {
            BareExpr::Name(ident) => {
                let name = ident.bare();

                // a name that denotes a template parameter acts as a variable
                if let Some(index) = func
                    .ty_params
                    .iter()
                    .position(|param| param.bare() == name)
                {
                    return match slots[index] {
                        Some(bound) => bound == actual,
                        None => {
                            slots[index] = Some(actual);
                            true
                        }
                    };
                }

                // anything else resolves as a concrete type and must
                // match the actual type exactly
                match self.resolve_ty(name, Vec::new(), pattern.span) {
                    Ok(ty) => ty == actual,
                    Err(_) => false,
                }
            }
            BareExpr::Call(call) => {
                let Ok(name) = self.name_of(&call.callee) else {
                    return false;
                };

                let Some(structure) = self.program.ty(actual).struct_() else {
                    return false;
                };
                if structure.binder != name || call.args.len() != structure.args.len() {
                    return false;
                }

                let actual_args = structure.args.clone();
                call.args
                    .iter()
                    .zip(actual_args)
                    .all(|(pattern, actual)| self.unify_pat(func, slots, pattern, actual))
            }
            _ => false,
        }
    }
}
