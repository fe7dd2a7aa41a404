//! Rendering of semantic entities for diagnostics.

use crate::{Program, Ty, TyId};
use std::fmt;
use utility::displayed;

impl Program {
    /// Render a type name the way it is spelled in the surface language,
    /// e.g. `Int` or `Pair<Int, Int>`.
    pub fn ty_name(&self, id: TyId) -> impl fmt::Display + '_ {
        displayed(move |f| self.write_ty_name(id, f))
    }

    fn write_ty_name(&self, id: TyId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty(id) {
            Ty::Void => write!(f, "Void"),
            Ty::Int => write!(f, "Int"),
            Ty::Struct(ty) => {
                write!(f, "{}", ty.binder)?;

                if !ty.args.is_empty() {
                    write!(f, "<")?;
                    for (index, &arg) in ty.args.iter().enumerate() {
                        if index != 0 {
                            write!(f, ", ")?;
                        }
                        self.write_ty_name(arg, f)?;
                    }
                    write!(f, ">")?;
                }

                Ok(())
            }
        }
    }
}
