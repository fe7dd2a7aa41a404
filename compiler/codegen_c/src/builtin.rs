//! The builtin registry.
//!
//! A builtin is recognized by its name and signature; its source body is
//! ignored and the registered emitter produces the definition instead.

use crate::Emitter;
use hir::{FuncId, FuncInst, Program, Ty};
use utility::Atom;

pub(crate) struct Builtin {
    name: Atom,
    signature: fn(&Program, &FuncInst) -> bool,
    pub(crate) emit: fn(&mut Emitter<'_>, FuncId, &FuncInst),
}

pub(crate) const BUILTINS: &[Builtin] = &[
    // print_int(Int) -> Void
    Builtin {
        name: Atom::PRINT_INT,
        signature: print_int_signature,
        emit: print_int,
    },
];

pub(crate) fn look_up(program: &Program, func: &FuncInst) -> Option<&'static Builtin> {
    BUILTINS
        .iter()
        .find(|builtin| builtin.name == func.binder && (builtin.signature)(program, func))
}

fn print_int_signature(program: &Program, func: &FuncInst) -> bool {
    func.ty_args.is_empty()
        && matches!(func.ty.map(|ty| program.ty(ty)), Some(Ty::Void))
        && match func.params.as_slice() {
            [param] => matches!(param.ty.map(|ty| program.ty(ty)), Some(Ty::Int)),
            _ => false,
        }
}

/// The definition of `print_int`, together with the declaration of the
/// only piece of the C library the emitted program uses.
fn print_int(emitter: &mut Emitter<'_>, id: FuncId, func: &FuncInst) {
    let signature = emitter.signature(id, func);
    let param = func.params[0].binder;

    emitter.line("int printf(const char*, ...);");
    emitter.line(format!("{signature} {{"));
    emitter.indentation += 1;
    emitter.line(format!("printf(\"%d\\n\", {param});"));
    emitter.indentation -= 1;
    emitter.line("}");
    emitter.blank();
}
