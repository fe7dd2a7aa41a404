//! The C emitter.
//!
//! Deterministic textual lowering of the semantic IR to free-standing C.
//! Types are emitted as `tN`, functions as `fN` where `N` is the
//! respective id; locals keep their source names. Forward declarations
//! for every type and function come first, so the later definitions may
//! reference each other freely; structure *definitions* follow the
//! member-completion order recorded by the analyzer since C requires
//! by-value member types to be complete.

use hir::{BareExpr, Block, Expr, FuncId, FuncInst, Program, Stmt, Ty, TyId};

mod builtin;

#[cfg(test)]
mod test;

/// Serialize the checked program to C source text.
pub fn emit(program: &Program) -> String {
    Emitter {
        program,
        out: String::new(),
        indentation: 0,
    }
    .run()
}

struct Emitter<'a> {
    program: &'a Program,
    out: String,
    indentation: usize,
}

impl Emitter<'_> {
    fn run(mut self) -> String {
        let program = self.program;

        // typedefs and forward declarations for all types, in id order
        for (id, ty) in program.tys() {
            match ty {
                Ty::Void => self.line(format!("typedef void t{};", id.number())),
                Ty::Int => self.line(format!("typedef int t{};", id.number())),
                Ty::Struct(_) => self.line(format!("typedef struct t{0} t{0};", id.number())),
            }
        }
        self.blank();

        // structure definitions, each after the types of its members
        let mut any_structs = false;
        for &id in &program.ty_order {
            let Ty::Struct(ty) = program.ty(id) else {
                continue;
            };
            any_structs = true;

            self.line(format!("struct t{} {{", id.number()));
            self.indentation += 1;
            for member in &ty.members {
                let ty = self.ty(member.ty);
                self.line(format!("{ty} {};", member.binder));
            }
            self.indentation -= 1;
            self.line("};");
        }
        if any_structs {
            self.blank();
        }

        // function prototypes, in id order
        for (id, func) in program.funcs() {
            let signature = self.signature(id, func);
            self.line(format!("{signature};"));
        }
        self.blank();

        // function definitions, in id order
        for (id, func) in program.funcs() {
            match builtin::look_up(program, func) {
                Some(builtin) => (builtin.emit)(&mut self, id, func),
                None => self.definition(id, func),
            }
        }

        // the entry trampoline
        let entry = program.entry.expect("emission requires a checked program");
        self.line("int main(void) {");
        self.indentation += 1;
        self.line(format!("f{}();", entry.number()));
        self.line("return 0;");
        self.indentation -= 1;
        self.line("}");

        self.out
    }

    fn definition(&mut self, id: FuncId, func: &FuncInst) {
        let signature = self.signature(id, func);
        self.out.push_str(&signature);
        self.out.push(' ');
        self.block(&func.body);
        self.out.push('\n');
        self.blank();
    }

    fn signature(&self, id: FuncId, func: &FuncInst) -> String {
        let mut signature = format!("{} f{}(", self.ty(func.ty), id.number());

        if func.params.is_empty() {
            signature.push_str("void");
        } else {
            for (index, param) in func.params.iter().enumerate() {
                if index != 0 {
                    signature.push_str(", ");
                }
                signature.push_str(&format!("{} {}", self.ty(param.ty), param.binder));
            }
        }

        signature.push(')');
        signature
    }

    fn ty(&self, ty: Option<TyId>) -> String {
        // unresolved types never survive to emission
        let ty = ty.expect("emission requires a fully typed program");
        format!("t{}", ty.number())
    }

    fn block(&mut self, block: &Block) {
        self.out.push_str("{\n");
        self.indentation += 1;
        for stmt in &block.stmts {
            self.indent();
            self.stmt(stmt);
            self.out.push('\n');
        }
        self.indentation -= 1;
        self.indent();
        self.out.push('}');
    }

    /// Emit a statement, without leading indentation or a trailing line break.
    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block(block),
            Stmt::Empty => self.out.push(';'),
            Stmt::Let(let_) => {
                let ty = self.ty(Some(let_.ty));
                self.out.push_str(&format!("{ty} {} = ", let_.binder));
                self.expr(&let_.init);
                self.out.push(';');
            }
            Stmt::If(if_) => {
                self.out.push_str("if (");
                self.expr(&if_.cond);
                self.out.push_str(") ");
                self.stmt(&if_.then);

                if !matches!(if_.alt, Stmt::Empty) {
                    self.out.push_str(" else ");
                    self.stmt(&if_.alt);
                }
            }
            Stmt::While(while_) => {
                self.out.push_str("while (");
                self.expr(&while_.cond);
                self.out.push_str(") ");
                self.stmt(&while_.body);
            }
            Stmt::Return(expr) => match expr {
                Some(expr) => {
                    self.out.push_str("return ");
                    self.expr(expr);
                    self.out.push(';');
                }
                None => self.out.push_str("return;"),
            },
            Stmt::Expr(expr) => {
                self.expr(expr);
                self.out.push(';');
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match &expr.bare {
            BareExpr::NumLit(value) => self.out.push_str(&value.to_string()),
            BareExpr::Name(name) => self.out.push_str(name.to_str()),
            BareExpr::BinOp(binary) => {
                self.out.push('(');
                self.expr(&binary.lhs);
                self.out.push_str(&format!(" {} ", binary.op.symbol()));
                self.expr(&binary.rhs);
                self.out.push(')');
            }
            BareExpr::Assign(assign) => {
                self.out.push('(');
                self.expr(&assign.lhs);
                self.out.push_str(" = ");
                self.expr(&assign.rhs);
                self.out.push(')');
            }
            BareExpr::Call(call) => {
                self.out.push_str(&format!("f{}(", call.func.number()));
                for (index, arg) in call.args.iter().enumerate() {
                    if index != 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg);
                }
                self.out.push(')');
            }
            BareExpr::Proj(proj) => {
                self.expr(&proj.basis);
                self.out.push('.');
                self.out.push_str(proj.field.to_str());
            }
        }
    }

    fn line(&mut self, line: impl AsRef<str>) {
        self.indent();
        self.out.push_str(line.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn indent(&mut self) {
        for _ in 0..self.indentation {
            self.out.push('\t');
        }
    }
}
