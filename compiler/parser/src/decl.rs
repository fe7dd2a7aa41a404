use crate::base::Parser;
use ast::{BareExpr, Func, Ident, Member, Param, Params, Program, Structure};
use diagnostics::error::Result;
use span::{Spanned, Spanning};
use utility::Atom;

impl Parser<'_> {
    /// Parse the top level of a source file.
    ///
    /// # Grammar
    ///
    /// ```grammar
    /// Program ::= (Func | Struct)* End-Of-Input
    /// ```
    ///
    /// A zero-byte file is rejected outright; a file that only becomes
    /// empty after skipping whitespace and comments yields a program
    /// with no declarations.
    pub(crate) fn parse_program(&mut self) -> Result<Program> {
        let mut program = Program::default();

        if self.at_raw_end() {
            return Err(self.error("expected a function"));
        }

        loop {
            if self.at_end()? {
                break;
            }

            if self.keyword("func")? {
                program.funcs.push(self.parse_func()?);
                continue;
            }

            if self.keyword("struct")? {
                program.structs.push(self.parse_structure()?);
                continue;
            }

            return Err(self.error("expected a function"));
        }

        Ok(program)
    }

    /// ```grammar
    /// Func ::=
    ///     "func" Identifier Ty-Params?
    ///     "(" (Identifier ":" Ty ("," Identifier ":" Ty)*)? ")"
    ///     (":" Ty)? Block
    /// ```
    ///
    /// An absent return type is parsed as `Void`.
    fn parse_func(&mut self) -> Result<Func> {
        let binder = self.expect_ident()?;
        let ty_params = self.parse_ty_params()?;

        self.expect("(")?;
        let mut params = Params::new();
        self.trivia()?;
        if !self.at(")") {
            loop {
                let binder = self.expect_ident()?;
                self.expect(":")?;
                let ty = self.parse_ty()?;
                params.push(Param { binder, ty });

                if self.token(",")? {
                    continue;
                }
                break;
            }
        }
        self.expect(")")?;

        let ty = if self.token(":")? {
            self.parse_ty()?
        } else {
            let ident = Ident::new(self.here(), Atom::VOID);
            Spanned::new(ident.span(), BareExpr::from(ident))
        };

        let body = self.parse_block()?;

        Ok(Func {
            binder,
            ty_params,
            params,
            ty,
            body,
        })
    }

    /// ```grammar
    /// Ty-Params ::= ("<" Identifier ("," Identifier)* ">")?
    /// ```
    fn parse_ty_params(&mut self) -> Result<Vec<Ident>> {
        let mut ty_params = Vec::new();

        if self.token("<")? {
            loop {
                ty_params.push(self.expect_ident()?);

                if self.token(",")? {
                    continue;
                }
                break;
            }
            self.expect(">")?;
        }

        Ok(ty_params)
    }

    /// ```grammar
    /// Struct ::=
    ///     "struct" Identifier Ty-Params?
    ///     "{" (Identifier ":" Ty ("," Identifier ":" Ty)*)? "}"
    /// ```
    fn parse_structure(&mut self) -> Result<Structure> {
        let binder = self.expect_ident()?;
        let ty_params = self.parse_ty_params()?;

        self.expect("{")?;
        let mut members = Vec::new();
        self.trivia()?;
        if !self.at("}") {
            loop {
                let binder = self.expect_ident()?;
                self.expect(":")?;
                let ty = self.parse_ty()?;
                members.push(Member { binder, ty });

                if self.token(",")? {
                    continue;
                }
                break;
            }
        }
        self.expect("}")?;

        Ok(Structure {
            binder,
            ty_params,
            members,
        })
    }
}
