use crate::base::Parser;
use ast::{BareStmt, Block, IfStmt, LetStmt, Stmt, WhileStmt};
use diagnostics::error::Result;
use span::Spanned;

impl Parser<'_> {
    /// Parse a statement.
    ///
    /// # Grammar
    ///
    /// ```grammar
    /// Stmt ::=
    ///     Block
    ///     | ";"
    ///     | "let" Identifier (":" Ty)? "=" Expr ";"
    ///     | "if" "(" Expr ")" Stmt ("else" Stmt)?
    ///     | "while" "(" Expr ")" Stmt
    ///     | "return" Expr? ";"
    ///     | Expr ";"
    /// ```
    ///
    /// Dispatches on the next significant token.
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt> {
        self.trivia()?;
        let start = self.index();

        if self.at("{") {
            let block = self.parse_block()?;
            return Ok(Spanned::new(self.span_from(start), BareStmt::Block(block)));
        }

        if self.token(";")? {
            return Ok(Spanned::new(self.span_from(start), BareStmt::Empty));
        }

        if self.keyword("let")? {
            let binder = self.expect_ident()?;
            let ty = if self.token(":")? {
                Some(self.parse_ty()?)
            } else {
                None
            };
            self.expect("=")?;
            let init = self.parse_expr()?;
            self.expect(";")?;

            return Ok(Spanned::new(
                self.span_from(start),
                LetStmt { binder, ty, init }.into(),
            ));
        }

        if self.keyword("if")? {
            self.expect("(")?;
            let cond = self.parse_expr()?;
            self.expect(")")?;
            let then = self.parse_stmt()?;
            let alt = if self.keyword("else")? {
                self.parse_stmt()?
            } else {
                // an absent else arm is represented by an empty statement
                Spanned::new(self.here(), BareStmt::Empty)
            };

            return Ok(Spanned::new(
                self.span_from(start),
                IfStmt { cond, then, alt }.into(),
            ));
        }

        if self.keyword("while")? {
            self.expect("(")?;
            let cond = self.parse_expr()?;
            self.expect(")")?;
            let body = self.parse_stmt()?;

            return Ok(Spanned::new(
                self.span_from(start),
                WhileStmt { cond, body }.into(),
            ));
        }

        if self.keyword("return")? {
            let expr = if self.token(";")? {
                None
            } else {
                let expr = self.parse_expr()?;
                self.expect(";")?;
                Some(expr)
            };

            return Ok(Spanned::new(self.span_from(start), BareStmt::Return(expr)));
        }

        let expr = self.parse_expr()?;
        self.expect(";")?;
        Ok(Spanned::new(self.span_from(start), BareStmt::Expr(expr)))
    }

    /// Parse a block of statements.
    pub(crate) fn parse_block(&mut self) -> Result<Block> {
        self.expect("{")?;

        let mut stmts = Vec::new();
        loop {
            if self.token("}")? {
                break;
            }
            if self.at_end()? {
                self.expect("}")?;
            }
            stmts.push(self.parse_stmt()?);
        }

        Ok(Block { stmts })
    }
}
