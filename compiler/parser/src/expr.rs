use crate::base::Parser;
use ast::{Assign, BareExpr, BinOp, BinOpKind, Call, Expr, Proj};
use diagnostics::error::Result;
use span::{Span, Spanned, Spanning};

impl Parser<'_> {
    /// Parse an expression.
    ///
    /// # Grammar
    ///
    /// ```grammar
    /// Expr ::= Assignment
    /// ```
    pub(crate) fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_assignment()
    }

    /// ```grammar
    /// Assignment ::= Equality ("=" Assignment)?
    /// ```
    ///
    /// Right-associative. The `=` must not be followed by another `=`
    /// which would form the equality operator.
    fn parse_assignment(&mut self) -> Result<Expr> {
        let lhs = self.parse_equality()?;

        if self.operator("=", Some('='))? {
            let rhs = self.parse_assignment()?;
            let span = lhs.span.merge(&rhs);
            return Ok(Spanned::new(span, Assign { lhs, rhs }.into()));
        }

        Ok(lhs)
    }

    /// ```grammar
    /// Equality ::= Comparison (("==" | "!=") Comparison)*
    /// ```
    fn parse_equality(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_comparison()?;

        loop {
            let op = if self.operator("==", None)? {
                BinOpKind::Eq
            } else if self.operator("!=", None)? {
                BinOpKind::Ne
            } else {
                break;
            };

            let rhs = self.parse_comparison()?;
            lhs = binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// ```grammar
    /// Comparison ::= Additive (("<=" | ">=" | "<" | ">") Additive)*
    /// ```
    ///
    /// The two-character operators are tried first, so a plain `<` or `>`
    /// is never followed by `=`.
    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_additive()?;

        loop {
            let op = if self.operator("<=", None)? {
                BinOpKind::Le
            } else if self.operator(">=", None)? {
                BinOpKind::Ge
            } else if self.operator("<", Some('='))? {
                BinOpKind::Lt
            } else if self.operator(">", Some('='))? {
                BinOpKind::Gt
            } else {
                break;
            };

            let rhs = self.parse_additive()?;
            lhs = binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// ```grammar
    /// Additive ::= Multiplicative (("+" | "-") Multiplicative)*
    /// ```
    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_multiplicative()?;

        loop {
            let op = if self.operator("+", None)? {
                BinOpKind::Add
            } else if self.operator("-", None)? {
                BinOpKind::Sub
            } else {
                break;
            };

            let rhs = self.parse_multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// ```grammar
    /// Multiplicative ::= Postfix (("*" | "/" | "%") Postfix)*
    /// ```
    ///
    /// `//` and `/*` never reach the operator match: they are consumed as
    /// trivia beforehand.
    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_postfix()?;

        loop {
            let op = if self.operator("*", None)? {
                BinOpKind::Mul
            } else if self.operator("/", None)? {
                BinOpKind::Div
            } else if self.operator("%", None)? {
                BinOpKind::Rem
            } else {
                break;
            };

            let rhs = self.parse_postfix()?;
            lhs = binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// ```grammar
    /// Postfix ::= Terminal ("(" Args ")" | "." Identifier)*
    /// ```
    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_terminal()?;

        loop {
            if self.token("(")? {
                let args = self.parse_args()?;
                let span = expr.span.merge(self.here());
                expr = Spanned::new(span, Call { callee: expr, args }.into());
            } else if self.token(".")? {
                let field = self.expect_ident()?;
                let span = expr.span.merge(field);
                expr = Spanned::new(span, Proj { basis: expr, field }.into());
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse call arguments, the opening bracket already consumed.
    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();

        if self.token(")")? {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr()?);

            if self.token(",")? {
                continue;
            }

            self.expect(")")?;
            break;
        }

        Ok(args)
    }

    /// ```grammar
    /// Terminal ::=
    ///     "(" Expr ")"
    ///     | "false" | "true"
    ///     | Number-Literal
    ///     | Identifier
    /// ```
    ///
    /// `false` and `true` are collected as the number literals `0` and `1`.
    fn parse_terminal(&mut self) -> Result<Expr> {
        self.trivia()?;
        let start = self.index();

        if self.token("(")? {
            let expr = self.parse_expr()?;
            self.expect(")")?;
            return Ok(expr);
        }

        if self.keyword("false")? {
            return Ok(Spanned::new(self.span_from(start), BareExpr::NumLit(0)));
        }

        if self.keyword("true")? {
            return Ok(Spanned::new(self.span_from(start), BareExpr::NumLit(1)));
        }

        if let Some(expr) = self.parse_num_lit()? {
            return Ok(expr);
        }

        if let Some(ident) = self.ident()? {
            return Ok(Spanned::new(ident.span(), ident.into()));
        }

        Err(self.error("expected an expression"))
    }

    /// Parse a base-10 integer literal.
    ///
    /// The accumulator is 32 bits wide and wraps on overflow.
    fn parse_num_lit(&mut self) -> Result<Option<Expr>> {
        self.trivia()?;
        let start = self.index();

        if !self.at_digit() {
            return Ok(None);
        }

        let mut value: i32 = 0;
        while let Some(digit) = self.eat_digit() {
            value = value.wrapping_mul(10).wrapping_add(digit);
        }

        Ok(Some(Spanned::new(
            self.span_from(start),
            BareExpr::NumLit(value),
        )))
    }

    /// Parse a type expression.
    ///
    /// # Grammar
    ///
    /// ```grammar
    /// Ty ::= Identifier ("<" Ty ("," Ty)* ">")*
    /// ```
    ///
    /// A template application is encoded as a call whose callee is the
    /// structure name; the analyzer rejects deeper callees.
    pub(crate) fn parse_ty(&mut self) -> Result<Expr> {
        self.trivia()?;

        let Some(ident) = self.ident()? else {
            return Err(self.error("expected a type"));
        };
        let mut ty = Spanned::new(ident.span(), BareExpr::from(ident));

        loop {
            if !self.token("<")? {
                break;
            }

            let mut args = vec![self.parse_ty()?];
            while self.token(",")? {
                args.push(self.parse_ty()?);
            }
            self.expect(">")?;

            let span = ty.span.merge(self.here());
            ty = Spanned::new(span, Call { callee: ty, args }.into());
        }

        Ok(ty)
    }
}

fn binary(op: BinOpKind, lhs: Expr, rhs: Expr) -> Expr {
    let span: Span = lhs.span.merge(&rhs);
    Spanned::new(span, BinOp { op, lhs, rhs }.into())
}
