//! Positive and negative behavior tests for the parser.

use crate::base::Parser;
use ast::{BareExpr, BareStmt, BinOp, BinOpKind, Call, Expr, Ident, Proj};
use diagnostics::{error::Result, reporter::Buffer, Reporter};
use span::{span, SourceMap, Span, Spanned};
use utility::{default, difference};

fn parse_program(source: &str) -> Result<ast::Program> {
    let mut map = SourceMap::default();
    let file = map.add(None, source.into());
    crate::parse(file, &map, &Reporter::silent())
}

fn parse_expr(source: &str) -> Result<Expr> {
    let mut map = SourceMap::default();
    let file = map.add(None, source.into());
    let rep = Reporter::silent();
    let mut parser = Parser::new(file, &map, &rep);
    let expr = parser.parse_expr()?;
    assert!(parser.at_end()?, "the parser did not consume all input");
    Ok(expr)
}

fn parse_ty(source: &str) -> Result<Expr> {
    let mut map = SourceMap::default();
    let file = map.add(None, source.into());
    let rep = Reporter::silent();
    let mut parser = Parser::new(file, &map, &rep);
    let ty = parser.parse_ty()?;
    assert!(parser.at_end()?, "the parser did not consume all input");
    Ok(ty)
}

/// Parse erroneous input and return the message of the reported diagnostic.
fn parse_error(source: &str) -> String {
    let mut map = SourceMap::default();
    let file = map.add(None, source.into());
    let buffer: Buffer = default();
    let rep = Reporter::buffer(buffer.clone());

    let result = crate::parse(file, &map, &rep);
    assert!(result.is_err(), "the parser accepted erroneous input");

    let diagnostics = buffer.lock().unwrap();
    diagnostics
        .first()
        .unwrap()
        .message
        .clone()
        .unwrap()
        .into_owned()
}

#[track_caller]
fn assert_eq<T: PartialEq + std::fmt::Debug>(actual: T, expected: T) {
    if actual != expected {
        colored::control::set_override(false);

        panic!(
            "the actual output of the parser does not match the expected one:\n{}",
            difference(
                &format!("{expected:#?}"),
                &format!("{actual:#?}"),
                "\n"
            ),
        );
    }
}

fn ident(name: &str, span: Span) -> Ident {
    Ident::new(span, name.into())
}

fn name(name_: &str, span: Span) -> Expr {
    Spanned::new(span, BareExpr::Name(ident(name_, span)))
}

fn num(value: i32, span: Span) -> Expr {
    Spanned::new(span, BareExpr::NumLit(value))
}

fn binary(op: BinOpKind, lhs: Expr, rhs: Expr, span: Span) -> Expr {
    Spanned::new(span, BinOp { op, lhs, rhs }.into())
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq(
        parse_expr("1 + 2 * 3"),
        Ok(binary(
            BinOpKind::Add,
            num(1, span(1, 2)),
            binary(
                BinOpKind::Mul,
                num(2, span(5, 6)),
                num(3, span(9, 10)),
                span(5, 10),
            ),
            span(1, 10),
        )),
    );
}

#[test]
fn subtraction_is_left_associative() {
    assert_eq(
        parse_expr("1 - 2 - 3"),
        Ok(binary(
            BinOpKind::Sub,
            binary(
                BinOpKind::Sub,
                num(1, span(1, 2)),
                num(2, span(5, 6)),
                span(1, 6),
            ),
            num(3, span(9, 10)),
            span(1, 10),
        )),
    );
}

#[test]
fn assignment_is_right_associative() {
    assert_eq(
        parse_expr("a = b = 1"),
        Ok(Spanned::new(
            span(1, 10),
            ast::Assign {
                lhs: name("a", span(1, 2)),
                rhs: Spanned::new(
                    span(5, 10),
                    ast::Assign {
                        lhs: name("b", span(5, 6)),
                        rhs: num(1, span(9, 10)),
                    }
                    .into(),
                ),
            }
            .into(),
        )),
    );
}

#[test]
fn relational_operators() {
    assert_eq(
        parse_expr("a < b"),
        Ok(binary(
            BinOpKind::Lt,
            name("a", span(1, 2)),
            name("b", span(5, 6)),
            span(1, 6),
        )),
    );
    assert_eq(
        parse_expr("a <= b"),
        Ok(binary(
            BinOpKind::Le,
            name("a", span(1, 2)),
            name("b", span(6, 7)),
            span(1, 7),
        )),
    );
}

#[test]
fn postfix_call_chain() {
    assert_eq(
        parse_expr("f(1)(2)"),
        Ok(Spanned::new(
            span(1, 8),
            Call {
                callee: Spanned::new(
                    span(1, 5),
                    Call {
                        callee: name("f", span(1, 2)),
                        args: vec![num(1, span(3, 4))],
                    }
                    .into(),
                ),
                args: vec![num(2, span(6, 7))],
            }
            .into(),
        )),
    );
}

#[test]
fn member_access_chain() {
    assert_eq(
        parse_expr("a.b.c"),
        Ok(Spanned::new(
            span(1, 6),
            Proj {
                basis: Spanned::new(
                    span(1, 4),
                    Proj {
                        basis: name("a", span(1, 2)),
                        field: ident("b", span(3, 4)),
                    }
                    .into(),
                ),
                field: ident("c", span(5, 6)),
            }
            .into(),
        )),
    );
}

#[test]
fn method_call_shape() {
    assert_eq(
        parse_expr("x.f(y)"),
        Ok(Spanned::new(
            span(1, 7),
            Call {
                callee: Spanned::new(
                    span(1, 4),
                    Proj {
                        basis: name("x", span(1, 2)),
                        field: ident("f", span(3, 4)),
                    }
                    .into(),
                ),
                args: vec![name("y", span(5, 6))],
            }
            .into(),
        )),
    );
}

#[test]
fn boolean_literals() {
    assert_eq(parse_expr("true"), Ok(num(1, span(1, 5))));
    assert_eq(parse_expr("false"), Ok(num(0, span(1, 6))));
}

#[test]
fn keyword_boundary() {
    // `truthy` begins with the keyword `true` but is an identifier
    assert_eq(parse_expr("truthy"), Ok(name("truthy", span(1, 7))));
}

#[test]
fn number_literal_wraps_to_signed_32_bits() {
    assert_eq(parse_expr("2147483648"), Ok(num(i32::MIN, span(1, 11))));
    assert_eq(parse_expr("4294967296"), Ok(num(0, span(1, 11))));
}

#[test]
fn comments_are_trivia() {
    assert_eq(
        parse_expr("1 /* two */ + 3"),
        Ok(binary(
            BinOpKind::Add,
            num(1, span(1, 2)),
            num(3, span(15, 16)),
            span(1, 16),
        )),
    );
    assert_eq(parse_expr("// line\n2"), Ok(num(2, span(9, 10))));
}

#[test]
fn parenthesized_expression_keeps_inner_span() {
    assert_eq(
        parse_expr("(1 + 2) * 3"),
        Ok(binary(
            BinOpKind::Mul,
            binary(
                BinOpKind::Add,
                num(1, span(2, 3)),
                num(2, span(6, 7)),
                span(2, 7),
            ),
            num(3, span(11, 12)),
            span(2, 12),
        )),
    );
}

#[test]
fn template_application_type() {
    assert_eq(
        parse_ty("Pair<Int, X>"),
        Ok(Spanned::new(
            span(1, 13),
            Call {
                callee: name("Pair", span(1, 5)),
                args: vec![name("Int", span(6, 9)), name("X", span(11, 12))],
            }
            .into(),
        )),
    );
}

#[test]
fn function_with_defaulted_return_type() {
    let program = parse_program("func main() {}").unwrap();

    assert_eq(program.funcs.len(), 1);
    let main = &program.funcs[0];
    assert_eq(main.binder.to_str(), "main");
    assert!(main.ty_params.is_empty());
    assert!(main.params.is_empty());
    // the substituted return type is `Void` with an empty span
    assert_eq(&main.ty.bare, &BareExpr::Name(ident("Void", default())));
    assert!(main.ty.span.is_empty());
    assert!(main.body.stmts.is_empty());
}

#[test]
fn function_with_explicit_return_type() {
    let program = parse_program("func f(x: Int): Int { return x; }").unwrap();

    let func = &program.funcs[0];
    assert_eq(func.params.len(), 1);
    assert_eq(func.params[0].binder.to_str(), "x");
    assert_eq(&func.ty.bare, &BareExpr::Name(ident("Int", default())));
    assert!(!func.ty.span.is_empty());
}

#[test]
fn structure_declaration() {
    let program = parse_program("struct Pair<A, B> { first: A, second: B }").unwrap();

    assert_eq(program.structs.len(), 1);
    let structure = &program.structs[0];
    assert_eq(structure.binder.to_str(), "Pair");
    assert_eq(
        structure
            .ty_params
            .iter()
            .map(|param| param.to_str())
            .collect::<Vec<_>>(),
        vec!["A", "B"],
    );
    assert_eq(
        structure
            .members
            .iter()
            .map(|member| member.binder.to_str())
            .collect::<Vec<_>>(),
        vec!["first", "second"],
    );
}

#[test]
fn statement_dispatch() {
    let program = parse_program(
        "func main() { let x: Int = 1; if (x) x; else ; while (0) { } return; }",
    )
    .unwrap();

    let stmts = &program.funcs[0].body.stmts;
    assert_eq(stmts.len(), 4);
    assert!(matches!(stmts[0].bare, BareStmt::Let(_)));
    assert!(matches!(stmts[1].bare, BareStmt::If(_)));
    assert!(matches!(stmts[2].bare, BareStmt::While(_)));
    assert!(matches!(stmts[3].bare, BareStmt::Return(None)));
}

#[test]
fn if_without_else_has_empty_alternative() {
    let program = parse_program("func main() { if (1) { } }").unwrap();

    let BareStmt::If(if_) = &program.funcs[0].body.stmts[0].bare else {
        panic!("expected an if-statement");
    };
    assert_eq(&if_.alt.bare, &BareStmt::Empty);
}

#[test]
fn let_without_annotation() {
    let program = parse_program("func main() { let x = 1 + 2; }").unwrap();

    let BareStmt::Let(let_) = &program.funcs[0].body.stmts[0].bare else {
        panic!("expected a let-statement");
    };
    assert!(let_.ty.is_none());
}

#[test]
fn error_on_empty_input() {
    assert_eq(parse_error(""), "expected a function".to_owned());
}

#[test]
fn trivia_only_input_is_a_program_without_declarations() {
    let program = parse_program(" ").unwrap();
    assert!(program.funcs.is_empty() && program.structs.is_empty());

    let program = parse_program("  // a comment\n/* another */").unwrap();
    assert!(program.funcs.is_empty() && program.structs.is_empty());
}

#[test]
fn error_on_stray_top_level_token() {
    assert_eq(parse_error("@"), "expected a function".to_owned());
    assert_eq(
        parse_error("func f() { } let x = 1;"),
        "expected a function".to_owned(),
    );
}

#[test]
fn error_on_missing_parameter_name() {
    assert_eq(
        parse_error("func f( { }"),
        "expected an identifier".to_owned(),
    );
}

#[test]
fn error_on_missing_expression() {
    assert_eq(
        parse_error("func f() { 1 + } "),
        "expected an expression".to_owned(),
    );
}

#[test]
fn error_on_unterminated_block_comment() {
    assert_eq(
        parse_error("/* never closed"),
        "expected \u{2018}*/\u{2019}".to_owned(),
    );
}

#[test]
fn error_on_missing_semicolon() {
    assert_eq(
        parse_error("func f() { let x = 1 }"),
        "expected \u{2018};\u{2019}".to_owned(),
    );
}

#[test]
fn error_on_missing_body() {
    assert_eq(
        parse_error("func f()"),
        "expected \u{2018}{\u{2019}".to_owned(),
    );
}
