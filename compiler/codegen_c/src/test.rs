//! Byte-exact emission tests, driven through the parser and the analyzer.

use diagnostics::Reporter;
use span::SourceMap;
use std::path::Path;
use utility::difference;

fn compile(source: &str) -> String {
    let mut map = SourceMap::default();
    let file = map.add(None, source.into());
    let rep = Reporter::silent();

    let ast = parser::parse(file, &map, &rep).expect("the input should parse");
    let program = typer::check(&ast, Path::new("test.mica"), &rep).expect("the input should check");
    crate::emit(&program)
}

#[track_caller]
fn assert_compiles_to(source: &str, expected: &str) {
    let actual = compile(source);

    if actual != expected {
        colored::control::set_override(false);
        panic!(
            "the emitted C does not match the expected text:\n{}",
            difference(expected, &actual, "\n"),
        );
    }
}

#[test]
fn empty_main() {
    assert_compiles_to(
        "func main() { }",
        "\
typedef void t1;

t1 f1(void);

t1 f1(void) {
}

int main(void) {
\tf1();
\treturn 0;
}
",
    );
}

#[test]
fn arithmetic_honors_precedence() {
    assert_compiles_to(
        "func main() { let x = 1 + 2 * 3; }",
        "\
typedef void t1;
typedef int t2;

t1 f1(void);

t1 f1(void) {
\tt2 x = (1 + (2 * 3));
}

int main(void) {
\tf1();
\treturn 0;
}
",
    );
}

#[test]
fn print_int_is_emitted_from_the_builtin_registry() {
    assert_compiles_to(
        "func print_int(x: Int) { }
func main() { print_int(42); }",
        "\
typedef void t1;
typedef int t2;

t1 f1(void);
t1 f2(t2 x);

t1 f1(void) {
\tf2(42);
}

int printf(const char*, ...);
t1 f2(t2 x) {
\tprintf(\"%d\\n\", x);
}

int main(void) {
\tf1();
\treturn 0;
}
",
    );
}

#[test]
fn control_flow_lowers_one_for_one() {
    assert_compiles_to(
        "func main() { let x = 0; while (x < 10) { x = x + 1; } if (x == 10) { x = 0; } else { x = 1; } }",
        "\
typedef void t1;
typedef int t2;

t1 f1(void);

t1 f1(void) {
\tt2 x = 0;
\twhile ((x < 10)) {
\t\t(x = (x + 1));
\t}
\tif ((x == 10)) {
\t\t(x = 0);
\t} else {
\t\t(x = 1);
\t}
}

int main(void) {
\tf1();
\treturn 0;
}
",
    );
}

#[test]
fn empty_else_arm_is_omitted() {
    assert_compiles_to(
        "func main() { if (1) { } }",
        "\
typedef void t1;
typedef int t2;

t1 f1(void);

t1 f1(void) {
\tif (1) {
\t}
}

int main(void) {
\tf1();
\treturn 0;
}
",
    );
}

#[test]
fn structure_definitions_follow_member_completion_order() {
    assert_compiles_to(
        "struct Inner { x: Int }
struct Outer { inner: Inner }
func make(): Outer { return make(); }
func main() { let o: Outer = make(); }",
        "\
typedef void t1;
typedef struct t2 t2;
typedef struct t3 t3;
typedef int t4;

struct t3 {
\tt4 x;
};
struct t2 {
\tt3 inner;
};

t1 f1(void);
t2 f2(void);

t1 f1(void) {
\tt2 o = f2();
}

t2 f2(void) {
\treturn f2();
}

int main(void) {
\tf1();
\treturn 0;
}
",
    );
}

#[test]
fn member_access_emits_a_projection() {
    assert_compiles_to(
        "struct P { v: Int }
func make(): P { return make(); }
func main() { let p: P = make(); let x: Int = p.v; }",
        "\
typedef void t1;
typedef struct t2 t2;
typedef int t3;

struct t2 {
\tt3 v;
};

t1 f1(void);
t2 f2(void);

t1 f1(void) {
\tt2 p = f2();
\tt3 x = p.v;
}

t2 f2(void) {
\treturn f2();
}

int main(void) {
\tf1();
\treturn 0;
}
",
    );
}

#[test]
fn emission_is_deterministic() {
    let source = "func id<T>(x: T): T { return x; }
func main() { let a: Int = id(42); }";

    assert_eq!(compile(source), compile(source));
}
