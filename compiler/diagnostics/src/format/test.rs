use crate::{Diag, UnboxedUntaggedDiag};
use span::{span, SourceMap};
use std::path::PathBuf;
use utility::difference;

#[track_caller]
fn assert_format(diagnostic: &UnboxedUntaggedDiag, map: Option<&SourceMap>, expected: &str) {
    colored::control::set_override(false);
    let actual = super::format(diagnostic, map);

    if actual != expected {
        panic!("the output differs:\n{}", difference(expected, &actual, "\n"));
    }
}

#[test]
fn format_no_highlights() {
    let diagnostic = Diag::error().message("summary");

    assert_format(&diagnostic, None, "error: summary");
}

#[test]
fn format_no_highlights_with_path() {
    let diagnostic = Diag::error()
        .message("no matching function \u{2018}main\u{2019} found")
        .path(PathBuf::from("main.mica"));

    assert_format(
        &diagnostic,
        None,
        "\
error: no matching function \u{2018}main\u{2019} found
 --> main.mica",
    );
}

#[test]
fn format_single_line_primary_highlight() {
    let mut map = SourceMap::default();
    map.add(None, "alpha\nbeta\ngamma\n".into());

    let diagnostic = Diag::error().message("message").primary_span(span(8, 11));

    assert_format(
        &diagnostic,
        Some(&map),
        "\
error: message
 --> :2:2
  |
2 | beta
  |  ^~~
  |",
    );
}

#[test]
fn format_two_line_primary_highlight() {
    let mut map = SourceMap::default();
    map.add(None, "alpha\nbeta\n".into());

    let diagnostic = Diag::error().primary_span(span(1, 9));

    assert_format(
        &diagnostic,
        Some(&map),
        "\
error
 --> :1:1
  |
1 |   alpha
  |  _^
2 | | beta
  | |__^
  |",
    );
}

#[test]
fn format_multi_line_primary_highlight() {
    let mut map = SourceMap::default();
    map.add(None, "alpha\nbeta\ngamma\ndelta\nepsilon".into());

    let diagnostic = Diag::error()
        .message("explanation")
        .primary_span(span(9, 23));

    assert_format(
        &diagnostic,
        Some(&map),
        "\
error: explanation
 --> :2:3
  |
2 |   beta
 ... ___^
4 | | delta
  | |_____^
  |",
    );
}

#[test]
fn format_zero_length_highlight() {
    let mut map = SourceMap::default();
    map.add(None, "alpha\nbeta\n".into());

    let diagnostic = Diag::error().message("message").primary_span(span(7, 7));

    assert_format(
        &diagnostic,
        Some(&map),
        "\
error: message
 --> :2:1
  |
2 |  beta
  | ><
  |",
    );
}

#[test]
fn format_labeled_primary_highlight() {
    let mut map = SourceMap::default();
    map.add(None, "alpha\nbeta\ngamma\n".into());

    let diagnostic = Diag::error()
        .message("message")
        .labeled_primary_span(span(8, 11), "look here");

    assert_format(
        &diagnostic,
        Some(&map),
        "\
error: message
 --> :2:2
  |
2 | beta
  |  ^~~ look here
  |",
    );
}

#[test]
fn format_secondary_highlight() {
    let mut map = SourceMap::default();
    map.add(None, "alpha\nbeta\n".into());

    let diagnostic = Diag::error().message("message").secondary_span(span(1, 6));

    assert_format(
        &diagnostic,
        Some(&map),
        "\
error: message
 --> :1:1
  |
1 | alpha
  | -----
  |",
    );
}

#[test]
fn format_subdiagnostics() {
    let diagnostic = Diag::error()
        .message("summary")
        .note("some context")
        .help("a suggestion");

    assert_format(
        &diagnostic,
        None,
        "\
error: summary
 note: some context
 help: a suggestion",
    );
}

#[test]
fn format_warning() {
    let mut map = SourceMap::default();
    map.add(None, "alpha\n".into());

    let diagnostic = Diag::warning().message("something").primary_span(span(1, 6));

    assert_format(
        &diagnostic,
        Some(&map),
        "\
warning: something
 --> :1:1
  |
1 | alpha
  | ^~~~~
  |",
    );
}

#[test]
fn format_path_with_highlight_location() {
    let mut map = SourceMap::default();
    map.add(Some(PathBuf::from("demo.mica")), "let x = 1;\n".into());

    let diagnostic = Diag::error().message("message").primary_span(span(5, 6));

    assert_format(
        &diagnostic,
        Some(&map),
        "\
error: message
 --> demo.mica:1:5
  |
1 | let x = 1;
  |     ^
  |",
    );
}
