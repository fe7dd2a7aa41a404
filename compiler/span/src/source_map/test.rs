use super::{Highlight, LineWithHighlight, SourceMap};
use crate::span;

#[test]
fn lines_single_line_highlight() {
    let mut map = SourceMap::default();
    map.add(None, "alpha\nbeta\ngamma\n".into());

    let lines = map.lines_with_highlight(span(8, 11));

    assert_eq!(lines.path, None);
    assert_eq!(
        lines.first,
        LineWithHighlight {
            number: 2,
            content: "beta",
            highlight: Highlight {
                start: 2,
                end: 5,
                width: 3,
                prefix_width: 1,
            },
        },
    );
    assert_eq!(lines.last, None);
}

#[test]
fn lines_highlight_at_start_of_first_line() {
    let mut map = SourceMap::default();
    map.add(None, "alpha\nbeta\n".into());

    let lines = map.lines_with_highlight(span(1, 6));

    assert_eq!(
        lines.first,
        LineWithHighlight {
            number: 1,
            content: "alpha",
            highlight: Highlight {
                start: 1,
                end: 6,
                width: 5,
                prefix_width: 0,
            },
        },
    );
    assert_eq!(lines.last, None);
}

#[test]
fn lines_multi_line_highlight() {
    let mut map = SourceMap::default();
    map.add(None, "alpha\nbeta\ngamma\n".into());

    let lines = map.lines_with_highlight(span(7, 17));

    assert_eq!(
        lines.first,
        LineWithHighlight {
            number: 2,
            content: "beta",
            highlight: Highlight {
                start: 1,
                end: 5,
                width: 4,
                prefix_width: 0,
            },
        },
    );
    assert_eq!(
        lines.last,
        Some(LineWithHighlight {
            number: 3,
            content: "gamma",
            highlight: Highlight {
                start: 1,
                end: 6,
                width: 5,
                prefix_width: 0,
            },
        }),
    );
}

#[test]
fn lines_zero_length_highlight() {
    let mut map = SourceMap::default();
    map.add(None, "alpha\nbeta\n".into());

    let lines = map.lines_with_highlight(span(7, 7));

    assert_eq!(
        lines.first,
        LineWithHighlight {
            number: 2,
            content: "beta",
            highlight: Highlight {
                start: 1,
                end: 1,
                width: 0,
                prefix_width: 0,
            },
        },
    );
    assert_eq!(lines.last, None);
}

#[test]
fn lines_zero_length_highlight_at_end_of_input() {
    let mut map = SourceMap::default();
    map.add(None, "alpha".into());

    let lines = map.lines_with_highlight(span(6, 6));

    assert_eq!(
        lines.first,
        LineWithHighlight {
            number: 1,
            content: "alpha",
            highlight: Highlight {
                start: 6,
                end: 6,
                width: 0,
                prefix_width: 5,
            },
        },
    );
    assert_eq!(lines.last, None);
}

#[test]
fn snippet_resolution() {
    let mut map = SourceMap::default();
    map.add(None, "let x = 1;".into());

    assert_eq!(map.snippet(span(5, 6)), "x");
    assert_eq!(map.snippet(span(1, 4)), "let");
}

#[test]
fn files_are_padded_apart() {
    let mut map = SourceMap::default();
    map.add(None, "aaa".into());
    let second = map.add(None, "bbb".into());

    // first file occupies 1..4, the second one 5..8
    assert_eq!(map.snippet(span(5, 8)), "bbb");
    assert_eq!(map[second].content(), "bbb");
}
