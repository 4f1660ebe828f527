// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn merge_covers_both_spans() {
    let a = Span::new(2, 5);
    let b = Span::new(10, 12);
    assert_eq!(a.merge(b), Span::new(2, 12));
}

#[test]
fn locate_span_tracks_lines_and_columns() {
    let source = "add(1,2)\nsub(3,4)";
    let pos = locate_span(source, 9);
    assert_eq!(pos, LineCol { line: 2, column: 1 });
}

#[test]
fn locate_span_first_line_is_one_indexed() {
    let source = "declare(x, 'N', 1)";
    let pos = locate_span(source, 0);
    assert_eq!(pos, LineCol { line: 1, column: 1 });
}

#[test]
fn slice_extracts_source_text() {
    let source = "add(1,2)";
    let span = Span::new(0, 3);
    assert_eq!(span.slice(source), "add");
}
