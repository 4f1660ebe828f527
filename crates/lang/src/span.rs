// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Byte-offset source spans and diagnostic rendering.

use serde::{Deserialize, Serialize};

/// A half-open byte range into the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// The smallest span covering both `self` and `other`.
    pub fn merge(&self, other: Span) -> Span {
        Span { start: self.start.min(other.start), end: self.end.max(other.end) }
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start.min(source.len())..self.end.min(source.len())]
    }
}

/// 1-indexed line and column of a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

/// Locate the 1-indexed line and column of `offset` within `source`.
pub fn locate_span(source: &str, offset: usize) -> LineCol {
    let mut line = 1u32;
    let mut column = 1u32;
    for (idx, ch) in source.char_indices() {
        if idx >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    LineCol { line, column }
}

/// Render a rustc-style snippet with a `^^^` caret underline beneath `span`.
pub fn diagnostic_context(source: &str, span: Span) -> String {
    let start = locate_span(source, span.start);
    let line_text = source.lines().nth((start.line - 1) as usize).unwrap_or("");
    let underline_len = span.len().max(1);
    let caret_offset = (start.column - 1) as usize;
    format!(
        "{line:>4} | {text}\n     | {pad}{carets}",
        line = start.line,
        text = line_text,
        pad = " ".repeat(caret_offset),
        carets = "^".repeat(underline_len.min(line_text.len().saturating_sub(caret_offset).max(1))),
    )
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
