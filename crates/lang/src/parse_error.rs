// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::lexer::LexError;
use crate::span::{diagnostic_context, Span};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("lexer error: {0}")]
    Lexer(#[from] LexError),
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken { expected: String, found: String, span: Span },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String, span: Span },
    #[error("call '{name}' is missing its argument list")]
    IncompleteCall { name: String, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lexer(e) => e.span(),
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span, .. } => *span,
            ParseError::IncompleteCall { span, .. } => *span,
        }
    }

    pub fn diagnostic(&self, source: &str) -> String {
        format!("{}\n{}", self, diagnostic_context(source, self.span()))
    }
}

/// Result of a best-effort parse: partial AST plus any errors recovered past.
#[derive(Debug)]
pub struct ParseResult {
    pub program: Option<crate::ast::AstNode>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
