// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hand-written lexer for Chariot source text.
//!
//! Whitespace (including newlines) and both comment styles (`// line` and
//! `/* block */`, non-nested) are skipped entirely; the grammar needs no
//! newline token because a statement boundary is always recoverable from the
//! shape of the surrounding expressions.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::span::Span;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },
    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },
    #[error("unexpected character '{found}'")]
    UnexpectedChar { found: char, span: Span },
    #[error("invalid numeric literal '{text}'")]
    InvalidNumber { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span }
            | LexError::UnterminatedComment { span }
            | LexError::UnexpectedChar { span, .. }
            | LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, chars: input.char_indices().peekable(), line: 1, column: 1 }
    }

    pub fn tokenize(input: &'a str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, ch)) = next {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn current_offset(&mut self) -> usize {
        self.chars.peek().map(|(i, _)| *i).unwrap_or(self.input.len())
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some((_, '/')) => {
                            self.advance();
                            self.advance();
                            while let Some(c) = self.peek_char() {
                                if c == '\n' {
                                    break;
                                }
                                self.advance();
                            }
                        }
                        Some((_, '*')) => {
                            let start = self.current_offset();
                            self.advance();
                            self.advance();
                            let mut closed = false;
                            while let Some((_, c)) = self.advance() {
                                if c == '*' && self.peek_char() == Some('/') {
                                    self.advance();
                                    closed = true;
                                    break;
                                }
                            }
                            if !closed {
                                return Err(LexError::UnterminatedComment {
                                    span: Span::new(start, self.input.len()),
                                });
                            }
                        }
                        _ => break,
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;
        let start = self.current_offset();
        let line = self.line;
        let column = self.column;

        let Some(ch) = self.peek_char() else {
            return Ok(Token::new(TokenKind::Eof, "", line, column, Span::empty(start)));
        };

        match ch {
            '(' => self.single(TokenKind::LParen, start, line, column),
            ')' => self.single(TokenKind::RParen, start, line, column),
            '{' => self.single(TokenKind::LBrace, start, line, column),
            '}' => self.single(TokenKind::RBrace, start, line, column),
            '[' => self.single(TokenKind::LBracket, start, line, column),
            ']' => self.single(TokenKind::RBracket, start, line, column),
            ',' => self.single(TokenKind::Comma, start, line, column),
            ';' => self.single(TokenKind::Semicolon, start, line, column),
            '"' | '\'' => self.lex_string(ch, start, line, column),
            c if c.is_ascii_digit() => self.lex_number(start, line, column),
            c if is_ident_start(c) => self.lex_identifier(start, line, column),
            c => {
                self.advance();
                Err(LexError::UnexpectedChar { found: c, span: Span::new(start, start + c.len_utf8()) })
            }
        }
    }

    fn single(&mut self, kind: TokenKind, start: usize, line: u32, column: u32) -> Result<Token, LexError> {
        let (_, ch) = self.advance().expect("checked by caller");
        let lexeme = ch.to_string();
        Ok(Token::new(kind, lexeme, line, column, Span::new(start, start + ch.len_utf8())))
    }

    fn lex_string(&mut self, quote: char, start: usize, line: u32, column: u32) -> Result<Token, LexError> {
        self.advance();
        let mut value = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(LexError::UnterminatedString { span: Span::new(start, self.input.len()) });
                }
                Some((_, c)) if c == quote => break,
                Some((_, '\\')) => match self.advance() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, c)) if c == quote => value.push(quote),
                    Some((_, c)) => value.push(c),
                    None => {
                        return Err(LexError::UnterminatedString { span: Span::new(start, self.input.len()) });
                    }
                },
                Some((_, c)) => value.push(c),
            }
        }
        let end = self.current_offset();
        Ok(Token::new(TokenKind::String(value.clone()), value, line, column, Span::new(start, end)))
    }

    fn lex_number(&mut self, start: usize, line: u32, column: u32) -> Result<Token, LexError> {
        let mut text = String::new();
        let mut is_float = false;

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek_char() == Some('.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if matches!(lookahead.peek(), Some((_, c)) if c.is_ascii_digit()) {
                is_float = true;
                text.push('.');
                self.advance();
                while let Some(c) = self.peek_char() {
                    if c.is_ascii_digit() {
                        text.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            let exponent_digit_follows = match lookahead.peek() {
                Some((_, '+')) | Some((_, '-')) => {
                    lookahead.next();
                    matches!(lookahead.peek(), Some((_, c)) if c.is_ascii_digit())
                }
                Some((_, c)) => c.is_ascii_digit(),
                None => false,
            };
            if exponent_digit_follows {
                is_float = true;
                text.push(self.advance().unwrap().1);
                if matches!(self.peek_char(), Some('+') | Some('-')) {
                    text.push(self.advance().unwrap().1);
                }
                while let Some(c) = self.peek_char() {
                    if c.is_ascii_digit() {
                        text.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        let end = self.current_offset();
        let span = Span::new(start, end);
        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| LexError::InvalidNumber { text: text.clone(), span })?;
            Ok(Token::new(TokenKind::Float(value), text, line, column, span))
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| LexError::InvalidNumber { text: text.clone(), span })?;
            Ok(Token::new(TokenKind::Integer(value), text, line, column, span))
        }
    }

    fn lex_identifier(&mut self, start: usize, line: u32, column: u32) -> Result<Token, LexError> {
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let end = self.current_offset();
        Ok(Token::new(TokenKind::Identifier(text.clone()), text, line, column, Span::new(start, end)))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
