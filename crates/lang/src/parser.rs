// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive-descent parser.
//!
//! Grammar (informal):
//!
//! ```text
//! program      := block_body
//! block_body   := (';'* statement)* ';'*
//! statement    := expression
//! expression   := literal | identifier call_or_ref
//! call_or_ref  := '(' args? ')' trailing_block? elseBlock?
//!               | trailing_block
//!               | /* nothing: bare variable reference */
//! args         := expression (',' expression)*
//! trailing_block := '{' block_body '}'
//! elseBlock    := 'else' trailing_block
//! ```
//!
//! `default{...}` and other zero-argument calls followed directly by a
//! block are sugar for a call with an empty argument list; the parser
//! folds `name{ ... }` into `Call{name, args: [Block]}` without requiring
//! empty parens. An `if(cond){...}` call may be followed by the identifier
//! `else` and another brace block, which becomes the call's third argument.

use crate::ast::{AstNode, LiteralValue};
use crate::lexer::Lexer;
use crate::parse_error::{ParseError, ParseResult};
use crate::span::Span;
use crate::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(source: &str) -> Result<AstNode, ParseError> {
        let tokens = Lexer::tokenize(source)?;
        let mut parser = Parser::new(tokens);
        let program = parser.parse_program()?;
        parser.expect_eof()?;
        Ok(program)
    }

    /// Parse as much as possible, recovering past errors by skipping to the
    /// next statement boundary rather than aborting the whole program.
    pub fn parse_with_recovery(source: &str) -> ParseResult {
        let tokens = match Lexer::tokenize(source) {
            Ok(tokens) => tokens,
            Err(e) => return ParseResult { program: None, errors: vec![ParseError::Lexer(e)] },
        };
        let mut parser = Parser::new(tokens);
        let mut statements = Vec::new();
        let mut errors = Vec::new();
        let start = parser.current().span;

        parser.skip_semicolons();
        while !parser.at_eof() {
            match parser.parse_expression() {
                Ok(node) => statements.push(node),
                Err(e) => {
                    errors.push(e);
                    parser.recover_to_separator();
                }
            }
            parser.skip_semicolons();
        }

        let end = parser.current().span;
        let program = AstNode::Block { statements, span: start.merge(end) };
        ParseResult { program: Some(program), errors }
    }

    fn parse_program(&mut self) -> Result<AstNode, ParseError> {
        let start = self.current().span;
        let statements = self.parse_block_body(None)?;
        let end = self.current().span;
        Ok(AstNode::Block { statements, span: start.merge(end) })
    }

    fn parse_block_body(&mut self, closing: Option<&TokenKind>) -> Result<Vec<AstNode>, ParseError> {
        let mut statements = Vec::new();
        self.skip_semicolons();
        loop {
            if self.at_eof() {
                break;
            }
            if let Some(close) = closing {
                if &self.current().kind == close {
                    break;
                }
            }
            statements.push(self.parse_expression()?);
            self.skip_semicolons();
        }
        Ok(statements)
    }

    fn skip_semicolons(&mut self) {
        while self.current().kind == TokenKind::Semicolon {
            self.advance();
        }
    }

    fn recover_to_separator(&mut self) {
        while !self.at_eof() && self.current().kind != TokenKind::Semicolon {
            self.advance();
        }
    }

    fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        let token = self.current().clone();
        match &token.kind {
            TokenKind::Integer(v) => {
                self.advance();
                Ok(AstNode::Literal { value: LiteralValue::Integer(*v), span: token.span })
            }
            TokenKind::Float(v) => {
                self.advance();
                Ok(AstNode::Literal { value: LiteralValue::Float(*v), span: token.span })
            }
            TokenKind::String(v) => {
                self.advance();
                Ok(AstNode::Literal { value: LiteralValue::String(v.clone()), span: token.span })
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                self.parse_identifier_tail(name, token.span)
            }
            _ => Err(self.unexpected_token("an expression")),
        }
    }

    fn parse_identifier_tail(&mut self, name: String, start_span: Span) -> Result<AstNode, ParseError> {
        match self.current().kind {
            TokenKind::LParen => {
                self.advance();
                let mut args = Vec::new();
                if self.current().kind != TokenKind::RParen {
                    loop {
                        args.push(self.parse_expression()?);
                        if self.current().kind == TokenKind::Comma {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                let close_span = self.expect(TokenKind::RParen, "')'")?;
                let mut span = start_span.merge(close_span);
                if self.current().kind == TokenKind::LBrace {
                    let block = self.parse_brace_block()?;
                    span = span.merge(block.span());
                    args.push(block);
                }
                let mut call = AstNode::Call { name, args, span };
                self.attach_else_branch(&mut call)?;
                Ok(call)
            }
            TokenKind::LBrace => {
                let block = self.parse_brace_block()?;
                let span = start_span.merge(block.span());
                let mut call = AstNode::Call { name, args: vec![block], span };
                self.attach_else_branch(&mut call)?;
                Ok(call)
            }
            _ => Ok(AstNode::VarRef { name, span: start_span }),
        }
    }

    /// `if(cond){then}` may be followed by `else{...}`; fold it in as a
    /// third argument to the `if` call.
    fn attach_else_branch(&mut self, call: &mut AstNode) -> Result<(), ParseError> {
        let AstNode::Call { name, args, span } = call else { return Ok(()) };
        if name != "if" {
            return Ok(());
        }
        if let TokenKind::Identifier(id) = &self.current().kind {
            if id == "else" {
                self.advance();
                let block = self.parse_brace_block()?;
                *span = span.merge(block.span());
                args.push(block);
            }
        }
        Ok(())
    }

    fn parse_brace_block(&mut self) -> Result<AstNode, ParseError> {
        let open_span = self.expect(TokenKind::LBrace, "'{'")?;
        let statements = self.parse_block_body(Some(&TokenKind::RBrace))?;
        let close_span = self.expect(TokenKind::RBrace, "'}'")?;
        Ok(AstNode::Block { statements, span: open_span.merge(close_span) })
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn at_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Span, ParseError> {
        if self.current().kind == kind {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected_token(expected))
        }
    }

    fn expect_eof(&mut self) -> Result<(), ParseError> {
        if self.at_eof() {
            Ok(())
        } else {
            Err(self.unexpected_token("end of input"))
        }
    }

    fn unexpected_token(&self, expected: &str) -> ParseError {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEof { expected: expected.to_string(), span: token.span }
        } else {
            ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.describe().to_string(),
                span: token.span,
            }
        }
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
