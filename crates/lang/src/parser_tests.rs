// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn parse(src: &str) -> AstNode {
    Parser::parse(src).unwrap()
}

#[test]
fn parses_bare_literal_program() {
    let program = parse("42");
    let AstNode::Block { statements, .. } = program else { panic!("expected block") };
    assert_eq!(statements.len(), 1);
    assert!(matches!(statements[0], AstNode::Literal { value: LiteralValue::Integer(42), .. }));
}

#[test]
fn parses_call_with_args() {
    let program = parse("add(1, 2)");
    let AstNode::Block { statements, .. } = program else { panic!("expected block") };
    let AstNode::Call { name, args, .. } = &statements[0] else { panic!("expected call") };
    assert_eq!(name, "add");
    assert_eq!(args.len(), 2);
}

#[test]
fn parses_statements_separated_by_semicolons_or_newlines() {
    let program = parse("declare(x,'N',1); setq(x,2)\nvalueOf(x)");
    let AstNode::Block { statements, .. } = program else { panic!("expected block") };
    assert_eq!(statements.len(), 3);
}

#[test]
fn parses_trailing_block_as_final_argument() {
    let program = parse("while(true()){ break() }");
    let AstNode::Block { statements, .. } = program else { panic!("expected block") };
    let AstNode::Call { name, args, .. } = &statements[0] else { panic!("expected call") };
    assert_eq!(name, "while");
    assert_eq!(args.len(), 2);
    assert!(matches!(args[1], AstNode::Block { .. }));
}

#[test]
fn parses_if_else_as_third_argument() {
    let program = parse("if(true()){1} else {2}");
    let AstNode::Block { statements, .. } = program else { panic!("expected block") };
    let AstNode::Call { name, args, .. } = &statements[0] else { panic!("expected call") };
    assert_eq!(name, "if");
    assert_eq!(args.len(), 3);
}

#[test]
fn parses_bare_block_call_sugar_for_default() {
    let program = parse("switch(x){ case(1){ 10 } default{ 20 } }");
    let AstNode::Block { statements, .. } = program else { panic!("expected block") };
    let AstNode::Call { args, .. } = &statements[0] else { panic!("expected call") };
    let AstNode::Block { statements: body, .. } = &args[1] else { panic!("expected block body") };
    let AstNode::Call { name, args: default_args, .. } = &body[1] else { panic!("expected call") };
    assert_eq!(name, "default");
    assert_eq!(default_args.len(), 1);
}

#[test]
fn bare_identifier_is_a_variable_reference() {
    let program = parse("x");
    let AstNode::Block { statements, .. } = program else { panic!("expected block") };
    assert!(matches!(&statements[0], AstNode::VarRef { name, .. } if name == "x"));
}

#[test]
fn reports_unexpected_token_with_span() {
    let err = Parser::parse("add(1,,2)").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn recovery_mode_collects_multiple_errors() {
    let result = Parser::parse_with_recovery("add(1,,2); sub(3,4)");
    assert!(!result.is_ok());
    assert!(result.program.is_some());
}
