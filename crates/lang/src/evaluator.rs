// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tree-walking evaluator.
//!
//! Control forms (`declare`, `setq`, `valueOf`, `if`, `while`, `switch`,
//! `func`, `break`, `continue`) are recognized by name before ordinary
//! dispatch and receive their arguments unevaluated; everything else goes
//! through eager left-to-right argument evaluation followed by four-tier
//! name resolution ([`crate::runtime::resolve`]).

use std::sync::Arc;

use crate::ast::{AstNode, LiteralValue};
use crate::error::{EvalOutcome, EvalResult, RuntimeError};
use crate::runtime::{self, Resolved, Runtime, ScopeRef};
use crate::value::{UserFunction, Value};

pub fn eval(scope: &ScopeRef, node: &AstNode) -> EvalResult<Value> {
    match node {
        AstNode::Literal { value, .. } => Ok(literal_value(value)),
        AstNode::VarRef { name, .. } => eval_var_ref(scope, name),
        AstNode::Block { statements, .. } => eval_statements(scope, statements),
        AstNode::Call { name, args, .. } => eval_call(scope, name, args),
    }
}

/// Entry point for running a whole parsed program. A stray `break`/`continue`
/// that unwinds past every loop is treated as a harmless no-op rather than a
/// hard failure, since it can only originate from script logic, not from a
/// host-side bug.
pub fn run_program(scope: &ScopeRef, program: &AstNode) -> Result<Value, RuntimeError> {
    match eval(scope, program) {
        Ok(value) => Ok(value),
        Err(EvalOutcome::Error(e)) => {
            tracing::error!(target: "chariot::script", error = %e, "unhandled runtime error");
            Err(e)
        }
        Err(EvalOutcome::Break) | Err(EvalOutcome::Continue) => Ok(Value::Null),
    }
}

fn literal_value(value: &LiteralValue) -> Value {
    match value {
        LiteralValue::Integer(i) => Value::Integer(*i),
        LiteralValue::Float(f) => Value::Float(*f),
        LiteralValue::String(s) => Value::String(s.clone()),
    }
}

fn eval_statements(scope: &ScopeRef, statements: &[AstNode]) -> EvalResult<Value> {
    let mut result = Value::Null;
    for stmt in statements {
        result = eval(scope, stmt)?;
    }
    Ok(result)
}

/// Runs a brace-block argument (an `if`/`while`/`case` body) in a fresh
/// child scope, so a `declare` inside one loop iteration does not collide
/// with the next.
fn eval_body_block(scope: &ScopeRef, block: &AstNode) -> EvalResult<Value> {
    let AstNode::Block { statements, .. } = block else {
        return Err(RuntimeError::type_mismatch("expected a block argument").into());
    };
    let child = Runtime::new_child(scope);
    eval_statements(&child, statements)
}

fn eval_var_ref(scope: &ScopeRef, name: &str) -> EvalResult<Value> {
    match runtime::resolve(scope, name) {
        Some(Resolved::Variable(value)) => Ok(value),
        Some(Resolved::UserFunction(func)) => Ok(Value::Function(func)),
        Some(Resolved::HostObject(obj)) => Ok(Value::HostObjectRef(obj)),
        Some(Resolved::Builtin(_)) | None => Err(RuntimeError::Unbound { name: name.to_string() }.into()),
    }
}

fn eval_call(scope: &ScopeRef, name: &str, args: &[AstNode]) -> EvalResult<Value> {
    match name {
        "declare" => special_declare(scope, args),
        "setq" => special_setq(scope, args),
        "valueOf" => special_value_of(scope, args),
        "if" => special_if(scope, args),
        "while" => special_while(scope, args),
        "switch" => special_switch(scope, args),
        "func" => special_func(scope, args),
        "break" => Err(EvalOutcome::Break),
        "continue" => Err(EvalOutcome::Continue),
        "case" | "default" => {
            Err(RuntimeError::HostFailure(format!("'{name}' may only appear directly inside a switch body")).into())
        }
        _ => eval_ordinary_call(scope, name, args),
    }
}

fn var_ref_name<'a>(node: &'a AstNode, index: usize) -> EvalResult<&'a str> {
    match node {
        AstNode::VarRef { name, .. } => Ok(name),
        other => Err(RuntimeError::bad_argument(index, "a bare variable name", other.span_kind()).into()),
    }
}

fn special_declare(scope: &ScopeRef, args: &[AstNode]) -> EvalResult<Value> {
    let [name_node, tag_node, value_node] = args else {
        return Err(RuntimeError::bad_argument(args.len(), "3 arguments (name, typeTag, expr)", args.len().to_string())
            .into());
    };
    let name = var_ref_name(name_node, 0)?.to_string();
    let tag = eval(scope, tag_node)?;
    let value = eval(scope, value_node)?;
    if let Value::String(tag) = &tag {
        if !type_tag_matches(tag, &value) {
            return Err(RuntimeError::type_mismatch(format!(
                "declared type '{tag}' does not match value of type {}",
                value.type_name()
            ))
            .into());
        }
    }
    scope.write().declare(&name, value.clone())?;
    Ok(value)
}

fn type_tag_matches(tag: &str, value: &Value) -> bool {
    match tag {
        "N" => matches!(value, Value::Integer(_) | Value::Float(_)),
        "S" => matches!(value, Value::String(_)),
        "B" => matches!(value, Value::Bool(_)),
        "A" => matches!(value, Value::Array(_)),
        "M" => matches!(value, Value::Map(_)),
        _ => true,
    }
}

fn special_setq(scope: &ScopeRef, args: &[AstNode]) -> EvalResult<Value> {
    let [name_node, value_node] = args else {
        return Err(RuntimeError::bad_argument(args.len(), "2 arguments (name, expr)", args.len().to_string()).into());
    };
    let name = var_ref_name(name_node, 0)?.to_string();
    let value = eval(scope, value_node)?;
    runtime::setq(scope, &name, value.clone());
    Ok(value)
}

fn special_value_of(scope: &ScopeRef, args: &[AstNode]) -> EvalResult<Value> {
    let [name_node] = args else {
        return Err(RuntimeError::bad_argument(args.len(), "1 argument (name)", args.len().to_string()).into());
    };
    let name = var_ref_name(name_node, 0)?;
    Ok(runtime::lookup_variable(scope, name).unwrap_or(Value::Null))
}

fn special_if(scope: &ScopeRef, args: &[AstNode]) -> EvalResult<Value> {
    if args.len() != 2 && args.len() != 3 {
        return Err(RuntimeError::bad_argument(
            args.len(),
            "2 or 3 arguments (cond, thenBlock, elseBlock?)",
            args.len().to_string(),
        )
        .into());
    }
    let cond = eval(scope, &args[0])?;
    if cond.is_truthy() {
        eval_body_block(scope, &args[1])
    } else if let Some(else_block) = args.get(2) {
        eval_body_block(scope, else_block)
    } else {
        Ok(Value::Null)
    }
}

fn special_while(scope: &ScopeRef, args: &[AstNode]) -> EvalResult<Value> {
    let [cond_node, body] = args else {
        return Err(RuntimeError::bad_argument(args.len(), "2 arguments (cond, body)", args.len().to_string()).into());
    };
    loop {
        let cond = eval(scope, cond_node)?;
        if !cond.is_truthy() {
            break;
        }
        match eval_body_block(scope, body) {
            Ok(_) => {}
            Err(EvalOutcome::Break) => break,
            Err(EvalOutcome::Continue) => {}
            Err(err @ EvalOutcome::Error(_)) => return Err(err),
        }
    }
    Ok(Value::Null)
}

fn special_switch(scope: &ScopeRef, args: &[AstNode]) -> EvalResult<Value> {
    let [subject_node, body] = args else {
        return Err(RuntimeError::bad_argument(args.len(), "2 arguments (value, body)", args.len().to_string()).into());
    };
    let AstNode::Block { statements, .. } = body else {
        return Err(RuntimeError::type_mismatch("switch body must be a block").into());
    };
    let subject = eval(scope, subject_node)?;

    let mut default_block: Option<&AstNode> = None;
    for stmt in statements {
        let AstNode::Call { name, args: case_args, .. } = stmt else {
            return Err(RuntimeError::type_mismatch("switch body may only contain case/default calls").into());
        };
        match name.as_str() {
            "case" => {
                let [label_node, case_body] = case_args.as_slice() else {
                    return Err(RuntimeError::bad_argument(
                        case_args.len(),
                        "2 arguments (label, body)",
                        case_args.len().to_string(),
                    )
                    .into());
                };
                let label = eval(scope, label_node)?;
                if label == subject {
                    return eval_body_block(scope, case_body);
                }
            }
            "default" => {
                let [default_body] = case_args.as_slice() else {
                    return Err(RuntimeError::bad_argument(
                        case_args.len(),
                        "1 argument (body)",
                        case_args.len().to_string(),
                    )
                    .into());
                };
                default_block = Some(default_body);
            }
            other => {
                return Err(RuntimeError::type_mismatch(format!(
                    "switch body may only contain case/default calls, found '{other}'"
                ))
                .into())
            }
        }
    }

    match default_block {
        Some(block) => eval_body_block(scope, block),
        None => Ok(Value::Null),
    }
}

fn special_func(scope: &ScopeRef, args: &[AstNode]) -> EvalResult<Value> {
    let Some((body_node, param_nodes)) = args.split_last() else {
        return Err(RuntimeError::bad_argument(0, "a body block", "no arguments").into());
    };
    let AstNode::Block { .. } = body_node else {
        return Err(RuntimeError::type_mismatch("'func' requires a trailing block body").into());
    };
    let mut params = Vec::with_capacity(param_nodes.len());
    for (index, node) in param_nodes.iter().enumerate() {
        params.push(var_ref_name(node, index)?.to_string());
    }
    let function = UserFunction {
        name: None,
        params,
        body: Arc::new(body_node.clone()),
        closure: Some(Arc::clone(scope)),
    };
    Ok(Value::Function(Arc::new(function)))
}

fn eval_ordinary_call(scope: &ScopeRef, name: &str, arg_nodes: &[AstNode]) -> EvalResult<Value> {
    let mut args = Vec::with_capacity(arg_nodes.len());
    for node in arg_nodes {
        args.push(eval(scope, node)?);
    }
    match runtime::resolve(scope, name) {
        Some(Resolved::Variable(Value::Function(func))) => invoke_function(scope, &func, &args).map_err(Into::into),
        Some(Resolved::Variable(other)) => {
            Err(RuntimeError::type_mismatch(format!("'{name}' is not callable ({})", other.type_name())).into())
        }
        Some(Resolved::UserFunction(func)) => invoke_function(scope, &func, &args).map_err(Into::into),
        Some(Resolved::HostObject(_)) => Err(RuntimeError::type_mismatch(format!(
            "'{name}' is a host object; it cannot be invoked as a bare call"
        ))
        .into()),
        Some(Resolved::Builtin(handler)) => handler(scope, &args).map_err(Into::into),
        None => Err(RuntimeError::Unbound { name: name.to_string() }.into()),
    }
}

/// Invokes a user function (whether a closure created by `func(...)` or one
/// loaded from the function library) with already-evaluated arguments.
/// `break`/`continue` escaping the body unwinds as a host failure: a
/// function body is not itself a loop.
pub fn invoke_function(caller_scope: &ScopeRef, func: &Arc<UserFunction>, args: &[Value]) -> Result<Value, RuntimeError> {
    if args.len() != func.params.len() {
        return Err(RuntimeError::bad_argument(
            args.len(),
            format!("{} argument(s)", func.params.len()),
            args.len().to_string(),
        ));
    }
    let parent = func.closure.clone().unwrap_or_else(|| Arc::clone(caller_scope));
    let frame = Runtime::new_child(&parent);
    for (param, value) in func.params.iter().zip(args) {
        frame.write().declare(param, value.clone())?;
    }
    match eval(&frame, &func.body) {
        Ok(value) => Ok(value),
        Err(EvalOutcome::Error(e)) => Err(e),
        Err(EvalOutcome::Break) | Err(EvalOutcome::Continue) => {
            Err(RuntimeError::HostFailure("break/continue escaped a function body".to_string()))
        }
    }
}

impl AstNode {
    fn span_kind(&self) -> String {
        match self {
            AstNode::Literal { .. } => "a literal".to_string(),
            AstNode::VarRef { name, .. } => format!("variable '{name}'"),
            AstNode::Call { name, .. } => format!("call '{name}'"),
            AstNode::Block { .. } => "a block".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
