// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The minimal arithmetic/logic substrate every Runtime carries regardless
//! of which host capabilities (storage, function library, listeners) get
//! layered on top by the daemon.

use std::sync::Arc;

use crate::error::RuntimeError;
use crate::evaluator;
use crate::runtime::{BuiltinRegistry, ScopeRef};
use crate::value::{LogLevel, Value};

pub fn register_core_builtins(registry: &mut BuiltinRegistry) {
    registry.register("true", Arc::new(|_: &ScopeRef, _: &[Value]| Ok(Value::Bool(true))));
    registry.register("false", Arc::new(|_: &ScopeRef, _: &[Value]| Ok(Value::Bool(false))));
    registry.register("null", Arc::new(|_: &ScopeRef, _: &[Value]| Ok(Value::Null)));

    registry.register("add", Arc::new(|_, args| arithmetic("add", args, |a, b| Ok(a + b), |a, b| a.checked_add(b))));
    registry.register("sub", Arc::new(|_, args| arithmetic("sub", args, |a, b| Ok(a - b), |a, b| a.checked_sub(b))));
    registry.register("mul", Arc::new(|_, args| arithmetic("mul", args, |a, b| Ok(a * b), |a, b| a.checked_mul(b))));
    registry.register(
        "div",
        Arc::new(|_, args| {
            arithmetic(
                "div",
                args,
                |a, b| if b == 0.0 { Err(RuntimeError::ArithmeticDomain) } else { Ok(a / b) },
                |a, b| if b == 0 { None } else { a.checked_div(b) },
            )
        }),
    );
    registry.register(
        "mod",
        Arc::new(|_, args| {
            let (a, b) = two_numbers("mod", args)?;
            if b == 0 {
                return Err(RuntimeError::ArithmeticDomain);
            }
            Ok(Value::Integer(a % b))
        }),
    );

    registry.register("smaller", Arc::new(|_, args| compare("smaller", args, |o| o.is_lt())));
    registry.register("smallerEq", Arc::new(|_, args| compare("smallerEq", args, |o| o.is_le())));
    registry.register("greater", Arc::new(|_, args| compare("greater", args, |o| o.is_gt())));
    registry.register("greaterEq", Arc::new(|_, args| compare("greaterEq", args, |o| o.is_ge())));

    registry.register(
        "equals",
        Arc::new(|_, args| {
            require_arity("equals", args, 2)?;
            Ok(Value::Bool(args[0] == args[1]))
        }),
    );

    registry.register(
        "not",
        Arc::new(|_, args| {
            require_arity("not", args, 1)?;
            Ok(Value::Bool(!args[0].is_truthy()))
        }),
    );
    registry.register(
        "and",
        Arc::new(|_, args| Ok(Value::Bool(!args.is_empty() && args.iter().all(Value::is_truthy)))),
    );
    registry
        .register("or", Arc::new(|_, args| Ok(Value::Bool(args.iter().any(Value::is_truthy)))));

    registry.register(
        "concat",
        Arc::new(|_, args| Ok(Value::String(args.iter().map(ToString::to_string).collect()))),
    );

    registry.register(
        "len",
        Arc::new(|_, args| {
            require_arity("len", args, 1)?;
            match &args[0] {
                Value::String(s) => Ok(Value::Integer(s.chars().count() as i64)),
                Value::Array(items) => Ok(Value::Integer(items.len() as i64)),
                Value::Map(map) => Ok(Value::Integer(map.len() as i64)),
                other => Err(RuntimeError::type_mismatch(format!("'len' does not support {}", other.type_name()))),
            }
        }),
    );

    registry.register("logPrint", Arc::new(log_print));

    registry.register("call", Arc::new(call_builtin));
}

fn arithmetic(
    name: &str,
    args: &[Value],
    float_op: impl Fn(f64, f64) -> Result<f64, RuntimeError>,
    int_op: impl Fn(i64, i64) -> Option<i64>,
) -> Result<Value, RuntimeError> {
    require_arity(name, args, 2)?;
    match (&args[0], &args[1]) {
        (Value::Integer(a), Value::Integer(b)) => {
            int_op(*a, *b).map(Value::Integer).ok_or(RuntimeError::ArithmeticDomain)
        }
        (a, b) => {
            let a = a.as_f64().ok_or_else(|| non_numeric(name, 0, a))?;
            let b = b.as_f64().ok_or_else(|| non_numeric(name, 1, b))?;
            float_op(a, b).map(Value::Float)
        }
    }
}

fn two_numbers(name: &str, args: &[Value]) -> Result<(i64, i64), RuntimeError> {
    require_arity(name, args, 2)?;
    let a = match &args[0] {
        Value::Integer(a) => *a,
        other => return Err(non_numeric(name, 0, other)),
    };
    let b = match &args[1] {
        Value::Integer(b) => *b,
        other => return Err(non_numeric(name, 1, other)),
    };
    Ok((a, b))
}

fn compare(name: &str, args: &[Value], accept: impl Fn(std::cmp::Ordering) -> bool) -> Result<Value, RuntimeError> {
    require_arity(name, args, 2)?;
    let a = args[0].as_f64().ok_or_else(|| non_numeric(name, 0, &args[0]))?;
    let b = args[1].as_f64().ok_or_else(|| non_numeric(name, 1, &args[1]))?;
    let ordering = a.partial_cmp(&b).ok_or(RuntimeError::ArithmeticDomain)?;
    Ok(Value::Bool(accept(ordering)))
}

fn non_numeric(name: &str, index: usize, value: &Value) -> RuntimeError {
    RuntimeError::bad_argument(index, "number", format!("'{name}' got {}", value.type_name()))
}

fn require_arity(name: &str, args: &[Value], expected: usize) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(RuntimeError::bad_argument(
            args.len(),
            format!("{expected} argument(s) to '{name}'"),
            format!("{}", args.len()),
        ));
    }
    Ok(())
}

fn log_print(scope: &ScopeRef, args: &[Value]) -> Result<Value, RuntimeError> {
    let (level, message) = match args {
        [Value::String(level), Value::String(message)] => (parse_level(level), message.clone()),
        [message] => (LogLevel::Info, message.to_string()),
        _ => {
            return Err(RuntimeError::bad_argument(
                args.len(),
                "1 argument (message) or 2 (level, message)",
                format!("{}", args.len()),
            ))
        }
    };
    let sink = Arc::clone(&scope.read().log_sink);
    sink.log(level, &message);
    Ok(Value::Null)
}

fn parse_level(level: &str) -> LogLevel {
    match level.to_ascii_lowercase().as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => LogLevel::Info,
    }
}

fn call_builtin(scope: &ScopeRef, args: &[Value]) -> Result<Value, RuntimeError> {
    let Some((callee, rest)) = args.split_first() else {
        return Err(RuntimeError::bad_argument(0, "a function followed by its arguments", "no arguments"));
    };
    let Value::Function(func) = callee else {
        return Err(RuntimeError::type_mismatch(format!(
            "'call' expected a function, got {}",
            callee.type_name()
        )));
    };
    evaluator::invoke_function(scope, func, rest)
}

#[cfg(test)]
#[path = "builtins_tests.rs"]
mod tests;
