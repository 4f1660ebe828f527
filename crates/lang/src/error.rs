// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors raised while evaluating a parsed program against a [`crate::runtime::Runtime`].
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    #[error("unbound name '{name}'")]
    Unbound { name: String },
    #[error("bad argument at index {index}: expected {expected}, got {got}")]
    BadArgument { index: usize, expected: String, got: String },
    #[error("arithmetic domain error")]
    ArithmeticDomain,
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },
    #[error("'{name}' is already declared in this scope")]
    Redeclared { name: String },
    #[error("evaluation canceled")]
    Canceled,
    #[error("evaluation timed out")]
    Timeout,
    #[error("host failure: {0}")]
    HostFailure(String),
}

impl RuntimeError {
    pub fn bad_argument(index: usize, expected: impl Into<String>, got: impl Into<String>) -> Self {
        RuntimeError::BadArgument { index, expected: expected.into(), got: got.into() }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        RuntimeError::TypeMismatch { message: message.into() }
    }
}

/// Non-local control flow produced while evaluating a [`crate::ast::AstNode`].
///
/// `Break`/`Continue` unwind exactly one enclosing loop; they are caught by
/// the `while` special form and never escape to the caller of `run_program`.
#[derive(Debug, Clone, Error)]
pub enum EvalOutcome {
    #[error(transparent)]
    Error(#[from] RuntimeError),
    #[error("break outside of a loop")]
    Break,
    #[error("continue outside of a loop")]
    Continue,
}

pub type EvalResult<T> = Result<T, EvalOutcome>;
