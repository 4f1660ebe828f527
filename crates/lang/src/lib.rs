// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chariot-lang: the lexer, parser, evaluator, and Runtime for the Chariot
//! scripting language. This crate is self-contained: it knows nothing about
//! sessions, transport, or persistence. The daemon wires host capabilities
//! in by registering additional built-ins into a [`Runtime`](runtime::Runtime).

pub mod ast;
pub mod builtins;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parse_error;
pub mod parser;
pub mod runtime;
pub mod span;
pub mod token;
pub mod value;

pub use error::{EvalOutcome, EvalResult, RuntimeError};
pub use evaluator::{invoke_function, run_program};
pub use parse_error::{ParseError, ParseResult};
pub use parser::Parser;
pub use runtime::{BuiltinRegistry, LogSink, Runtime, ScopeRef};
pub use value::{HostObjectCapability, LogLevel, Node, UserFunction, Value};

/// Builds the default built-in registry: the pure arithmetic/logic
/// substrate every Runtime carries. Hosts layer additional built-ins
/// (storage-backed, session-aware) on top by building their own
/// [`BuiltinRegistry`] that registers these first.
pub fn default_builtins() -> BuiltinRegistry {
    let mut registry = BuiltinRegistry::new();
    builtins::register_core_builtins(&mut registry);
    registry
}
