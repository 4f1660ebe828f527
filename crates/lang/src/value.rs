// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime values.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::AstNode;
use crate::runtime::ScopeRef;

/// A tree-shaped value: the language's one aggregate type for representing
/// parsed documents, command output, and similar hierarchical data.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub text: Option<String>,
    pub attributes: IndexMap<String, Value>,
    pub children: Vec<Value>,
}

/// A user-defined closure: parameters, an unevaluated body, and the scope it
/// closed over at `func(...)` evaluation time (`None` for functions loaded
/// from the function library, which close over the session root instead).
#[derive(Clone)]
pub struct UserFunction {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Arc<AstNode>,
    pub closure: Option<ScopeRef>,
}

impl fmt::Debug for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserFunction")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl PartialEq for UserFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params && Arc::ptr_eq(&self.body, &other.body)
    }
}

/// A capability a host (the daemon) has bound into a Runtime, addressable by
/// name through the `hostObjects` resolution tier. Opaque to the evaluator:
/// invocation happens through host-registered built-ins, never bare `Call`
/// dispatch.
pub trait HostObjectCapability: Send + Sync + fmt::Debug {
    fn kind(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
    Array(Vec<Value>),
    Map(IndexMap<String, Value>),
    Node(Arc<Node>),
    Function(Arc<UserFunction>),
    HostObjectRef(Arc<dyn HostObjectCapability>),
    Opaque { kind: String, id: String },
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => *a as f64 == *b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::HostObjectRef(a), Value::HostObjectRef(b)) => Arc::ptr_eq(a, b),
            (Value::Opaque { kind: ak, id: ai }, Value::Opaque { kind: bk, id: bi }) => ak == bk && ai == bi,
            _ => false,
        }
    }
}

impl Value {
    /// Truthiness for `if`/`while`/`switch` conditions: integers and floats
    /// are truthy when non-zero, strings when non-empty, `Null` is always
    /// falsy, and everything else (arrays, maps, nodes, functions, host
    /// refs, opaque handles) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::Null => false,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Node(_) => "node",
            Value::Function(_) => "function",
            Value::HostObjectRef(_) => "host_object",
            Value::Opaque { .. } => "opaque",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "Integer({i})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Null => write!(f, "Null"),
            Value::Array(items) => f.debug_list().entries(items).finish(),
            Value::Map(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Node(node) => write!(f, "Node({node:?})"),
            Value::Function(func) => write!(f, "Function({func:?})"),
            Value::HostObjectRef(obj) => write!(f, "HostObjectRef({})", obj.kind()),
            Value::Opaque { kind, id } => write!(f, "Opaque {{ kind: {kind:?}, id: {id:?} }}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "null"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Node(node) => write!(f, "<{}>", node.name),
            Value::Function(func) => write!(f, "<function {}>", func.name.as_deref().unwrap_or("anonymous")),
            Value::HostObjectRef(obj) => write!(f, "<host:{}>", obj.kind()),
            Value::Opaque { kind, id } => write!(f, "<{kind}:{id}>"),
        }
    }
}
