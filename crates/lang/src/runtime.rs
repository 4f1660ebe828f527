// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Runtime: nested lexical scopes plus the shared, immutable built-in
//! table. A session owns one root Runtime; every `func(...)` call and every
//! closure invocation creates a child Runtime whose `parent` points back at
//! the defining scope, giving ordinary lexical closures.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::RuntimeError;
use crate::value::{HostObjectCapability, LogLevel, UserFunction, Value};

/// A shared, lockable scope frame. Ancestor frames are locked one at a time
/// while walking the chain, never more than one at once, so there is no
/// lock-ordering hazard even though evaluation recurses through nested
/// closures.
pub type ScopeRef = Arc<RwLock<Runtime>>;

/// Signature every built-in implements. Arguments have already been
/// evaluated by the time a built-in runs; lazy control forms are handled
/// directly by the evaluator and never reach this table.
pub type BuiltinFn = dyn Fn(&ScopeRef, &[Value]) -> Result<Value, RuntimeError> + Send + Sync;

/// A host-supplied sink for the `logPrint` built-in and evaluator
/// diagnostics. The daemon binds one per execution job so log lines land in
/// that job's log bus instead of the process's own stderr.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

/// Default sink used when no host sink is bound: forwards to `tracing`.
#[derive(Debug, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "chariot::script", "{message}"),
            LogLevel::Debug => tracing::debug!(target: "chariot::script", "{message}"),
            LogLevel::Info => tracing::info!(target: "chariot::script", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "chariot::script", "{message}"),
            LogLevel::Error => tracing::error!(target: "chariot::script", "{message}"),
        }
    }
}

#[derive(Default)]
pub struct BuiltinRegistry {
    handlers: IndexMap<String, Arc<BuiltinFn>>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a built-in. Panics on a duplicate name: the registry is
    /// built once at startup and a collision is a programming error, not a
    /// runtime condition.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<BuiltinFn>) {
        let name = name.into();
        if self.handlers.insert(name.clone(), handler).is_some() {
            panic!("builtin '{name}' registered twice");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<BuiltinFn>> {
        self.handlers.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

pub enum Resolved {
    Variable(Value),
    UserFunction(Arc<UserFunction>),
    HostObject(Arc<dyn HostObjectCapability>),
    Builtin(Arc<BuiltinFn>),
}

pub struct Runtime {
    pub variables: IndexMap<String, Value>,
    pub user_functions: IndexMap<String, Arc<UserFunction>>,
    pub host_objects: IndexMap<String, Arc<dyn HostObjectCapability>>,
    pub builtins: Arc<BuiltinRegistry>,
    pub parent: Option<ScopeRef>,
    pub log_sink: Arc<dyn LogSink>,
}

impl Runtime {
    pub fn new_root(builtins: Arc<BuiltinRegistry>) -> ScopeRef {
        Arc::new(RwLock::new(Runtime {
            variables: IndexMap::new(),
            user_functions: IndexMap::new(),
            host_objects: IndexMap::new(),
            builtins,
            parent: None,
            log_sink: Arc::new(TracingLogSink),
        }))
    }

    pub fn with_log_sink(builtins: Arc<BuiltinRegistry>, log_sink: Arc<dyn LogSink>) -> ScopeRef {
        Arc::new(RwLock::new(Runtime {
            variables: IndexMap::new(),
            user_functions: IndexMap::new(),
            host_objects: IndexMap::new(),
            builtins,
            parent: None,
            log_sink,
        }))
    }

    pub fn new_child(parent: &ScopeRef) -> ScopeRef {
        let (builtins, log_sink) = {
            let guard = parent.read();
            (Arc::clone(&guard.builtins), Arc::clone(&guard.log_sink))
        };
        Arc::new(RwLock::new(Runtime {
            variables: IndexMap::new(),
            user_functions: IndexMap::new(),
            host_objects: IndexMap::new(),
            builtins,
            parent: Some(Arc::clone(parent)),
            log_sink,
        }))
    }

    /// Binds a name in the *current* scope only. Rejects redeclaration
    /// within this scope, but allows shadowing a binding from an ancestor
    /// scope or a built-in.
    pub fn declare(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        if self.variables.contains_key(name) {
            return Err(RuntimeError::Redeclared { name: name.to_string() });
        }
        self.variables.insert(name.to_string(), value);
        Ok(())
    }
}

/// Walks the scope chain from `scope` outward looking for an existing
/// `variables` binding and assigns there; if none exists anywhere in the
/// chain, creates the binding in `scope` itself (the resolved behavior for
/// assignment-creates-if-absent).
pub fn setq(scope: &ScopeRef, name: &str, value: Value) {
    let mut current = Arc::clone(scope);
    loop {
        let has_binding = current.read().variables.contains_key(name);
        if has_binding {
            current.write().variables.insert(name.to_string(), value);
            return;
        }
        let next = current.read().parent.clone();
        match next {
            Some(parent) => current = parent,
            None => break,
        }
    }
    scope.write().variables.insert(name.to_string(), value);
}

/// Looks up `name` in `variables` only, walking the scope chain. Used by
/// `valueOf`, which by design does not fall through to user functions,
/// host objects, or built-ins.
pub fn lookup_variable(scope: &ScopeRef, name: &str) -> Option<Value> {
    let mut current = Arc::clone(scope);
    loop {
        if let Some(value) = current.read().variables.get(name) {
            return Some(value.clone());
        }
        let next = current.read().parent.clone();
        match next {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

/// Four-tier name resolution: variables, then user functions, then host
/// objects, then built-ins. Each non-built-in tier is searched across the
/// whole ancestor chain (innermost scope wins), matching how `declare`
/// shadows an ancestor binding or a built-in of the same name.
pub fn resolve(scope: &ScopeRef, name: &str) -> Option<Resolved> {
    let mut current = Arc::clone(scope);
    loop {
        {
            let guard = current.read();
            if let Some(value) = guard.variables.get(name) {
                return Some(Resolved::Variable(value.clone()));
            }
            if let Some(func) = guard.user_functions.get(name) {
                return Some(Resolved::UserFunction(Arc::clone(func)));
            }
            if let Some(obj) = guard.host_objects.get(name) {
                return Some(Resolved::HostObject(Arc::clone(obj)));
            }
        }
        let next = current.read().parent.clone();
        match next {
            Some(parent) => current = parent,
            None => break,
        }
    }
    scope.read().builtins.get(name).map(Resolved::Builtin)
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
