// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host built-ins layered onto the bare `chariot-lang` substrate: the
//! function library (`saveFunctions`/`loadFunctions`/`listFunctions`/
//! `getFunction`/`deleteFunction`) and `inspectRuntime`. Registered once at
//! daemon startup into the `BuiltinRegistry` every session's root Runtime is
//! built from, so every script-visible capability beyond arithmetic and
//! `logPrint` is wired in exactly one place.

use std::sync::Arc;

use chariot_core::Clock;
use chariot_lang::{BuiltinRegistry, Parser, RuntimeError, ScopeRef, UserFunction, Value};
use chariot_storage::{FunctionLibrary, FunctionRecord};
use indexmap::IndexMap;
use parking_lot::Mutex;

pub fn register_host_builtins<C: Clock>(
    registry: &mut BuiltinRegistry,
    library: Arc<Mutex<FunctionLibrary>>,
    clock: C,
) {
    registry.register("listFunctions", Arc::new({
        let library = Arc::clone(&library);
        move |_: &ScopeRef, args: &[Value]| list_functions(&library, args)
    }));

    registry.register("getFunction", Arc::new({
        let library = Arc::clone(&library);
        move |_: &ScopeRef, args: &[Value]| get_function(&library, args)
    }));

    registry.register("deleteFunction", Arc::new({
        let library = Arc::clone(&library);
        move |scope: &ScopeRef, args: &[Value]| delete_function(&library, scope, args)
    }));

    registry.register("saveFunctions", Arc::new({
        let library = Arc::clone(&library);
        let clock = clock.clone();
        move |_: &ScopeRef, args: &[Value]| save_functions(&library, &clock, args)
    }));

    registry.register("loadFunctions", Arc::new({
        let library = Arc::clone(&library);
        move |scope: &ScopeRef, args: &[Value]| load_functions(&library, scope, args)
    }));

    registry.register("inspectRuntime", Arc::new(|scope: &ScopeRef, args: &[Value]| inspect_runtime(scope, args)));
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

fn expect_string(name: &str, index: usize, value: &Value) -> Result<String, RuntimeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(RuntimeError::bad_argument(index, "string", format!("'{name}' got {}", other.type_name()))),
    }
}

fn expect_string_array(name: &str, index: usize, value: &Value) -> Result<Vec<String>, RuntimeError> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(RuntimeError::bad_argument(i, "string", format!("'{name}' element got {}", other.type_name()))),
            })
            .collect(),
        other => Err(RuntimeError::bad_argument(index, "array of strings", format!("'{name}' got {}", other.type_name()))),
    }
}

/// Walks to the outermost ancestor: functions installed by `loadFunctions`
/// are bound there, visible from anywhere in the session rather than only
/// the scope active when the load happened.
fn root_scope(scope: &ScopeRef) -> ScopeRef {
    let mut current = Arc::clone(scope);
    loop {
        let parent = current.read().parent.clone();
        match parent {
            Some(parent) => current = parent,
            None => return current,
        }
    }
}

fn parse_function_body(name: &str, record: &FunctionRecord) -> Result<Arc<UserFunction>, RuntimeError> {
    let body = Parser::parse(&record.body_source)
        .map_err(|e| RuntimeError::HostFailure(format!("function '{name}' has an unparsable body: {e}")))?;
    Ok(Arc::new(UserFunction {
        name: Some(name.to_string()),
        params: record.params.clone(),
        body: Arc::new(body),
        closure: None,
    }))
}

fn list_functions(library: &Arc<Mutex<FunctionLibrary>>, args: &[Value]) -> Result<Value, RuntimeError> {
    require_arity("listFunctions", args, 0)?;
    let names: Vec<Value> = library.lock().list().map(|n| Value::String(n.to_string())).collect();
    Ok(Value::Array(names))
}

fn get_function(library: &Arc<Mutex<FunctionLibrary>>, args: &[Value]) -> Result<Value, RuntimeError> {
    require_arity("getFunction", args, 1)?;
    let name = expect_string("getFunction", 0, &args[0])?;
    let guard = library.lock();
    let record = guard
        .get(&name)
        .ok_or_else(|| RuntimeError::HostFailure(format!("function '{name}' not found")))?
        .clone();
    drop(guard);
    Ok(Value::Function(parse_function_body(&name, &record)?))
}

fn delete_function(library: &Arc<Mutex<FunctionLibrary>>, scope: &ScopeRef, args: &[Value]) -> Result<Value, RuntimeError> {
    require_arity("deleteFunction", args, 1)?;
    let name = expect_string("deleteFunction", 0, &args[0])?;
    library
        .lock()
        .delete(&name)
        .map_err(|e| RuntimeError::HostFailure(format!("deleteFunction: {e}")))?;
    root_scope(scope).write().user_functions.shift_remove(&name);
    Ok(Value::Null)
}

fn save_functions<C: Clock>(library: &Arc<Mutex<FunctionLibrary>>, clock: &C, args: &[Value]) -> Result<Value, RuntimeError> {
    require_arity("saveFunctions", args, 3)?;
    let name = expect_string("saveFunctions", 0, &args[0])?;
    let params = expect_string_array("saveFunctions", 1, &args[1])?;
    let body_source = expect_string("saveFunctions", 2, &args[2])?;

    let mut guard = library.lock();
    guard
        .define(name, FunctionRecord { params, body_source })
        .map_err(|e| RuntimeError::HostFailure(format!("saveFunctions: {e}")))?;
    guard
        .persist(clock.epoch_ms())
        .map_err(|e| RuntimeError::HostFailure(format!("saveFunctions: {e}")))?;
    Ok(Value::Null)
}

/// Reloads the library file from disk, replacing in-memory state, then
/// installs every entry into the session's root scope so the reloaded
/// functions are immediately callable by name.
fn load_functions(library: &Arc<Mutex<FunctionLibrary>>, scope: &ScopeRef, args: &[Value]) -> Result<Value, RuntimeError> {
    require_arity("loadFunctions", args, 0)?;
    let mut guard = library.lock();
    let reloaded = FunctionLibrary::load(guard.path())
        .map_err(|e| RuntimeError::HostFailure(format!("loadFunctions: {e}")))?;
    *guard = reloaded;

    let root = root_scope(scope);
    let mut count = 0;
    for name in guard.list().map(str::to_string).collect::<Vec<_>>() {
        let record = guard.get(&name).expect("name came from list()").clone();
        let function = parse_function_body(&name, &record)?;
        root.write().user_functions.insert(name, function);
        count += 1;
    }
    Ok(Value::Integer(count))
}

fn inspect_runtime(scope: &ScopeRef, args: &[Value]) -> Result<Value, RuntimeError> {
    require_arity("inspectRuntime", args, 0)?;
    let mut variable_names = Vec::new();
    let mut function_names = Vec::new();
    let mut host_object_names = Vec::new();

    let mut current = Arc::clone(scope);
    loop {
        let guard = current.read();
        for name in guard.variables.keys() {
            if !variable_names.contains(name) {
                variable_names.push(name.clone());
            }
        }
        for name in guard.user_functions.keys() {
            if !function_names.contains(name) {
                function_names.push(name.clone());
            }
        }
        for name in guard.host_objects.keys() {
            if !host_object_names.contains(name) {
                host_object_names.push(name.clone());
            }
        }
        let parent = guard.parent.clone();
        drop(guard);
        match parent {
            Some(parent) => current = parent,
            None => break,
        }
    }

    let mut map = IndexMap::new();
    map.insert("variableNames".to_string(), Value::Array(variable_names.into_iter().map(Value::String).collect()));
    map.insert("functionNames".to_string(), Value::Array(function_names.into_iter().map(Value::String).collect()));
    map.insert("hostObjectNames".to_string(), Value::Array(host_object_names.into_iter().map(Value::String).collect()));
    Ok(Value::Map(map))
}

#[cfg(test)]
#[path = "builtins_host_tests.rs"]
mod tests;
