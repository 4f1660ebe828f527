// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chariot_core::FakeClock;
use chariot_lang::{BuiltinRegistry, Runtime};
use chariot_storage::FunctionLibrary;
use tempfile::tempdir;

use super::*;

fn scope_with_library(path: &std::path::Path) -> (ScopeRef, Arc<Mutex<FunctionLibrary>>) {
    let library = Arc::new(Mutex::new(FunctionLibrary::load(path).unwrap()));
    let mut registry = BuiltinRegistry::new();
    chariot_lang::builtins::register_core_builtins(&mut registry);
    register_host_builtins(&mut registry, Arc::clone(&library), FakeClock::new());
    (Runtime::new_root(Arc::new(registry)), library)
}

fn call(scope: &ScopeRef, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    scope.read().builtins.get(name).unwrap()(scope, args)
}

#[test]
fn save_functions_defines_and_persists_an_entry() {
    let dir = tempdir().unwrap();
    let (scope, library) = scope_with_library(&dir.path().join("functions.json"));

    call(
        &scope,
        "saveFunctions",
        &[
            Value::String("increment".into()),
            Value::Array(vec![Value::String("x".into())]),
            Value::String("add(x, 1)".into()),
        ],
    )
    .unwrap();

    assert!(library.lock().get("increment").is_some());

    let reloaded = FunctionLibrary::load(dir.path().join("functions.json")).unwrap();
    assert!(reloaded.get("increment").is_some());
}

#[test]
fn save_functions_rejects_a_duplicate_name() {
    let dir = tempdir().unwrap();
    let (scope, _library) = scope_with_library(&dir.path().join("functions.json"));
    let args = [Value::String("f".into()), Value::Array(vec![]), Value::String("null()".into())];
    call(&scope, "saveFunctions", &args).unwrap();
    let err = call(&scope, "saveFunctions", &args).unwrap_err();
    assert!(matches!(err, RuntimeError::HostFailure(_)));
}

#[test]
fn list_functions_returns_saved_names() {
    let dir = tempdir().unwrap();
    let (scope, _library) = scope_with_library(&dir.path().join("functions.json"));
    call(
        &scope,
        "saveFunctions",
        &[Value::String("f".into()), Value::Array(vec![]), Value::String("null()".into())],
    )
    .unwrap();

    let names = call(&scope, "listFunctions", &[]).unwrap();
    assert_eq!(names, Value::Array(vec![Value::String("f".into())]));
}

#[test]
fn get_function_returns_a_callable_closed_over_nothing() {
    let dir = tempdir().unwrap();
    let (scope, _library) = scope_with_library(&dir.path().join("functions.json"));
    call(
        &scope,
        "saveFunctions",
        &[
            Value::String("increment".into()),
            Value::Array(vec![Value::String("x".into())]),
            Value::String("add(x, 1)".into()),
        ],
    )
    .unwrap();

    let func = call(&scope, "getFunction", &[Value::String("increment".into())]).unwrap();
    let Value::Function(func) = func else { panic!("expected a function value") };
    assert_eq!(func.params, vec!["x".to_string()]);
    assert!(func.closure.is_none());
}

#[test]
fn get_function_on_an_unknown_name_is_a_host_failure() {
    let dir = tempdir().unwrap();
    let (scope, _library) = scope_with_library(&dir.path().join("functions.json"));
    let err = call(&scope, "getFunction", &[Value::String("ghost".into())]).unwrap_err();
    assert!(matches!(err, RuntimeError::HostFailure(_)));
}

#[test]
fn delete_function_removes_it_from_the_library() {
    let dir = tempdir().unwrap();
    let (scope, library) = scope_with_library(&dir.path().join("functions.json"));
    call(
        &scope,
        "saveFunctions",
        &[Value::String("f".into()), Value::Array(vec![]), Value::String("null()".into())],
    )
    .unwrap();

    call(&scope, "deleteFunction", &[Value::String("f".into())]).unwrap();
    assert!(library.lock().get("f").is_none());

    let err = call(&scope, "deleteFunction", &[Value::String("f".into())]).unwrap_err();
    assert!(matches!(err, RuntimeError::HostFailure(_)));
}

#[test]
fn load_functions_installs_every_entry_into_the_root_scope() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("functions.json");
    {
        let mut library = FunctionLibrary::load(&path).unwrap();
        library
            .define("increment", chariot_storage::FunctionRecord { params: vec!["x".into()], body_source: "add(x, 1)".into() })
            .unwrap();
        library.persist(1).unwrap();
    }

    let (scope, _library) = scope_with_library(&path);
    let count = call(&scope, "loadFunctions", &[]).unwrap();
    assert_eq!(count, Value::Integer(1));
    assert!(scope.read().user_functions.contains_key("increment"));
}

#[test]
fn load_functions_reflects_changes_made_on_disk_after_startup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("functions.json");
    let (scope, library) = scope_with_library(&path);

    {
        let mut external = FunctionLibrary::load(&path).unwrap();
        external
            .define("added-later", chariot_storage::FunctionRecord { params: vec![], body_source: "null()".into() })
            .unwrap();
        external.persist(5).unwrap();
    }

    call(&scope, "loadFunctions", &[]).unwrap();
    assert!(library.lock().get("added-later").is_some());
    assert!(scope.read().user_functions.contains_key("added-later"));
}

#[test]
fn inspect_runtime_reports_variables_and_functions_across_the_scope_chain() {
    let dir = tempdir().unwrap();
    let (root, _library) = scope_with_library(&dir.path().join("functions.json"));
    root.write().declare("topLevel", Value::Integer(1)).unwrap();
    let child = Runtime::new_child(&root);
    child.write().declare("inner", Value::Integer(2)).unwrap();

    let report = call(&child, "inspectRuntime", &[]).unwrap();
    let Value::Map(map) = report else { panic!("expected a map") };
    let Value::Array(variable_names) = map.get("variableNames").unwrap() else { panic!("expected an array") };
    assert!(variable_names.contains(&Value::String("topLevel".into())));
    assert!(variable_names.contains(&Value::String("inner".into())));
}

#[test]
fn arity_mismatches_are_rejected() {
    let dir = tempdir().unwrap();
    let (scope, _library) = scope_with_library(&dir.path().join("functions.json"));
    assert!(call(&scope, "listFunctions", &[Value::Integer(1)]).is_err());
    assert!(call(&scope, "getFunction", &[]).is_err());
}
