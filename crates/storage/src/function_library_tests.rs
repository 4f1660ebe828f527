// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tempfile::tempdir;

use super::*;

fn sample() -> FunctionRecord {
    FunctionRecord { params: vec!["x".into()], body_source: "add(x, 1)".into() }
}

#[test]
fn define_then_persist_then_reload_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("functions.json");

    let mut library = FunctionLibrary::load(&path).unwrap();
    library.define("increment", sample()).unwrap();
    library.persist(1_000).unwrap();

    let reloaded = FunctionLibrary::load(&path).unwrap();
    assert_eq!(reloaded.get("increment"), Some(&sample()));
}

#[test]
fn define_rejects_duplicate_name() {
    let dir = tempdir().unwrap();
    let mut library = FunctionLibrary::load(dir.path().join("functions.json")).unwrap();
    library.define("increment", sample()).unwrap();
    let err = library.define("increment", sample()).unwrap_err();
    assert!(matches!(err, PersistenceError::FunctionExists { .. }));
}

#[test]
fn delete_rejects_missing_name() {
    let dir = tempdir().unwrap();
    let mut library = FunctionLibrary::load(dir.path().join("functions.json")).unwrap();
    let err = library.delete("nope").unwrap_err();
    assert!(matches!(err, PersistenceError::FunctionNotFound { .. }));
}

#[test]
fn replace_all_swaps_the_whole_library() {
    let dir = tempdir().unwrap();
    let mut library = FunctionLibrary::load(dir.path().join("functions.json")).unwrap();
    library.define("keep-me-not", sample()).unwrap();

    let mut replacement = IndexMap::new();
    replacement.insert("fresh".to_string(), sample());
    library.replace_all(replacement);

    assert!(library.get("keep-me-not").is_none());
    assert!(library.get("fresh").is_some());
}

#[test]
fn seq_increments_across_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("functions.json");
    let mut library = FunctionLibrary::load(&path).unwrap();
    library.define("f", sample()).unwrap();
    library.persist(1).unwrap();
    library.persist(2).unwrap();

    let snap: Snapshot<LibraryState> = snapshot::read_snapshot(&path, FUNCTION_LIBRARY_VERSION).unwrap().unwrap();
    assert_eq!(snap.seq, 2);
}
