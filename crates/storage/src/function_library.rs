// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persists the named function library: source text for every function
//! saved via `saveFunctions`, keyed by name, restored on `loadFunctions`.
//! Bodies are stored as source text rather than a parsed AST so the library
//! file stays portable across evaluator versions; the daemon re-parses each
//! body when a function is invoked.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::snapshot::{self, Snapshot};

pub const FUNCTION_LIBRARY_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub params: Vec<String>,
    pub body_source: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LibraryState {
    functions: IndexMap<String, FunctionRecord>,
}

pub struct FunctionLibrary {
    path: PathBuf,
    state: LibraryState,
    next_seq: u64,
}

impl FunctionLibrary {
    /// Loads the library from `path`, or starts empty if it doesn't exist yet.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let loaded: Option<Snapshot<LibraryState>> = snapshot::read_snapshot(&path, FUNCTION_LIBRARY_VERSION)?;
        let (state, next_seq) = match loaded {
            Some(snap) => (snap.state, snap.seq + 1),
            None => (LibraryState::default(), 1),
        };
        Ok(Self { path, state, next_seq })
    }

    pub fn list(&self) -> impl Iterator<Item = &str> {
        self.state.functions.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&FunctionRecord> {
        self.state.functions.get(name)
    }

    pub fn define(&mut self, name: impl Into<String>, record: FunctionRecord) -> Result<(), PersistenceError> {
        let name = name.into();
        if self.state.functions.contains_key(&name) {
            return Err(PersistenceError::FunctionExists { name });
        }
        self.state.functions.insert(name, record);
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<(), PersistenceError> {
        if self.state.functions.shift_remove(name).is_none() {
            return Err(PersistenceError::FunctionNotFound { name: name.to_string() });
        }
        Ok(())
    }

    /// Bulk-replaces the whole library, as `loadFunctions` does when
    /// importing a library file that was saved elsewhere.
    pub fn replace_all(&mut self, functions: IndexMap<String, FunctionRecord>) {
        self.state.functions = functions;
    }

    pub fn persist(&mut self, created_at_ms: u64) -> Result<(), PersistenceError> {
        let snapshot =
            Snapshot { version: FUNCTION_LIBRARY_VERSION, seq: self.next_seq, created_at_ms, state: self.state.clone() };
        snapshot::write_snapshot(&self.path, &snapshot)?;
        self.next_seq += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "function_library_tests.rs"]
mod tests;
