// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("path '{path}' escapes its root via '..'")]
    PathEscape { path: String },
    #[error("path '{path}' must be relative")]
    AbsolutePath { path: String },
    #[error("path '{path}' contains a NUL byte")]
    NulByte { path: String },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("security violation: {0}")]
    Security(#[from] SecurityError),
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("could not deserialize snapshot at {path}: {source}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot at {path} has version {found}, expected {expected}")]
    VersionMismatch { path: PathBuf, found: u32, expected: u32 },
    #[error("lock on {path} is held by another process")]
    Locked { path: PathBuf },
    #[error("function '{name}' not found")]
    FunctionNotFound { name: String },
    #[error("function '{name}' already exists")]
    FunctionExists { name: String },
}
