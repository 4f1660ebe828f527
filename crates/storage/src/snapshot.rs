// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic JSON snapshot persistence: write to a temp file, fsync, rotate up
//! to [`MAX_BAK_FILES`] numbered backups, then rename into place. An
//! advisory exclusive lock on a sibling `.lock` file keeps two daemon
//! instances from stomping on each other's writes.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

pub const MAX_BAK_FILES: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub version: u32,
    pub seq: u64,
    pub created_at_ms: u64,
    pub state: T,
}

fn io_err(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io { path: path.to_path_buf(), source }
}

fn bak_path(path: &Path, index: usize) -> PathBuf {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!("{file_name}.bak.{index}"))
}

fn rotate_backups(path: &Path) -> std::io::Result<()> {
    for i in (1..MAX_BAK_FILES).rev() {
        let from = bak_path(path, i);
        let to = bak_path(path, i + 1);
        if from.exists() {
            fs::rename(&from, &to)?;
        }
    }
    if path.exists() {
        fs::rename(path, bak_path(path, 1))?;
    }
    Ok(())
}

/// Writes `snapshot` to `path` atomically: temp-file-then-rename, with
/// backup rotation of whatever was previously at `path`.
pub fn write_snapshot<T: Serialize>(path: &Path, snapshot: &Snapshot<T>) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let lock_path = path.with_extension("lock");
    let lock_file =
        OpenOptions::new().create(true).write(true).open(&lock_path).map_err(|e| io_err(&lock_path, e))?;
    lock_file.lock_exclusive().map_err(|_| PersistenceError::Locked { path: path.to_path_buf() })?;

    let result = (|| {
        let tmp_path = path.with_extension("tmp");
        let json = serde_json::to_vec_pretty(snapshot).map_err(PersistenceError::Serialize)?;
        {
            let mut tmp_file = File::create(&tmp_path).map_err(|e| io_err(&tmp_path, e))?;
            tmp_file.write_all(&json).map_err(|e| io_err(&tmp_path, e))?;
            tmp_file.sync_all().map_err(|e| io_err(&tmp_path, e))?;
        }
        rotate_backups(path).map_err(|e| io_err(path, e))?;
        fs::rename(&tmp_path, path).map_err(|e| io_err(path, e))
    })();

    let _ = FileExt::unlock(&lock_file);
    result
}

/// Reads the snapshot at `path`, if any. Returns `Ok(None)` when the file
/// does not exist (first run); errors on malformed JSON or a version this
/// binary does not understand.
pub fn read_snapshot<T: DeserializeOwned>(
    path: &Path,
    expected_version: u32,
) -> Result<Option<Snapshot<T>>, PersistenceError> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path).map_err(|e| io_err(path, e))?;
    let snapshot: Snapshot<T> = serde_json::from_slice(&bytes)
        .map_err(|source| PersistenceError::Deserialize { path: path.to_path_buf(), source })?;
    if snapshot.version != expected_version {
        return Err(PersistenceError::VersionMismatch {
            path: path.to_path_buf(),
            found: snapshot.version,
            expected: expected_version,
        });
    }
    Ok(Some(snapshot))
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
