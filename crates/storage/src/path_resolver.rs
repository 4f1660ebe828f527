// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves script-supplied relative paths against one of a handful of
//! fixed root directories, rejecting anything that could escape the root.

use std::path::{Component, Path, PathBuf};

use crate::error::SecurityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    /// General-purpose key/value and document storage.
    Data,
    /// Parsed/serialized tree structures produced by script execution.
    Trees,
    /// Rendered diagram artifacts.
    Diagrams,
    /// TLS material for the daemon's listener sockets.
    Cert,
}

/// Expands a leading `~/` using the current user's home directory. Only
/// meant for trusted configuration values (env vars, config files); never
/// applied to script-supplied relative paths, which must stay relative.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

/// Validates a script-supplied relative path: no NUL bytes, not absolute,
/// and no `..` component. Returns the path unchanged (as a `&str`) when it
/// passes, so callers can still choose how to join it to a root.
pub fn validate_relative(path: &str) -> Result<&str, SecurityError> {
    if path.contains('\0') {
        return Err(SecurityError::NulByte { path: path.to_string() });
    }
    let as_path = Path::new(path);
    if as_path.is_absolute() {
        return Err(SecurityError::AbsolutePath { path: path.to_string() });
    }
    if as_path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(SecurityError::PathEscape { path: path.to_string() });
    }
    Ok(path)
}

#[derive(Debug, Clone)]
pub struct SecurePathResolver {
    data: PathBuf,
    trees: PathBuf,
    diagrams: PathBuf,
    cert: PathBuf,
}

impl SecurePathResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base = base_dir.into();
        Self {
            data: base.join("data"),
            trees: base.join("trees"),
            diagrams: base.join("diagrams"),
            cert: base.join("cert"),
        }
    }

    fn root(&self, kind: RootKind) -> &Path {
        match kind {
            RootKind::Data => &self.data,
            RootKind::Trees => &self.trees,
            RootKind::Diagrams => &self.diagrams,
            RootKind::Cert => &self.cert,
        }
    }

    /// Resolves `relative` against `kind`'s root. The returned path is
    /// always a descendant of that root; the caller never sees a path
    /// escaping it.
    pub fn resolve(&self, kind: RootKind, relative: &str) -> Result<PathBuf, SecurityError> {
        let relative = validate_relative(relative)?;
        Ok(self.root(kind).join(relative))
    }
}

#[cfg(test)]
#[path = "path_resolver_tests.rs"]
mod tests;
