// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side mirror of `chariot_daemon::config`'s env vars that the CLI
//! also needs to agree with the daemon on: the socket it dials and the
//! token it presents on login.

use std::path::PathBuf;

use chariot_storage::expand_tilde;

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Root directory for all persisted state. Mirrors
/// `chariot_daemon::config::state_dir` so a client run on the same host
/// finds the same socket without extra configuration.
pub fn state_dir() -> PathBuf {
    if let Some(dir) = env_string("CHARIOT_STATE_DIR") {
        return expand_tilde(&dir);
    }
    if let Some(xdg) = env_string("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("chariot");
    }
    dirs::home_dir().map(|home| home.join(".local/state/chariot")).unwrap_or_else(|| PathBuf::from("/tmp/chariot"))
}

/// Path to the daemon's Unix domain socket. Default: `<state_dir>/chariot.sock`.
pub fn socket_path() -> PathBuf {
    match env_string("CHARIOT_SOCKET_PATH") {
        Some(path) => expand_tilde(&path),
        None => state_dir().join("chariot.sock"),
    }
}

/// Bearer token presented on `login`, absent a `--token` flag.
pub fn auth_token() -> Option<String> {
    env_string("CHARIOT_AUTH_TOKEN")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
