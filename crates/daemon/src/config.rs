// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One function per environment variable, each documenting its own default,
//! rather than a global config singleton: a module scanning for a setting
//! can `grep` the function name instead of chasing a struct field through a
//! config-loading indirection.

use std::path::PathBuf;
use std::time::Duration;

use chariot_storage::expand_tilde;

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_u64(name: &str) -> Option<u64> {
    env_string(name).and_then(|v| v.parse().ok())
}

/// Root directory for all persisted state. `CHARIOT_STATE_DIR` >
/// `XDG_STATE_HOME/chariot` > `~/.local/state/chariot`.
pub fn state_dir() -> PathBuf {
    if let Some(dir) = env_string("CHARIOT_STATE_DIR") {
        return expand_tilde(&dir);
    }
    if let Some(xdg) = env_string("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("chariot");
    }
    dirs::home_dir().map(|home| home.join(".local/state/chariot")).unwrap_or_else(|| PathBuf::from("/tmp/chariot"))
}

/// Path to the Unix domain socket the daemon listens on. Default:
/// `<state_dir>/chariot.sock`.
pub fn socket_path() -> PathBuf {
    match env_string("CHARIOT_SOCKET_PATH") {
        Some(path) => expand_tilde(&path),
        None => state_dir().join("chariot.sock"),
    }
}

/// Bearer token clients must present on `login`. No default: unset means
/// the daemon accepts any client, intended only for local development.
pub fn auth_token() -> Option<String> {
    env_string("CHARIOT_AUTH_TOKEN")
}

/// How long a session may sit idle before the expiry sweeper reclaims it.
/// Default: 30 minutes.
pub fn session_ttl() -> Duration {
    Duration::from_millis(env_u64("CHARIOT_SESSION_TTL_MS").unwrap_or(30 * 60 * 1000))
}

/// How often the session expiry sweeper runs. Default: 30 seconds.
pub fn session_sweep_interval() -> Duration {
    Duration::from_millis(env_u64("CHARIOT_SESSION_SWEEP_MS").unwrap_or(30_000))
}

/// How long a completed/failed job's record and log lines are retained
/// before the job retention sweeper reclaims them. Default: 1 hour.
pub fn job_retention() -> Duration {
    Duration::from_millis(env_u64("CHARIOT_JOB_RETENTION_MS").unwrap_or(60 * 60 * 1000))
}

/// How often the job retention sweeper runs. Default: 1 minute.
pub fn job_sweep_interval() -> Duration {
    Duration::from_millis(env_u64("CHARIOT_JOB_SWEEP_MS").unwrap_or(60_000))
}

/// Maximum number of log lines kept per job before the log bus starts
/// dropping the oldest and recording a gap marker. Default: 10,000.
pub fn log_ring_capacity() -> usize {
    env_u64("CHARIOT_LOG_RING_CAPACITY").unwrap_or(10_000) as usize
}

/// Grace period the daemon waits for in-flight jobs to finish before a
/// forced shutdown. Default: 10 seconds.
pub fn drain_timeout() -> Duration {
    Duration::from_millis(env_u64("CHARIOT_DRAIN_TIMEOUT_MS").unwrap_or(10_000))
}

/// Wall-clock budget for a single synchronous `execute` call before it is
/// canceled. Default: 300 seconds.
pub fn execute_timeout() -> Duration {
    Duration::from_millis(env_u64("CHARIOT_EXECUTE_TIMEOUT_MS").unwrap_or(300_000))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
