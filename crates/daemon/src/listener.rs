// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener Registry: named lifecycle entries, each with `onStart`/`onExit`
//! Chariot program text, mirrored to a single JSON snapshot file. `start`
//! and `stop` evaluate those hooks against one shared bootstrap Runtime, so
//! lifecycle invocations are naturally serialized by the registry's own
//! lock rather than needing a second synchronization primitive.

use std::path::PathBuf;
use std::sync::Arc;

use chariot_core::Clock;
use chariot_lang::{Parser, ScopeRef};
use chariot_storage::{PersistenceError, Snapshot};
use chariot_wire::{ListenerInfo, ListenerStatus};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LISTENER_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("listener '{name}' already exists")]
    AlreadyExists { name: String },
    #[error("listener '{name}' not found")]
    NotFound { name: String },
    #[error("listener '{name}' is running; stop it before deleting")]
    StillRunning { name: String },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listener {
    pub name: String,
    pub script: String,
    pub on_start: String,
    pub on_exit: String,
    pub auto_start: bool,
    pub status: ListenerStatus,
    pub start_time_ms: Option<u64>,
    pub last_active_ms: Option<u64>,
    pub is_healthy: bool,
    pub error: Option<String>,
}

impl Listener {
    fn new(name: String, script: String, on_start: String, on_exit: String, auto_start: bool) -> Self {
        Self {
            name,
            script,
            on_start,
            on_exit,
            auto_start,
            status: ListenerStatus::Stopped,
            start_time_ms: None,
            last_active_ms: None,
            is_healthy: false,
            error: None,
        }
    }
}

impl From<&Listener> for ListenerInfo {
    fn from(listener: &Listener) -> Self {
        ListenerInfo {
            name: listener.name.clone(),
            status: listener.status,
            auto_start: listener.auto_start,
            is_healthy: listener.is_healthy,
            start_time_ms: listener.start_time_ms,
            last_active_ms: listener.last_active_ms,
            error: listener.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegistryState {
    listeners: IndexMap<String, Listener>,
}

pub struct ListenerRegistry<C: Clock> {
    path: PathBuf,
    bootstrap: ScopeRef,
    clock: C,
    state: Mutex<RegistryState>,
    next_seq: Mutex<u64>,
    /// Held for the full duration of a `start`/`stop` call, including hook
    /// evaluation against the shared bootstrap Runtime: lifecycle
    /// invocations serialize against each other, not just the bookkeeping
    /// around them.
    lifecycle: Mutex<()>,
}

impl<C: Clock> ListenerRegistry<C> {
    /// Loads the registry from `path`, starting empty if the snapshot
    /// doesn't exist yet (first run).
    pub fn load(path: impl Into<PathBuf>, bootstrap: ScopeRef, clock: C) -> Result<Self, ListenerError> {
        let path = path.into();
        let loaded: Option<Snapshot<RegistryState>> = chariot_storage::read_snapshot(&path, LISTENER_SNAPSHOT_VERSION)?;
        let (state, next_seq) = match loaded {
            Some(snap) => (snap.state, snap.seq + 1),
            None => (RegistryState::default(), 1),
        };
        Ok(Self {
            path,
            bootstrap,
            clock,
            state: Mutex::new(state),
            next_seq: Mutex::new(next_seq),
            lifecycle: Mutex::new(()),
        })
    }

    pub fn list(&self) -> Vec<Listener> {
        self.state.lock().listeners.values().cloned().collect()
    }

    pub fn create(
        &self,
        name: impl Into<String>,
        script: impl Into<String>,
        on_start: impl Into<String>,
        on_exit: impl Into<String>,
        auto_start: bool,
    ) -> Result<Listener, ListenerError> {
        let name = name.into();
        let mut state = self.state.lock();
        if state.listeners.contains_key(&name) {
            return Err(ListenerError::AlreadyExists { name });
        }
        let listener = Listener::new(name.clone(), script.into(), on_start.into(), on_exit.into(), auto_start);
        state.listeners.insert(name, listener.clone());
        drop(state);
        self.persist()?;
        Ok(listener)
    }

    pub fn delete(&self, name: &str) -> Result<(), ListenerError> {
        let mut state = self.state.lock();
        match state.listeners.get(name) {
            None => return Err(ListenerError::NotFound { name: name.to_string() }),
            Some(listener) if listener.status == ListenerStatus::Running => {
                return Err(ListenerError::StillRunning { name: name.to_string() })
            }
            Some(_) => {}
        }
        state.listeners.shift_remove(name);
        drop(state);
        self.persist()
    }

    /// Evaluates `onStart` against the shared bootstrap Runtime. Success
    /// marks the listener `running` and healthy; failure marks it `error`
    /// and records the message, but never panics or propagates past this
    /// call — a bad listener script should not take the daemon down.
    pub fn start(&self, name: &str) -> Result<Listener, ListenerError> {
        let _lifecycle = self.lifecycle.lock();
        let on_start = {
            let state = self.state.lock();
            let listener = state.listeners.get(name).ok_or_else(|| ListenerError::NotFound { name: name.to_string() })?;
            listener.on_start.clone()
        };

        let outcome = run_hook(&self.bootstrap, &on_start);

        let mut state = self.state.lock();
        let listener = state.listeners.get_mut(name).ok_or_else(|| ListenerError::NotFound { name: name.to_string() })?;
        let now = self.clock.epoch_ms();
        match outcome {
            Ok(()) => {
                listener.status = ListenerStatus::Running;
                listener.start_time_ms = Some(now);
                listener.last_active_ms = Some(now);
                listener.is_healthy = true;
                listener.error = None;
            }
            Err(message) => {
                listener.status = ListenerStatus::Error;
                listener.is_healthy = false;
                listener.error = Some(message);
            }
        }
        let result = listener.clone();
        drop(state);
        self.persist()?;
        Ok(result)
    }

    /// Evaluates `onExit`. Always transitions to `stopped`/unhealthy
    /// regardless of whether the hook itself succeeded, but preserves the
    /// hook's error message when it failed.
    pub fn stop(&self, name: &str) -> Result<Listener, ListenerError> {
        let _lifecycle = self.lifecycle.lock();
        let on_exit = {
            let state = self.state.lock();
            let listener = state.listeners.get(name).ok_or_else(|| ListenerError::NotFound { name: name.to_string() })?;
            listener.on_exit.clone()
        };

        let outcome = run_hook(&self.bootstrap, &on_exit);

        let mut state = self.state.lock();
        let listener = state.listeners.get_mut(name).ok_or_else(|| ListenerError::NotFound { name: name.to_string() })?;
        listener.status = ListenerStatus::Stopped;
        listener.is_healthy = false;
        listener.error = outcome.err();
        let result = listener.clone();
        drop(state);
        self.persist()?;
        Ok(result)
    }

    /// Starts every listener with `autoStart=true`, logging and continuing
    /// past individual failures rather than aborting the boot sequence.
    pub fn auto_start_all(&self) {
        let names: Vec<String> =
            self.state.lock().listeners.values().filter(|l| l.auto_start).map(|l| l.name.clone()).collect();
        for name in names {
            if let Err(e) = self.start(&name) {
                tracing::warn!(listener = %name, error = %e, "auto-start failed");
            }
        }
    }

    fn persist(&self) -> Result<(), ListenerError> {
        let state = self.state.lock().clone();
        let mut next_seq = self.next_seq.lock();
        let snapshot = Snapshot { version: LISTENER_SNAPSHOT_VERSION, seq: *next_seq, created_at_ms: self.clock.epoch_ms(), state };
        chariot_storage::write_snapshot(&self.path, &snapshot)?;
        *next_seq += 1;
        Ok(())
    }
}

fn run_hook(bootstrap: &ScopeRef, source: &str) -> Result<(), String> {
    if source.trim().is_empty() {
        return Ok(());
    }
    let program = Parser::parse(source).map_err(|e| e.to_string())?;
    chariot_lang::run_program(bootstrap, &program).map(|_| ()).map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
