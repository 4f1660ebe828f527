// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session manager: owns the mapping from [`SessionId`] to a root
//! [`Runtime`](chariot_lang::Runtime), plus the idle-expiry sweep that
//! reclaims sessions nobody has touched in a while.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chariot_core::{define_id, Clock};
use chariot_lang::{BuiltinRegistry, Runtime, ScopeRef};
use indexmap::IndexMap;
use parking_lot::Mutex;
use thiserror::Error;

define_id! {
    pub struct SessionId("ses-");
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session '{session_id}' not found")]
    NotFound { session_id: String },
    #[error("session '{session_id}' expired")]
    Expired { session_id: String },
}

struct SessionEntry {
    runtime: ScopeRef,
    last_active: Instant,
}

pub struct SessionManager<C: Clock> {
    sessions: Mutex<IndexMap<SessionId, SessionEntry>>,
    builtins: Arc<BuiltinRegistry>,
    clock: C,
    ttl: Duration,
}

impl<C: Clock> SessionManager<C> {
    pub fn new(builtins: Arc<BuiltinRegistry>, clock: C, ttl: Duration) -> Self {
        Self { sessions: Mutex::new(IndexMap::new()), builtins, clock, ttl }
    }

    /// Creates a fresh session with its own root Runtime. `client_name` is
    /// accepted for future auditing but not currently persisted.
    pub fn login(&self, _client_name: &str) -> SessionId {
        let id = SessionId::new();
        let runtime = Runtime::new_root(Arc::clone(&self.builtins));
        self.sessions.lock().insert(id.clone(), SessionEntry { runtime, last_active: self.clock.now() });
        id
    }

    /// Looks up a session's Runtime and refreshes its idle timer. Detects
    /// idle expiry eagerly rather than relying solely on the background
    /// sweeper, so a call made just past the TTL reports `Expired` instead
    /// of racing the sweep to `NotFound`.
    pub fn resolve(&self, id: &SessionId) -> Result<ScopeRef, SessionError> {
        let mut sessions = self.sessions.lock();
        let expired = match sessions.get(id) {
            None => return Err(SessionError::NotFound { session_id: id.to_string() }),
            Some(entry) => self.clock.now().duration_since(entry.last_active) >= self.ttl,
        };
        if expired {
            sessions.shift_remove(id);
            return Err(SessionError::Expired { session_id: id.to_string() });
        }
        let entry = sessions.get_mut(id).expect("presence checked above");
        entry.last_active = self.clock.now();
        Ok(Arc::clone(&entry.runtime))
    }

    pub fn logout(&self, id: &SessionId) -> Result<(), SessionError> {
        self.sessions
            .lock()
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| SessionError::NotFound { session_id: id.to_string() })
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Removes every session whose idle time exceeds the configured TTL,
    /// returning the ids that were reclaimed.
    pub fn sweep_expired(&self) -> Vec<SessionId> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock();
        let expired: Vec<SessionId> = sessions
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.last_active) >= self.ttl)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            sessions.shift_remove(id);
        }
        expired
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
