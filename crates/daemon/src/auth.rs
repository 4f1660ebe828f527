// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bearer-token authentication for `login`. Kept as a trait so tests (and,
//! eventually, alternate deployments) can swap in a different scheme
//! without touching the session manager.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("a token is required")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("session expired")]
    Expired,
}

pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: Option<&str>) -> Result<(), AuthError>;
}

/// Compares the presented token against a single configured secret. When no
/// secret is configured, every login succeeds; that's the local-development
/// posture, never appropriate for a daemon reachable outside the host.
pub struct TokenAuthenticator {
    expected: Option<String>,
}

impl TokenAuthenticator {
    pub fn new(expected: Option<String>) -> Self {
        Self { expected }
    }
}

impl Authenticator for TokenAuthenticator {
    fn authenticate(&self, token: Option<&str>) -> Result<(), AuthError> {
        match &self.expected {
            None => Ok(()),
            Some(expected) => match token {
                None => Err(AuthError::MissingToken),
                Some(t) if t == expected => Ok(()),
                Some(_) => Err(AuthError::InvalidToken),
            },
        }
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
