// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chariot_core::FakeClock;

use super::*;

fn manager(ttl: Duration) -> SessionManager<FakeClock> {
    SessionManager::new(Arc::new(chariot_lang::default_builtins()), FakeClock::new(), ttl)
}

#[test]
fn login_creates_a_resolvable_session() {
    let manager = manager(Duration::from_secs(60));
    let id = manager.login("tester");
    assert!(manager.resolve(&id).is_ok());
}

#[test]
fn logout_removes_the_session() {
    let manager = manager(Duration::from_secs(60));
    let id = manager.login("tester");
    manager.logout(&id).unwrap();
    assert!(manager.resolve(&id).is_err());
}

#[test]
fn resolving_an_unknown_session_is_an_error() {
    let manager = manager(Duration::from_secs(60));
    let bogus = SessionId::new();
    let err = manager.resolve(&bogus).unwrap_err();
    assert!(matches!(err, SessionError::NotFound { .. }));
}

#[test]
fn resolve_detects_idle_expiry_ahead_of_the_sweeper() {
    let clock = FakeClock::new();
    let manager = SessionManager::new(Arc::new(chariot_lang::default_builtins()), clock.clone(), Duration::from_secs(60));
    let id = manager.login("tester");

    clock.advance(Duration::from_secs(61));
    let err = manager.resolve(&id).unwrap_err();
    assert!(matches!(err, SessionError::Expired { .. }));
    assert!(manager.resolve(&id).is_err(), "expired session should also be evicted");
}

#[test]
fn sweep_reclaims_sessions_past_their_ttl() {
    let clock = FakeClock::new();
    let manager = SessionManager::new(Arc::new(chariot_lang::default_builtins()), clock.clone(), Duration::from_secs(60));
    let id = manager.login("tester");

    clock.advance(Duration::from_secs(30));
    assert!(manager.sweep_expired().is_empty());

    clock.advance(Duration::from_secs(31));
    let expired = manager.sweep_expired();
    assert_eq!(expired, vec![id]);
    assert_eq!(manager.session_count(), 0);
}

#[test]
fn resolving_a_session_refreshes_its_idle_timer() {
    let clock = FakeClock::new();
    let manager = SessionManager::new(Arc::new(chariot_lang::default_builtins()), clock.clone(), Duration::from_secs(60));
    let id = manager.login("tester");

    clock.advance(Duration::from_secs(50));
    manager.resolve(&id).unwrap();
    clock.advance(Duration::from_secs(50));

    assert!(manager.sweep_expired().is_empty());
}
