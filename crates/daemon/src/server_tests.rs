// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chariot_core::FakeClock;
use chariot_lang::{BuiltinRegistry, Runtime};
use chariot_storage::FunctionLibrary;
use tempfile::tempdir;

use super::*;
use crate::auth::TokenAuthenticator;
use crate::builtins_host::register_host_builtins;

fn context(dir: &Path, token: Option<&str>) -> ServerContext<FakeClock> {
    let clock = FakeClock::new();
    let mut registry = BuiltinRegistry::new();
    chariot_lang::builtins::register_core_builtins(&mut registry);
    let functions = Arc::new(Mutex::new(FunctionLibrary::load(dir.join("functions.json")).unwrap()));
    register_host_builtins(&mut registry, Arc::clone(&functions), clock.clone());
    let builtins = Arc::new(registry);
    let bootstrap = Runtime::new_root(Arc::clone(&builtins));

    ServerContext {
        sessions: SessionManager::new(Arc::clone(&builtins), clock.clone(), Duration::from_secs(3600)),
        jobs: JobManager::new(clock.clone(), 64, Duration::from_secs(3600)),
        listeners: ListenerRegistry::load(dir.join("listeners.json"), bootstrap, clock.clone()).unwrap(),
        functions,
        authenticator: Arc::new(TokenAuthenticator::new(token.map(String::from))),
        clock,
        execute_timeout: Duration::from_secs(5),
    }
}

async fn login(ctx: &ServerContext<FakeClock>) -> String {
    let response = handle(ctx, Request::Login { client_name: "tester".into(), credentials: None }).await.unwrap();
    match response {
        Response::Ok { data: ResponseData::SessionId { session_id } } => session_id,
        other => panic!("expected a session id, got {other:?}"),
    }
}

#[tokio::test]
async fn login_requires_the_configured_token() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path(), Some("s3cret"));

    let denied = handle(&ctx, Request::Login { client_name: "tester".into(), credentials: None }).await;
    assert!(matches!(denied, Err(DispatchError::Auth(_))));

    let granted = handle(
        &ctx,
        Request::Login { client_name: "tester".into(), credentials: Some("s3cret".into()) },
    )
    .await;
    assert!(granted.is_ok());
}

#[tokio::test]
async fn execute_returns_the_final_value() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path(), None);
    let sid = login(&ctx).await;

    let response = handle(&ctx, Request::Execute { session_id: sid, source: "add(2, 3)".into() }).await.unwrap();
    match response {
        Response::Ok { data: ResponseData::Value { value } } => assert_eq!(value, WireValue::Integer(5)),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn execute_surfaces_runtime_errors() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path(), None);
    let sid = login(&ctx).await;

    let err = handle(&ctx, Request::Execute { session_id: sid, source: "valueOf(neverDeclared)".into() }).await;
    assert!(matches!(err, Err(DispatchError::Runtime(_))));
}

#[tokio::test]
async fn execute_after_idle_ttl_reports_expired_not_not_found() {
    let dir = tempdir().unwrap();
    let clock = FakeClock::new();
    let mut registry = BuiltinRegistry::new();
    chariot_lang::builtins::register_core_builtins(&mut registry);
    let functions = Arc::new(Mutex::new(FunctionLibrary::load(dir.path().join("functions.json")).unwrap()));
    register_host_builtins(&mut registry, Arc::clone(&functions), clock.clone());
    let builtins = Arc::new(registry);
    let bootstrap = Runtime::new_root(Arc::clone(&builtins));
    let ctx = ServerContext {
        sessions: SessionManager::new(Arc::clone(&builtins), clock.clone(), Duration::from_secs(60)),
        jobs: JobManager::new(clock.clone(), 64, Duration::from_secs(3600)),
        listeners: ListenerRegistry::load(dir.path().join("listeners.json"), bootstrap, clock.clone()).unwrap(),
        functions,
        authenticator: Arc::new(TokenAuthenticator::new(None)),
        clock: clock.clone(),
        execute_timeout: Duration::from_secs(5),
    };
    let sid = login(&ctx).await;

    clock.advance(Duration::from_secs(61));
    let err = handle(&ctx, Request::Execute { session_id: sid, source: "add(1, 1)".into() }).await;
    assert!(matches!(err, Err(DispatchError::Auth(crate::auth::AuthError::Expired))));
}

#[tokio::test]
async fn execute_async_then_result_completes() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path(), None);
    let sid = login(&ctx).await;

    let started =
        handle(&ctx, Request::ExecuteAsync { session_id: sid.clone(), source: "add(1, 1)".into() }).await.unwrap();
    let job_id = match started {
        Response::Ok { data: ResponseData::JobStarted { job_id } } => job_id,
        other => panic!("unexpected response: {other:?}"),
    };

    for _ in 0..200 {
        let response = handle(&ctx, Request::Result { session_id: sid.clone(), job_id: job_id.clone() }).await.unwrap();
        if let Response::Ok { data: ResponseData::JobStatus { state, value, .. } } = &response {
            if !matches!(state, chariot_wire::JobState::Running | chariot_wire::JobState::Queued) {
                assert_eq!(*state, chariot_wire::JobState::Completed);
                assert_eq!(*value, Some(WireValue::Integer(2)));
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job did not complete in time");
}

#[tokio::test]
async fn a_second_session_cannot_read_another_sessions_job() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path(), None);
    let sid = login(&ctx).await;
    let other_sid = login(&ctx).await;

    let started = handle(&ctx, Request::ExecuteAsync { session_id: sid, source: "add(1, 1)".into() }).await.unwrap();
    let job_id = match started {
        Response::Ok { data: ResponseData::JobStarted { job_id } } => job_id,
        other => panic!("unexpected response: {other:?}"),
    };

    let err = handle(&ctx, Request::Result { session_id: other_sid, job_id }).await;
    assert!(matches!(err, Err(DispatchError::Job(JobError::Forbidden { .. }))));
}

#[tokio::test]
async fn function_library_round_trips_over_the_wire() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path(), None);
    let sid = login(&ctx).await;

    handle(
        &ctx,
        Request::SaveFunctions {
            session_id: sid.clone(),
            name: "increment".into(),
            params: vec!["x".into()],
            body_source: "add(x, 1)".into(),
        },
    )
    .await
    .unwrap();

    let listed = handle(&ctx, Request::ListFunctions { session_id: sid.clone() }).await.unwrap();
    assert!(matches!(listed, Response::Ok { data: ResponseData::FunctionNames { names } } if names == vec!["increment".to_string()]));

    let detail = handle(&ctx, Request::GetFunction { session_id: sid.clone(), name: "increment".into() }).await.unwrap();
    match detail {
        Response::Ok { data: ResponseData::FunctionDetail { params, body_source } } => {
            assert_eq!(params, vec!["x".to_string()]);
            assert_eq!(body_source, "add(x, 1)");
        }
        other => panic!("unexpected response: {other:?}"),
    }

    handle(&ctx, Request::DeleteFunction { session_id: sid.clone(), name: "increment".into() }).await.unwrap();
    let err = handle(&ctx, Request::GetFunction { session_id: sid, name: "increment".into() }).await;
    assert!(matches!(err, Err(DispatchError::Persistence(_))));
}

#[tokio::test]
async fn listener_lifecycle_over_the_wire() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path(), None);
    let sid = login(&ctx).await;

    let created = handle(
        &ctx,
        Request::ListenerCreate {
            session_id: sid.clone(),
            name: "webhook".into(),
            script: String::new(),
            on_start: "add(1, 1)".into(),
            on_exit: String::new(),
            auto_start: false,
        },
    )
    .await
    .unwrap();
    assert!(matches!(created, Response::Ok { data: ResponseData::ListenerList { .. } }));

    let started = handle(&ctx, Request::ListenerStart { session_id: sid.clone(), name: "webhook".into() }).await.unwrap();
    match started {
        Response::Ok { data: ResponseData::ListenerList { listeners } } => {
            assert_eq!(listeners[0].status, chariot_wire::ListenerStatus::Running);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    handle(&ctx, Request::ListenerStop { session_id: sid.clone(), name: "webhook".into() }).await.unwrap();
    let err = handle(&ctx, Request::ListenerDelete { session_id: sid, name: "webhook".into() }).await;
    assert!(err.is_ok());
}

#[tokio::test]
async fn inspect_runtime_reports_declared_variables() {
    let dir = tempdir().unwrap();
    let ctx = context(dir.path(), None);
    let sid = login(&ctx).await;

    handle(&ctx, Request::Execute { session_id: sid.clone(), source: "declare(seen, 1)".into() }).await.unwrap();
    let response = handle(&ctx, Request::InspectRuntime { session_id: sid }).await.unwrap();
    match response {
        Response::Ok { data: ResponseData::RuntimeInspection(report) } => {
            assert!(report.variable_names.contains(&"seen".to_string()));
        }
        other => panic!("unexpected response: {other:?}"),
    }
}
