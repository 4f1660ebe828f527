// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime Control API socket: one `Request` in, one `Response` out, one
//! connection per call. A CLI invocation opens the socket, sends its
//! request, reads the reply, and disconnects, so there is no per-connection
//! state to keep beyond the request at hand.

use std::sync::Arc;
use std::time::Duration;

use chariot_core::Clock;
use chariot_lang::{RuntimeError, Value};
use chariot_storage::FunctionLibrary;
use chariot_wire::{
    read_request, write_response, FunctionInfo, ListenerInfo, Request, Response, ResponseData, RuntimeInspection,
    WireValue,
};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, warn};

use crate::auth::Authenticator;
use crate::jobs::{JobError, JobId, JobManager, JobOutcome};
use crate::listener::{ListenerError, ListenerRegistry};
use crate::session::{SessionError, SessionId, SessionManager};

#[derive(Debug, Error)]
enum DispatchError {
    #[error(transparent)]
    Auth(#[from] crate::auth::AuthError),
    #[error(transparent)]
    Session(SessionError),
    #[error(transparent)]
    Job(#[from] JobError),
    #[error(transparent)]
    Listener(#[from] ListenerError),
    #[error(transparent)]
    Persistence(#[from] chariot_storage::PersistenceError),
    #[error(transparent)]
    Parse(#[from] chariot_lang::ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl DispatchError {
    fn kind(&self) -> &'static str {
        match self {
            DispatchError::Auth(_) => "AuthError",
            DispatchError::Session(_) => "SessionError",
            DispatchError::Job(_) => "JobError",
            DispatchError::Listener(_) => "ListenerError",
            DispatchError::Persistence(_) => "PersistenceError",
            DispatchError::Parse(_) => "ParseError",
            DispatchError::Runtime(_) => "RuntimeError",
        }
    }
}

impl From<SessionError> for DispatchError {
    /// A session that has aged past its TTL is an auth failure, not a
    /// missing-resource one: `resolve` detects expiry eagerly so this
    /// reaches the caller as `AuthError{Expired}` rather than `SessionError`.
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Expired { .. } => DispatchError::Auth(crate::auth::AuthError::Expired),
            other => DispatchError::Session(other),
        }
    }
}

impl From<DispatchError> for Response {
    fn from(err: DispatchError) -> Self {
        Response::error(err.kind(), err.to_string())
    }
}

/// Everything a connection handler needs, shared across every accepted
/// connection behind `Arc`.
pub struct ServerContext<C: Clock> {
    pub sessions: SessionManager<C>,
    pub jobs: JobManager<C>,
    pub listeners: ListenerRegistry<C>,
    pub functions: Arc<Mutex<FunctionLibrary>>,
    pub authenticator: Arc<dyn Authenticator>,
    pub clock: C,
    pub execute_timeout: Duration,
}

/// Accepts connections on `listener` until the process is asked to shut
/// down, spawning one task per connection. Does not itself return early on
/// a single accept error: a transient accept failure shouldn't take the
/// whole daemon down.
pub async fn serve<C: Clock + 'static>(listener: UnixListener, ctx: Arc<ServerContext<C>>) {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, &ctx).await {
                        debug!(error = %e, "connection handling failed");
                    }
                });
            }
            Err(e) => error!(error = %e, "accept failed"),
        }
    }
}

async fn handle_connection<C: Clock>(mut stream: UnixStream, ctx: &ServerContext<C>) -> Result<(), chariot_wire::ProtocolError> {
    let request = read_request(&mut stream).await?;
    let response = dispatch(ctx, request).await;
    write_response(&mut stream, &response).await
}

async fn dispatch<C: Clock>(ctx: &ServerContext<C>, request: Request) -> Response {
    match handle(ctx, request).await {
        Ok(response) => response,
        Err(e) => e.into(),
    }
}

fn session_id(raw: &str) -> SessionId {
    SessionId::from_string(raw)
}

fn job_id(raw: &str) -> JobId {
    JobId::from_string(raw)
}

async fn handle<C: Clock>(ctx: &ServerContext<C>, request: Request) -> Result<Response, DispatchError> {
    match request {
        Request::Login { client_name, credentials } => {
            ctx.authenticator.authenticate(credentials.as_deref())?;
            let id = ctx.sessions.login(&client_name);
            Ok(Response::ok(ResponseData::SessionId { session_id: id.to_string() }))
        }

        Request::Logout { session_id: sid } => {
            let sid = session_id(&sid);
            let owned = ctx.jobs.jobs_owned_by(&sid);
            ctx.jobs.cancel_all(&owned);
            ctx.sessions.logout(&sid)?;
            Ok(Response::ok(ResponseData::Empty))
        }

        Request::Execute { session_id: sid, source } => {
            let scope = ctx.sessions.resolve(&session_id(&sid))?;
            let value = execute_sync(&scope, &source, ctx.execute_timeout).await?;
            Ok(Response::ok(ResponseData::Value { value: WireValue::from(&value) }))
        }

        Request::ExecuteAsync { session_id: sid, source } => {
            let sid = session_id(&sid);
            let scope = ctx.sessions.resolve(&sid)?;
            let job = ctx.jobs.submit(sid, &scope, &source)?;
            Ok(Response::ok(ResponseData::JobStarted { job_id: job.to_string() }))
        }

        Request::StreamLogs { session_id: sid, job_id: jid, after_seq } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            let (lines, next_after_seq, done) = ctx.jobs.stream_logs(&session_id(&sid), &job_id(&jid), after_seq)?;
            Ok(Response::ok(ResponseData::LogLines { lines, next_after_seq, done }))
        }

        Request::Result { session_id: sid, job_id: jid } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            let (state, outcome) = ctx.jobs.result(&session_id(&sid), &job_id(&jid))?;
            let (value, error) = match outcome {
                JobOutcome::Completed(v) => (Some(WireValue::from(&v)), None),
                JobOutcome::Failed(message) => (None, Some(message)),
                JobOutcome::Pending | JobOutcome::Canceled => (None, None),
            };
            Ok(Response::ok(ResponseData::JobStatus { state, value, error }))
        }

        Request::CancelJob { session_id: sid, job_id: jid } => {
            ctx.jobs.cancel(&session_id(&sid), &job_id(&jid))?;
            Ok(Response::ok(ResponseData::Empty))
        }

        Request::InspectRuntime { session_id: sid } => {
            let scope = ctx.sessions.resolve(&session_id(&sid))?;
            Ok(Response::ok(ResponseData::RuntimeInspection(inspect(&scope)?)))
        }

        Request::ListFunctions { session_id: sid } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            let names: Vec<String> = ctx.functions.lock().list().map(str::to_string).collect();
            Ok(Response::ok(ResponseData::FunctionNames { names }))
        }

        Request::GetFunction { session_id: sid, name } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            let guard = ctx.functions.lock();
            let record = guard
                .get(&name)
                .ok_or_else(|| chariot_storage::PersistenceError::FunctionNotFound { name: name.clone() })?
                .clone();
            Ok(Response::ok(ResponseData::FunctionDetail { params: record.params, body_source: record.body_source }))
        }

        Request::SaveFunctions { session_id: sid, name, params, body_source } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            let mut guard = ctx.functions.lock();
            guard.define(name, chariot_storage::FunctionRecord { params, body_source })?;
            guard.persist(ctx.clock.epoch_ms())?;
            Ok(Response::ok(ResponseData::Empty))
        }

        Request::LoadFunctions { session_id: sid } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            let mut guard = ctx.functions.lock();
            let reloaded = FunctionLibrary::load(guard.path())?;
            *guard = reloaded;
            let functions =
                guard.list().map(|name| FunctionInfo { name: name.to_string(), params: guard.get(name).map(|r| r.params.clone()).unwrap_or_default() }).collect();
            Ok(Response::ok(ResponseData::FunctionList { functions }))
        }

        Request::DeleteFunction { session_id: sid, name } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            ctx.functions.lock().delete(&name)?;
            Ok(Response::ok(ResponseData::Empty))
        }

        Request::ListenerList { session_id: sid } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            let listeners = ctx.listeners.list().iter().map(ListenerInfo::from).collect();
            Ok(Response::ok(ResponseData::ListenerList { listeners }))
        }

        Request::ListenerCreate { session_id: sid, name, script, on_start, on_exit, auto_start } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            let listener = ctx.listeners.create(name, script, on_start, on_exit, auto_start)?;
            Ok(Response::ok(ResponseData::ListenerList { listeners: vec![ListenerInfo::from(&listener)] }))
        }

        Request::ListenerDelete { session_id: sid, name } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            ctx.listeners.delete(&name)?;
            Ok(Response::ok(ResponseData::Empty))
        }

        Request::ListenerStart { session_id: sid, name } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            let listener = ctx.listeners.start(&name)?;
            Ok(Response::ok(ResponseData::ListenerList { listeners: vec![ListenerInfo::from(&listener)] }))
        }

        Request::ListenerStop { session_id: sid, name } => {
            ctx.sessions.resolve(&session_id(&sid))?;
            let listener = ctx.listeners.stop(&name)?;
            Ok(Response::ok(ResponseData::ListenerList { listeners: vec![ListenerInfo::from(&listener)] }))
        }
    }
}

/// Parses and evaluates `source` against `scope`, racing it against
/// `timeout`. As with async jobs, evaluation has no internal yield points:
/// an elapsed timeout reports immediately while the orphaned blocking
/// computation (if any) keeps running on its thread, its result discarded.
async fn execute_sync(scope: &chariot_lang::ScopeRef, source: &str, timeout: Duration) -> Result<Value, DispatchError> {
    let program = chariot_lang::Parser::parse(source)?;
    let scope = Arc::clone(scope);
    let work = tokio::task::spawn_blocking(move || chariot_lang::run_program(&scope, &program));
    match tokio::time::timeout(timeout, work).await {
        Ok(Ok(eval_result)) => Ok(eval_result?),
        Ok(Err(_panic)) => Err(DispatchError::Runtime(RuntimeError::HostFailure("worker task panicked".into()))),
        Err(_elapsed) => {
            warn!("execute timed out after {timeout:?}");
            Err(DispatchError::Runtime(RuntimeError::Timeout))
        }
    }
}

fn inspect(scope: &chariot_lang::ScopeRef) -> Result<RuntimeInspection, DispatchError> {
    let handler = scope
        .read()
        .builtins
        .get("inspectRuntime")
        .expect("inspectRuntime is registered by register_host_builtins at startup");
    let report = handler(scope, &[])?;
    let Value::Map(map) = report else {
        return Err(DispatchError::Runtime(RuntimeError::HostFailure("inspectRuntime returned a non-map value".into())));
    };
    let names = |key: &str| -> Vec<String> {
        match map.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(|v| if let Value::String(s) = v { Some(s.clone()) } else { None }).collect(),
            _ => Vec::new(),
        }
    };
    Ok(RuntimeInspection {
        variable_names: names("variableNames"),
        function_names: names("functionNames"),
        host_object_names: names("hostObjectNames"),
    })
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
