// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `chariotd`: binds the Runtime Control API socket, loads persisted state
//! (function library, listener registry), and serves requests until asked
//! to shut down.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::sync::Arc;

use chariot_core::{Clock, SystemClock};
use chariot_daemon::{
    auth::TokenAuthenticator, builtins_host::register_host_builtins, config, jobs::JobManager, listener::ListenerRegistry,
    server::{serve, ServerContext}, session::SessionManager,
};
use chariot_lang::{BuiltinRegistry, Runtime};
use chariot_storage::FunctionLibrary;
use fs2::FileExt;
use parking_lot::Mutex;
use tokio::net::UnixListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = config::state_dir().join("logs");
    std::fs::create_dir_all(&log_dir).expect("failed to create log directory");
    let file_appender = tracing_appender::rolling::daily(&log_dir, "chariotd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    guard
}

/// Holds the state directory's exclusive lock file for the process
/// lifetime; a second `chariotd` against the same state dir fails fast
/// instead of silently fighting over the socket.
#[allow(dead_code)]
struct LockFile(std::fs::File);

fn acquire_lock() -> anyhow::Result<LockFile> {
    let state_dir = config::state_dir();
    std::fs::create_dir_all(&state_dir)?;
    let lock_path = state_dir.join("chariotd.pid");
    let mut file = OpenOptions::new().write(true).create(true).truncate(false).open(&lock_path)?;
    file.try_lock_exclusive().map_err(|_| anyhow::anyhow!("another chariotd is already running against {state_dir:?}"))?;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(LockFile(file))
}

fn bind_socket() -> anyhow::Result<UnixListener> {
    let socket_path = config::socket_path();
    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if socket_path.exists() {
        std::fs::remove_file(&socket_path)?;
    }
    Ok(UnixListener::bind(&socket_path)?)
}

fn spawn_sweepers<C: Clock + 'static>(ctx: Arc<ServerContext<C>>) {
    let sweep_ctx = Arc::clone(&ctx);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config::session_sweep_interval());
        loop {
            ticker.tick().await;
            let expired = sweep_ctx.sessions.sweep_expired();
            for id in &expired {
                let owned = sweep_ctx.jobs.jobs_owned_by(id);
                sweep_ctx.jobs.cancel_all(&owned);
            }
            if !expired.is_empty() {
                info!(count = expired.len(), "reclaimed idle sessions");
            }
        }
    });

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config::job_sweep_interval());
        loop {
            ticker.tick().await;
            let reclaimed = ctx.jobs.sweep_retention();
            if !reclaimed.is_empty() {
                info!(count = reclaimed.len(), "reclaimed expired jobs");
            }
        }
    });
}

async fn wait_for_shutdown_signal() {
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
        _ = sigterm.recv() => info!("received SIGTERM"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = init_tracing();
    let _lock = acquire_lock()?;

    let state_dir = config::state_dir();
    std::fs::create_dir_all(&state_dir)?;

    let clock = SystemClock;
    let mut registry = BuiltinRegistry::new();
    chariot_lang::builtins::register_core_builtins(&mut registry);

    let functions = Arc::new(Mutex::new(FunctionLibrary::load(state_dir.join("functions.json"))?));
    register_host_builtins(&mut registry, Arc::clone(&functions), clock.clone());
    let builtins = Arc::new(registry);

    let bootstrap = Runtime::new_root(Arc::clone(&builtins));
    let listeners = ListenerRegistry::load(state_dir.join("listeners.json"), bootstrap, clock.clone())?;
    listeners.auto_start_all();

    let ctx = Arc::new(ServerContext {
        sessions: SessionManager::new(Arc::clone(&builtins), clock.clone(), config::session_ttl()),
        jobs: JobManager::new(clock.clone(), config::log_ring_capacity(), config::job_retention()),
        listeners,
        functions,
        authenticator: Arc::new(TokenAuthenticator::new(config::auth_token())),
        clock,
        execute_timeout: config::execute_timeout(),
    });

    let socket_path = config::socket_path();
    let listener = bind_socket()?;
    info!(socket = %socket_path.display(), "chariotd listening");

    spawn_sweepers(Arc::clone(&ctx));

    tokio::select! {
        _ = serve(listener, ctx) => {}
        _ = wait_for_shutdown_signal() => {
            info!(timeout = ?config::drain_timeout(), "shutting down, draining in-flight work");
            tokio::time::sleep(config::drain_timeout()).await;
        }
    }

    if let Err(e) = std::fs::remove_file(&socket_path) {
        warn!(error = %e, "failed to remove socket file on shutdown");
    }
    if let Err(e) = std::fs::remove_file(state_dir.join("chariotd.pid")) {
        warn!(error = %e, "failed to remove pid file on shutdown");
    }

    Ok(())
}
