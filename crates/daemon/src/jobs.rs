// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Async Execution Manager: `submit`/`streamLogs`/`result`/`cancelJob`, plus
//! the per-job Log Bus. A submitted program is parsed eagerly (so parse
//! errors surface to the caller of `submit`, not to a subscriber later) and
//! then evaluated on a spawned task against a child Runtime of the owning
//! session.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chariot_core::{define_id, Clock};
use chariot_lang::{LogLevel, LogSink, Parser, Runtime, RuntimeError, ScopeRef, Value};
use chariot_wire::{JobState, LogLine};
use indexmap::IndexMap;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::session::SessionId;

define_id! {
    pub struct JobId("exe-");
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job '{job_id}' not found")]
    NotFound { job_id: String },
    #[error("job '{job_id}' is not owned by this session")]
    Forbidden { job_id: String },
    #[error("parse error: {0}")]
    Parse(#[from] chariot_lang::ParseError),
}

/// Outcome of a finished job, as returned by `result()`.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Pending,
    Completed(Value),
    Failed(String),
    Canceled,
}

/// Bounded ring buffer of a job's log entries. `append` drops the oldest
/// entry on overflow and records how far the drop reached, so a subscriber
/// that registered before the drop can be told it missed something rather
/// than silently seeing a hole in the sequence.
struct LogBus {
    capacity: usize,
    entries: VecDeque<LogLine>,
    next_seq: u64,
    dropped_through: Option<u64>,
    notify: Notify,
}

impl LogBus {
    fn new(capacity: usize) -> Self {
        Self { capacity, entries: VecDeque::new(), next_seq: 0, dropped_through: None, notify: Notify::new() }
    }

    fn append(&mut self, level: LogLevel, message: impl Into<String>, epoch_ms: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push_back(LogLine { seq, level: level_name(level).to_string(), message: message.into(), timestamp_ms: epoch_ms });
        if self.entries.len() > self.capacity {
            if let Some(dropped) = self.entries.pop_front() {
                self.dropped_through = Some(dropped.seq);
            }
        }
        self.notify.notify_waiters();
    }

    /// Returns every entry with `seq > after_seq`, prefixing a gap marker
    /// when entries at or before `after_seq` have already been discarded.
    fn entries_after(&self, after_seq: Option<u64>) -> (Vec<LogLine>, Option<u64>) {
        let mut lines = Vec::new();
        if let Some(dropped_through) = self.dropped_through {
            if after_seq.map(|a| a < dropped_through).unwrap_or(true) {
                lines.push(LogLine {
                    seq: dropped_through,
                    level: "GAP".to_string(),
                    message: format!("{} entries dropped", dropped_through + 1),
                    timestamp_ms: 0,
                });
            }
        }
        for line in &self.entries {
            if after_seq.map(|a| line.seq > a).unwrap_or(true) {
                lines.push(line.clone());
            }
        }
        let next_after_seq = lines.last().map(|l| l.seq).or(after_seq);
        (lines, next_after_seq)
    }
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "TRACE",
        LogLevel::Debug => "DEBUG",
        LogLevel::Info => "INFO",
        LogLevel::Warn => "WARN",
        LogLevel::Error => "ERROR",
    }
}

/// [`LogSink`] that appends into a job's [`LogBus`] instead of the process's
/// own `tracing` output.
struct JobLogSink<C: Clock> {
    bus: Arc<Mutex<LogBus>>,
    clock: C,
}

impl<C: Clock> LogSink for JobLogSink<C> {
    fn log(&self, level: LogLevel, message: &str) {
        self.bus.lock().append(level, message.to_string(), self.clock.epoch_ms());
    }
}

struct JobEntry {
    owner: SessionId,
    state: JobState,
    outcome: JobOutcome,
    bus: Arc<Mutex<LogBus>>,
    cancel: CancellationToken,
    terminal_at: Option<Instant>,
}

/// Owns every in-flight and recently-finished job. Cloned cheaply (it's an
/// `Arc` inside) so the connection-handling tasks and the retention sweeper
/// can share one manager.
#[derive(Clone)]
pub struct JobManager<C: Clock> {
    jobs: Arc<Mutex<IndexMap<JobId, JobEntry>>>,
    clock: C,
    log_ring_capacity: usize,
    retention: Duration,
}

impl<C: Clock> JobManager<C> {
    pub fn new(clock: C, log_ring_capacity: usize, retention: Duration) -> Self {
        Self { jobs: Arc::new(Mutex::new(IndexMap::new())), clock, log_ring_capacity, retention }
    }

    /// Parses `source` eagerly, then spawns a worker task evaluating it
    /// against a fresh child Runtime of `session_scope`. Returns the new
    /// job's id immediately; the worker runs independently of the caller.
    pub fn submit(&self, owner: SessionId, session_scope: &ScopeRef, source: &str) -> Result<JobId, JobError> {
        let program = Parser::parse(source)?;
        let job_id = JobId::new();
        let bus = Arc::new(Mutex::new(LogBus::new(self.log_ring_capacity)));
        let cancel = CancellationToken::new();

        self.jobs.lock().insert(
            job_id.clone(),
            JobEntry {
                owner,
                state: JobState::Running,
                outcome: JobOutcome::Pending,
                bus: Arc::clone(&bus),
                cancel: cancel.clone(),
                terminal_at: None,
            },
        );

        let job_runtime = Runtime::new_child(session_scope);
        job_runtime.write().log_sink = Arc::new(JobLogSink { bus: Arc::clone(&bus), clock: self.clock.clone() });

        let jobs = Arc::clone(&self.jobs);
        let job_id_for_task = job_id.clone();
        let clock = self.clock.clone();
        tokio::spawn(async move {
            // Evaluation is a synchronous tree walk with no yield points, so a
            // cancellation can't preempt it mid-expression; racing the token
            // against the blocking handle means the job is marked Canceled
            // immediately, while the orphaned computation (if any) finishes
            // on its blocking thread and its result is simply dropped.
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(RuntimeError::Canceled),
                result = tokio::task::spawn_blocking(move || chariot_lang::run_program(&job_runtime, &program)) => {
                    result.unwrap_or(Err(RuntimeError::HostFailure("worker task panicked".into())))
                }
            };

            let mut jobs = jobs.lock();
            if let Some(entry) = jobs.get_mut(&job_id_for_task) {
                entry.terminal_at = Some(clock.now());
                match result {
                    Ok(value) => {
                        entry.state = JobState::Completed;
                        entry.outcome = JobOutcome::Completed(value);
                    }
                    Err(RuntimeError::Canceled) => {
                        entry.state = JobState::Canceled;
                        entry.outcome = JobOutcome::Canceled;
                    }
                    Err(other) => {
                        entry.state = JobState::Failed;
                        entry.outcome = JobOutcome::Failed(other.to_string());
                        entry.bus.lock().append(LogLevel::Error, other.to_string(), clock.epoch_ms());
                    }
                }
                entry.bus.lock().notify.notify_waiters();
            }
        });

        Ok(job_id)
    }

    pub fn result(&self, owner: &SessionId, job_id: &JobId) -> Result<(JobState, JobOutcome), JobError> {
        let jobs = self.jobs.lock();
        let entry = Self::owned_entry(&jobs, owner, job_id)?;
        Ok((entry.state, entry.outcome.clone()))
    }

    pub fn cancel(&self, owner: &SessionId, job_id: &JobId) -> Result<(), JobError> {
        let jobs = self.jobs.lock();
        let entry = Self::owned_entry(&jobs, owner, job_id)?;
        entry.cancel.cancel();
        Ok(())
    }

    /// Every job id owned by `owner`, for session logout to cancel.
    pub fn jobs_owned_by(&self, owner: &SessionId) -> Vec<JobId> {
        self.jobs.lock().iter().filter(|(_, entry)| &entry.owner == owner).map(|(id, _)| id.clone()).collect()
    }

    /// Cancels every job in `job_ids` regardless of owner. Called from
    /// session logout/sweep with ids already scoped to the departing session.
    pub fn cancel_all(&self, job_ids: &[JobId]) {
        let jobs = self.jobs.lock();
        for job_id in job_ids {
            if let Some(entry) = jobs.get(job_id) {
                entry.cancel.cancel();
            }
        }
    }

    /// Returns buffered log lines after `after_seq`, along with the sequence
    /// number to resume from on the next call, and whether the job has
    /// reached a terminal state (the `done` sentinel callers should stop
    /// polling on).
    pub fn stream_logs(
        &self,
        owner: &SessionId,
        job_id: &JobId,
        after_seq: Option<u64>,
    ) -> Result<(Vec<LogLine>, Option<u64>, bool), JobError> {
        let jobs = self.jobs.lock();
        let entry = Self::owned_entry(&jobs, owner, job_id)?;
        let (lines, next_after_seq) = entry.bus.lock().entries_after(after_seq);
        let done = !matches!(entry.state, JobState::Running | JobState::Queued);
        Ok((lines, next_after_seq, done))
    }

    fn owned_entry<'a>(
        jobs: &'a IndexMap<JobId, JobEntry>,
        owner: &SessionId,
        job_id: &JobId,
    ) -> Result<&'a JobEntry, JobError> {
        let entry = jobs.get(job_id).ok_or_else(|| JobError::NotFound { job_id: job_id.to_string() })?;
        if &entry.owner != owner {
            return Err(JobError::Forbidden { job_id: job_id.to_string() });
        }
        Ok(entry)
    }

    /// Purges jobs that reached a terminal state more than `retention` ago.
    /// Returns the ids reclaimed, for logging by the caller.
    pub fn sweep_retention(&self) -> Vec<JobId> {
        let now = self.clock.now();
        let mut jobs = self.jobs.lock();
        let expired: Vec<JobId> = jobs
            .iter()
            .filter(|(_, entry)| entry.terminal_at.map(|t| now.duration_since(t) >= self.retention).unwrap_or(false))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            jobs.shift_remove(id);
        }
        expired
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().len()
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
