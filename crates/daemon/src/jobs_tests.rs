// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use chariot_core::FakeClock;
use chariot_lang::Runtime;

use super::*;
use crate::session::SessionId;

fn manager() -> JobManager<FakeClock> {
    JobManager::new(FakeClock::new(), 16, Duration::from_secs(3600))
}

fn root_scope() -> ScopeRef {
    Runtime::new_root(Arc::new(chariot_lang::default_builtins()))
}

async fn wait_terminal(manager: &JobManager<FakeClock>, owner: &SessionId, job_id: &JobId) -> (JobState, JobOutcome) {
    for _ in 0..200 {
        let (state, outcome) = manager.result(owner, job_id).unwrap();
        if !matches!(state, JobState::Running | JobState::Queued) {
            return (state, outcome);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job did not reach a terminal state in time");
}

#[tokio::test]
async fn submit_runs_the_program_to_completion() {
    let manager = manager();
    let owner = SessionId::new();
    let scope = root_scope();
    let job_id = manager.submit(owner, &scope, "add(2, 3)").unwrap();

    let (state, outcome) = wait_terminal(&manager, &owner, &job_id).await;
    assert_eq!(state, JobState::Completed);
    assert!(matches!(outcome, JobOutcome::Completed(Value::Integer(5))));
}

#[tokio::test]
async fn submit_surfaces_parse_errors_immediately() {
    let manager = manager();
    let owner = SessionId::new();
    let scope = root_scope();
    let err = manager.submit(owner, &scope, "add(2,").unwrap_err();
    assert!(matches!(err, JobError::Parse(_)));
}

#[tokio::test]
async fn runtime_errors_fail_the_job() {
    let manager = manager();
    let owner = SessionId::new();
    let scope = root_scope();
    let job_id = manager.submit(owner, &scope, "valueOf(neverDeclared)").unwrap();

    let (state, outcome) = wait_terminal(&manager, &owner, &job_id).await;
    assert_eq!(state, JobState::Failed);
    assert!(matches!(outcome, JobOutcome::Failed(_)));
}

#[tokio::test]
async fn result_on_unknown_job_is_not_found() {
    let manager = manager();
    let owner = SessionId::new();
    let bogus = JobId::new();
    assert!(manager.result(&owner, &bogus).is_err());
}

#[tokio::test]
async fn result_from_a_different_session_is_forbidden() {
    let manager = manager();
    let owner = SessionId::new();
    let intruder = SessionId::new();
    let scope = root_scope();
    let job_id = manager.submit(owner, &scope, "add(1, 1)").unwrap();
    wait_terminal(&manager, &owner, &job_id).await;

    let err = manager.result(&intruder, &job_id).unwrap_err();
    assert!(matches!(err, JobError::Forbidden { .. }));
}

#[tokio::test]
async fn cancel_marks_the_job_canceled() {
    let manager = manager();
    let owner = SessionId::new();
    let scope = root_scope();
    let job_id = manager.submit(owner, &scope, "logPrint('INFO', 'hi')").unwrap();
    manager.cancel(&owner, &job_id).unwrap();

    let (state, outcome) = wait_terminal(&manager, &owner, &job_id).await;
    assert_eq!(state, JobState::Canceled);
    assert!(matches!(outcome, JobOutcome::Canceled));
}

#[tokio::test]
async fn jobs_owned_by_lists_only_that_sessions_jobs() {
    let manager = manager();
    let owner = SessionId::new();
    let other = SessionId::new();
    let scope = root_scope();
    let job_id = manager.submit(owner, &scope, "add(1, 1)").unwrap();
    manager.submit(other, &scope, "add(1, 1)").unwrap();

    assert_eq!(manager.jobs_owned_by(&owner), vec![job_id]);
}

#[tokio::test]
async fn stream_logs_returns_buffered_lines_in_order() {
    let manager = manager();
    let owner = SessionId::new();
    let scope = root_scope();
    let job_id = manager.submit(owner, &scope, "logPrint('INFO', 'one'); logPrint('INFO', 'two')").unwrap();
    wait_terminal(&manager, &owner, &job_id).await;

    let (lines, next_after_seq, done) = manager.stream_logs(&owner, &job_id, None).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].message, "one");
    assert_eq!(lines[1].message, "two");
    assert_eq!(next_after_seq, Some(1));
    assert!(done);

    let (more, _, _) = manager.stream_logs(&owner, &job_id, Some(0)).unwrap();
    assert_eq!(more.len(), 1);
    assert_eq!(more[0].message, "two");
}

#[tokio::test]
async fn log_bus_overflow_reports_a_gap() {
    let manager = JobManager::new(FakeClock::new(), 2, Duration::from_secs(3600));
    let owner = SessionId::new();
    let scope = root_scope();
    let job_id =
        manager.submit(owner, &scope, "logPrint('INFO', 'a'); logPrint('INFO', 'b'); logPrint('INFO', 'c')").unwrap();
    wait_terminal(&manager, &owner, &job_id).await;

    let (lines, _, _) = manager.stream_logs(&owner, &job_id, None).unwrap();
    assert_eq!(lines[0].level, "GAP");
    assert_eq!(lines.len(), 3);
}

#[tokio::test]
async fn sweep_retention_reclaims_only_jobs_past_their_grace_period() {
    let clock = FakeClock::new();
    let manager = JobManager::new(clock.clone(), 16, Duration::from_secs(60));
    let owner = SessionId::new();
    let scope = root_scope();
    let job_id = manager.submit(owner, &scope, "add(1, 1)").unwrap();
    wait_terminal(&manager, &owner, &job_id).await;

    clock.advance(Duration::from_secs(30));
    assert!(manager.sweep_retention().is_empty());

    clock.advance(Duration::from_secs(31));
    let reclaimed = manager.sweep_retention();
    assert_eq!(reclaimed, vec![job_id]);
    assert_eq!(manager.job_count(), 0);
}
