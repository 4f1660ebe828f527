// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

use super::*;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: JobCommand,
}

#[test]
fn result_parses_session_and_job_id() {
    let cli = Cli::try_parse_from(["test", "result", "-s", "sess-1", "job-1"]).unwrap();
    assert!(matches!(cli.command, JobCommand::Result { session, job_id } if session == "sess-1" && job_id == "job-1"));
}

#[test]
fn logs_after_is_optional() {
    let cli = Cli::try_parse_from(["test", "logs", "-s", "sess-1", "job-1"]).unwrap();
    assert!(matches!(cli.command, JobCommand::Logs { after: None, .. }));

    let cli = Cli::try_parse_from(["test", "logs", "-s", "sess-1", "job-1", "--after", "42"]).unwrap();
    assert!(matches!(cli.command, JobCommand::Logs { after: Some(42), .. }));
}

#[test]
fn cancel_parses_job_id() {
    let cli = Cli::try_parse_from(["test", "cancel", "-s", "sess-1", "job-1"]).unwrap();
    assert!(matches!(cli.command, JobCommand::Cancel { job_id, .. } if job_id == "job-1"));
}
