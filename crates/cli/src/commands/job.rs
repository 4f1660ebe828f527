// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `chariot job` - async job result/logs/cancel

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::output::{print_job_status, print_log_lines, OutputFormat};

#[derive(Args)]
pub struct JobArgs {
    #[command(subcommand)]
    pub command: JobCommand,
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Poll a job's current state and, once terminal, its result
    Result {
        #[arg(long, short = 's')]
        session: String,
        job_id: String,
    },
    /// Fetch log lines appended since `--after`
    Logs {
        #[arg(long, short = 's')]
        session: String,
        job_id: String,
        #[arg(long)]
        after: Option<u64>,
    },
    /// Cancel a running job
    Cancel {
        #[arg(long, short = 's')]
        session: String,
        job_id: String,
    },
}

pub async fn handle(command: JobCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match command {
        JobCommand::Result { session, job_id } => {
            let (state, value, error) = client.result(&session, &job_id).await?;
            print_job_status(&job_id, state, value.as_ref(), error.as_deref(), format)?;
        }
        JobCommand::Logs { session, job_id, after } => {
            let (lines, next_after_seq, done) = client.stream_logs(&session, &job_id, after).await?;
            print_log_lines(&lines, format)?;
            if !done {
                if let Some(seq) = next_after_seq {
                    eprintln!("(more log lines available after seq {seq})");
                }
            }
        }
        JobCommand::Cancel { session, job_id } => {
            client.cancel_job(&session, &job_id).await?;
            println!("Canceled {job_id}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
