// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `chariot exec` / `chariot inspect` - program evaluation against a session

use anyhow::Result;
use clap::Args;

use crate::client::DaemonClient;
use crate::output::{print_runtime_inspection, print_value, OutputFormat};

#[derive(Args)]
pub struct ExecArgs {
    /// Session ID returned by `chariot login`
    #[arg(long, short = 's')]
    pub session: String,

    /// Chariot source to evaluate
    pub source: String,

    /// Submit as an async job and print its job ID instead of blocking for the result
    #[arg(long)]
    pub r#async: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Session ID returned by `chariot login`
    #[arg(long, short = 's')]
    pub session: String,
}

pub async fn exec(args: ExecArgs, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    if args.r#async {
        let job_id = client.execute_async(&args.session, &args.source).await?;
        println!("{job_id}");
    } else {
        let value = client.execute(&args.session, &args.source).await?;
        print_value(&value, format)?;
    }
    Ok(())
}

pub async fn inspect(args: InspectArgs, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let report = client.inspect_runtime(&args.session).await?;
    print_runtime_inspection(&report, format)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
