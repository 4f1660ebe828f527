// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `chariot login` / `chariot logout` - session lifecycle

use anyhow::Result;
use clap::Args;

use crate::client::DaemonClient;

#[derive(Args)]
pub struct LoginArgs {
    /// Name to identify this client by in daemon logs
    #[arg(long, default_value = "chariot-cli")]
    pub name: String,

    /// Bearer token, absent `CHARIOT_AUTH_TOKEN`
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Args)]
pub struct LogoutArgs {
    /// Session ID to close
    pub session_id: String,
}

pub async fn login(args: LoginArgs, client: &DaemonClient) -> Result<()> {
    let credentials = args.token.or_else(crate::config::auth_token);
    let session_id = client.login(&args.name, credentials).await?;
    println!("{session_id}");
    Ok(())
}

pub async fn logout(args: LogoutArgs, client: &DaemonClient) -> Result<()> {
    client.logout(&args.session_id).await?;
    println!("Logged out {}", args.session_id);
    Ok(())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
