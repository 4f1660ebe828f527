// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `chariot listener` - named onStart/onExit lifecycle hooks

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::output::{print_listeners, OutputFormat};

#[derive(Args)]
pub struct ListenerArgs {
    #[command(subcommand)]
    pub command: ListenerCommand,
}

#[derive(Subcommand)]
pub enum ListenerCommand {
    /// List all listeners and their status
    List {
        #[arg(long, short = 's')]
        session: String,
    },
    /// Define a new listener
    Create {
        #[arg(long, short = 's')]
        session: String,
        name: String,
        /// Chariot source evaluated once when the listener is created
        #[arg(long, default_value = "")]
        script: String,
        /// Chariot source run on `listener start`
        #[arg(long, default_value = "")]
        on_start: String,
        /// Chariot source run on `listener stop`
        #[arg(long, default_value = "")]
        on_exit: String,
        /// Start the listener immediately whenever the daemon starts
        #[arg(long)]
        auto_start: bool,
    },
    /// Remove a listener
    Delete {
        #[arg(long, short = 's')]
        session: String,
        name: String,
    },
    /// Run a listener's onStart hook
    Start {
        #[arg(long, short = 's')]
        session: String,
        name: String,
    },
    /// Run a listener's onExit hook
    Stop {
        #[arg(long, short = 's')]
        session: String,
        name: String,
    },
}

pub async fn handle(command: ListenerCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match command {
        ListenerCommand::List { session } => {
            let listeners = client.listener_list(&session).await?;
            print_listeners(&listeners, format)?;
        }
        ListenerCommand::Create { session, name, script, on_start, on_exit, auto_start } => {
            let listeners = client.listener_create(&session, &name, script, on_start, on_exit, auto_start).await?;
            print_listeners(&listeners, format)?;
        }
        ListenerCommand::Delete { session, name } => {
            client.listener_delete(&session, &name).await?;
            println!("Deleted {name}");
        }
        ListenerCommand::Start { session, name } => {
            let listeners = client.listener_start(&session, &name).await?;
            print_listeners(&listeners, format)?;
        }
        ListenerCommand::Stop { session, name } => {
            let listeners = client.listener_stop(&session, &name).await?;
            print_listeners(&listeners, format)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
