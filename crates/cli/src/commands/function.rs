// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `chariot function` - persisted user function library

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::DaemonClient;
use crate::output::{print_function_detail, print_function_list, print_function_names, OutputFormat};

#[derive(Args)]
pub struct FunctionArgs {
    #[command(subcommand)]
    pub command: FunctionCommand,
}

#[derive(Subcommand)]
pub enum FunctionCommand {
    /// List the names of all saved functions
    List {
        #[arg(long, short = 's')]
        session: String,
    },
    /// Show a saved function's parameters and body
    Get {
        #[arg(long, short = 's')]
        session: String,
        name: String,
    },
    /// Save (or replace) a function definition
    Save {
        #[arg(long, short = 's')]
        session: String,
        name: String,
        /// Comma-separated parameter names
        #[arg(long, value_delimiter = ',')]
        params: Vec<String>,
        /// Chariot source for the function body
        body: String,
    },
    /// Reload the function library from disk, discarding unsaved changes
    Load {
        #[arg(long, short = 's')]
        session: String,
    },
    /// Delete a saved function
    Delete {
        #[arg(long, short = 's')]
        session: String,
        name: String,
    },
}

pub async fn handle(command: FunctionCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match command {
        FunctionCommand::List { session } => {
            let names = client.list_functions(&session).await?;
            print_function_names(&names, format)?;
        }
        FunctionCommand::Get { session, name } => {
            let (params, body_source) = client.get_function(&session, &name).await?;
            print_function_detail(&name, &params, &body_source, format)?;
        }
        FunctionCommand::Save { session, name, params, body } => {
            client.save_function(&session, &name, params, &body).await?;
            println!("Saved {name}");
        }
        FunctionCommand::Load { session } => {
            let functions = client.load_functions(&session).await?;
            print_function_list(&functions, format)?;
        }
        FunctionCommand::Delete { session, name } => {
            client.delete_function(&session, &name).await?;
            println!("Deleted {name}");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "function_tests.rs"]
mod tests;
