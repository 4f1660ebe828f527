// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `chariot`: command-line client for `chariotd`'s Runtime Control API.

mod client;
mod color;
mod commands;
mod config;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};

use client::DaemonClient;
use commands::function::FunctionArgs;
use commands::job::JobArgs;
use commands::listener::ListenerArgs;
use commands::run::{ExecArgs, InspectArgs};
use commands::session::{LoginArgs, LogoutArgs};
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "chariot", version, styles = color::styles())]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Socket path, absent `CHARIOT_SOCKET_PATH`
    #[arg(long, global = true)]
    socket: Option<std::path::PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Command {
    /// Start a session and print its session ID
    Login(LoginArgs),
    /// End a session and cancel its in-flight jobs
    Logout(LogoutArgs),
    /// Evaluate a program against a session
    Exec(ExecArgs),
    /// Report a session's declared variables, functions, and host objects
    Inspect(InspectArgs),
    /// Async job result/logs/cancel
    Job(JobArgs),
    /// Persisted user function library
    Function(FunctionArgs),
    /// Named onStart/onExit lifecycle hooks
    Listener(ListenerArgs),
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let socket = cli.socket.unwrap_or_else(config::socket_path);
    let client = DaemonClient::new(socket);

    match cli.command {
        Command::Login(args) => commands::session::login(args, &client).await,
        Command::Logout(args) => commands::session::logout(args, &client).await,
        Command::Exec(args) => commands::run::exec(args, &client, cli.format).await,
        Command::Inspect(args) => commands::run::inspect(args, &client, cli.format).await,
        Command::Job(args) => commands::job::handle(args.command, &client, cli.format).await,
        Command::Function(args) => commands::function::handle(args.command, &client, cli.format).await,
        Command::Listener(args) => commands::listener::handle(args.command, &client, cli.format).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        let exit = match e.downcast::<ExitError>() {
            Ok(exit_error) => exit_error,
            Err(other) => ExitError::new(1, other.to_string()),
        };
        eprintln!("{}", exit.message);
        std::process::exit(exit.code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_is_the_default_entry_point_for_running_source() {
        let cli = Cli::try_parse_from(["chariot", "exec", "-s", "sess-1", "add(1, 2)"]).unwrap();
        assert!(matches!(cli.command, Command::Exec(_)));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn format_flag_is_global_across_subcommands() {
        let cli = Cli::try_parse_from(["chariot", "--format", "json", "job", "result", "-s", "sess-1", "job-1"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn socket_flag_overrides_the_environment_default() {
        let cli = Cli::try_parse_from(["chariot", "--socket", "/tmp/custom.sock", "login"]).unwrap();
        assert_eq!(cli.socket, Some(std::path::PathBuf::from("/tmp/custom.sock")));
    }
}
