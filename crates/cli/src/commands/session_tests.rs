// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

use super::*;

#[derive(Parser)]
struct Cli {
    #[command(flatten)]
    login: LoginArgs,
}

#[test]
fn login_defaults_to_the_cli_client_name() {
    let cli = Cli::try_parse_from(["test"]).unwrap();
    assert_eq!(cli.login.name, "chariot-cli");
    assert_eq!(cli.login.token, None);
}

#[test]
fn login_accepts_an_explicit_token() {
    let cli = Cli::try_parse_from(["test", "--token", "s3cret"]).unwrap();
    assert_eq!(cli.login.token, Some("s3cret".to_string()));
}

#[derive(Parser)]
struct LogoutCli {
    #[command(flatten)]
    logout: LogoutArgs,
}

#[test]
fn logout_requires_a_session_id() {
    assert!(LogoutCli::try_parse_from(["test"]).is_err());
    let cli = LogoutCli::try_parse_from(["test", "sess-1"]).unwrap();
    assert_eq!(cli.logout.session_id, "sess-1");
}
