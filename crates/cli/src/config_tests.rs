// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn socket_path_defaults_under_state_dir() {
    std::env::remove_var("CHARIOT_SOCKET_PATH");
    std::env::set_var("CHARIOT_STATE_DIR", "/tmp/chariot-cli-test-state");
    assert_eq!(socket_path(), PathBuf::from("/tmp/chariot-cli-test-state/chariot.sock"));
    std::env::remove_var("CHARIOT_STATE_DIR");
}

#[test]
#[serial]
fn socket_path_honors_explicit_override() {
    std::env::set_var("CHARIOT_SOCKET_PATH", "/tmp/explicit.sock");
    assert_eq!(socket_path(), PathBuf::from("/tmp/explicit.sock"));
    std::env::remove_var("CHARIOT_SOCKET_PATH");
}

#[test]
#[serial]
fn auth_token_is_none_when_unset() {
    std::env::remove_var("CHARIOT_AUTH_TOKEN");
    assert_eq!(auth_token(), None);
}

#[test]
#[serial]
fn auth_token_reads_env_var() {
    std::env::set_var("CHARIOT_AUTH_TOKEN", "s3cret");
    assert_eq!(auth_token(), Some("s3cret".to_string()));
    std::env::remove_var("CHARIOT_AUTH_TOKEN");
}
