// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chariot_wire::{read_message, write_message};
use tempfile::tempdir;
use tokio::net::UnixListener;

use super::*;

/// Accepts exactly one connection, reads one `Request`, and replies with
/// `response` regardless of what was asked.
async fn serve_once(listener: UnixListener, response: Response) {
    let (mut stream, _addr) = listener.accept().await.unwrap();
    let _request: Request = read_message(&mut stream).await.unwrap();
    write_message(&mut stream, &response).await.unwrap();
}

#[tokio::test]
async fn login_returns_the_session_id() {
    let dir = tempdir().unwrap();
    let socket_path = dir.path().join("chariot.sock");
    let listener = UnixListener::bind(&socket_path).unwrap();
    let server = tokio::spawn(serve_once(
        listener,
        Response::ok(ResponseData::SessionId { session_id: "sess-1".into() }),
    ));

    let client = DaemonClient::new(socket_path);
    let session_id = client.login("tester", None).await.unwrap();
    assert_eq!(session_id, "sess-1");
    server.await.unwrap();
}

#[tokio::test]
async fn server_error_surfaces_as_client_error() {
    let dir = tempdir().unwrap();
    let socket_path = dir.path().join("chariot.sock");
    let listener = UnixListener::bind(&socket_path).unwrap();
    let server = tokio::spawn(serve_once(listener, Response::error("AuthError", "missing token")));

    let client = DaemonClient::new(socket_path);
    let err = client.login("tester", None).await.unwrap_err();
    assert!(matches!(err, ClientError::Server { kind, .. } if kind == "AuthError"));
    server.await.unwrap();
}

#[tokio::test]
async fn unexpected_response_shape_is_reported() {
    let dir = tempdir().unwrap();
    let socket_path = dir.path().join("chariot.sock");
    let listener = UnixListener::bind(&socket_path).unwrap();
    let server = tokio::spawn(serve_once(listener, Response::ok(ResponseData::Empty)));

    let client = DaemonClient::new(socket_path);
    let err = client.login("tester", None).await.unwrap_err();
    assert!(matches!(err, ClientError::Unexpected(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn connecting_to_a_missing_socket_fails_fast() {
    let dir = tempdir().unwrap();
    let socket_path = dir.path().join("no-such.sock");
    let client = DaemonClient::new(socket_path);
    let err = client.login("tester", None).await.unwrap_err();
    assert!(matches!(err, ClientError::Connect { .. }));
}
