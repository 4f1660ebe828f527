// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("message exceeds maximum frame size of {max} bytes (got {got})")]
    FrameTooLarge { max: u32, got: u32 },
    #[error("connection closed before a full frame was read")]
    UnexpectedEof,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}
