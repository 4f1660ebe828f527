// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chariot-storage: atomic snapshot persistence, the function library, and
//! the secure path resolver that fences script I/O to a handful of fixed
//! root directories.

pub mod error;
pub mod function_library;
pub mod path_resolver;
pub mod snapshot;

pub use error::{PersistenceError, SecurityError};
pub use function_library::{FunctionLibrary, FunctionRecord};
pub use path_resolver::{expand_tilde, validate_relative, RootKind, SecurePathResolver};
pub use snapshot::{read_snapshot, write_snapshot, Snapshot};
