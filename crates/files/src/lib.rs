// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nsk-files: process-scoped temp files and PID-file locks
//!
//! Both services have a process-wide instance ([`TempService::global`],
//! [`PidLocks::global`]). Rust never drops statics, so a host program that
//! wants cleanup at exit holds an [`ExitGuard`] in `main`.

mod error;
mod pidlock;
mod temp;

pub use error::{LockError, TempError};
pub use pidlock::{Acquire, LockConfig, LockInfo, PidLocks};
pub use temp::{OpenMode, TempService};

/// Tears down the global services when dropped
///
/// Releases every PID lock still held through [`PidLocks::global`] and
/// removes the [`TempService::global`] directory.
#[must_use = "cleanup runs when the guard is dropped"]
#[derive(Debug, Default)]
pub struct ExitGuard {
    _private: (),
}

impl ExitGuard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        PidLocks::global().release_all();
        if let Err(e) = TempService::global().cleanup() {
            tracing::warn!(error = %e, "failed to remove temp directory at exit");
        }
    }
}
