// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the temp-file service
#[derive(Debug, Error)]
pub enum TempError {
    #[error("failed to create temp directory: {0}")]
    CreateDir(#[source] io::Error),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create FIFO {path}: {source}")]
    Fifo {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },
    #[error("temp name must be a plain file name: {name:?}")]
    InvalidName { name: String },
}

/// Errors from PID-file locking
///
/// A lock held by another live process is not an error; see
/// [`crate::Acquire::Busy`].
#[derive(Debug, Error)]
pub enum LockError {
    #[error("IO error on lock file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid lock config: {0}")]
    Config(#[from] toml::de::Error),
}
