// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

/// Errors from auditing a single resource
///
/// Cloneable so a cached failure can be handed out again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    #[error("invalid stamp for {key:?}: {reason}")]
    Integrity { key: String, reason: String },
    #[error("cannot stamp {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("cannot hash {path}: {reason}")]
    Hash { path: PathBuf, reason: String },
}

/// Errors from loading or storing a ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger {0} has never been written")]
    NotFound(String),
    #[error("ledger {ledger} temporarily unavailable: {reason}")]
    Recoverable { ledger: String, reason: String },
    #[error("ledger {path} corrupted at line {line}: {reason}")]
    Corrupted {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("ledger io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ledger encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LedgerError {
    /// Not-found and recoverable failures read as an empty ledger
    pub fn is_empty_ledger(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Recoverable { .. })
    }
}

/// Errors surfaced by [`crate::Sentinel`]
#[derive(Debug, Error)]
pub enum SentinelError {
    #[error(transparent)]
    Audit(#[from] AuditError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("invalid sentinel config: {0}")]
    Config(#[from] toml::de::Error),
}
