// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors from rendering queries and talking to databases
#[derive(Debug, Error)]
pub enum SqlError {
    #[error("invalid connection URI {uri:?}: {reason}")]
    InvalidUri { uri: String, reason: String },
    #[error("no driver for scheme {scheme:?}")]
    NoDriver { scheme: String },
    #[error("unknown parameter style {name:?}")]
    UnknownStyle { name: String },
    #[error("unknown placeholder {token:?} at offset {offset}")]
    UnknownPlaceholder { token: String, offset: usize },
    #[error("unterminated {what} starting at offset {offset}")]
    Unterminated { what: &'static str, offset: usize },
    #[error("no value bound for parameter {name:?}")]
    MissingParam { name: String },
    #[error("{driver} driver cannot take {style} parameters")]
    StyleMismatch {
        driver: &'static str,
        style: String,
    },
    #[error("{driver} driver unavailable: {reason}")]
    DriverUnavailable {
        driver: &'static str,
        reason: String,
    },
    #[error("cannot bind {value} to a {ty} parameter")]
    Bind { value: String, ty: String },
    #[error("connection is closed")]
    Closed,
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[cfg(feature = "postgres")]
    #[error("postgres error: {0}")]
    Postgres(#[from] postgres::Error),
}
