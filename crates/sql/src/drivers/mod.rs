// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database drivers

mod oracle;
#[cfg(feature = "postgres")]
mod postgres;
mod sqlite;

pub use oracle::{OracleDriver, OracleTarget};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresConnection, PostgresDriver};
pub use sqlite::{SqliteConnection, SqliteDriver};
