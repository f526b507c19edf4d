// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite through rusqlite
//!
//! `sqlite:///abs/path.db` opens an absolute path, `sqlite://rel/path.db`
//! a relative one, and `sqlite://` or `sqlite:///:memory:` an in-memory
//! database. A `timeout` query parameter sets the busy timeout in ms.

use crate::{
    scheme_matches, Connection, ConnectionUri, Driver, ParamStyle, Params, ResultSet, Row,
    SqlError, SqlValue,
};
use rusqlite::types::{Value, ValueRef};
use std::path::PathBuf;
use std::time::Duration;

/// Handles `sqlite`, `sqlite3` and their `-<suffix>` flavours
#[derive(Clone, Copy, Debug, Default)]
pub struct SqliteDriver;

impl Driver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn can_handle(&self, scheme: &str) -> bool {
        scheme_matches(scheme, "sqlite") || scheme_matches(scheme, "sqlite3")
    }

    fn connect(&self, uri: &ConnectionUri) -> Result<Box<dyn Connection>, SqlError> {
        Ok(Box::new(SqliteConnection::open(uri)?))
    }
}

pub struct SqliteConnection {
    conn: Option<rusqlite::Connection>,
    variants: Vec<String>,
}

/// Database file named by `uri`; `None` for an in-memory database
fn database_path(uri: &ConnectionUri) -> Option<PathBuf> {
    let joined = format!("{}{}", uri.host.as_deref().unwrap_or(""), uri.path);
    match joined.as_str() {
        "" | "/:memory:" => None,
        _ => Some(PathBuf::from(joined)),
    }
}

fn to_sqlite(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::Integer(*i),
        SqlValue::Real(r) => Value::Real(*r),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Blob(b) => Value::Blob(b.clone()),
    }
}

fn from_sqlite(cell: ValueRef<'_>) -> SqlValue {
    match cell {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(i) => SqlValue::Integer(i),
        ValueRef::Real(r) => SqlValue::Real(r),
        ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => SqlValue::Blob(b.to_vec()),
    }
}

/// Values in statement parameter order
fn bind(stmt: &rusqlite::Statement<'_>, params: &Params) -> Result<Vec<Value>, SqlError> {
    match params {
        Params::Positional(values) => Ok(values.iter().map(to_sqlite).collect()),
        Params::Named(values) => (1..=stmt.parameter_count())
            .map(|index| {
                let name = stmt
                    .parameter_name(index)
                    .unwrap_or_default()
                    .trim_start_matches([':', '@', '$']);
                values
                    .get(name)
                    .map(to_sqlite)
                    .ok_or_else(|| SqlError::MissingParam {
                        name: name.to_string(),
                    })
            })
            .collect(),
    }
}

impl SqliteConnection {
    pub fn open(uri: &ConnectionUri) -> Result<Self, SqlError> {
        let conn = match database_path(uri) {
            Some(path) => rusqlite::Connection::open(path)?,
            None => rusqlite::Connection::open_in_memory()?,
        };
        if let Some(timeout) = uri.param("timeout") {
            let ms = timeout.parse::<u64>().map_err(|_| SqlError::InvalidUri {
                uri: uri.to_string(),
                reason: format!("bad timeout {timeout:?}"),
            })?;
            conn.busy_timeout(Duration::from_millis(ms))?;
        }
        Ok(Self::from_connection(conn))
    }

    pub fn in_memory() -> Result<Self, SqlError> {
        Ok(Self::from_connection(rusqlite::Connection::open_in_memory()?))
    }

    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        Self {
            conn: Some(conn),
            variants: vec!["sqlite".to_string()],
        }
    }
}

impl Connection for SqliteConnection {
    fn driver(&self) -> &'static str {
        "sqlite"
    }

    fn style(&self) -> ParamStyle {
        ParamStyle::Qmark
    }

    fn variants(&self) -> &[String] {
        &self.variants
    }

    fn execute_sql(&mut self, sql: &str, params: &Params) -> Result<ResultSet, SqlError> {
        let conn = self.conn.as_ref().ok_or(SqlError::Closed)?;
        let mut stmt = conn.prepare(sql)?;
        let values = bind(&stmt, params)?;
        let width = stmt.column_count();
        if width == 0 {
            let changed = stmt.execute(rusqlite::params_from_iter(values))?;
            return Ok(ResultSet::affected(changed as u64));
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(rusqlite::params_from_iter(values))?;
        let mut out: Vec<Row> = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(
                (0..width)
                    .map(|i| row.get_ref(i).map(from_sqlite))
                    .collect::<Result<Row, _>>()?,
            );
        }
        Ok(ResultSet::from_rows(columns, out))
    }

    fn close(&mut self) -> Result<(), SqlError> {
        match self.conn.take() {
            Some(conn) => conn.close().map_err(|(_, e)| SqlError::Sqlite(e)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
