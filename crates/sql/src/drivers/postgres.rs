// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PostgreSQL through the `postgres` crate
//!
//! Every statement is prepared first so parameters are bound with the types
//! the server asked for. Queries run through a server-side cursor whose rows
//! are fetched a batch at a time as the [`ResultSet`] is read; the cursor
//! keeps a transaction open until it is exhausted or dropped. Other
//! statements run directly, inside that transaction while a cursor is open.
//! Recognized query parameters: `application_name` and `connect_timeout`
//! (seconds).

use crate::{
    is_query, scheme_matches, Connection, ConnectionUri, CursorNames, Driver, ParamStyle,
    Params, ResultSet, Row, SqlError, SqlValue,
};
use bytes::BytesMut;
use postgres::types::{to_sql_checked, IsNull, ToSql, Type};
use postgres::{Client, Config, NoTls};
use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

const FETCH_SIZE: usize = 1000;

/// Handles `postgres`, `postgresql` and their `-<suffix>` flavours
#[derive(Clone, Copy, Debug, Default)]
pub struct PostgresDriver;

impl Driver for PostgresDriver {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn can_handle(&self, scheme: &str) -> bool {
        scheme_matches(scheme, "postgres") || scheme_matches(scheme, "postgresql")
    }

    fn connect(&self, uri: &ConnectionUri) -> Result<Box<dyn Connection>, SqlError> {
        Ok(Box::new(PostgresConnection::open(uri)?))
    }
}

/// Client plus the number of cursors reading inside its open transaction
struct Session {
    client: Option<Client>,
    open_cursors: usize,
}

type Shared = Arc<Mutex<Session>>;

fn lock(session: &Shared) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(|e| e.into_inner())
}

pub struct PostgresConnection {
    session: Shared,
    cursors: CursorNames,
    variants: Vec<String>,
}

fn config_for(uri: &ConnectionUri) -> Result<Config, SqlError> {
    let mut config = Config::new();
    if let Some(host) = &uri.host {
        config.host(host.trim_start_matches('[').trim_end_matches(']'));
    }
    if let Some(port) = uri.port {
        config.port(port);
    }
    if let Some(user) = &uri.user {
        config.user(user);
    }
    if let Some(password) = &uri.password {
        config.password(password);
    }
    if !uri.database().is_empty() {
        config.dbname(uri.database());
    }
    if let Some(name) = uri.param("application_name") {
        config.application_name(name);
    }
    if let Some(secs) = uri.param("connect_timeout") {
        let secs = secs.parse::<u64>().map_err(|_| SqlError::InvalidUri {
            uri: uri.to_string(),
            reason: format!("bad connect_timeout {secs:?}"),
        })?;
        config.connect_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

/// A parameter converted to the type its placeholder was prepared with
#[derive(Clone, Debug, PartialEq)]
enum Bound {
    Null,
    Bool(bool),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
    Text(String),
    Bytes(Vec<u8>),
}

fn is_textual(ty: &Type) -> bool {
    [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME, Type::UNKNOWN].contains(ty)
}

fn out_of_range(value: &SqlValue, ty: &Type) -> SqlError {
    SqlError::Bind {
        value: format!("{value:?}"),
        ty: ty.to_string(),
    }
}

/// Convert `value` for a parameter of type `ty`
///
/// Values with no sensible conversion keep their natural type and are
/// rejected by the client when bound.
fn bind(value: &SqlValue, ty: &Type) -> Result<Bound, SqlError> {
    let narrow = |_| out_of_range(value, ty);
    Ok(match value {
        SqlValue::Null => Bound::Null,
        SqlValue::Integer(i) if *ty == Type::BOOL => Bound::Bool(*i != 0),
        SqlValue::Integer(i) if *ty == Type::INT2 => Bound::Int2(i16::try_from(*i).map_err(narrow)?),
        SqlValue::Integer(i) if *ty == Type::INT4 => Bound::Int4(i32::try_from(*i).map_err(narrow)?),
        SqlValue::Integer(i) if *ty == Type::FLOAT4 => Bound::Float4(*i as f32),
        SqlValue::Integer(i) if *ty == Type::FLOAT8 => Bound::Float8(*i as f64),
        SqlValue::Integer(i) if is_textual(ty) => Bound::Text(i.to_string()),
        SqlValue::Integer(i) => Bound::Int8(*i),
        SqlValue::Real(r) if *ty == Type::FLOAT4 => Bound::Float4(*r as f32),
        SqlValue::Real(r) if is_textual(ty) => Bound::Text(r.to_string()),
        SqlValue::Real(r) => Bound::Float8(*r),
        SqlValue::Text(s) => Bound::Text(s.clone()),
        SqlValue::Blob(b) => Bound::Bytes(b.clone()),
    })
}

fn encode<T: ToSql>(
    value: &T,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    if T::accepts(ty) {
        value.to_sql(ty, out)
    } else {
        Err(format!("cannot bind {} to a {ty} parameter", std::any::type_name::<T>()).into())
    }
}

impl ToSql for Bound {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Bound::Null => Ok(IsNull::Yes),
            Bound::Bool(v) => encode(v, ty, out),
            Bound::Int2(v) => encode(v, ty, out),
            Bound::Int4(v) => encode(v, ty, out),
            Bound::Int8(v) => encode(v, ty, out),
            Bound::Float4(v) => encode(v, ty, out),
            Bound::Float8(v) => encode(v, ty, out),
            Bound::Text(v) => encode(v, ty, out),
            Bound::Bytes(v) => encode(v, ty, out),
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn bind_all(values: &[SqlValue], types: &[Type]) -> Result<Vec<Bound>, SqlError> {
    values
        .iter()
        .zip(types.iter().chain(std::iter::repeat(&Type::UNKNOWN)))
        .map(|(value, ty)| bind(value, ty))
        .collect()
}

fn as_params(bound: &[Bound]) -> Vec<&(dyn ToSql + Sync)> {
    bound.iter().map(|b| b as &(dyn ToSql + Sync)).collect()
}

fn cell(row: &postgres::Row, index: usize) -> Result<SqlValue, SqlError> {
    let ty = row.columns()[index].type_();
    Ok(if *ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(index)?.into()
    } else if *ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(index)?.map(i64::from).into()
    } else if *ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(index)?.map(i64::from).into()
    } else if *ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(index)?.into()
    } else if *ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(index)?.map(f64::from).into()
    } else if *ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(index)?.into()
    } else if *ty == Type::BYTEA {
        row.try_get::<_, Option<Vec<u8>>>(index)?.into()
    } else {
        row.try_get::<_, Option<String>>(index)?.into()
    })
}

fn convert(row: &postgres::Row) -> Result<Row, SqlError> {
    (0..row.len()).map(|i| cell(row, i)).collect()
}

/// Rows of one declared cursor, fetched a batch at a time
struct Cursor {
    session: Shared,
    name: String,
    batch: std::vec::IntoIter<postgres::Row>,
    exhausted: bool,
    open: bool,
}

impl Cursor {
    fn fetch(&mut self) -> Result<(), SqlError> {
        let mut session = lock(&self.session);
        let client = session.client.as_mut().ok_or(SqlError::Closed)?;
        let rows = client.query(&format!("FETCH {FETCH_SIZE} FROM {}", self.name), &[])?;
        self.exhausted = rows.len() < FETCH_SIZE;
        self.batch = rows.into_iter();
        Ok(())
    }

    /// Close the cursor, committing once no other cursor needs the transaction
    fn finish(&mut self) -> Result<(), SqlError> {
        if !std::mem::replace(&mut self.open, false) {
            return Ok(());
        }
        let mut session = lock(&self.session);
        session.open_cursors = session.open_cursors.saturating_sub(1);
        let last = session.open_cursors == 0;
        let Some(client) = session.client.as_mut() else {
            return Ok(());
        };
        client.batch_execute(&format!("CLOSE {}", self.name))?;
        if last {
            client.batch_execute("COMMIT")?;
        }
        Ok(())
    }
}

impl Iterator for Cursor {
    type Item = Result<Row, SqlError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.batch.next() {
                return Some(convert(&row));
            }
            if self.exhausted || !self.open {
                return match self.finish() {
                    Ok(()) => None,
                    Err(e) => Some(Err(e)),
                };
            }
            if let Err(e) = self.fetch() {
                self.exhausted = true;
                let _ = self.finish();
                return Some(Err(e));
            }
        }
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            tracing::warn!(cursor = %self.name, error = %e, "failed to close cursor");
        }
    }
}

impl PostgresConnection {
    pub fn open(uri: &ConnectionUri) -> Result<Self, SqlError> {
        let client = config_for(uri)?.connect(NoTls)?;
        Ok(Self {
            session: Arc::new(Mutex::new(Session {
                client: Some(client),
                open_cursors: 0,
            })),
            cursors: CursorNames::default(),
            variants: vec!["postgres".to_string()],
        })
    }

    fn declare(&self, sql: &str, values: &[SqlValue]) -> Result<ResultSet, SqlError> {
        let name = self.cursors.next_name();
        let mut session = lock(&self.session);
        let begin = session.open_cursors == 0;
        let client = session.client.as_mut().ok_or(SqlError::Closed)?;
        let stmt = client.prepare(sql)?;
        let columns = stmt.columns().iter().map(|c| c.name().to_string()).collect();
        let bound = bind_all(values, stmt.params())?;
        let refs = as_params(&bound);

        if begin {
            client.batch_execute("BEGIN")?;
        }
        let declared = client.execute(&format!("DECLARE {name} NO SCROLL CURSOR FOR {sql}"), &refs);
        if let Err(e) = declared {
            if begin {
                let _ = client.batch_execute("ROLLBACK");
            }
            return Err(e.into());
        }
        session.open_cursors += 1;
        drop(session);

        let cursor = Cursor {
            session: Arc::clone(&self.session),
            name,
            batch: Vec::new().into_iter(),
            exhausted: false,
            open: true,
        };
        Ok(ResultSet::from_stream(columns, cursor))
    }
}

impl Connection for PostgresConnection {
    fn driver(&self) -> &'static str {
        "postgres"
    }

    fn style(&self) -> ParamStyle {
        ParamStyle::Dollar
    }

    fn variants(&self) -> &[String] {
        &self.variants
    }

    fn execute_sql(&mut self, sql: &str, params: &Params) -> Result<ResultSet, SqlError> {
        let values = match params {
            Params::Positional(values) => values,
            Params::Named(_) => {
                return Err(SqlError::StyleMismatch {
                    driver: "postgres",
                    style: ParamStyle::Named.to_string(),
                })
            }
        };
        if is_query(sql) {
            return self.declare(sql, values);
        }

        let mut session = lock(&self.session);
        let client = session.client.as_mut().ok_or(SqlError::Closed)?;
        let stmt = client.prepare(sql)?;
        let bound = bind_all(values, stmt.params())?;
        let refs = as_params(&bound);
        Ok(ResultSet::affected(client.execute(&stmt, &refs)?))
    }

    fn close(&mut self) -> Result<(), SqlError> {
        let mut session = lock(&self.session);
        session.open_cursors = 0;
        match session.client.take() {
            Some(client) => Ok(client.close()?),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "postgres_tests.rs"]
mod tests;
