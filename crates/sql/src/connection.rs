// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::{Bindings, ParamStyle, Params, QueryTemplate, Row, SqlError};
use std::fmt;
use std::sync::Mutex;

/// An open database connection
pub trait Connection: Send {
    /// Driver name, for logs
    fn driver(&self) -> &'static str;

    /// Placeholder convention the driver executes
    fn style(&self) -> ParamStyle;

    /// Dialect tags tried, in order, when choosing a template body
    fn variants(&self) -> &[String];

    /// Run SQL already rendered in [`Connection::style`]
    fn execute_sql(&mut self, sql: &str, params: &Params) -> Result<ResultSet, SqlError>;

    /// Render `template` for this connection and run it
    fn execute(
        &mut self,
        template: &QueryTemplate,
        bindings: &Bindings,
    ) -> Result<ResultSet, SqlError> {
        let rendered = template.render(self.style(), self.variants(), bindings)?;
        self.execute_sql(&rendered.sql, &rendered.params)
    }

    /// Release the connection; later calls fail with [`SqlError::Closed`]
    fn close(&mut self) -> Result<(), SqlError>;
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn driver(&self) -> &'static str {
        (**self).driver()
    }

    fn style(&self) -> ParamStyle {
        (**self).style()
    }

    fn variants(&self) -> &[String] {
        (**self).variants()
    }

    fn execute_sql(&mut self, sql: &str, params: &Params) -> Result<ResultSet, SqlError> {
        (**self).execute_sql(sql, params)
    }

    fn close(&mut self) -> Result<(), SqlError> {
        (**self).close()
    }
}

type RowStream = Box<dyn Iterator<Item = Result<Row, SqlError>> + Send>;

/// Rows of one statement, read once
///
/// Rows may be fetched lazily, so each one can fail. Statements that return
/// no rows report how many rows they changed.
pub struct ResultSet {
    columns: Vec<String>,
    rows: RowStream,
    rows_affected: u64,
}

impl ResultSet {
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self::from_stream(columns, rows.into_iter().map(Ok))
    }

    /// Rows pulled from `rows` as the caller iterates
    pub fn from_stream<I>(columns: Vec<String>, rows: I) -> Self
    where
        I: Iterator<Item = Result<Row, SqlError>> + Send + 'static,
    {
        Self {
            columns,
            rows: Box::new(rows),
            rows_affected: 0,
        }
    }

    pub fn affected(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            ..Self::default()
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// Every remaining row, stopping at the first failure
    pub fn into_rows(self) -> Result<Vec<Row>, SqlError> {
        self.collect()
    }
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::from_rows(Vec::new(), Vec::new())
    }
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("columns", &self.columns)
            .field("rows_affected", &self.rows_affected)
            .finish_non_exhaustive()
    }
}

impl Iterator for ResultSet {
    type Item = Result<Row, SqlError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

/// Whether `sql` reads rows: its first keyword is `select` or `with`
///
/// Leading whitespace, comments and opening parentheses are skipped.
pub fn is_query(sql: &str) -> bool {
    let mut rest = sql;
    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail);
        } else if let Some(after) = rest.strip_prefix('(') {
            rest = after;
        } else {
            break;
        }
    }
    let keyword = rest
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()
        .unwrap_or_default();
    keyword.eq_ignore_ascii_case("select") || keyword.eq_ignore_ascii_case("with")
}

/// Unique cursor names for one connection
#[derive(Debug)]
pub struct CursorNames {
    prefix: String,
    counter: Mutex<u64>,
}

impl Default for CursorNames {
    fn default() -> Self {
        Self::new("nsk_cursor")
    }
}

impl CursorNames {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Mutex::new(0),
        }
    }

    pub fn next_name(&self) -> String {
        let mut counter = self.counter.lock().unwrap_or_else(|e| e.into_inner());
        *counter += 1;
        format!("{}_{}", self.prefix, *counter)
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
