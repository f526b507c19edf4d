// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced connection wrapper for consistent observability

use crate::{Connection, ParamStyle, Params, ResultSet, SqlError};

/// Wrapper that adds tracing to any Connection
pub struct TracedConnection<C> {
    inner: C,
    target: String,
}

impl<C: Connection> TracedConnection<C> {
    /// `target` names the database in logs and must not carry secrets
    pub fn new(inner: C, target: impl Into<String>) -> Self {
        Self {
            inner,
            target: target.into(),
        }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Connection> Connection for TracedConnection<C> {
    fn driver(&self) -> &'static str {
        self.inner.driver()
    }

    fn style(&self) -> ParamStyle {
        self.inner.style()
    }

    fn variants(&self) -> &[String] {
        self.inner.variants()
    }

    fn execute_sql(&mut self, sql: &str, params: &Params) -> Result<ResultSet, SqlError> {
        let span = tracing::info_span!(
            "sql.execute",
            driver = self.inner.driver(),
            db = %self.target
        );
        let _guard = span.enter();

        tracing::debug!(sql, params = params.len(), "executing");
        let start = std::time::Instant::now();
        let result = self.inner.execute_sql(sql, params);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(rows) => tracing::info!(
                elapsed_ms,
                columns = rows.columns().len(),
                rows_affected = rows.rows_affected(),
                "statement done"
            ),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "statement failed"),
        }
        result
    }

    fn close(&mut self) -> Result<(), SqlError> {
        let span = tracing::info_span!(
            "sql.close",
            driver = self.inner.driver(),
            db = %self.target
        );
        let _guard = span.enter();

        let result = self.inner.close();
        match &result {
            Ok(()) => tracing::debug!("closed"),
            Err(e) => tracing::warn!(error = %e, "close failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
