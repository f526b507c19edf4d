// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake driver for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{
    scheme_matches, Connection, ConnectionUri, Driver, ParamStyle, Params, ResultSet, Row,
    SqlError,
};
use std::sync::{Arc, Mutex};

/// Recorded driver call
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Connect { uri: String },
    Execute { sql: String, params: Params },
    Close,
}

type Calls = Arc<Mutex<Vec<DriverCall>>>;

fn record(calls: &Calls, call: DriverCall) {
    calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
}

/// Fake driver that records calls and answers queries with fixed rows
#[derive(Clone)]
pub struct FakeDriver {
    scheme: String,
    style: ParamStyle,
    variants: Vec<String>,
    rows: Vec<Row>,
    calls: Calls,
}

impl FakeDriver {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            style: ParamStyle::Named,
            variants: Vec::new(),
            rows: Vec::new(),
            calls: Arc::default(),
        }
    }

    pub fn with_style(mut self, style: ParamStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_variants<S: Into<String>>(mut self, variants: impl IntoIterator<Item = S>) -> Self {
        self.variants = variants.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    /// Get all recorded calls, across every connection
    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Driver for FakeDriver {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn can_handle(&self, scheme: &str) -> bool {
        scheme_matches(scheme, &self.scheme)
    }

    fn connect(&self, uri: &ConnectionUri) -> Result<Box<dyn Connection>, SqlError> {
        record(
            &self.calls,
            DriverCall::Connect {
                uri: uri.to_string(),
            },
        );
        Ok(Box::new(FakeConnection {
            driver: self.clone(),
            open: true,
        }))
    }
}

struct FakeConnection {
    driver: FakeDriver,
    open: bool,
}

impl Connection for FakeConnection {
    fn driver(&self) -> &'static str {
        "fake"
    }

    fn style(&self) -> ParamStyle {
        self.driver.style
    }

    fn variants(&self) -> &[String] {
        &self.driver.variants
    }

    fn execute_sql(&mut self, sql: &str, params: &Params) -> Result<ResultSet, SqlError> {
        if !self.open {
            return Err(SqlError::Closed);
        }
        record(
            &self.driver.calls,
            DriverCall::Execute {
                sql: sql.to_string(),
                params: params.clone(),
            },
        );
        Ok(if crate::is_query(sql) {
            ResultSet::from_rows(Vec::new(), self.driver.rows.clone())
        } else {
            ResultSet::affected(0)
        })
    }

    fn close(&mut self) -> Result<(), SqlError> {
        if std::mem::replace(&mut self.open, false) {
            record(&self.driver.calls, DriverCall::Close);
        }
        Ok(())
    }
}
