// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheme-to-driver registry

use crate::drivers::{OracleDriver, SqliteDriver};
use crate::{Connection, ConnectionUri, SqlError, TracedConnection};
use std::fmt;
use std::sync::LazyLock;

/// Opens connections for the URI schemes it handles
pub trait Driver: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_handle(&self, scheme: &str) -> bool;

    fn connect(&self, uri: &ConnectionUri) -> Result<Box<dyn Connection>, SqlError>;
}

/// Drivers in registration order; the first that handles a scheme wins
#[derive(Default)]
pub struct DriverRegistry {
    drivers: Vec<Box<dyn Driver>>,
}

static GLOBAL: LazyLock<DriverRegistry> = LazyLock::new(DriverRegistry::with_defaults);

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.drivers.iter().map(|d| d.name()))
            .finish()
    }
}

impl DriverRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// sqlite, postgres when built with the `postgres` feature, and oracle
    pub fn with_defaults() -> Self {
        let registry = Self::new().with(SqliteDriver);
        #[cfg(feature = "postgres")]
        let registry = registry.with(crate::drivers::PostgresDriver);
        registry.with(OracleDriver)
    }

    /// The process-wide registry of default drivers
    pub fn global() -> &'static DriverRegistry {
        &GLOBAL
    }

    pub fn with(mut self, driver: impl Driver + 'static) -> Self {
        self.register(driver);
        self
    }

    pub fn register(&mut self, driver: impl Driver + 'static) {
        self.drivers.push(Box::new(driver));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.drivers.iter().map(|d| d.name()).collect()
    }

    pub fn driver_for(&self, scheme: &str) -> Option<&dyn Driver> {
        self.drivers
            .iter()
            .find(|d| d.can_handle(scheme))
            .map(|d| d.as_ref())
    }

    /// Open a connection to `uri`
    ///
    /// `user` and `password`, when given, replace those in the URI.
    pub fn connect(
        &self,
        uri: &str,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn Connection>, SqlError> {
        let mut parsed = ConnectionUri::parse(uri)?;
        if let Some(user) = user {
            parsed.user = Some(user.to_string());
        }
        if let Some(password) = password {
            parsed.password = Some(password.to_string());
        }

        let span = tracing::info_span!("sql.connect", uri = %parsed);
        let _guard = span.enter();

        let driver = self
            .driver_for(&parsed.scheme)
            .ok_or_else(|| SqlError::NoDriver {
                scheme: parsed.scheme.clone(),
            })?;
        tracing::info!(driver = driver.name(), "connecting");

        let start = std::time::Instant::now();
        let result = driver.connect(&parsed);
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(connection) => {
                tracing::info!(elapsed_ms, "connected");
                let traced: Box<dyn Connection> =
                    Box::new(TracedConnection::new(connection, parsed.to_string()));
                Ok(traced)
            }
            Err(e) => {
                tracing::error!(elapsed_ms, error = %e, "connect failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
