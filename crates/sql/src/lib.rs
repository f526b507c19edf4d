// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nsk-sql: query templates and database connections
//!
//! A [`QueryTemplate`] holds one SQL body with `:name` placeholders plus
//! alternate bodies keyed by dialect tag. Rendering picks a body for the
//! runtime variants and rewrites its placeholders into one of the
//! [`ParamStyle`] conventions. Connections come from a [`DriverRegistry`]
//! that maps URI schemes to drivers.

mod connection;
mod error;
mod registry;
mod scanner;
mod style;
mod template;
mod traced;
mod uri;
mod value;

pub mod drivers;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DriverCall, FakeDriver};

pub use connection::{is_query, Connection, CursorNames, ResultSet};
pub use error::SqlError;
pub use registry::{Driver, DriverRegistry};
pub use scanner::{scan, Fragment};
pub use style::ParamStyle;
pub use template::{QueryTemplate, Rendered};
pub use traced::TracedConnection;
pub use uri::{scheme_matches, ConnectionUri};
pub use value::{Bindings, Params, Row, SqlValue};
