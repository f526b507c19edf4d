// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nsk-sentinel: change detection over a keyed set of resources
//!
//! Each resource has an [`Auditor`] that produces a [`Stamp`] describing its
//! current state and compares a stored stamp against the live resource. A
//! [`Ledger`] keeps the last stamps written. [`Sentinel::changed`] walks the
//! auditors against the ledger and reports whether downstream work has to
//! be redone.

mod auditor;
mod cache;
mod config;
mod error;
mod file;
mod hash;
mod ledger;
mod report;
mod sentinel;
mod stamp;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeAuditor;

pub use auditor::{AuditOutcome, Auditor};
pub use cache::{AuditCache, CacheStats};
pub use config::{CacheScope, SentinelConfig};
pub use error::{AuditError, LedgerError, SentinelError};
pub use file::{FileAuditor, FileStamp, SignatureAuditor};
pub use hash::HashFacility;
pub use ledger::{FileLedger, Ledger, MemoryLedger};
pub use report::ChangeReport;
pub use sentinel::Sentinel;
pub use stamp::{Stamp, Stamps};
