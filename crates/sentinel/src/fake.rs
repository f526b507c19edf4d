// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake auditor for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{AuditError, AuditOutcome, Auditor, Stamp};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct State {
    stamp: Stamp,
    outcome: Result<AuditOutcome, AuditError>,
    audits: usize,
}

/// Auditor with a scripted stamp and outcome that counts its audits
#[derive(Debug, Clone)]
pub struct FakeAuditor {
    key: String,
    state: Arc<Mutex<State>>,
}

impl FakeAuditor {
    pub fn new(key: impl Into<String>, stamp: Stamp) -> Self {
        Self {
            key: key.into(),
            state: Arc::new(Mutex::new(State {
                stamp,
                outcome: Ok(AuditOutcome::Match),
                audits: 0,
            })),
        }
    }

    pub fn with_outcome(self, outcome: Result<AuditOutcome, AuditError>) -> Self {
        self.set_outcome(outcome);
        self
    }

    pub fn set_outcome(&self, outcome: Result<AuditOutcome, AuditError>) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).outcome = outcome;
    }

    /// Number of times `audit` actually ran
    pub fn audits(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).audits
    }
}

impl Auditor for FakeAuditor {
    fn kind(&self) -> &'static str {
        "fake"
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn stamp(&self) -> Result<Stamp, AuditError> {
        Ok(self.state.lock().unwrap_or_else(|e| e.into_inner()).stamp.clone())
    }

    fn audit(&self, _stored: &Stamp, _deep: bool) -> Result<AuditOutcome, AuditError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.audits += 1;
        state.outcome.clone()
    }
}
