// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::{AuditOutcome, Stamps};

/// What [`crate::Sentinel::changed`] found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    pub(crate) stored: Stamps,
    pub(crate) outcomes: Vec<(String, AuditOutcome)>,
    pub(crate) aborted: bool,
}

impl ChangeReport {
    /// True when any resource mismatched or went missing
    pub fn is_changed(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| outcome.is_changed())
    }

    /// True when some stored stamps are stale but content is unchanged
    pub fn needs_refresh(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, outcome)| matches!(outcome, AuditOutcome::Refresh(_)))
    }

    /// Outcomes by key, in audit order
    pub fn outcomes(&self) -> &[(String, AuditOutcome)] {
        &self.outcomes
    }

    pub fn outcome(&self, key: &str) -> Option<&AuditOutcome> {
        self.outcomes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, outcome)| outcome)
    }

    /// Keys whose outcome forces a rerun
    pub fn changed_keys(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_changed())
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Whether auditing stopped early at a change
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// The stored ledger with refreshed stamps substituted
    pub fn refreshed_ledger(&self) -> Stamps {
        let mut stamps = self.stored.clone();
        for (key, outcome) in &self.outcomes {
            if let AuditOutcome::Refresh(stamp) = outcome {
                stamps.insert(key.clone(), stamp.clone());
            }
        }
        stamps
    }
}
