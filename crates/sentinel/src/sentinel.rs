// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change detection against a ledger

use crate::{
    AuditCache, AuditError, AuditOutcome, Auditor, CacheScope, CacheStats, ChangeReport, Ledger,
    LedgerError, SentinelConfig, SentinelError, Stamp, Stamps,
};
use std::collections::BTreeSet;

enum Cache {
    None,
    Local(AuditCache),
    Shared,
}

impl Cache {
    fn get(&self) -> Option<&AuditCache> {
        match self {
            Self::None => None,
            Self::Local(cache) => Some(cache),
            Self::Shared => Some(AuditCache::shared()),
        }
    }
}

/// Decides whether the resources behind a set of auditors have changed
/// since their stamps were last stored
pub struct Sentinel<L> {
    ledger: L,
    config: SentinelConfig,
    cache: Cache,
}

impl<L: Ledger> Sentinel<L> {
    pub fn new(ledger: L, config: SentinelConfig) -> Self {
        let cache = match config.cache {
            CacheScope::None => Cache::None,
            CacheScope::Local => Cache::Local(AuditCache::new()),
            CacheScope::Shared => Cache::Shared,
        };
        Self {
            ledger,
            config,
            cache,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &SentinelConfig {
        &self.config
    }

    /// Counters of the cache in use, if any
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.get().map(AuditCache::stats)
    }

    /// Stored stamps; a missing or temporarily unreadable ledger is empty
    pub fn load(&self) -> Result<Stamps, SentinelError> {
        let identity = self.ledger.identity();
        let cache = self.cache.get();
        if let Some(stamps) = cache.and_then(|c| c.load(&identity)) {
            return Ok(stamps);
        }
        let stamps = match self.ledger.load() {
            Ok(stamps) => stamps,
            Err(LedgerError::NotFound(_)) => Stamps::new(),
            Err(e @ LedgerError::Recoverable { .. }) => {
                tracing::warn!(ledger = %identity, error = %e, "treating ledger as empty");
                Stamps::new()
            }
            Err(e) => return Err(e.into()),
        };
        if let Some(cache) = cache {
            cache.remember_load(&identity, &stamps);
        }
        Ok(stamps)
    }

    fn audit(&self, auditor: &dyn Auditor, stored: &Stamp) -> Result<AuditOutcome, AuditError> {
        let deep = self.config.deep_check;
        match self.cache.get() {
            Some(cache) => cache.audit(auditor, stored, deep),
            None => auditor.audit(stored, deep),
        }
    }

    /// Audit every resource, reporting stored stamps that no auditor claims
    pub fn changed<A: Auditor>(&self, auditors: &[A]) -> Result<ChangeReport, SentinelError> {
        self.check(auditors, false)
    }

    /// Audit only the given resources, ignoring the rest of the ledger
    pub fn changed_subset<A: Auditor>(
        &self,
        auditors: &[A],
    ) -> Result<ChangeReport, SentinelError> {
        self.check(auditors, true)
    }

    fn check<A: Auditor>(&self, auditors: &[A], subset: bool) -> Result<ChangeReport, SentinelError> {
        let span = tracing::info_span!(
            "sentinel.changed",
            ledger = %self.ledger.identity(),
            auditors = auditors.len(),
            subset
        );
        let _guard = span.enter();
        let start = std::time::Instant::now();

        let stored = self.load()?;
        let mut outcomes = Vec::with_capacity(auditors.len());
        let mut aborted = false;
        for auditor in auditors {
            let key = auditor.key().to_string();
            let outcome = match stored.get(&key) {
                Some(stamp) => self.audit(auditor, stamp).inspect_err(|e| {
                    tracing::error!(key = %key, error = %e, "audit failed");
                })?,
                None => AuditOutcome::mismatch("missing stamp", None),
            };
            tracing::debug!(key = %key, outcome = outcome.label(), "audited");
            let stop = self.config.abort_on_changed && outcome.is_changed();
            outcomes.push((key, outcome));
            if stop {
                aborted = true;
                break;
            }
        }

        if !subset && !aborted {
            let claimed: BTreeSet<&str> = auditors.iter().map(|a| a.key()).collect();
            for key in stored.keys().filter(|k| !claimed.contains(k.as_str())) {
                outcomes.push((key.clone(), AuditOutcome::mismatch("stamp not found", None)));
                if self.config.abort_on_changed {
                    aborted = true;
                    break;
                }
            }
        }

        let report = ChangeReport {
            stored,
            outcomes,
            aborted,
        };
        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            changed = report.is_changed(),
            refresh = report.needs_refresh(),
            "audit done"
        );
        Ok(report)
    }

    /// Replace the ledger and drop cached results
    pub fn store(&self, stamps: &Stamps) -> Result<(), SentinelError> {
        let span = tracing::info_span!(
            "sentinel.store",
            ledger = %self.ledger.identity(),
            stamps = stamps.len()
        );
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.ledger.store(stamps);
        let elapsed_ms = start.elapsed().as_millis() as u64;
        if let Some(cache) = self.cache.get() {
            cache.clear();
        }
        match &result {
            Ok(()) => tracing::info!(elapsed_ms, "ledger stored"),
            Err(e) => tracing::error!(elapsed_ms, error = %e, "ledger store failed"),
        }
        Ok(result?)
    }

    /// Live stamps of every auditor
    pub fn stamps_for<A: Auditor>(&self, auditors: &[A]) -> Result<Stamps, SentinelError> {
        auditors
            .iter()
            .map(|a| -> Result<_, SentinelError> { Ok((a.key().to_string(), a.stamp()?)) })
            .collect()
    }

    /// Stamp every auditor and store the result as the new ledger
    pub fn update<A: Auditor>(&self, auditors: &[A]) -> Result<Stamps, SentinelError> {
        let stamps = self.stamps_for(auditors)?;
        self.store(&stamps)?;
        Ok(stamps)
    }
}

#[cfg(test)]
#[path = "sentinel_tests.rs"]
mod tests;
