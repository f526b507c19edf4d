// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Memoized audits and ledger loads

use crate::{AuditError, AuditOutcome, Auditor, Stamp, Stamps};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub audit_hits: u64,
    pub audit_misses: u64,
    pub load_hits: u64,
    pub load_misses: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AuditKey {
    kind: &'static str,
    key: String,
    stamp: String,
    deep: bool,
}

#[derive(Debug, Default)]
struct Entries {
    audits: HashMap<AuditKey, Result<AuditOutcome, AuditError>>,
    loads: HashMap<String, Stamps>,
    stats: CacheStats,
}

/// Remembers audit results, failures included, until cleared
#[derive(Debug, Default)]
pub struct AuditCache {
    entries: Mutex<Entries>,
}

static SHARED: LazyLock<AuditCache> = LazyLock::new(AuditCache::default);

impl AuditCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache
    pub fn shared() -> &'static AuditCache {
        &SHARED
    }

    /// Result of `auditor.audit(stored, deep)`, computed at most once
    pub fn audit(
        &self,
        auditor: &dyn Auditor,
        stored: &Stamp,
        deep: bool,
    ) -> Result<AuditOutcome, AuditError> {
        let key = AuditKey {
            kind: auditor.kind(),
            key: auditor.key().to_string(),
            stamp: stored.identity(),
            deep,
        };
        {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(result) = entries.audits.get(&key).cloned() {
                entries.stats.audit_hits += 1;
                return result;
            }
            entries.stats.audit_misses += 1;
        }

        // Audit outside the lock; a racing duplicate just overwrites
        let result = auditor.audit(stored, deep);
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .audits
            .insert(key, result.clone());
        result
    }

    /// Cached ledger contents for `identity`, if any
    pub fn load(&self, identity: &str) -> Option<Stamps> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.loads.get(identity).cloned() {
            Some(stamps) => {
                entries.stats.load_hits += 1;
                Some(stamps)
            }
            None => {
                entries.stats.load_misses += 1;
                None
            }
        }
    }

    pub fn remember_load(&self, identity: &str, stamps: &Stamps) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .loads
            .insert(identity.to_string(), stamps.clone());
    }

    /// Forget every cached result; counters are kept
    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.audits.clear();
        entries.loads.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).stats
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
