// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::{FakeAuditor, FileLedger, HashFacility, MemoryLedger, SignatureAuditor};
use serde_json::json;
use std::path::PathBuf;

fn stamp(n: i64) -> Stamp {
    Stamp::new(vec![json!(n), json!(0)])
}

fn ledger(pairs: &[(&str, i64)]) -> MemoryLedger {
    MemoryLedger::with_stamps(pairs.iter().map(|(k, n)| (k.to_string(), stamp(*n))).collect())
}

fn mismatch(reason: &str) -> AuditOutcome {
    AuditOutcome::mismatch(reason, None)
}

struct Files {
    dir: tempfile::TempDir,
    paths: Vec<PathBuf>,
}

fn two_files() -> Files {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<PathBuf> = ["in.rw", "out.rw"]
        .iter()
        .map(|name| dir.path().join(name))
        .collect();
    std::fs::write(&paths[0], "first file").unwrap();
    std::fs::write(&paths[1], "second").unwrap();
    Files { dir, paths }
}

fn signature_auditors(files: &Files) -> Vec<SignatureAuditor> {
    files
        .paths
        .iter()
        .map(|p| SignatureAuditor::new(p).with_facility(HashFacility::Builtin))
        .collect()
}

/// Rewrite item `index` of the stamp stored under `key`
fn tamper(sentinel: &Sentinel<FileLedger>, key: &str, index: usize, value: serde_json::Value) {
    let mut stamps = sentinel.load().unwrap();
    let stored = stamps.get_mut(key).unwrap();
    let mut items = stored.items().to_vec();
    items[index] = value;
    *stored = Stamp::new(items);
    sentinel.store(&stamps).unwrap();
}

#[test]
fn file_sentinel_lifecycle() {
    let files = two_files();
    let auditors = signature_auditors(&files);
    let key = auditors[0].key().to_string();
    let path = files.dir.path().join("ledger");

    let shallow = Sentinel::new(FileLedger::new(&path), SentinelConfig::default());
    shallow.update(&auditors).unwrap();
    assert!(!shallow.changed(&auditors).unwrap().is_changed());

    // size and ctime agree, so the corrupt hash goes unread
    tamper(&shallow, &key, 2, json!("0123456789abcdef0123456789abcdef"));
    let report = shallow.changed(&auditors).unwrap();
    assert!(!report.is_changed());

    let deep = Sentinel::new(
        FileLedger::new(&path),
        SentinelConfig::default().with_deep_check(true),
    );
    let report = deep.changed(&auditors).unwrap();
    assert!(report.is_changed());
    assert_eq!(report.changed_keys(), vec![key.as_str()]);

    // restore the hash, then move only the stored ctime
    shallow.update(&auditors).unwrap();
    let live = shallow.load().unwrap()[&key].clone();
    tamper(&shallow, &key, 0, json!(1));
    let report = shallow.changed(&auditors).unwrap();
    assert!(!report.is_changed());
    assert!(report.needs_refresh());
    assert_eq!(report.outcome(&key), Some(&AuditOutcome::Refresh(live.clone())));
    assert_eq!(report.refreshed_ledger()[&key], live);
}

#[test]
fn missing_stamp_is_a_mismatch() {
    let sentinel = Sentinel::new(MemoryLedger::new(), SentinelConfig::default());
    let report = sentinel.changed(&[FakeAuditor::new("a", stamp(1))]).unwrap();
    assert_eq!(report.outcomes(), [("a".to_string(), mismatch("missing stamp"))]);
}

#[test]
fn unclaimed_stamps_are_reported_unless_subset() {
    let config = SentinelConfig::default().with_abort_on_changed(false);
    let sentinel = Sentinel::new(ledger(&[("a", 1), ("b", 2)]), config);
    let auditors = [FakeAuditor::new("a", stamp(1))];

    let full = sentinel.changed(&auditors).unwrap();
    assert_eq!(
        full.outcomes(),
        [
            ("a".to_string(), AuditOutcome::Match),
            ("b".to_string(), mismatch("stamp not found")),
        ]
    );

    let subset = sentinel.changed_subset(&auditors).unwrap();
    assert!(!subset.is_changed());
    assert_eq!(subset.outcomes().len(), 1);
}

#[test]
fn abort_stops_at_the_first_change() {
    let auditors = [
        FakeAuditor::new("a", stamp(1)).with_outcome(Ok(mismatch("size changed"))),
        FakeAuditor::new("b", stamp(2)),
    ];

    let sentinel = Sentinel::new(ledger(&[("a", 1), ("b", 2)]), SentinelConfig::default());
    let report = sentinel.changed(&auditors).unwrap();
    assert!(report.aborted());
    assert_eq!(report.outcomes().len(), 1);
    assert_eq!(auditors[1].audits(), 0);

    let config = SentinelConfig::default().with_abort_on_changed(false);
    let sentinel = Sentinel::new(ledger(&[("a", 1), ("b", 2)]), config);
    let report = sentinel.changed(&auditors).unwrap();
    assert!(!report.aborted());
    assert_eq!(report.outcomes().len(), 2);
}

#[test]
fn refresh_does_not_abort() {
    let auditors = [
        FakeAuditor::new("a", stamp(1)).with_outcome(Ok(AuditOutcome::Refresh(stamp(5)))),
        FakeAuditor::new("b", stamp(2)),
    ];
    let sentinel = Sentinel::new(ledger(&[("a", 1), ("b", 2)]), SentinelConfig::default());
    let report = sentinel.changed(&auditors).unwrap();
    assert_eq!(report.outcomes().len(), 2);
    assert!(report.needs_refresh());
    assert_eq!(report.refreshed_ledger()["a"], stamp(5));
}

#[test]
fn audit_errors_propagate() {
    let failure = AuditError::Integrity {
        key: "a".to_string(),
        reason: "bad".to_string(),
    };
    let auditors = [FakeAuditor::new("a", stamp(1)).with_outcome(Err(failure))];
    let sentinel = Sentinel::new(ledger(&[("a", 1)]), SentinelConfig::default());
    assert!(matches!(
        sentinel.changed(&auditors),
        Err(SentinelError::Audit(AuditError::Integrity { .. }))
    ));
}

#[test]
fn local_cache_memoizes_until_store() {
    let auditor = FakeAuditor::new("a", stamp(1));
    let config = SentinelConfig::default().with_cache(CacheScope::Local);
    let sentinel = Sentinel::new(ledger(&[("a", 1)]), config);

    sentinel.changed(&[auditor.clone()]).unwrap();
    sentinel.changed(&[auditor.clone()]).unwrap();
    assert_eq!(auditor.audits(), 1);
    assert_eq!(
        sentinel.cache_stats(),
        Some(CacheStats {
            audit_hits: 1,
            audit_misses: 1,
            load_hits: 1,
            load_misses: 1,
        })
    );

    sentinel.update(&[auditor.clone()]).unwrap();
    sentinel.changed(&[auditor.clone()]).unwrap();
    assert_eq!(auditor.audits(), 2);
}

#[test]
fn no_cache_has_no_stats() {
    let sentinel = Sentinel::new(MemoryLedger::new(), SentinelConfig::default());
    assert_eq!(sentinel.cache_stats(), None);
}

#[test]
fn shared_cache_spans_sentinels() {
    let auditor = FakeAuditor::new("shared-cache-test", stamp(7));
    let config = SentinelConfig::default().with_cache(CacheScope::Shared);
    let stamps: Stamps = [("shared-cache-test".to_string(), stamp(7))].into();

    let first = Sentinel::new(MemoryLedger::with_stamps(stamps.clone()), config.clone());
    let second = Sentinel::new(MemoryLedger::with_stamps(stamps), config);
    first.changed(&[auditor.clone()]).unwrap();
    second.changed(&[auditor.clone()]).unwrap();
    assert_eq!(auditor.audits(), 1);
}

struct FlakyLedger;

impl Ledger for FlakyLedger {
    fn identity(&self) -> String {
        "flaky".to_string()
    }

    fn load(&self) -> Result<Stamps, LedgerError> {
        Err(LedgerError::Recoverable {
            ledger: self.identity(),
            reason: "busy".to_string(),
        })
    }

    fn store(&self, _stamps: &Stamps) -> Result<(), LedgerError> {
        Ok(())
    }
}

#[test]
fn recoverable_ledger_reads_as_empty() {
    let sentinel = Sentinel::new(FlakyLedger, SentinelConfig::default());
    assert_eq!(sentinel.load().unwrap(), Stamps::new());
}

#[test]
fn corrupted_ledger_is_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger");
    std::fs::write(&path, "nope\n").unwrap();
    let sentinel = Sentinel::new(FileLedger::new(&path), SentinelConfig::default());
    assert!(matches!(
        sentinel.changed(&[FakeAuditor::new("a", stamp(1))]),
        Err(SentinelError::Ledger(LedgerError::Corrupted { .. }))
    ));
}

#[test]
fn config_from_toml() {
    let config = SentinelConfig::from_toml_str("deep_check = true\ncache = \"shared\"\n").unwrap();
    assert_eq!(
        config,
        SentinelConfig::default()
            .with_deep_check(true)
            .with_cache(CacheScope::Shared)
    );
    assert!(matches!(
        SentinelConfig::from_toml_str("cache = \"global\""),
        Err(SentinelError::Config(_))
    ));
}
