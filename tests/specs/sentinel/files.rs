//! Content sentinel specs

use crate::prelude::*;
use nsk_sentinel::{
    AuditOutcome, Auditor, FileLedger, Ledger, Sentinel, SentinelConfig, SignatureAuditor, Stamp,
};
use similar_asserts::assert_eq;

struct Setup {
    scratch: Scratch,
    auditors: Vec<SignatureAuditor>,
}

fn setup() -> Setup {
    let scratch = Scratch::new();
    let auditors = vec![
        SignatureAuditor::new(scratch.file("in.rw", "ten bytes!")),
        SignatureAuditor::new(scratch.file("out.rw", "six b.")),
    ];
    Setup { scratch, auditors }
}

impl Setup {
    fn ledger(&self) -> FileLedger {
        FileLedger::new(self.scratch.join("sentinel.ledger"))
    }

    fn sentinel(&self, deep_check: bool) -> Sentinel<FileLedger> {
        Sentinel::new(
            self.ledger(),
            SentinelConfig::default().with_deep_check(deep_check),
        )
    }

    /// Overwrite one item of the stored stamp for `auditor`
    fn tamper(&self, auditor: usize, item: usize, value: serde_json::Value) {
        let ledger = self.ledger();
        let mut stamps = ledger.load().unwrap();
        let key = self.auditors[auditor].key();
        let mut items = stamps[key].items().to_vec();
        items[item] = value;
        stamps.insert(key.to_string(), Stamp::new(items));
        ledger.store(&stamps).unwrap();
    }
}

#[test]
fn seeded_ledger_reports_no_change() {
    let s = setup();
    s.sentinel(false).update(&s.auditors).unwrap();
    let report = s.sentinel(false).changed(&s.auditors).unwrap();
    assert!(!report.is_changed());
    assert!(!report.needs_refresh());
    assert_eq!(report.outcomes().len(), 2);
}

#[test]
fn corrupt_hash_is_caught_only_by_a_deep_check() {
    let s = setup();
    s.sentinel(false).update(&s.auditors).unwrap();
    s.tamper(1, 2, serde_json::json!("ffffffffffffffffffffffffffffffff"));

    assert!(!s.sentinel(false).changed(&s.auditors).unwrap().is_changed());

    let report = s.sentinel(true).changed(&s.auditors).unwrap();
    assert!(report.is_changed());
    assert_eq!(report.changed_keys(), vec![s.auditors[1].key()]);
}

#[test]
fn moved_ctime_with_same_content_is_a_refresh() {
    let s = setup();
    let seeded = s.sentinel(false).update(&s.auditors).unwrap();
    s.tamper(0, 0, serde_json::json!(0));

    let report = s.sentinel(false).changed(&s.auditors).unwrap();
    assert!(!report.is_changed());
    assert!(report.needs_refresh());
    assert_eq!(report.refreshed_ledger(), seeded);
}

#[test]
fn size_change_is_a_mismatch_without_hashing() {
    let s = setup();
    s.sentinel(false).update(&s.auditors).unwrap();
    std::fs::write(s.auditors[0].path(), "now eleven!").unwrap();

    let report = s.sentinel(true).changed(&s.auditors).unwrap();
    match report.outcome(s.auditors[0].key()) {
        Some(AuditOutcome::Mismatch { reason, stamp }) => {
            assert_eq!(reason, "size changed");
            assert_eq!(stamp.as_ref().map(Stamp::len), Some(2));
        }
        other => panic!("expected a size mismatch, got {other:?}"),
    }
}

#[test]
fn removed_file_is_missing() {
    let s = setup();
    s.sentinel(false).update(&s.auditors).unwrap();
    std::fs::remove_file(s.auditors[1].path()).unwrap();

    let report = s.sentinel(false).changed(&s.auditors).unwrap();
    assert!(report.is_changed());
    assert!(matches!(
        report.outcome(s.auditors[1].key()),
        Some(AuditOutcome::Missing(_))
    ));
}
