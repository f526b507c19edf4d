//! PID-lock and temp-service specs

use crate::prelude::*;
use nsk_files::{Acquire, ExitGuard, LockConfig, PidLocks, TempService};
use similar_asserts::assert_eq;
use std::process::Command;
use std::time::Duration;

#[test]
fn a_live_holder_excludes_until_it_dies() {
    let scratch = Scratch::new();
    let path = scratch.join("collector.pid");
    let mut holder = Command::new("sleep").arg("30").spawn().unwrap();
    let pid = holder.id() as i32;
    std::fs::write(&path, format!("{pid}\n")).unwrap();

    let locks = PidLocks::new(LockConfig::default().with_steal_backoff(Duration::from_millis(10)));
    assert_eq!(locks.acquire(&path).unwrap(), Acquire::Busy { pid: Some(pid) });

    holder.kill().unwrap();
    holder.wait().unwrap();
    assert_eq!(locks.acquire(&path).unwrap(), Acquire::Acquired);
    assert_eq!(locks.held(), vec![path.clone()]);

    assert!(locks.release(&path).unwrap());
    assert!(!path.exists());
}

#[test]
fn exit_guard_removes_the_global_temp_directory() {
    let dir = TempService::global().temp_dir().unwrap();
    let (name, _file) = TempService::global()
        .temp_file(Some("flows.txt"), nsk_files::OpenMode::Write)
        .unwrap();
    assert!(name.starts_with(&dir));
    assert!(dir.is_dir());

    drop(ExitGuard::new());
    assert!(!dir.exists());
}
