// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashSet;
use std::io::{Read, Write};
use std::os::unix::fs::FileTypeExt;
use std::sync::Arc;
use yare::parameterized;

#[test]
fn directory_is_created_lazily_and_removed_on_cleanup() {
    let service = TempService::new();
    let dir = service.temp_dir().unwrap();
    assert!(dir.is_dir());
    assert_eq!(service.temp_dir().unwrap(), dir);

    service.cleanup().unwrap();
    assert!(!dir.exists());
    // a second cleanup is a no-op
    service.cleanup().unwrap();
}

#[test]
fn dropping_a_scoped_service_removes_its_directory() {
    let dir = {
        let service = TempService::new();
        service.temp_dir().unwrap()
    };
    assert!(!dir.exists());
}

#[test]
fn names_carry_the_suffix_and_are_not_created() {
    let service = TempService::new();
    let path = service.temp_name(Some(".rw")).unwrap();
    assert!(path.to_string_lossy().ends_with(".rw"));
    assert_eq!(path.parent().unwrap(), service.temp_dir().unwrap());
    assert!(!path.exists());
}

#[test]
fn names_stay_unique_across_threads_and_cleanup() {
    let service = Arc::new(TempService::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            std::thread::spawn(move || {
                (0..50)
                    .map(|_| service.temp_name(None).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let mut names: HashSet<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .map(|p| p.file_name().unwrap().to_owned())
        .collect();
    assert_eq!(names.len(), 200);

    service.cleanup().unwrap();
    let after = service.temp_name(None).unwrap();
    assert!(names.insert(after.file_name().unwrap().to_owned()));
}

#[test]
fn temp_file_round_trips_content() {
    let service = TempService::new();
    let (path, mut file) = service.temp_file(Some("data.txt"), OpenMode::Write).unwrap();
    file.write_all(b"hello").unwrap();
    drop(file);

    let (_, mut file) = service.temp_file(Some("data.txt"), OpenMode::Append).unwrap();
    file.write_all(b" world").unwrap();
    drop(file);

    let (same, mut file) = service.temp_file(Some("data.txt"), OpenMode::Read).unwrap();
    assert_eq!(same, path);
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    assert_eq!(text, "hello world");
}

#[parameterized(
    parent = { "../escape" },
    nested = { "a/b" },
    empty = { "" },
)]
fn names_with_directories_are_rejected(name: &str) {
    let service = TempService::new();
    assert!(matches!(
        service.temp_file(Some(name), OpenMode::Write),
        Err(TempError::InvalidName { .. })
    ));
}

#[test]
fn temp_pipe_creates_a_fifo() {
    let service = TempService::new();
    let path = service.temp_pipe(None).unwrap();
    let meta = std::fs::metadata(&path).unwrap();
    assert!(meta.file_type().is_fifo());
}
