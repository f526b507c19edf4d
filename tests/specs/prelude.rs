//! Shared helpers for the behavioral specs

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Scratch directory that disappears with the test
pub struct Scratch {
    dir: tempfile::TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `content` to `name` and return its path
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

pub fn instant(text: &str) -> nsk_time::Instant {
    nsk_time::parse_instant(text).unwrap()
}
