// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent stamp ledgers

use crate::{LedgerError, Stamp, Stamps};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Key to stamp mapping that outlives a run
pub trait Ledger: Send + Sync {
    /// Name that identifies this ledger's storage, used to key cached loads
    fn identity(&self) -> String;

    /// Current mapping
    ///
    /// [`LedgerError::NotFound`] means the ledger was never written.
    fn load(&self) -> Result<Stamps, LedgerError>;

    /// Replace the whole mapping; readers see either the old or the new one
    fn store(&self, stamps: &Stamps) -> Result<(), LedgerError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct LedgerEntry {
    key: String,
    stamp: Stamp,
}

/// Ledger kept as JSON lines, one `{"key": .., "stamp": [..]}` per entry
#[derive(Debug, Clone)]
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: io::Error) -> LedgerError {
        match e.kind() {
            io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                LedgerError::Recoverable {
                    ledger: self.identity(),
                    reason: e.to_string(),
                }
            }
            _ => LedgerError::Io {
                path: self.path.clone(),
                source: e,
            },
        }
    }
}

impl Ledger for FileLedger {
    fn identity(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Stamps, LedgerError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LedgerError::NotFound(self.identity()))
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut stamps = Stamps::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: LedgerEntry =
                serde_json::from_str(&line).map_err(|e| LedgerError::Corrupted {
                    path: self.path.clone(),
                    line: index + 1,
                    reason: e.to_string(),
                })?;
            stamps.insert(entry.key, entry.stamp);
        }
        Ok(stamps)
    }

    fn store(&self, stamps: &Stamps) -> Result<(), LedgerError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        for (key, stamp) in stamps {
            let line = serde_json::to_string(&LedgerEntry {
                key: key.clone(),
                stamp: stamp.clone(),
            })?;
            writeln!(temp, "{line}").map_err(|e| self.io_error(e))?;
        }
        temp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        temp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

static NEXT_MEMORY_LEDGER: AtomicU64 = AtomicU64::new(1);

/// In-process ledger
#[derive(Debug)]
pub struct MemoryLedger {
    id: u64,
    stamps: Mutex<Option<Stamps>>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self {
            id: NEXT_MEMORY_LEDGER.fetch_add(1, Ordering::Relaxed),
            stamps: Mutex::new(None),
        }
    }
}

impl MemoryLedger {
    /// Ledger that has never been stored
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stamps(stamps: Stamps) -> Self {
        let ledger = Self::default();
        *ledger.stamps.lock().unwrap_or_else(|e| e.into_inner()) = Some(stamps);
        ledger
    }
}

impl Ledger for MemoryLedger {
    fn identity(&self) -> String {
        format!("memory:{}", self.id)
    }

    fn load(&self) -> Result<Stamps, LedgerError> {
        self.stamps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| LedgerError::NotFound(self.identity()))
    }

    fn store(&self, stamps: &Stamps) -> Result<(), LedgerError> {
        *self.stamps.lock().unwrap_or_else(|e| e.into_inner()) = Some(stamps.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
