// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Auditors for regular files
//!
//! [`FileAuditor`] stamps `[ctime_ns, size]`; [`SignatureAuditor`] adds the
//! MD5 of the content, `[ctime_ns, size, md5]`.

use crate::{AuditError, AuditOutcome, Auditor, HashFacility, Stamp};
use serde_json::Value;
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

/// Decoded file stamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    /// Inode change time in nanoseconds since the epoch
    pub ctime_ns: i64,
    pub size: u64,
    pub md5: Option<String>,
}

impl FileStamp {
    /// Decode a two- or three-item stamp stored under `key`
    pub fn decode(key: &str, stamp: &Stamp) -> Result<Self, AuditError> {
        let invalid = |reason: &str| AuditError::Integrity {
            key: key.to_string(),
            reason: format!("{reason} in {stamp}"),
        };
        let items = stamp.items();
        if !(2..=3).contains(&items.len()) {
            return Err(invalid("expected 2 or 3 items"));
        }
        let ctime_ns = items[0].as_i64().ok_or_else(|| invalid("ctime is not an integer"))?;
        let size = items[1].as_u64().ok_or_else(|| invalid("size is not an unsigned integer"))?;
        let md5 = match items.get(2) {
            None => None,
            Some(Value::String(s)) if s.len() == 32 => Some(s.clone()),
            Some(_) => return Err(invalid("md5 is not a 32 digit string")),
        };
        Ok(Self {
            ctime_ns,
            size,
            md5,
        })
    }

    /// Size and ctime of the file at `path`
    pub fn of(path: &Path) -> Result<Self, String> {
        let meta = fs::metadata(path).map_err(|e| e.to_string())?;
        if !meta.is_file() {
            return Err("not a regular file".to_string());
        }
        Ok(Self {
            ctime_ns: meta.ctime() * 1_000_000_000 + meta.ctime_nsec(),
            size: meta.size(),
            md5: None,
        })
    }

    pub fn with_md5(mut self, md5: String) -> Self {
        self.md5 = Some(md5);
        self
    }
}

impl From<FileStamp> for Stamp {
    fn from(stamp: FileStamp) -> Self {
        let mut items = vec![Value::from(stamp.ctime_ns), Value::from(stamp.size)];
        items.extend(stamp.md5.map(Value::from));
        Stamp::new(items)
    }
}

fn key_for(path: &Path) -> String {
    path.display().to_string()
}

/// Watches a file's size and change time
#[derive(Debug, Clone)]
pub struct FileAuditor {
    key: String,
    path: PathBuf,
}

impl FileAuditor {
    /// Auditor keyed by the path itself
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            key: key_for(&path),
            path,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Auditor for FileAuditor {
    fn kind(&self) -> &'static str {
        "file"
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn stamp(&self) -> Result<Stamp, AuditError> {
        FileStamp::of(&self.path)
            .map(Stamp::from)
            .map_err(|reason| AuditError::Unreadable {
                path: self.path.clone(),
                reason,
            })
    }

    fn audit(&self, stored: &Stamp, _deep: bool) -> Result<AuditOutcome, AuditError> {
        let old = FileStamp::decode(&self.key, stored)?;
        let live = match FileStamp::of(&self.path) {
            Ok(live) => live,
            Err(reason) => return Ok(AuditOutcome::Missing(reason)),
        };
        Ok(if live.size != old.size {
            AuditOutcome::mismatch("size changed", Some(live.into()))
        } else if live.ctime_ns != old.ctime_ns {
            AuditOutcome::mismatch("ctime changed", Some(live.into()))
        } else {
            AuditOutcome::Match
        })
    }
}

/// Watches a file's size, change time and MD5 signature
///
/// A changed ctime alone triggers a rehash: the same signature means the
/// stored stamp only needs a refresh.
#[derive(Debug, Clone)]
pub struct SignatureAuditor {
    key: String,
    path: PathBuf,
    facility: Option<HashFacility>,
}

impl SignatureAuditor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            key: key_for(&path),
            path,
            facility: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Hash with `facility` instead of the process-wide choice
    pub fn with_facility(mut self, facility: HashFacility) -> Self {
        self.facility = Some(facility);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn digest(&self) -> Result<String, AuditError> {
        self.facility
            .unwrap_or_else(HashFacility::global)
            .digest(&self.path)
    }
}

impl Auditor for SignatureAuditor {
    fn kind(&self) -> &'static str {
        "signature"
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn stamp(&self) -> Result<Stamp, AuditError> {
        let live = FileStamp::of(&self.path).map_err(|reason| AuditError::Unreadable {
            path: self.path.clone(),
            reason,
        })?;
        Ok(live.with_md5(self.digest()?).into())
    }

    fn audit(&self, stored: &Stamp, deep: bool) -> Result<AuditOutcome, AuditError> {
        let old = FileStamp::decode(&self.key, stored)?;
        let live = match FileStamp::of(&self.path) {
            Ok(live) => live,
            Err(reason) => return Ok(AuditOutcome::Missing(reason)),
        };
        if live.size != old.size {
            return Ok(AuditOutcome::mismatch("size changed", Some(live.into())));
        }
        let ctime_changed = live.ctime_ns != old.ctime_ns;
        if !ctime_changed && !deep {
            return Ok(AuditOutcome::Match);
        }

        let live = live.with_md5(self.digest()?);
        if live.md5 != old.md5 {
            Ok(AuditOutcome::mismatch("content changed", Some(live.into())))
        } else if ctime_changed {
            Ok(AuditOutcome::Refresh(live.into()))
        } else {
            Ok(AuditOutcome::Match)
        }
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
