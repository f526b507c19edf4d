// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PID-file locking
//!
//! A lock file holds the decimal id of its owner. A file naming a process
//! that no longer exists is stale and may be stolen. Acquisition never
//! waits on a live holder.

use crate::LockError;
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};
use std::time::Duration;

/// PID-lock tunables
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Pause before a second steal of a stale lock within one acquisition
    #[serde(with = "humantime_serde")]
    pub steal_backoff: Duration,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            steal_backoff: Duration::from_secs(1),
        }
    }
}

impl LockConfig {
    pub fn with_steal_backoff(mut self, backoff: Duration) -> Self {
        self.steal_backoff = backoff;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self, LockError> {
        Ok(toml::from_str(text)?)
    }
}

/// Outcome of [`PidLocks::acquire`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquire {
    /// The lock file was created for this process
    Acquired,
    /// The lock file already names this process
    AlreadyHeld,
    /// Another live process holds the lock; `None` when the file is
    /// unreadable, such as mid-write by its creator
    Busy { pid: Option<i32> },
}

impl Acquire {
    /// True when this process now holds the lock
    pub fn is_held(&self) -> bool {
        matches!(self, Acquire::Acquired | Acquire::AlreadyHeld)
    }
}

/// Contents of an existing lock file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockInfo {
    pub pid: i32,
    pub running: bool,
}

/// The set of PID locks held by this process
#[derive(Debug, Default)]
pub struct PidLocks {
    config: LockConfig,
    held: Mutex<BTreeSet<PathBuf>>,
}

static GLOBAL: LazyLock<PidLocks> = LazyLock::new(PidLocks::default);

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> LockError + '_ {
    move |source| LockError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn own_pid() -> i32 {
    std::process::id() as i32
}

/// Whether a process with this id exists
///
/// EPERM means it exists under another user.
fn is_running(pid: i32) -> bool {
    if pid <= 0 {
        return false;
    }
    match kill(Pid::from_raw(pid), None) {
        Ok(()) | Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

enum Examined {
    Absent,
    Malformed,
    Found(LockInfo),
}

fn read_lock(path: &Path) -> Result<Examined, LockError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Examined::Absent),
        Err(e) => return Err(io_error(path)(e)),
    };
    Ok(match text.trim().parse::<i32>() {
        Ok(pid) if pid > 0 => Examined::Found(LockInfo {
            pid,
            running: is_running(pid),
        }),
        _ => Examined::Malformed,
    })
}

/// Unlink `path` if it still names `stale_pid`; false when it changed hands
fn remove_stale(path: &Path, stale_pid: i32) -> Result<bool, LockError> {
    match read_lock(path)? {
        Examined::Found(info) if info.pid == stale_pid => {}
        _ => return Ok(false),
    }
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error(path)(e)),
    }
}

impl PidLocks {
    pub fn new(config: LockConfig) -> Self {
        Self {
            config,
            held: Mutex::default(),
        }
    }

    /// The process-wide lock set
    pub fn global() -> &'static PidLocks {
        &GLOBAL
    }

    /// Read the lock file at `path`
    ///
    /// `None` when there is no lock file or it does not hold a pid.
    pub fn examine(path: impl AsRef<Path>) -> Result<Option<LockInfo>, LockError> {
        Ok(match read_lock(path.as_ref())? {
            Examined::Found(info) => Some(info),
            Examined::Absent | Examined::Malformed => None,
        })
    }

    /// Try to take the lock at `path` without waiting on a live holder
    ///
    /// A lock naming a dead process is removed and taken over. The file is
    /// re-read just before removal, but two processes stealing the same
    /// stale lock at once can still race: one may unlink the file the other
    /// has just created. Stealing is best-effort under that contention.
    pub fn acquire(&self, path: impl AsRef<Path>) -> Result<Acquire, LockError> {
        let path = path.as_ref();
        let me = own_pid();
        let mut stolen = false;

        loop {
            match OpenOptions::new().write(true).create_new(true).open(path) {
                Ok(mut file) => {
                    writeln!(file, "{me}").map_err(io_error(path))?;
                    file.sync_all().map_err(io_error(path))?;
                    self.remember(path);
                    tracing::debug!(path = %path.display(), pid = me, "acquired pid lock");
                    return Ok(Acquire::Acquired);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(io_error(path)(e)),
            }

            match read_lock(path)? {
                // removed between our create and read; try again
                Examined::Absent => continue,
                Examined::Malformed => {
                    tracing::warn!(path = %path.display(), "unreadable pid lock");
                    return Ok(Acquire::Busy { pid: None });
                }
                Examined::Found(info) if info.pid == me => {
                    self.remember(path);
                    return Ok(Acquire::AlreadyHeld);
                }
                Examined::Found(info) if info.running => {
                    return Ok(Acquire::Busy {
                        pid: Some(info.pid),
                    });
                }
                Examined::Found(info) => {
                    // a second steal in one acquisition backs off first
                    if stolen {
                        std::thread::sleep(self.config.steal_backoff);
                    }
                    tracing::info!(
                        path = %path.display(),
                        stale_pid = info.pid,
                        "stealing stale pid lock"
                    );
                    remove_stale(path, info.pid)?;
                    stolen = true;
                }
            }
        }
    }

    /// Remove the lock at `path` if it still names this process
    ///
    /// Returns whether a file was removed. Safe to call repeatedly.
    pub fn release(&self, path: impl AsRef<Path>) -> Result<bool, LockError> {
        let path = path.as_ref();
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(path);

        match read_lock(path)? {
            Examined::Found(info) if info.pid == own_pid() => {}
            _ => return Ok(false),
        }
        match fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "released pid lock");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(path)(e)),
        }
    }

    /// Release every lock this set holds; used at process exit
    pub fn release_all(&self) {
        for path in self.held() {
            if let Err(e) = self.release(&path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to release pid lock");
            }
        }
    }

    /// Snapshot of the lock paths currently held
    pub fn held(&self) -> Vec<PathBuf> {
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    fn remember(&self, path: &Path) {
        self.held
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.to_path_buf());
    }
}

#[cfg(test)]
#[path = "pidlock_tests.rs"]
mod tests;
