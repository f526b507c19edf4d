// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-lifetime temp directory
//!
//! The directory is created on first use. Names inside it come from a
//! counter that only ever increases, so a name is never handed out twice
//! even across [`TempService::cleanup`].

use crate::TempError;
use nix::sys::stat::Mode;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};
use tempfile::TempDir;

/// How [`TempService::temp_file`] opens its file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Existing file, read only
    Read,
    /// Create or truncate, write only
    #[default]
    Write,
    /// Create if missing, append
    Append,
    /// Create or truncate, read and write
    ReadWrite,
}

impl OpenMode {
    fn options(self) -> OpenOptions {
        let mut opts = OpenOptions::new();
        match self {
            OpenMode::Read => opts.read(true),
            OpenMode::Write => opts.write(true).create(true).truncate(true),
            OpenMode::Append => opts.append(true).create(true),
            OpenMode::ReadWrite => opts.read(true).write(true).create(true).truncate(true),
        };
        opts
    }
}

#[derive(Debug, Default)]
struct State {
    dir: Option<TempDir>,
    counter: u64,
}

/// A lazily created temp directory and a source of fresh names in it
#[derive(Debug, Default)]
pub struct TempService {
    state: Mutex<State>,
}

static GLOBAL: LazyLock<TempService> = LazyLock::new(TempService::new);

impl TempService {
    /// A service with its own directory, removed when the service drops
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide service
    pub fn global() -> &'static TempService {
        &GLOBAL
    }

    fn with_dir<T>(
        &self,
        f: impl FnOnce(&Path, &mut u64) -> Result<T, TempError>,
    ) -> Result<T, TempError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let dir = match state.dir.take() {
            Some(dir) => dir,
            None => {
                let created = tempfile::Builder::new()
                    .prefix("nsk-")
                    .tempdir()
                    .map_err(TempError::CreateDir)?;
                tracing::debug!(path = %created.path().display(), "created temp directory");
                created
            }
        };
        let result = f(dir.path(), &mut state.counter);
        state.dir = Some(dir);
        result
    }

    /// Path of the temp directory, creating it if needed
    pub fn temp_dir(&self) -> Result<PathBuf, TempError> {
        self.with_dir(|dir, _| Ok(dir.to_path_buf()))
    }

    /// A fresh path in the temp directory; nothing is created there
    pub fn temp_name(&self, suffix: Option<&str>) -> Result<PathBuf, TempError> {
        self.with_dir(|dir, counter| {
            *counter += 1;
            let name = format!("tmp{:04}{}", counter, suffix.unwrap_or(""));
            Ok(dir.join(name))
        })
    }

    fn named(&self, name: Option<&str>) -> Result<PathBuf, TempError> {
        match name {
            None => self.temp_name(None),
            Some(name) => {
                let plain = Path::new(name)
                    .file_name()
                    .is_some_and(|f| f == std::ffi::OsStr::new(name));
                if !plain {
                    return Err(TempError::InvalidName {
                        name: name.to_string(),
                    });
                }
                Ok(self.temp_dir()?.join(name))
            }
        }
    }

    /// Open a file in the temp directory
    ///
    /// With no name a fresh one is chosen. A given name must be a bare file
    /// name; it is placed inside the temp directory.
    pub fn temp_file(
        &self,
        name: Option<&str>,
        mode: OpenMode,
    ) -> Result<(PathBuf, File), TempError> {
        let path = self.named(name)?;
        let file = mode.options().open(&path).map_err(|source| TempError::Io {
            path: path.clone(),
            source,
        })?;
        Ok((path, file))
    }

    /// Create a FIFO in the temp directory and return its path
    pub fn temp_pipe(&self, name: Option<&str>) -> Result<PathBuf, TempError> {
        let path = self.named(name)?;
        nix::unistd::mkfifo(&path, Mode::S_IRUSR | Mode::S_IWUSR).map_err(|source| {
            TempError::Fifo {
                path: path.clone(),
                source,
            }
        })?;
        Ok(path)
    }

    /// Remove the temp directory and everything in it
    ///
    /// Later calls create a new directory; the name counter keeps counting.
    pub fn cleanup(&self) -> Result<(), TempError> {
        let dir = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.dir.take()
        };
        let Some(dir) = dir else {
            return Ok(());
        };
        let path = dir.path().to_path_buf();
        dir.close().map_err(|source| TempError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "removed temp directory");
        Ok(())
    }
}

#[cfg(test)]
#[path = "temp_tests.rs"]
mod tests;
