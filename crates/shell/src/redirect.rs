// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline redirections

use std::fs::File;
use std::path::{Path, PathBuf};

/// How a redirected path is opened
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileMode {
    /// Input; the file must exist
    Read,
    /// Output; created or truncated
    Write,
    /// Output; created or appended to
    Append,
}

/// Where a pipeline stream comes from or goes to
#[derive(Debug, Default)]
pub enum Redirect {
    /// The runner's own stream
    #[default]
    Inherit,
    /// `/dev/null`
    Null,
    /// A file opened when the run starts
    Path { path: PathBuf, mode: FileMode },
    /// An already open file
    File(File),
    /// A named pipe shared with another pipeline in the same run
    Fifo(PathBuf),
    /// Standard error only: wherever the pipeline's stdout goes
    ToStdout,
}

impl Redirect {
    pub fn read(path: impl Into<PathBuf>) -> Self {
        Redirect::Path {
            path: path.into(),
            mode: FileMode::Read,
        }
    }

    pub fn write(path: impl Into<PathBuf>) -> Self {
        Redirect::Path {
            path: path.into(),
            mode: FileMode::Write,
        }
    }

    pub fn append(path: impl Into<PathBuf>) -> Self {
        Redirect::Path {
            path: path.into(),
            mode: FileMode::Append,
        }
    }

    pub fn fifo(path: impl Into<PathBuf>) -> Self {
        Redirect::Fifo(path.into())
    }

    pub(crate) fn fifo_path(&self) -> Option<&Path> {
        match self {
            Redirect::Fifo(path) => Some(path),
            _ => None,
        }
    }

    pub(crate) fn is_inherit(&self) -> bool {
        matches!(self, Redirect::Inherit)
    }

    /// Why this redirect cannot be used for standard input, if it cannot
    pub(crate) fn input_problem(&self) -> Option<String> {
        match self {
            Redirect::Path { mode, path } if *mode != FileMode::Read => {
                Some(format!("{} is opened for output", path.display()))
            }
            Redirect::ToStdout => Some("stdin cannot follow stdout".to_string()),
            _ => None,
        }
    }

    /// Why this redirect cannot be used for an output stream, if it cannot
    pub(crate) fn output_problem(&self, stream: &str) -> Option<String> {
        match self {
            Redirect::Path { mode, path } if *mode == FileMode::Read => {
                Some(format!("{} is opened for input", path.display()))
            }
            Redirect::ToStdout if stream == "stdout" => {
                Some("stdout cannot follow itself".to_string())
            }
            _ => None,
        }
    }
}
