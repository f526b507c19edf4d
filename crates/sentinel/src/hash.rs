// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MD5 content signatures
//!
//! External tools are preferred when present; the `md-5` crate is the
//! fallback. The choice is probed once per process.

use crate::AuditError;
use md5::{Digest, Md5};
use std::fs::File;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

/// How MD5 signatures are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFacility {
    /// `openssl md5`
    Openssl,
    /// `md5sum`
    Md5sum,
    /// In-process
    Builtin,
}

static FACILITY: OnceLock<HashFacility> = OnceLock::new();

/// First 32-hex-digit token in tool output
fn signature_in(output: &str) -> Option<String> {
    output
        .split(|c: char| c.is_whitespace() || c == '=')
        .find(|word| word.len() == 32 && word.bytes().all(|b| b.is_ascii_hexdigit()))
        .map(str::to_ascii_lowercase)
}

impl HashFacility {
    /// Facility chosen for this process
    pub fn global() -> Self {
        *FACILITY.get_or_init(|| {
            let chosen = Self::probe();
            tracing::debug!(facility = ?chosen, "selected md5 facility");
            chosen
        })
    }

    /// First facility that signs empty input correctly
    pub fn probe() -> Self {
        const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";
        [Self::Openssl, Self::Md5sum]
            .into_iter()
            .find(|facility| {
                facility
                    .external(Stdio::null())
                    .is_ok_and(|sig| sig == EMPTY_MD5)
            })
            .unwrap_or(Self::Builtin)
    }

    fn program(&self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            Self::Openssl => Some(("openssl", &["md5"])),
            Self::Md5sum => Some(("md5sum", &[])),
            Self::Builtin => None,
        }
    }

    fn external(&self, input: Stdio) -> io::Result<String> {
        let Some((program, args)) = self.program() else {
            return Err(io::Error::other("no external program"));
        };
        let output = Command::new(program)
            .args(args)
            .stdin(input)
            .stderr(Stdio::null())
            .output()?;
        if !output.status.success() {
            return Err(io::Error::other(format!("{program} exited with {}", output.status)));
        }
        signature_in(&String::from_utf8_lossy(&output.stdout))
            .ok_or_else(|| io::Error::other(format!("{program} printed no signature")))
    }

    /// Lowercase hex MD5 of the file at `path`
    pub fn digest(&self, path: &Path) -> Result<String, AuditError> {
        let fail = |e: io::Error| AuditError::Hash {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        let mut file = File::open(path).map_err(fail)?;
        match self {
            Self::Builtin => {
                let mut hasher = Md5::new();
                io::copy(&mut file, &mut hasher).map_err(fail)?;
                Ok(format!("{:x}", hasher.finalize()))
            }
            _ => self.external(Stdio::from(file)).map_err(fail),
        }
    }
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
