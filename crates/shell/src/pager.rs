// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pager selection for rendered manual pages

/// Environment variables consulted, highest priority first
pub const PAGER_VARS: [&str; 3] = ["PERLPOD_PAGER", "MANPAGER", "PAGER"];

pub const DEFAULT_PAGER: &str = "less -isr";

/// The pager command line from the environment
///
/// Unset and blank variables are skipped.
pub fn pager_command() -> String {
    PAGER_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PAGER.to_string())
}

#[cfg(test)]
#[path = "pager_tests.rs"]
mod tests;
