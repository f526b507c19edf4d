// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::SentinelError;
use serde::{Deserialize, Serialize};

/// Where a sentinel keeps memoized audits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheScope {
    #[default]
    None,
    /// Owned by the sentinel
    Local,
    /// One cache for the whole process
    Shared,
}

/// Audit policy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    /// Hash content even when size and ctime agree
    pub deep_check: bool,
    /// Stop at the first changed resource
    pub abort_on_changed: bool,
    pub cache: CacheScope,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            deep_check: false,
            abort_on_changed: true,
            cache: CacheScope::None,
        }
    }
}

impl SentinelConfig {
    pub fn with_deep_check(mut self, deep: bool) -> Self {
        self.deep_check = deep;
        self
    }

    pub fn with_abort_on_changed(mut self, abort: bool) -> Self {
        self.abort_on_changed = abort;
        self
    }

    pub fn with_cache(mut self, cache: CacheScope) -> Self {
        self.cache = cache;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SentinelError> {
        Ok(toml::from_str(text)?)
    }
}
