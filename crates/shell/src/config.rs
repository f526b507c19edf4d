// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::ShellError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runner tunables
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Time between SIGTERM and SIGKILL when tearing down a failed run
    #[serde(with = "humantime_serde")]
    pub kill_grace: Duration,
    /// How often children are polled for exit
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            kill_grace: Duration::from_secs(1),
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl RunConfig {
    pub fn with_kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ShellError> {
        Ok(toml::from_str(text)?)
    }
}
