// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::CommandStatus;
use std::collections::BTreeSet;
use std::fmt;

/// Which outcomes of a command count as success
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExitPolicy {
    /// Acceptable exit codes
    pub codes: BTreeSet<i32>,
    /// Signals whose deaths are ignored
    pub signals: BTreeSet<i32>,
}

impl Default for ExitPolicy {
    fn default() -> Self {
        Self {
            codes: BTreeSet::from([0]),
            signals: BTreeSet::new(),
        }
    }
}

impl ExitPolicy {
    pub fn with_codes(mut self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.codes = codes.into_iter().collect();
        self
    }

    pub fn with_signals(mut self, signals: impl IntoIterator<Item = i32>) -> Self {
        self.signals = signals.into_iter().collect();
        self
    }

    pub fn accepts(&self, status: &CommandStatus) -> bool {
        match status {
            CommandStatus::Exited(code) => self.codes.contains(code),
            CommandStatus::Signaled(signal) => self.signals.contains(signal),
            CommandStatus::NotRun | CommandStatus::SpawnFailed(_) => false,
        }
    }
}

/// A program with its arguments and exit policy
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub program: String,
    pub args: Vec<String>,
    pub policy: ExitPolicy,
}

impl Command {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            policy: ExitPolicy::default(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_policy(mut self, policy: ExitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the acceptable exit codes
    pub fn accept_codes(mut self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.policy = self.policy.with_codes(codes);
        self
    }

    /// Replace the ignorable signals
    pub fn ignore_signals(mut self, signals: impl IntoIterator<Item = i32>) -> Self {
        self.policy = self.policy.with_signals(signals);
        self
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::shell_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", crate::shell_quote(arg))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
