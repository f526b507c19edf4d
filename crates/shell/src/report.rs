// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-command outcomes of a run

use std::fmt;
use thiserror::Error;

/// How a command ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandStatus {
    Exited(i32),
    Signaled(i32),
    /// Never started because the run failed first
    NotRun,
    /// The program could not be started
    SpawnFailed(String),
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Exited(code) => write!(f, "exit {code}"),
            CommandStatus::Signaled(signal) => write!(f, "signal {signal}"),
            CommandStatus::NotRun => f.write_str("not run"),
            CommandStatus::SpawnFailed(reason) => write!(f, "spawn failed: {reason}"),
        }
    }
}

/// Outcome of one command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandReport {
    /// The command line, shell-quoted
    pub command: String,
    pub status: CommandStatus,
    /// The status satisfies the command's exit policy
    pub accepted: bool,
    /// The runner signalled this command while tearing the run down
    pub terminated: bool,
}

impl CommandReport {
    /// Broke its policy on its own, not because the runner stopped it
    pub fn is_cause(&self) -> bool {
        !self.accepted && !self.terminated && self.status != CommandStatus::NotRun
    }
}

/// Outcome of one pipeline, commands in pipeline order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineReport {
    pub commands: Vec<CommandReport>,
    /// Pipelines, nearest first, whose failure reached this one through
    /// the FIFO on its standard input
    pub caused_by: Vec<usize>,
}

impl PipelineReport {
    pub fn succeeded(&self) -> bool {
        self.caused_by.is_empty() && self.commands.iter().all(|c| c.accepted)
    }

    pub fn statuses(&self) -> Vec<CommandStatus> {
        self.commands.iter().map(|c| c.status.clone()).collect()
    }
}

/// Outcome of a successful run, pipelines in run order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub pipelines: Vec<PipelineReport>,
}

/// A run in which some command broke its exit policy
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub struct PipelineError {
    pub pipelines: Vec<PipelineReport>,
}

impl PipelineError {
    /// `(pipeline, command)` indices of the commands that failed on their own
    pub fn failed_commands(&self) -> Vec<(usize, usize)> {
        self.pipelines
            .iter()
            .enumerate()
            .flat_map(|(p, pipeline)| {
                pipeline
                    .commands
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.is_cause())
                    .map(move |(c, _)| (p, c))
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<Vec<CommandStatus>> {
        self.pipelines.iter().map(PipelineReport::statuses).collect()
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .pipelines
            .iter()
            .flat_map(|p| p.commands.iter())
            .map(|c| c.command.len())
            .max()
            .unwrap_or(0)
            .min(48);

        writeln!(f, "pipeline run failed")?;
        for (index, pipeline) in self.pipelines.iter().enumerate() {
            for (position, command) in pipeline.commands.iter().enumerate() {
                let label = if position == 0 {
                    format!("[{index}]")
                } else {
                    "  |".to_string()
                };
                let note = if command.is_cause() {
                    "  <- failed"
                } else if command.terminated {
                    "  (terminated)"
                } else {
                    ""
                };
                writeln!(
                    f,
                    "  {label:<5} {:<width$}  {}{note}",
                    command.command, command.status
                )?;
            }
            if !pipeline.caused_by.is_empty() {
                let chain: Vec<String> =
                    pipeline.caused_by.iter().map(|i| format!("[{i}]")).collect();
                writeln!(f, "        collateral: input fed by {}", chain.join(" <- "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
