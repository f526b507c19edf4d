// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nsk-shell: parallel command pipelines
//!
//! A [`Run`] is a set of [`Pipeline`]s started together. Each pipeline is a
//! chain of [`Command`]s joined by pipes, with its redirections attached to
//! the pipeline as a whole. The [`Runner`] starts every child before waiting
//! on any, and on the first command that breaks its [`ExitPolicy`] it
//! terminates the rest and fails with a [`PipelineError`].

mod command;
mod config;
mod error;
mod executor;
mod pager;
mod pipeline;
mod redirect;
mod report;
mod template;

pub use command::{Command, ExitPolicy};
pub use config::RunConfig;
pub use error::ShellError;
pub use executor::{run, run_collect, run_collect_files, Collected, Runner};
pub use pager::{pager_command, DEFAULT_PAGER, PAGER_VARS};
pub use pipeline::{Pipeline, Run};
pub use redirect::{FileMode, Redirect};
pub use report::{CommandReport, CommandStatus, PipelineError, PipelineReport, RunReport};
pub use template::{shell_quote, split_words, substitute, Word};
