// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::PipelineError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from building or running pipelines
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("pipeline {index} has no commands")]
    EmptyPipeline { index: usize },
    #[error("invalid {stream} redirect: {reason}")]
    InvalidRedirect {
        stream: &'static str,
        reason: String,
    },
    #[error("cannot open {path} for {stream}: {source}")]
    Open {
        stream: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("missing template variable: {name}")]
    MissingVar { name: String },
    #[error("cannot parse command line {input:?}: {reason}")]
    Parse { input: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid run config: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Failed(#[from] PipelineError),
}
