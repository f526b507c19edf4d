// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for time parsing and binning

use thiserror::Error;

/// Errors raised while building, parsing or binning times
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("unrecognized time: {input:?}")]
    InvalidTime { input: String },
    #[error("time out of range: {input:?}")]
    OutOfRange { input: String },
    #[error("invalid epoch value: {value}")]
    InvalidEpoch { value: String },
    #[error("invalid duration: {input:?}")]
    InvalidDuration { input: String },
    #[error("invalid bin size: {input:?}")]
    InvalidBinSize { input: String },
    #[error("invalid precision: {input:?}")]
    InvalidPrecision { input: String },
    #[error("{format} format does not support {precision} precision")]
    UnsupportedPrecision {
        format: &'static str,
        precision: &'static str,
    },
    #[error("time is not aligned to a bin boundary: {value}")]
    Misaligned { value: String },
    #[error("no date found in file name: {path}")]
    FilenameDate { path: String },
}
