// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use nsk_time::TimeError;
use thiserror::Error;

/// Errors raised while choosing ticks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickError {
    #[error("invalid tick range: upper bound {hi} is below lower bound {lo}")]
    InvalidRange { lo: String, hi: String },
    #[error("need at least 2 ticks, got {n}")]
    TooFewTicks { n: usize },
    #[error("non-finite tick bound: {value}")]
    NonFinite { value: f64 },
    #[error("invalid tick intervals: {reason}")]
    InvalidIntervals { reason: String },
    #[error(transparent)]
    Time(#[from] TimeError),
}
