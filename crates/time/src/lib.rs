// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nsk-time: timestamps, durations and time bins
//!
//! This crate provides:
//! - [`Instant`], a UTC moment with microsecond resolution and a display offset
//! - [`Duration`], a signed microsecond difference with ISO-8601 parsing
//! - A permissive multi-format timestamp parser ([`parse_instant`])
//! - SiLK / ISO / basic ISO formatting at a chosen [`Precision`]
//! - Bin snapping for fixed sizes and calendar months/years ([`bin_instant`])
//! - A weekday-anchored snapper with a forward-filling aligner ([`WeekdayBins`])
//! - Date extraction from repository file names

mod bin;
mod duration;
mod error;
mod filename;
mod format;
mod instant;
mod parse;
mod weekday;

pub use bin::{bin_instant, bin_instant_from, BinSize};
pub use duration::Duration;
pub use error::TimeError;
pub use filename::{date_from_filename, dates_in_filename};
pub use format::Precision;
pub use instant::Instant;
pub use parse::{parse_instant, TimeValue};
pub use weekday::{Align, WeekdayBins, WEEK_EPOCH_SECS};
