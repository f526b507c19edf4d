// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time-bin snapping
//!
//! A bin is the half-open interval `[z + k·s, z + (k+1)·s)`. Snapping returns
//! the start of the bin containing a time, so snapping is idempotent.

use crate::{Duration, Instant, TimeError};
use std::fmt;
use std::str::FromStr;

/// Width of a time bin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinSize {
    /// A fixed, positive duration
    Fixed(Duration),
    /// Calendar months, UTC
    Month,
    /// Calendar years, UTC
    Year,
}

impl BinSize {
    /// `"month"`, `"year"`, or an ISO-8601 duration
    pub fn parse(input: &str) -> Result<Self, TimeError> {
        match input.trim() {
            "month" => Ok(BinSize::Month),
            "year" => Ok(BinSize::Year),
            other => {
                let d = Duration::parse_iso(other).map_err(|_| TimeError::InvalidBinSize {
                    input: input.to_string(),
                })?;
                BinSize::fixed(d)
            }
        }
    }

    /// A fixed bin; zero and negative widths are rejected
    pub fn fixed(size: Duration) -> Result<Self, TimeError> {
        if size.as_micros() <= 0 {
            return Err(TimeError::InvalidBinSize {
                input: size.to_string(),
            });
        }
        Ok(BinSize::Fixed(size))
    }
}

impl FromStr for BinSize {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BinSize::parse(s)
    }
}

impl fmt::Display for BinSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinSize::Fixed(d) => write!(f, "{d}"),
            BinSize::Month => f.write_str("month"),
            BinSize::Year => f.write_str("year"),
        }
    }
}

/// Snap `t` to its bin, with fixed bins counted from the Unix epoch
pub fn bin_instant(size: BinSize, t: Instant) -> Result<Instant, TimeError> {
    bin_instant_from(size, t, Instant::epoch())
}

/// Snap `t` to its bin, with fixed bins counted from `zero`
///
/// Calendar sizes ignore `zero`.
pub fn bin_instant_from(size: BinSize, t: Instant, zero: Instant) -> Result<Instant, TimeError> {
    match size {
        BinSize::Month => Ok(t.start_of_month()),
        BinSize::Year => Ok(t.start_of_year()),
        BinSize::Fixed(width) => {
            let step = width.as_micros();
            if step <= 0 {
                return Err(TimeError::InvalidBinSize {
                    input: width.to_string(),
                });
            }
            let offset = (t - zero).as_micros();
            let q = offset.div_euclid(step);
            zero.checked_add(Duration::micros(q * step))
                .map(|start| start.with_display_offset(t.offset()))
                .ok_or_else(|| TimeError::OutOfRange {
                    input: t.to_string(),
                })
        }
    }
}

#[cfg(test)]
#[path = "bin_tests.rs"]
mod tests;
