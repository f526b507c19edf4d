// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar-aware ticks
//!
//! Levels are tried coarsest first. Each level numbers its natural units
//! with an integer index (years, months since year 0, weeks since
//! 1970-01-04, and so on) so that a step of `k` units always lands on a
//! calendar boundary. When no level spans enough units, ticks fall back to
//! plain numbers of seconds past the minute containing the lower bound.

use crate::numeric::{nice_ticks, round_step};
use crate::{TickError, TickOptions};
use nsk_time::{bin_instant, BinSize, Duration, Instant, TimeError, WEEK_EPOCH_SECS};
use std::fmt;

const INTEGER_INTERVALS: &[f64] = &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0];
const DOZENAL_INTERVALS: &[f64] = &[1.0, 2.0, 3.0, 4.0, 6.0, 12.0];
const SEXAGESIMAL_INTERVALS: &[f64] = &[
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 10.0, 12.0, 15.0, 20.0, 30.0,
];

/// Granularity chosen for a set of time ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeLevel {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    /// Arbitrary numbers of seconds past a whole minute
    Subsecond,
}

impl TimeLevel {
    pub fn name(&self) -> &'static str {
        match self {
            TimeLevel::Year => "year",
            TimeLevel::Month => "month",
            TimeLevel::Week => "week",
            TimeLevel::Day => "day",
            TimeLevel::Hour => "hour",
            TimeLevel::Minute => "minute",
            TimeLevel::Second => "second",
            TimeLevel::Subsecond => "subsecond",
        }
    }
}

impl fmt::Display for TimeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy)]
enum Scale {
    Years,
    Months,
    Fixed { unit: Duration, zero_secs: i64 },
}

impl Scale {
    fn floor_index(&self, t: Instant) -> i64 {
        match *self {
            Scale::Years => t.year().into(),
            Scale::Months => i64::from(t.year()) * 12 + i64::from(t.month()) - 1,
            Scale::Fixed { unit, zero_secs } => {
                let offset = t.epoch_micros() - zero_secs * 1_000_000;
                offset.div_euclid(unit.as_micros())
            }
        }
    }

    fn at(&self, k: i64) -> Result<Instant, TimeError> {
        let out_of_range = || TimeError::OutOfRange {
            input: k.to_string(),
        };
        match *self {
            Scale::Years => {
                let year = i32::try_from(k).map_err(|_| out_of_range())?;
                Instant::from_ymd(year, 1, 1)
            }
            Scale::Months => {
                let year = i32::try_from(k.div_euclid(12)).map_err(|_| out_of_range())?;
                Instant::from_ymd(year, k.rem_euclid(12) as u32 + 1, 1)
            }
            Scale::Fixed { unit, zero_secs } => {
                let zero = Instant::from_epoch_secs(zero_secs)?;
                unit.checked_mul(k)
                    .and_then(|d| zero.checked_add(d))
                    .ok_or_else(out_of_range)
            }
        }
    }

    fn ceil_index(&self, t: Instant) -> Result<i64, TimeError> {
        let k = self.floor_index(t);
        Ok(if self.at(k)? == t { k } else { k + 1 })
    }

    /// Fractional index of `t`
    fn position(&self, t: Instant) -> Result<f64, TimeError> {
        let k = self.floor_index(t);
        let start = self.at(k)?;
        let width = (self.at(k + 1)? - start).as_micros() as f64;
        Ok(k as f64 + (t - start).as_micros() as f64 / width)
    }
}

struct Level {
    level: TimeLevel,
    intervals: &'static [f64],
    base: f64,
    scale: Scale,
}

const fn fixed(unit: Duration, zero_secs: i64) -> Scale {
    Scale::Fixed { unit, zero_secs }
}

static LEVELS: [Level; 7] = [
    Level {
        level: TimeLevel::Year,
        intervals: INTEGER_INTERVALS,
        base: 10.0,
        scale: Scale::Years,
    },
    Level {
        level: TimeLevel::Month,
        intervals: DOZENAL_INTERVALS,
        base: 12.0,
        scale: Scale::Months,
    },
    Level {
        level: TimeLevel::Week,
        intervals: INTEGER_INTERVALS,
        base: 10.0,
        scale: fixed(Duration::weeks(1), WEEK_EPOCH_SECS),
    },
    Level {
        level: TimeLevel::Day,
        intervals: INTEGER_INTERVALS,
        base: 10.0,
        scale: fixed(Duration::days(1), 0),
    },
    Level {
        level: TimeLevel::Hour,
        intervals: DOZENAL_INTERVALS,
        base: 24.0,
        scale: fixed(Duration::hours(1), 0),
    },
    Level {
        level: TimeLevel::Minute,
        intervals: SEXAGESIMAL_INTERVALS,
        base: 60.0,
        scale: fixed(Duration::minutes(1), 0),
    },
    Level {
        level: TimeLevel::Second,
        intervals: SEXAGESIMAL_INTERVALS,
        base: 60.0,
        scale: fixed(Duration::seconds(1), 0),
    },
];

/// Ticks over a time range
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTicks {
    level: TimeLevel,
    step: f64,
    ticks: Vec<Instant>,
}

impl TimeTicks {
    pub fn level(&self) -> TimeLevel {
        self.level
    }

    /// Step in units of the level; seconds for [`TimeLevel::Subsecond`]
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn lower(&self) -> Option<Instant> {
        self.ticks.first().copied()
    }

    pub fn upper(&self) -> Option<Instant> {
        self.ticks.last().copied()
    }

    pub fn ticks(&self) -> &[Instant] {
        &self.ticks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instant> {
        self.ticks.iter()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

impl IntoIterator for TimeTicks {
    type Item = Instant;
    type IntoIter = std::vec::IntoIter<Instant>;

    fn into_iter(self) -> Self::IntoIter {
        self.ticks.into_iter()
    }
}

impl<'a> IntoIterator for &'a TimeTicks {
    type Item = &'a Instant;
    type IntoIter = std::slice::Iter<'a, Instant>;

    fn into_iter(self) -> Self::IntoIter {
        self.ticks.iter()
    }
}

/// Nice ticks spanning `[lo, hi]` on calendar boundaries
///
/// Only `n` and `inside` apply to the calendar levels; the sub-second
/// fallback passes the full options to [`nice_ticks`].
pub fn nice_time_ticks(
    lo: Instant,
    hi: Instant,
    opts: &TickOptions,
) -> Result<TimeTicks, TickError> {
    if hi < lo {
        return Err(TickError::InvalidRange {
            lo: lo.to_string(),
            hi: hi.to_string(),
        });
    }
    opts.validate()?;
    let gaps = (opts.n - 1) as f64;

    for level in &LEVELS {
        let span = level.scale.position(hi)? - level.scale.position(lo)?;
        if span < gaps {
            continue;
        }
        let nearest = round_step(span / gaps, level.intervals, level.base).value();
        let step = (nearest.round() as i64).max(1);
        let ticks = calendar_ticks(level.scale, step, lo, hi, opts.inside)?;
        tracing::debug!(level = %level.level, step, ticks = ticks.len(), "time ticks");
        return Ok(TimeTicks {
            level: level.level,
            step: step as f64,
            ticks,
        });
    }

    subsecond_ticks(lo, hi, opts)
}

fn calendar_ticks(
    scale: Scale,
    step: i64,
    lo: Instant,
    hi: Instant,
    inside: bool,
) -> Result<Vec<Instant>, TimeError> {
    let covering = (
        scale.floor_index(lo).div_euclid(step) * step,
        ceil_multiple(scale.ceil_index(hi)?, step),
    );
    let (first, last) = if inside {
        let first = ceil_multiple(scale.ceil_index(lo)?, step);
        let last = scale.floor_index(hi).div_euclid(step) * step;
        if last < first {
            covering
        } else {
            (first, last)
        }
    } else {
        covering
    };

    let mut ticks = Vec::new();
    let mut k = first;
    while k <= last {
        ticks.push(scale.at(k)?);
        k += step;
    }
    Ok(ticks)
}

fn ceil_multiple(k: i64, step: i64) -> i64 {
    let q = k.div_euclid(step);
    if q * step == k {
        k
    } else {
        (q + 1) * step
    }
}

fn subsecond_ticks(lo: Instant, hi: Instant, opts: &TickOptions) -> Result<TimeTicks, TickError> {
    let base = bin_instant(BinSize::Fixed(Duration::minutes(1)), lo)?;
    let numeric = nice_ticks(
        (lo - base).as_secs_f64(),
        (hi - base).as_secs_f64(),
        opts,
    )?;
    let ticks = numeric
        .iter()
        .map(|secs| {
            let offset = Duration::micros((secs * 1_000_000.0).round() as i64);
            base.checked_add(offset).ok_or_else(|| TimeError::OutOfRange {
                input: secs.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(
        level = "subsecond",
        step = numeric.step(),
        ticks = ticks.len(),
        "time ticks"
    );
    Ok(TimeTicks {
        level: TimeLevel::Subsecond,
        step: numeric.step(),
        ticks,
    })
}

#[cfg(test)]
#[path = "calendar_tests.rs"]
mod tests;
