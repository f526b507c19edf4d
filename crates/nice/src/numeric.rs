// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Numeric nice ticks
//!
//! A nice step has the form `m · base^e` with `m` drawn from an intervals
//! table. Tick values are computed from their integer index rather than by
//! repeated addition, so `0.1`-sized steps do not drift.

use crate::TickError;

/// Default intervals table for base 10
pub const DEFAULT_INTERVALS: &[f64] = &[1.0, 2.0, 2.5, 3.0, 5.0, 10.0];

// Rounding noise tolerated when snapping a quotient to an integer index,
// in units of the quotient's magnitude
const INDEX_SLACK: f64 = 16.0 * f64::EPSILON;

/// Options for [`nice_ticks`]
#[derive(Debug, Clone, PartialEq)]
pub struct TickOptions {
    /// Target tick count (at least 2)
    pub n: usize,
    /// Shrink the range to ticks inside `[lo, hi]` instead of covering it
    pub inside: bool,
    /// Step multipliers, each positive
    pub intervals: Vec<f64>,
    /// Magnitude base (greater than 1)
    pub base: f64,
}

impl Default for TickOptions {
    fn default() -> Self {
        Self {
            n: 5,
            inside: false,
            intervals: DEFAULT_INTERVALS.to_vec(),
            base: 10.0,
        }
    }
}

impl TickOptions {
    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn with_inside(mut self, inside: bool) -> Self {
        self.inside = inside;
        self
    }

    pub fn with_intervals(mut self, intervals: impl Into<Vec<f64>>) -> Self {
        self.intervals = intervals.into();
        self
    }

    pub fn with_base(mut self, base: f64) -> Self {
        self.base = base;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), TickError> {
        if self.n < 2 {
            return Err(TickError::TooFewTicks { n: self.n });
        }
        validate_table(&self.intervals, self.base)
    }
}

pub(crate) fn validate_table(intervals: &[f64], base: f64) -> Result<(), TickError> {
    if intervals.is_empty() {
        return Err(TickError::InvalidIntervals {
            reason: "empty table".to_string(),
        });
    }
    if let Some(bad) = intervals.iter().find(|m| !m.is_finite() || **m <= 0.0) {
        return Err(TickError::InvalidIntervals {
            reason: format!("interval {bad} is not positive"),
        });
    }
    if !base.is_finite() || base <= 1.0 {
        return Err(TickError::InvalidIntervals {
            reason: format!("base {base} must exceed 1"),
        });
    }
    Ok(())
}

/// A step `mult · base^exp`
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Step {
    mult: f64,
    base: f64,
    exp: i32,
}

impl Step {
    /// Value of the `k`th multiple of this step
    pub(crate) fn at(&self, k: i64) -> f64 {
        let k = k as f64;
        if self.exp >= 0 {
            k * self.mult * self.base.powi(self.exp)
        } else {
            k * self.mult / self.base.powi(-self.exp)
        }
    }

    pub(crate) fn value(&self) -> f64 {
        self.at(1)
    }

    /// `x / step`, snapped to an integer when within rounding noise
    fn quotient(&self, x: f64) -> f64 {
        let q = if self.exp >= 0 {
            x / (self.mult * self.base.powi(self.exp))
        } else {
            x * self.base.powi(-self.exp) / self.mult
        };
        let r = q.round();
        if (q - r).abs() <= INDEX_SLACK * r.abs().max(1.0) {
            r
        } else {
            q
        }
    }

    fn floor_index(&self, x: f64) -> Result<i64, TickError> {
        to_index(self.quotient(x).floor())
    }

    fn ceil_index(&self, x: f64) -> Result<i64, TickError> {
        to_index(self.quotient(x).ceil())
    }
}

fn to_index(q: f64) -> Result<i64, TickError> {
    if q.is_finite() && q.abs() < i64::MAX as f64 / 2.0 {
        Ok(q as i64)
    } else {
        Err(TickError::NonFinite { value: q })
    }
}

fn log_base(x: f64, base: f64) -> f64 {
    x.ln() / base.ln()
}

/// Nearest nice step to a positive `x`
///
/// Candidates are the intervals at magnitude `base^(⌈log_base x⌉ - 1)` plus
/// the smallest interval one magnitude up; ties go to the larger step.
pub(crate) fn round_step(x: f64, intervals: &[f64], base: f64) -> Step {
    let exp = log_base(x, base).ceil() as i32 - 1;
    let first = intervals.iter().copied().fold(f64::INFINITY, f64::min);
    let candidates = intervals
        .iter()
        .map(|&mult| Step { mult, base, exp })
        .chain(std::iter::once(Step {
            mult: first,
            base,
            exp: exp + 1,
        }));

    let mut best: Option<Step> = None;
    for step in candidates {
        best = match best {
            None => Some(step),
            Some(b) => {
                let (db, ds) = ((b.value() - x).abs(), (step.value() - x).abs());
                if ds < db || (ds == db && step.value() > b.value()) {
                    Some(step)
                } else {
                    Some(b)
                }
            }
        };
    }
    best.unwrap_or(Step {
        mult: 1.0,
        base,
        exp,
    })
}

/// Nearest value `m · base^e` to `x`
///
/// `x` must be positive; zero, negative and non-finite inputs are returned
/// unchanged.
pub fn nice_round(x: f64, intervals: &[f64], base: f64) -> f64 {
    if !x.is_finite() || x <= 0.0 || validate_table(intervals, base).is_err() {
        return x;
    }
    round_step(x, intervals, base).value()
}

// Nice values around |x|, across the neighbouring magnitudes
fn neighbours(x: f64, intervals: &[f64], base: f64) -> impl Iterator<Item = f64> + '_ {
    let exp = log_base(x.abs(), base).floor() as i32;
    (exp - 1..=exp + 1).flat_map(move |exp| {
        intervals
            .iter()
            .map(move |&mult| Step { mult, base, exp }.value())
    })
}

/// Largest nice value at or below `x`
pub fn nice_floor(x: f64, intervals: &[f64], base: f64) -> f64 {
    if !x.is_finite() || x == 0.0 || validate_table(intervals, base).is_err() {
        return x;
    }
    if x < 0.0 {
        return -nice_ceil(-x, intervals, base);
    }
    neighbours(x, intervals, base)
        .filter(|v| *v <= x)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(x)
}

/// Smallest nice value at or above `x`
pub fn nice_ceil(x: f64, intervals: &[f64], base: f64) -> f64 {
    if !x.is_finite() || x == 0.0 || validate_table(intervals, base).is_err() {
        return x;
    }
    if x < 0.0 {
        return -nice_floor(-x, intervals, base);
    }
    neighbours(x, intervals, base)
        .filter(|v| *v >= x)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
        .unwrap_or(x)
}

/// A chosen tick sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticks {
    step: Step,
    first: i64,
    last: i64,
}

impl Ticks {
    /// Lower end of the adjusted range (the first tick)
    pub fn lower(&self) -> f64 {
        self.step.at(self.first)
    }

    /// Upper end of the adjusted range (the last tick)
    pub fn upper(&self) -> f64 {
        self.step.at(self.last)
    }

    pub fn step(&self) -> f64 {
        self.step.value()
    }

    pub fn len(&self) -> usize {
        (self.last - self.first + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> TickIter {
        TickIter {
            step: self.step,
            next: self.first,
            last: self.last,
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

impl IntoIterator for Ticks {
    type Item = f64;
    type IntoIter = TickIter;

    fn into_iter(self) -> TickIter {
        self.iter()
    }
}

/// Strictly increasing tick values
#[derive(Debug, Clone)]
pub struct TickIter {
    step: Step,
    next: i64,
    last: i64,
}

impl Iterator for TickIter {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next > self.last {
            return None;
        }
        let value = self.step.at(self.next);
        self.next += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.last - self.next + 1).max(0) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for TickIter {}

/// Nice ticks spanning `[lo, hi]`
///
/// Equal bounds are widened to the surrounding nice values, or by half a
/// unit each way when `lo` is already nice. In inside mode a range too
/// narrow to hold a tick falls back to covering mode.
pub fn nice_ticks(lo: f64, hi: f64, opts: &TickOptions) -> Result<Ticks, TickError> {
    for value in [lo, hi] {
        if !value.is_finite() {
            return Err(TickError::NonFinite { value });
        }
    }
    if hi < lo {
        return Err(TickError::InvalidRange {
            lo: lo.to_string(),
            hi: hi.to_string(),
        });
    }
    opts.validate()?;

    let (lo, hi) = if hi == lo {
        let (l, h) = (
            nice_floor(lo, &opts.intervals, opts.base),
            nice_ceil(hi, &opts.intervals, opts.base),
        );
        if l == h {
            (lo - 0.5, hi + 0.5)
        } else {
            (l, h)
        }
    } else {
        (lo, hi)
    };

    let step = round_step(
        (hi - lo) / (opts.n - 1) as f64,
        &opts.intervals,
        opts.base,
    );
    let covering = (step.floor_index(lo)?, step.ceil_index(hi)?);
    let (first, last) = if opts.inside {
        let (first, last) = (step.ceil_index(lo)?, step.floor_index(hi)?);
        if last < first {
            covering
        } else {
            (first, last)
        }
    } else {
        covering
    };

    tracing::trace!(lo, hi, step = step.value(), first, last, "nice ticks");
    Ok(Ticks { step, first, last })
}

#[cfg(test)]
#[path = "numeric_tests.rs"]
mod tests;
