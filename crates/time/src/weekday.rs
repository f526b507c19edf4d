// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Week bins anchored on a chosen weekday
//!
//! [`WeekdayBins`] binds a seven-day bin size to a reference day of the
//! week. [`Align`] pairs a sequence of known bins with a sequence of
//! measured dates: each known bin is paired with the latest measured date
//! at or before it, so sparse measurements are carried forward and dense
//! ones collapse to their latest value.

use crate::{bin_instant_from, BinSize, Duration, Instant, TimeError};
use chrono::Weekday;
use std::iter::Peekable;

/// 1970-01-04T00:00:00Z, the first Sunday after the Unix epoch
pub const WEEK_EPOCH_SECS: i64 = 3 * 86_400;

/// Seven-day bins starting on a fixed weekday
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeekdayBins {
    zero: Instant,
}

impl WeekdayBins {
    pub fn new(weekday: Weekday) -> Self {
        let shift = (weekday.num_days_from_sunday() as i64) * 86_400;
        // within the first week after WEEK_EPOCH_SECS, always representable
        let zero =
            Instant::from_epoch_secs(WEEK_EPOCH_SECS + shift).unwrap_or_else(|_| Instant::epoch());
        Self { zero }
    }

    /// Week bins starting on Sundays
    pub fn sundays() -> Self {
        Self::new(Weekday::Sun)
    }

    pub fn zero(&self) -> Instant {
        self.zero
    }

    pub fn size(&self) -> Duration {
        Duration::weeks(1)
    }

    /// Start of the week containing `t`
    pub fn bin(&self, t: Instant) -> Result<Instant, TimeError> {
        bin_instant_from(BinSize::Fixed(self.size()), t, self.zero)
    }

    /// Start of the week after the one containing `t`
    pub fn next_bin(&self, t: Instant) -> Result<Instant, TimeError> {
        let start = self.bin(t)?;
        start.checked_add(self.size()).ok_or_else(|| TimeError::OutOfRange {
            input: t.to_string(),
        })
    }

    /// Both the containing bin and the following one
    pub fn bins(&self, t: Instant) -> Result<(Instant, Instant), TimeError> {
        Ok((self.bin(t)?, self.next_bin(t)?))
    }

    /// Pair each known bin with the latest measured date in or before it
    ///
    /// Known bins must be bin starts; a misaligned one yields
    /// [`TimeError::Misaligned`] and ends the iteration. Both inputs are
    /// expected in increasing order.
    pub fn align<K, M>(&self, known: K, measured: M) -> Align<K::IntoIter, M::IntoIter>
    where
        K: IntoIterator<Item = Instant>,
        M: IntoIterator<Item = Instant>,
    {
        Align {
            bins: *self,
            known: known.into_iter(),
            measured: measured.into_iter().peekable(),
            current: None,
            done: false,
        }
    }
}

/// Iterator returned by [`WeekdayBins::align`]
pub struct Align<K, M: Iterator> {
    bins: WeekdayBins,
    known: K,
    measured: Peekable<M>,
    current: Option<Instant>,
    done: bool,
}

impl<K, M> Align<K, M>
where
    K: Iterator<Item = Instant>,
    M: Iterator<Item = Instant>,
{
    fn step(&mut self) -> Option<Result<(Instant, Instant), TimeError>> {
        loop {
            let known = self.known.next()?;
            match self.bins.bin(known) {
                Ok(start) if start == known => {}
                Ok(_) => {
                    return Some(Err(TimeError::Misaligned {
                        value: known.to_string(),
                    }))
                }
                Err(e) => return Some(Err(e)),
            }

            // Consume every measurement that falls in this bin or earlier
            while let Some(next) = self.measured.peek().copied() {
                match self.bins.bin(next) {
                    Ok(start) if start <= known => {
                        self.current = Some(next);
                        self.measured.next();
                    }
                    Ok(_) => break,
                    Err(e) => return Some(Err(e)),
                }
            }

            if let Some(measured) = self.current {
                return Some(Ok((known, measured)));
            }
            // no measurement yet: skip this bin
        }
    }
}

impl<K, M> Iterator for Align<K, M>
where
    K: Iterator<Item = Instant>,
    M: Iterator<Item = Instant>,
{
    type Item = Result<(Instant, Instant), TimeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.step();
        if matches!(item, None | Some(Err(_))) {
            self.done = true;
        }
        item
    }
}

#[cfg(test)]
#[path = "weekday_tests.rs"]
mod tests;
