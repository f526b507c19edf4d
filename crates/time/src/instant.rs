// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instants on the UTC timeline
//!
//! An [`Instant`] carries a display offset for rendering only. Equality,
//! ordering, hashing and arithmetic all use the UTC value.

use crate::duration::MICROS_PER_SECOND;
use crate::{Duration, TimeError};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

/// A moment on the UTC timeline with microsecond resolution
#[derive(Clone, Copy, Debug)]
pub struct Instant {
    utc: DateTime<Utc>,
    offset: FixedOffset,
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

impl Instant {
    /// Wrap a chrono UTC datetime, truncating to microseconds
    pub fn from_utc(utc: DateTime<Utc>) -> Self {
        let micros = utc.timestamp_subsec_micros();
        let utc = utc.with_nanosecond(micros * 1_000).unwrap_or(utc);
        Self {
            utc,
            offset: utc_offset(),
        }
    }

    /// 1970-01-01T00:00:00Z
    pub fn epoch() -> Self {
        Self::from_utc(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    pub fn from_epoch_micros(micros: i64) -> Result<Self, TimeError> {
        DateTime::from_timestamp_micros(micros)
            .map(Self::from_utc)
            .ok_or_else(|| TimeError::InvalidEpoch {
                value: micros.to_string(),
            })
    }

    pub fn from_epoch_secs(seconds: i64) -> Result<Self, TimeError> {
        DateTime::from_timestamp(seconds, 0)
            .map(Self::from_utc)
            .ok_or_else(|| TimeError::InvalidEpoch {
                value: seconds.to_string(),
            })
    }

    /// Fractional epoch seconds; the fraction is truncated to microseconds
    pub fn from_epoch_f64(seconds: f64) -> Result<Self, TimeError> {
        let invalid = || TimeError::InvalidEpoch {
            value: seconds.to_string(),
        };
        let micros = (seconds * MICROS_PER_SECOND as f64).floor();
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return Err(invalid());
        }
        Self::from_epoch_micros(micros as i64).map_err(|_| invalid())
    }

    /// Midnight UTC on the given calendar date
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, TimeError> {
        Self::from_ymd_hms_micro(year, month, day, 0, 0, 0, 0)
    }

    pub fn from_ymd_hms_micro(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        micro: u32,
    ) -> Result<Self, TimeError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_micro_opt(hour, minute, second, micro))
            .map(|naive| Self::from_utc(naive.and_utc()))
            .ok_or_else(|| TimeError::OutOfRange {
                input: format!(
                    "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}.{micro:06}"
                ),
            })
    }

    /// Same instant, rendered in another offset
    pub fn with_display_offset(self, offset: FixedOffset) -> Self {
        Self { offset, ..self }
    }

    pub fn utc(&self) -> DateTime<Utc> {
        self.utc
    }

    /// The instant as seen from its display offset
    pub fn local(&self) -> DateTime<FixedOffset> {
        self.utc.with_timezone(&self.offset)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn epoch_micros(&self) -> i64 {
        self.utc.timestamp_micros()
    }

    pub fn epoch_secs_f64(&self) -> f64 {
        self.epoch_micros() as f64 / MICROS_PER_SECOND as f64
    }

    pub fn year(&self) -> i32 {
        self.utc.year()
    }

    pub fn month(&self) -> u32 {
        self.utc.month()
    }

    pub fn day(&self) -> u32 {
        self.utc.day()
    }

    pub fn hour(&self) -> u32 {
        self.utc.hour()
    }

    pub fn minute(&self) -> u32 {
        self.utc.minute()
    }

    pub fn second(&self) -> u32 {
        self.utc.second()
    }

    pub fn microsecond(&self) -> u32 {
        self.utc.timestamp_subsec_micros()
    }

    /// First of the month, 00:00:00 UTC
    pub fn start_of_month(&self) -> Self {
        self.calendar_floor(self.month())
    }

    /// First of January, 00:00:00 UTC
    pub fn start_of_year(&self) -> Self {
        self.calendar_floor(1)
    }

    fn calendar_floor(&self, month: u32) -> Self {
        let utc = NaiveDate::from_ymd_opt(self.year(), month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .unwrap_or(self.utc);
        Self {
            utc,
            offset: self.offset,
        }
    }

    /// Shift by a whole number of calendar months, clamped to the 1st
    pub fn add_months(&self, months: i64) -> Result<Self, TimeError> {
        let index = self.year() as i64 * 12 + self.month() as i64 - 1 + months;
        let year = i32::try_from(index.div_euclid(12)).map_err(|_| TimeError::OutOfRange {
            input: format!("{self} + {months} months"),
        })?;
        let month = index.rem_euclid(12) as u32 + 1;
        Self::from_ymd(year, month, 1)
    }

    pub fn checked_add(&self, d: Duration) -> Option<Self> {
        self.utc
            .checked_add_signed(d.into())
            .map(|utc| Self {
                utc,
                offset: self.offset,
            })
    }

    pub fn checked_sub(&self, d: Duration) -> Option<Self> {
        self.checked_add(-d)
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.utc == other.utc
    }
}

impl Eq for Instant {}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc.cmp(&other.utc)
    }
}

impl Hash for Instant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.utc.hash(state);
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(utc: DateTime<Utc>) -> Self {
        Self::from_utc(utc)
    }
}

impl From<DateTime<FixedOffset>> for Instant {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::from_utc(dt.with_timezone(&Utc)).with_display_offset(*dt.offset())
    }
}

// Operators panic past chrono's representable range; checked_add does not.
impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant {
            utc: self.utc + chrono::TimeDelta::from(rhs),
            offset: self.offset,
        }
    }
}

impl Sub<Duration> for Instant {
    type Output = Instant;

    fn sub(self, rhs: Duration) -> Instant {
        Instant {
            utc: self.utc - chrono::TimeDelta::from(rhs),
            offset: self.offset,
        }
    }
}

impl Sub for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Duration {
        Duration::micros(self.epoch_micros() - rhs.epoch_micros())
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = if self.microsecond() == 0 {
            crate::Precision::Second
        } else {
            crate::Precision::Usec
        };
        write!(f, "{}", self.format_iso(precision))
    }
}

#[cfg(test)]
#[path = "instant_tests.rs"]
mod tests;
