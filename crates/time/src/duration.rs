// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signed durations with microsecond resolution
//!
//! ISO-8601 duration strings are accepted with the calendar simplification
//! used throughout the toolbox: a year is 365 days and a month is 30 days.

use crate::TimeError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;
use std::sync::LazyLock;

pub(crate) const MICROS_PER_SECOND: i64 = 1_000_000;
pub(crate) const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
pub(crate) const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
pub(crate) const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;
pub(crate) const MICROS_PER_WEEK: i64 = 7 * MICROS_PER_DAY;

// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([+-])?P(?:(\d+(?:\.\d+)?)Y)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)W)?(?:(\d+(?:\.\d+)?)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("constant regex pattern is valid")
});

/// Microsecond multipliers for each capture group of [`ISO_DURATION`]
const ISO_UNITS: [i64; 7] = [
    365 * MICROS_PER_DAY,
    30 * MICROS_PER_DAY,
    MICROS_PER_WEEK,
    MICROS_PER_DAY,
    MICROS_PER_HOUR,
    MICROS_PER_MINUTE,
    MICROS_PER_SECOND,
];

/// A signed difference between two instants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Duration {
    micros: i64,
}

impl Duration {
    pub const ZERO: Duration = Duration { micros: 0 };

    pub const fn micros(micros: i64) -> Self {
        Self { micros }
    }

    pub const fn millis(millis: i64) -> Self {
        Self::micros(millis * 1_000)
    }

    pub const fn seconds(seconds: i64) -> Self {
        Self::micros(seconds * MICROS_PER_SECOND)
    }

    pub const fn minutes(minutes: i64) -> Self {
        Self::micros(minutes * MICROS_PER_MINUTE)
    }

    pub const fn hours(hours: i64) -> Self {
        Self::micros(hours * MICROS_PER_HOUR)
    }

    pub const fn days(days: i64) -> Self {
        Self::micros(days * MICROS_PER_DAY)
    }

    pub const fn weeks(weeks: i64) -> Self {
        Self::micros(weeks * MICROS_PER_WEEK)
    }

    /// Fractional seconds, truncated toward zero at microsecond resolution
    pub fn from_secs_f64(seconds: f64) -> Result<Self, TimeError> {
        let micros = (seconds * MICROS_PER_SECOND as f64).trunc();
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return Err(TimeError::InvalidDuration {
                input: seconds.to_string(),
            });
        }
        Ok(Self::micros(micros as i64))
    }

    /// Parse an ISO-8601 duration such as `P1DT2H` or `-PT0.5S`
    pub fn parse_iso(input: &str) -> Result<Self, TimeError> {
        let invalid = || TimeError::InvalidDuration {
            input: input.to_string(),
        };
        let text = input.trim();
        let caps = ISO_DURATION.captures(text).ok_or_else(invalid)?;

        let mut total: i64 = 0;
        let mut seen = false;
        for (index, unit) in ISO_UNITS.iter().enumerate() {
            if let Some(m) = caps.get(index + 2) {
                seen = true;
                let part = decimal_micros(m.as_str(), *unit).ok_or_else(invalid)?;
                total = total.checked_add(part).ok_or_else(invalid)?;
            }
        }
        // "P" and "PT" carry no fields
        if !seen || text.ends_with('T') {
            return Err(invalid());
        }
        if caps.get(1).map(|m| m.as_str()) == Some("-") {
            total = -total;
        }
        Ok(Self::micros(total))
    }

    pub const fn as_micros(&self) -> i64 {
        self.micros
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.micros as f64 / MICROS_PER_SECOND as f64
    }

    pub const fn is_zero(&self) -> bool {
        self.micros == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.micros < 0
    }

    pub const fn abs(&self) -> Self {
        Self::micros(self.micros.abs())
    }

    pub fn checked_mul(&self, factor: i64) -> Option<Self> {
        self.micros.checked_mul(factor).map(Self::micros)
    }

    /// Canonical ISO-8601 rendering using days, hours, minutes and seconds
    pub fn to_iso_string(&self) -> String {
        if self.micros == 0 {
            return "PT0S".to_string();
        }
        let sign = if self.micros < 0 { "-" } else { "" };
        let mut rest = self.micros.unsigned_abs();
        let day = MICROS_PER_DAY as u64;
        let hour = MICROS_PER_HOUR as u64;
        let minute = MICROS_PER_MINUTE as u64;
        let second = MICROS_PER_SECOND as u64;

        let days = rest / day;
        rest %= day;
        let hours = rest / hour;
        rest %= hour;
        let minutes = rest / minute;
        rest %= minute;
        let seconds = rest / second;
        let micros = rest % second;

        let mut out = format!("{sign}P");
        if days > 0 {
            out.push_str(&format!("{days}D"));
        }
        if hours > 0 || minutes > 0 || seconds > 0 || micros > 0 {
            out.push('T');
            if hours > 0 {
                out.push_str(&format!("{hours}H"));
            }
            if minutes > 0 {
                out.push_str(&format!("{minutes}M"));
            }
            if micros > 0 {
                let frac = format!("{micros:06}");
                out.push_str(&format!("{seconds}.{}S", frac.trim_end_matches('0')));
            } else if seconds > 0 {
                out.push_str(&format!("{seconds}S"));
            }
        }
        out
    }
}

/// Convert a decimal string in `unit` microseconds to whole microseconds
fn decimal_micros(text: &str, unit: i64) -> Option<i64> {
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    let whole: i64 = whole.parse().ok()?;
    let mut micros = whole.checked_mul(unit)?;
    if !frac.is_empty() {
        let digits = &frac[..frac.len().min(9)];
        let scale = 10i64.pow(digits.len() as u32);
        let numerator: i64 = digits.parse().ok()?;
        let part = (numerator as i128 * unit as i128 / scale as i128) as i64;
        micros = micros.checked_add(part)?;
    }
    Some(micros)
}

impl FromStr for Duration {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_iso(s)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso_string())
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration::micros(self.micros + rhs.micros)
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration::micros(self.micros - rhs.micros)
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration::micros(-self.micros)
    }
}

impl Mul<i64> for Duration {
    type Output = Duration;

    fn mul(self, rhs: i64) -> Duration {
        Duration::micros(self.micros * rhs)
    }
}

impl From<Duration> for chrono::TimeDelta {
    fn from(d: Duration) -> Self {
        chrono::TimeDelta::microseconds(d.micros)
    }
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
