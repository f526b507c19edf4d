// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Permissive timestamp parser
//!
//! Strings are matched against an ordered list of anchored shapes; the first
//! shape that matches decides how fields are extracted. No shape is retried
//! once it matched, so a matching-but-invalid string (say, month 13) is an
//! out-of-range error rather than falling through to a later shape.

use crate::{Instant, TimeError};
use chrono::{FixedOffset, NaiveDate, TimeZone};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Anything the parser accepts
#[derive(Clone, Debug, PartialEq)]
pub enum TimeValue {
    /// Whole epoch seconds
    Int(i64),
    /// Fractional epoch seconds
    Float(f64),
    /// A formatted timestamp
    Text(String),
}

impl From<i64> for TimeValue {
    fn from(v: i64) -> Self {
        TimeValue::Int(v)
    }
}

impl From<i32> for TimeValue {
    fn from(v: i32) -> Self {
        TimeValue::Int(v.into())
    }
}

impl From<f64> for TimeValue {
    fn from(v: f64) -> Self {
        TimeValue::Float(v)
    }
}

impl From<&str> for TimeValue {
    fn from(v: &str) -> Self {
        TimeValue::Text(v.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(v: String) -> Self {
        TimeValue::Text(v)
    }
}

/// Parse epoch seconds or a timestamp string into an [`Instant`]
///
/// Strings without an offset are taken to be UTC.
pub fn parse_instant(value: impl Into<TimeValue>) -> Result<Instant, TimeError> {
    match value.into() {
        TimeValue::Int(secs) => Instant::from_epoch_secs(secs),
        TimeValue::Float(secs) => Instant::from_epoch_f64(secs),
        TimeValue::Text(text) => parse_text(&text),
    }
}

/// Raw fields pulled out of a matched shape
#[derive(Debug, Default)]
struct Fields {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    micro: u32,
    offset: Option<i32>,
}

struct Shape {
    name: &'static str,
    pattern: Regex,
    extract: fn(&Captures) -> Option<Fields>,
}

// Allow expect here as the regexes are compile-time verified to be valid
#[allow(clippy::expect_used)]
fn shape(name: &'static str, pattern: &str, extract: fn(&Captures) -> Option<Fields>) -> Shape {
    Shape {
        name,
        pattern: Regex::new(pattern).expect("constant regex pattern is valid"),
        extract,
    }
}

/// Shapes in priority order
static SHAPES: LazyLock<Vec<Shape>> = LazyLock::new(|| {
    vec![
        shape(
            "iso",
            r"^(\d{4})(?:-(\d{2})(?:-(\d{2})(?:[T ](\d{2}):(\d{2})(?::(\d{2})(?:\.(\d+))?)?(Z|[+-]\d{2}(?::?\d{2})?)?)?)?)?$",
            year_first,
        ),
        shape(
            "iso-basic",
            r"^(\d{4})(\d{2})(\d{2})(?:T(\d{2})(\d{2})(?:(\d{2})(?:\.(\d+))?)?(Z|[+-]\d{2}(?:\d{2})?)?)?$",
            year_first,
        ),
        shape(
            "silk",
            r"^(\d{4})/(\d{1,2})/(\d{1,2})(?:[T: ](\d{1,2})(?::(\d{1,2})(?::(\d{1,2})(?:\.(\d+))?)?)?)?$",
            year_first,
        ),
        shape(
            "us-legacy",
            r"^(\d{1,2})/(\d{1,2})/(\d{4})(?:[: ](\d{1,2}):(\d{1,2}):(\d{1,2})(?:\.(\d+))?)?$",
            month_first,
        ),
    ]
});

fn parse_text(input: &str) -> Result<Instant, TimeError> {
    let text = input.trim();
    for shape in SHAPES.iter() {
        let Some(caps) = shape.pattern.captures(text) else {
            continue;
        };
        tracing::trace!(input, shape = shape.name, "matched time shape");
        let fields = (shape.extract)(&caps).ok_or_else(|| TimeError::OutOfRange {
            input: input.to_string(),
        })?;
        return build(fields, input);
    }
    Err(TimeError::InvalidTime {
        input: input.to_string(),
    })
}

fn num<T: std::str::FromStr>(caps: &Captures, index: usize, default: T) -> Option<T> {
    match caps.get(index) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(default),
    }
}

/// Digits after the decimal point, truncated (not rounded) to microseconds
fn micros(caps: &Captures, index: usize) -> Option<u32> {
    let Some(m) = caps.get(index) else {
        return Some(0);
    };
    let digits = m.as_str();
    let kept = &digits[..digits.len().min(6)];
    let value: u32 = kept.parse().ok()?;
    Some(value * 10u32.pow(6 - kept.len() as u32))
}

/// `Z`, `±HH`, `±HHMM` or `±HH:MM` as seconds east of UTC
fn offset(caps: &Captures, index: usize) -> Option<Option<i32>> {
    let Some(m) = caps.get(index) else {
        return Some(None);
    };
    let text = m.as_str();
    if text == "Z" {
        return Some(Some(0));
    }
    let sign = if text.starts_with('-') { -1 } else { 1 };
    let digits: String = text[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..) {
        Some("") | None => 0,
        Some(mm) => mm.parse().ok()?,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(Some(sign * (hours * 3600 + minutes * 60)))
}

fn year_first(caps: &Captures) -> Option<Fields> {
    Some(Fields {
        year: num(caps, 1, 1970)?,
        month: num(caps, 2, 1)?,
        day: num(caps, 3, 1)?,
        hour: num(caps, 4, 0)?,
        minute: num(caps, 5, 0)?,
        second: num(caps, 6, 0)?,
        micro: micros(caps, 7)?,
        offset: if caps.len() > 8 { offset(caps, 8)? } else { None },
    })
}

fn month_first(caps: &Captures) -> Option<Fields> {
    Some(Fields {
        month: num(caps, 1, 1)?,
        day: num(caps, 2, 1)?,
        year: num(caps, 3, 1970)?,
        hour: num(caps, 4, 0)?,
        minute: num(caps, 5, 0)?,
        second: num(caps, 6, 0)?,
        micro: micros(caps, 7)?,
        offset: None,
    })
}

fn build(fields: Fields, input: &str) -> Result<Instant, TimeError> {
    let out_of_range = || TimeError::OutOfRange {
        input: input.to_string(),
    };
    let naive = NaiveDate::from_ymd_opt(fields.year, fields.month, fields.day)
        .and_then(|d| {
            d.and_hms_micro_opt(fields.hour, fields.minute, fields.second, fields.micro)
        })
        .ok_or_else(out_of_range)?;
    match fields.offset {
        None => Ok(Instant::from_utc(naive.and_utc())),
        Some(secs) => {
            let zone = FixedOffset::east_opt(secs).ok_or_else(out_of_range)?;
            let local = zone
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(out_of_range)?;
            Ok(Instant::from(local))
        }
    }
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
