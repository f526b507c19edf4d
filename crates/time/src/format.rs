// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SiLK, extended ISO and basic ISO rendering
//!
//! All formats render the UTC value without an offset suffix.

use crate::{Instant, TimeError};
use std::fmt;
use std::str::FromStr;

/// How much of a timestamp to render
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Msec,
    Usec,
}

impl Precision {
    pub fn name(&self) -> &'static str {
        match self {
            Precision::Year => "year",
            Precision::Month => "month",
            Precision::Day => "day",
            Precision::Hour => "hour",
            Precision::Minute => "minute",
            Precision::Second => "second",
            Precision::Msec => "msec",
            Precision::Usec => "usec",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Precision {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Precision::Year),
            "month" => Ok(Precision::Month),
            "day" => Ok(Precision::Day),
            "hour" => Ok(Precision::Hour),
            "minute" => Ok(Precision::Minute),
            "second" => Ok(Precision::Second),
            "msec" => Ok(Precision::Msec),
            "usec" => Ok(Precision::Usec),
            _ => Err(TimeError::InvalidPrecision {
                input: s.to_string(),
            }),
        }
    }
}

/// Separators that distinguish the three renderings
struct Layout {
    date_sep: &'static str,
    time_sep: &'static str,
}

const SILK: Layout = Layout {
    date_sep: "/",
    time_sep: ":",
};
const ISO: Layout = Layout {
    date_sep: "-",
    time_sep: ":",
};
const ISO_BASIC: Layout = Layout {
    date_sep: "",
    time_sep: "",
};

impl Instant {
    /// `YYYY/MM/DDTHH:MM:SS.ffffff`, cut at `precision`
    pub fn format_silk(&self, precision: Precision) -> String {
        self.render(&SILK, precision)
    }

    /// `YYYY-MM-DDTHH:MM:SS.ffffff`, cut at `precision`
    pub fn format_iso(&self, precision: Precision) -> String {
        self.render(&ISO, precision)
    }

    /// `YYYYMMDDTHHMMSS.ffffff`, cut at `precision`
    ///
    /// Month precision is rejected: `YYYYMM` is ambiguous in basic form.
    pub fn format_iso_basic(&self, precision: Precision) -> Result<String, TimeError> {
        if precision == Precision::Month {
            return Err(TimeError::UnsupportedPrecision {
                format: "basic ISO",
                precision: precision.name(),
            });
        }
        Ok(self.render(&ISO_BASIC, precision))
    }

    fn render(&self, layout: &Layout, precision: Precision) -> String {
        let mut out = format!("{:04}", self.year());
        if precision >= Precision::Month {
            out.push_str(&format!("{}{:02}", layout.date_sep, self.month()));
        }
        if precision >= Precision::Day {
            out.push_str(&format!("{}{:02}", layout.date_sep, self.day()));
        }
        if precision >= Precision::Hour {
            out.push_str(&format!("T{:02}", self.hour()));
        }
        if precision >= Precision::Minute {
            out.push_str(&format!("{}{:02}", layout.time_sep, self.minute()));
        }
        if precision >= Precision::Second {
            out.push_str(&format!("{}{:02}", layout.time_sep, self.second()));
        }
        match precision {
            Precision::Msec => out.push_str(&format!(".{:03}", self.microsecond() / 1_000)),
            Precision::Usec => out.push_str(&format!(".{:06}", self.microsecond())),
            _ => {}
        }
        out
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
