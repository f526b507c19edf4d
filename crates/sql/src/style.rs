// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::SqlError;
use std::fmt;
use std::str::FromStr;

/// Placeholder convention of a rendered query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamStyle {
    /// `?`, one positional value per occurrence
    Qmark,
    /// `:1`, `:2`, numbered by first occurrence
    Numeric,
    /// `:name`
    Named,
    /// `%s`, one positional value per occurrence
    Format,
    /// `%(name)s`
    Pyformat,
    /// `$1`, `$2`, numbered by first occurrence
    Dollar,
}

impl ParamStyle {
    pub const ALL: [ParamStyle; 6] = [
        ParamStyle::Qmark,
        ParamStyle::Numeric,
        ParamStyle::Named,
        ParamStyle::Format,
        ParamStyle::Pyformat,
        ParamStyle::Dollar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParamStyle::Qmark => "qmark",
            ParamStyle::Numeric => "numeric",
            ParamStyle::Named => "named",
            ParamStyle::Format => "format",
            ParamStyle::Pyformat => "pyformat",
            ParamStyle::Dollar => "dollar",
        }
    }

    /// Whether parameters travel as a mapping rather than a list
    pub fn is_named(&self) -> bool {
        matches!(self, ParamStyle::Named | ParamStyle::Pyformat)
    }

    /// Whether a literal `%` must be written as `%%`
    pub fn escapes_percent(&self) -> bool {
        matches!(self, ParamStyle::Format | ParamStyle::Pyformat)
    }
}

impl fmt::Display for ParamStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamStyle {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamStyle::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| SqlError::UnknownStyle {
                name: s.to_string(),
            })
    }
}
