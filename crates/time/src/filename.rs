// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dates embedded in repository file names
//!
//! Packed repository files carry their hour in the name, as in
//! `in-S0_20090301.07`; daily products use `YYYYMMDD` or `YYYY-MM-DD`.

use crate::{Instant, TimeError};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static NAME_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?P<y>\d{4})(?P<m>\d{2})(?P<d>\d{2})(?:\.(?P<h>\d{2}))?
        | (?P<ey>\d{4})-(?P<em>\d{2})-(?P<ed>\d{2})
        ",
    )
    .expect("constant regex pattern is valid")
});

/// Every date stamp found in the final component of `path`, in order
///
/// A stamp must not touch other digits on either side, and must name a real
/// calendar date; anything else is skipped.
pub fn dates_in_filename(path: impl AsRef<Path>) -> Vec<Instant> {
    let Some(name) = path.as_ref().file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };
    let bytes = name.as_bytes();
    let digit_at = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    NAME_DATE
        .captures_iter(name)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            if (whole.start() > 0 && digit_at(whole.start() - 1)) || digit_at(whole.end()) {
                return None;
            }
            let field = |a: &str, b: &str| {
                caps.name(a)
                    .or_else(|| caps.name(b))
                    .and_then(|m| m.as_str().parse::<u32>().ok())
            };
            let year = field("y", "ey")? as i32;
            let month = field("m", "em")?;
            let day = field("d", "ed")?;
            let hour = caps
                .name("h")
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);
            Instant::from_ymd_hms_micro(year, month, day, hour, 0, 0, 0).ok()
        })
        .collect()
}

/// The first date stamp in the final component of `path`
pub fn date_from_filename(path: impl AsRef<Path>) -> Result<Instant, TimeError> {
    let path = path.as_ref();
    let found = dates_in_filename(path).into_iter().next();
    tracing::trace!(path = %path.display(), found = ?found, "date from filename");
    found.ok_or_else(|| TimeError::FilenameDate {
        path: path.display().to_string(),
    })
}

#[cfg(test)]
#[path = "filename_tests.rs"]
mod tests;
