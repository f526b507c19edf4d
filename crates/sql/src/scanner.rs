// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Placeholder scanner for query bodies
//!
//! Splits a body into literal text and `:name` placeholders. Quoted strings,
//! quoted identifiers, comments and `::` casts are copied through untouched.

use crate::SqlError;

/// A piece of a scanned query body
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    Literal(String),
    Param(String),
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Offset just past the closing quote; a doubled quote is an escape
fn skip_quoted(bytes: &[u8], start: usize) -> Result<usize, SqlError> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return Ok(i + 1);
        }
        i += 1;
    }
    Err(SqlError::Unterminated {
        what: if quote == b'\'' {
            "string literal"
        } else {
            "quoted identifier"
        },
        offset: start,
    })
}

fn skip_block_comment(bytes: &[u8], start: usize) -> Result<usize, SqlError> {
    bytes[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map(|p| start + 2 + p + 2)
        .ok_or(SqlError::Unterminated {
            what: "block comment",
            offset: start,
        })
}

/// Split `sql` into literal runs and placeholders
///
/// `?` and `:<digit>` outside literals are errors; a template only ever
/// names its parameters.
pub fn scan(sql: &str) -> Result<Vec<Fragment>, SqlError> {
    let bytes = sql.as_bytes();
    let mut fragments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let next = bytes.get(i + 1).copied();
        match (bytes[i], next) {
            (b'\'' | b'"', _) => i = skip_quoted(bytes, i)?,
            (b'-', Some(b'-')) => {
                i = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |p| i + p + 1);
            }
            (b'/', Some(b'*')) => i = skip_block_comment(bytes, i)?,
            (b':', Some(b':')) => i += 2,
            (b':', Some(b)) if is_name_byte(b) => {
                let start = i + 1;
                let end = start + bytes[start..].iter().take_while(|&&b| is_name_byte(b)).count();
                if b.is_ascii_digit() {
                    return Err(SqlError::UnknownPlaceholder {
                        token: sql[i..end].to_string(),
                        offset: i,
                    });
                }
                if literal_start < i {
                    fragments.push(Fragment::Literal(sql[literal_start..i].to_string()));
                }
                fragments.push(Fragment::Param(sql[start..end].to_string()));
                i = end;
                literal_start = end;
            }
            (b'?', _) => {
                return Err(SqlError::UnknownPlaceholder {
                    token: "?".to_string(),
                    offset: i,
                })
            }
            _ => i += 1,
        }
    }
    if literal_start < bytes.len() {
        fragments.push(Fragment::Literal(sql[literal_start..].to_string()));
    }
    Ok(fragments)
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
