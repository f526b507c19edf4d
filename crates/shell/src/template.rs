// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line templates
//!
//! `%(name)s` is replaced by the shell-quoted value of `name`, and `%%` by a
//! single `%`. The result is split into words with POSIX quoting rules, so a
//! substituted value always stays one literal argument. Placeholders must
//! stand outside quotes; one inside quotes is a parse error.

use crate::ShellError;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%\(([A-Za-z_][A-Za-z0-9_]*)\)s|%%").expect("constant regex pattern is valid")
});

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c)
}

/// Quote `value` so a POSIX shell reads it back as one literal word
pub fn shell_quote(value: &str) -> String {
    if !value.is_empty() && value.chars().all(is_safe) {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Quote context of a command line at some point
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Quoting {
    #[default]
    Bare,
    Single,
    Double,
}

impl Quoting {
    /// The context after reading `text` from this one
    fn after(mut self, text: &str) -> Self {
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            self = match (self, c) {
                (Quoting::Bare, '\'') => Quoting::Single,
                (Quoting::Bare, '"') => Quoting::Double,
                (Quoting::Single, '\'') | (Quoting::Double, '"') => Quoting::Bare,
                (Quoting::Bare | Quoting::Double, '\\') => {
                    chars.next();
                    self
                }
                (state, _) => state,
            };
        }
        self
    }
}

/// Expand `%(name)s` placeholders with quoted values and `%%` with `%`
///
/// A placeholder naming a missing variable, or sitting inside quotes, is an
/// error; other `%` characters pass through.
pub fn substitute(template: &str, vars: &HashMap<String, String>) -> Result<String, ShellError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    let mut quoting = Quoting::Bare;
    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        let literal = &template[last..whole.start()];
        out.push_str(literal);
        quoting = quoting.after(literal);
        match caps.get(1) {
            Some(name) if quoting != Quoting::Bare => {
                return Err(ShellError::Parse {
                    input: template.to_string(),
                    reason: format!("placeholder %({})s inside quotes", name.as_str()),
                });
            }
            Some(name) => {
                let value = vars.get(name.as_str()).ok_or_else(|| ShellError::MissingVar {
                    name: name.as_str().to_string(),
                })?;
                out.push_str(&shell_quote(value));
            }
            None => out.push('%'),
        }
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// One word of a split command line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    /// Some part of the word was quoted or escaped, so it is never an
    /// operator such as `|` or `>file`
    pub quoted: bool,
}

impl Word {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }
}

/// Split a command line into words
///
/// Handles single quotes, double quotes (where `\` escapes `$`, `` ` ``,
/// `"`, `\` and newline) and backslash escapes. An unquoted `|` is always a
/// word of its own.
pub fn split_words(input: &str) -> Result<Vec<Word>, ShellError> {
    let parse_error = |reason: &str| ShellError::Parse {
        input: input.to_string(),
        reason: reason.to_string(),
    };
    let mut words = Vec::new();
    let mut current: Option<Word> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => words.extend(current.take()),
            '|' => {
                words.extend(current.take());
                words.push(Word::plain("|"));
            }
            '\'' => {
                let word = current.get_or_insert_with(|| Word::quoted(""));
                word.quoted = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.text.push(c),
                        None => return Err(parse_error("unterminated single quote")),
                    }
                }
            }
            '"' => {
                let word = current.get_or_insert_with(|| Word::quoted(""));
                word.quoted = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('$' | '`' | '"' | '\\')) => word.text.push(c),
                            Some('\n') => {}
                            Some(c) => {
                                word.text.push('\\');
                                word.text.push(c);
                            }
                            None => return Err(parse_error("unterminated double quote")),
                        },
                        Some(c) => word.text.push(c),
                        None => return Err(parse_error("unterminated double quote")),
                    }
                }
            }
            '\\' => {
                let next = chars.next().ok_or_else(|| parse_error("trailing backslash"))?;
                let word = current.get_or_insert_with(|| Word::quoted(""));
                word.quoted = true;
                if next != '\n' {
                    word.text.push(next);
                }
            }
            c => current.get_or_insert_with(|| Word::plain("")).text.push(c),
        }
    }
    words.extend(current);
    Ok(words)
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
