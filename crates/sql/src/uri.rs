// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection URIs
//!
//! `scheme://[user[:password]@][host[:port]]/path[?key=value&...]`. User,
//! password and query parts are percent-decoded.

use crate::SqlError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        (?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://
        (?:(?P<user>[^:@/?]*)(?::(?P<password>[^@/?]*))?@)?
        (?P<host>\[[^\]]*\]|[^:/?]*)
        (?::(?P<port>[^/?]*))?
        (?P<path>/[^?]*)?
        (?:\?(?P<query>.*))?
        $",
    )
    .expect("constant regex pattern is valid")
});

/// A parsed connection URI
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionUri {
    pub scheme: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Path including its leading `/`; empty when absent
    pub path: String,
    /// Query parameters in URI order
    pub params: Vec<(String, String)>,
}

fn invalid(uri: &str, reason: impl Into<String>) -> SqlError {
    SqlError::InvalidUri {
        uri: uri.to_string(),
        reason: reason.into(),
    }
}

fn hex(b: u8) -> Option<u8> {
    char::from(b).to_digit(16).map(|d| d as u8)
}

fn percent_decode(uri: &str, text: &str) -> Result<String, SqlError> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let digit = |at: usize| bytes.get(at).copied().and_then(hex);
                let Some((hi, lo)) = digit(i + 1).zip(digit(i + 2)) else {
                    return Err(invalid(uri, format!("bad percent escape in {text:?}")));
                };
                out.push((hi << 4) | lo);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out)
        .map_err(|_| invalid(uri, format!("{text:?} is not UTF-8 once decoded")))
}

/// Whether `scheme` is `prefix` or a `prefix-<suffix>` flavour of it
pub fn scheme_matches(scheme: &str, prefix: &str) -> bool {
    scheme == prefix
        || scheme
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.len() > 1 && rest.starts_with('-'))
}

impl ConnectionUri {
    pub fn parse(uri: &str) -> Result<Self, SqlError> {
        let caps = URI.captures(uri).ok_or_else(|| {
            invalid(uri, "expected scheme://[user[:password]@][host[:port]]/path")
        })?;
        let part = |name| caps.name(name).map(|m| m.as_str());

        let port = match part("port") {
            None => None,
            Some(text) => Some(
                text.parse::<u16>()
                    .map_err(|_| invalid(uri, format!("bad port {text:?}")))?,
            ),
        };
        let params = match part("query") {
            None | Some("") => Vec::new(),
            Some(query) => query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| -> Result<(String, String), SqlError> {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    Ok((percent_decode(uri, key)?, percent_decode(uri, value)?))
                })
                .collect::<Result<Vec<_>, SqlError>>()?,
        };

        Ok(Self {
            scheme: part("scheme").unwrap_or_default().to_string(),
            user: part("user").map(|u| percent_decode(uri, u)).transpose()?,
            password: part("password").map(|p| percent_decode(uri, p)).transpose()?,
            host: part("host").filter(|h| !h.is_empty()).map(str::to_string),
            port,
            path: part("path").unwrap_or_default().to_string(),
            params,
        })
    }

    /// First value of query parameter `key`
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path without its leading `/`, as used for a database name
    pub fn database(&self) -> &str {
        self.path.strip_prefix('/').unwrap_or(&self.path)
    }

    /// See [`scheme_matches`]
    pub fn scheme_is(&self, prefix: &str) -> bool {
        scheme_matches(&self.scheme, prefix)
    }
}

impl FromStr for ConnectionUri {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Renders without the password
impl fmt::Display for ConnectionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme)?;
        if let Some(user) = &self.user {
            write!(f, "{user}@")?;
        }
        if let Some(host) = &self.host {
            f.write_str(host)?;
        }
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "uri_tests.rs"]
mod tests;
