// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Stamps by auditor key
pub type Stamps = BTreeMap<String, Stamp>;

/// Compact description of a resource's state
///
/// A stamp is an ordered list of JSON scalars; each auditor decides how
/// many items it holds and what they mean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stamp(Vec<Value>);

impl Stamp {
    pub fn new(items: Vec<Value>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical text form, used to key the audit cache
    pub fn identity(&self) -> String {
        Value::Array(self.0.clone()).to_string()
    }
}

impl<T: Into<Value>> FromIterator<T> for Stamp {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity())
    }
}
