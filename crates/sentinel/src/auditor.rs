// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::{AuditError, Stamp};

/// Result of comparing a stored stamp with the live resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Live stamp equals the stored one
    Match,
    /// Content is unchanged but the stored stamp is stale
    Refresh(Stamp),
    /// Content differs; `stamp` is the live stamp when one could be taken
    Mismatch {
        reason: String,
        stamp: Option<Stamp>,
    },
    /// The resource could not be found or read
    Missing(String),
}

impl AuditOutcome {
    pub fn mismatch(reason: impl Into<String>, stamp: Option<Stamp>) -> Self {
        Self::Mismatch {
            reason: reason.into(),
            stamp,
        }
    }

    /// True for outcomes that force downstream work to rerun
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Mismatch { .. } | Self::Missing(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Refresh(_) => "refresh",
            Self::Mismatch { .. } => "mismatch",
            Self::Missing(_) => "missing",
        }
    }
}

/// Produces and checks the stamp of one resource
pub trait Auditor: Send + Sync {
    /// Kind of auditor; together with the key it identifies cached audits
    fn kind(&self) -> &'static str;

    /// Ledger key of the audited resource
    fn key(&self) -> &str;

    /// Stamp of the resource as it is now
    fn stamp(&self) -> Result<Stamp, AuditError>;

    /// Compare `stored` with the live resource
    ///
    /// `deep` asks for a content check even when the cheap fields agree.
    fn audit(&self, stored: &Stamp, deep: bool) -> Result<AuditOutcome, AuditError>;
}

impl<A: Auditor + ?Sized> Auditor for Box<A> {
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    fn key(&self) -> &str {
        (**self).key()
    }

    fn stamp(&self) -> Result<Stamp, AuditError> {
        (**self).stamp()
    }

    fn audit(&self, stored: &Stamp, deep: bool) -> Result<AuditOutcome, AuditError> {
        (**self).audit(stored, deep)
    }
}
