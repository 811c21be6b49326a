//! Revocation entities.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::token::MICROS_PER_SEC;

/// What a revocation applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RevocationTarget {
    /// A single token, by its `jti`
    Token(String),
    /// Every token of a subject issued before the revocation
    Subject(String),
}

impl fmt::Display for RevocationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevocationTarget::Token(id) => write!(f, "token:{}", id),
            RevocationTarget::Subject(id) => write!(f, "subject:{}", id),
        }
    }
}

/// A recorded revocation
///
/// Kept until `expires_at`, after which nothing it covers can still verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationEntry {
    pub target: RevocationTarget,

    /// Clock stamp of the revocation, Unix microseconds
    pub revoked_at_us: i64,

    /// Unix seconds
    pub expires_at: i64,
}

impl RevocationEntry {
    pub fn new(target: RevocationTarget, revoked_at_us: i64, expires_at: i64) -> Self {
        Self {
            target,
            revoked_at_us,
            expires_at,
        }
    }

    /// Revocation time in Unix seconds
    pub fn revoked_at(&self) -> i64 {
        self.revoked_at_us.div_euclid(MICROS_PER_SEC)
    }

    /// Whether the entry can be discarded at `now`
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// Whether this entry revokes a token with the given identity
    ///
    /// Stamps come from the same clock, so a subject revocation covers
    /// exactly the tokens issued before it, even within one second.
    pub fn covers(&self, token_id: &str, subject_id: &str, issued_at_us: i64) -> bool {
        match &self.target {
            RevocationTarget::Token(id) => id == token_id,
            RevocationTarget::Subject(id) => id == subject_id && issued_at_us < self.revoked_at_us,
        }
    }
}
