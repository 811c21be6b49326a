//! Stored credential entity.

use chrono::{DateTime, Utc};
use std::fmt;
use warden_shared::HashAlgorithm;

/// Parameters a credential hash was produced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub algorithm: HashAlgorithm,

    /// bcrypt log rounds or argon2 time cost
    pub cost: u32,
}

/// A subject's stored secret hash
///
/// The hash never leaves the core through a response type. This struct is
/// not `Serialize` and its `Debug` output redacts the hash.
/// Persistence adapters read it through [`Credential::stored_hash`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub subject_id: String,
    hash: String,
    pub hash_params: HashParams,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Creates a credential from a freshly computed hash
    pub fn new(subject_id: impl Into<String>, hash: String, hash_params: HashParams) -> Self {
        Self {
            subject_id: subject_id.into(),
            hash,
            hash_params,
            updated_at: Utc::now(),
        }
    }

    /// Rebuilds a credential loaded from storage
    pub fn from_stored(
        subject_id: impl Into<String>,
        hash: impl Into<String>,
        hash_params: HashParams,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            hash: hash.into(),
            hash_params,
            updated_at,
        }
    }

    /// Hash string in its self-describing stored form
    pub fn stored_hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("subject_id", &self.subject_id)
            .field("hash", &"[REDACTED]")
            .field("hash_params", &self.hash_params)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
