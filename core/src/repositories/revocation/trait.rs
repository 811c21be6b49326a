//! Revocation repository trait for durable revocation records.

use async_trait::async_trait;

use crate::domain::entities::revocation::RevocationEntry;
use crate::errors::StorageError;

/// Append-only log of revocations
///
/// The in-memory revocation set is rebuilt from this log on startup, so a
/// revocation survives restarts once `append_revocation` has returned.
#[async_trait]
pub trait RevocationRepository: Send + Sync {
    /// Load every recorded revocation, expired ones included
    async fn load_revocations(&self) -> Result<Vec<RevocationEntry>, StorageError>;

    /// Durably record a revocation
    async fn append_revocation(&self, entry: RevocationEntry) -> Result<(), StorageError>;
}
