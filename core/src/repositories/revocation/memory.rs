//! In-memory implementation of RevocationRepository

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::revocation::RevocationEntry;
use crate::errors::StorageError;

use super::r#trait::RevocationRepository;

/// Revocation log backed by a vector
pub struct InMemoryRevocationRepository {
    entries: Arc<RwLock<Vec<RevocationEntry>>>,
    unavailable: AtomicBool,
}

impl InMemoryRevocationRepository {
    /// Create a new empty log
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    /// Create a log holding previously recorded entries
    pub fn with_entries(entries: Vec<RevocationEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every call fail with `StorageError::Unavailable` (for testing)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("revocation log is offline"));
        }
        Ok(())
    }
}

impl Default for InMemoryRevocationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationRepository for InMemoryRevocationRepository {
    async fn load_revocations(&self) -> Result<Vec<RevocationEntry>, StorageError> {
        self.check_available()?;
        Ok(self.entries.read().await.clone())
    }

    async fn append_revocation(&self, entry: RevocationEntry) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries.write().await.push(entry);
        Ok(())
    }
}
