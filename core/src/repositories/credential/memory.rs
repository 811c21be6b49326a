//! In-memory implementation of CredentialRepository

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::credential::Credential;
use crate::errors::StorageError;

use super::r#trait::CredentialRepository;

/// Credential repository backed by a map, for tests and single-process use
pub struct InMemoryCredentialRepository {
    credentials: Arc<RwLock<HashMap<String, Credential>>>,
    unavailable: AtomicBool,
}

impl InMemoryCredentialRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self {
            credentials: Arc::new(RwLock::new(HashMap::new())),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every call fail with `StorageError::Unavailable` (for testing)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored credentials
    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.credentials.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("credential store is offline"));
        }
        Ok(())
    }
}

impl Default for InMemoryCredentialRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn load_credential(&self, subject_id: &str) -> Result<Option<Credential>, StorageError> {
        self.check_available()?;
        let credentials = self.credentials.read().await;
        Ok(credentials.get(subject_id).cloned())
    }

    async fn insert_credential(&self, credential: Credential) -> Result<bool, StorageError> {
        self.check_available()?;
        let mut credentials = self.credentials.write().await;
        match credentials.entry(credential.subject_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(credential);
                Ok(true)
            }
        }
    }

    async fn save_credential(&self, credential: Credential) -> Result<(), StorageError> {
        self.check_available()?;
        let mut credentials = self.credentials.write().await;
        credentials.insert(credential.subject_id.clone(), credential);
        Ok(())
    }
}
