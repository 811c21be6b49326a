//! Credential repository trait defining the interface for credential persistence.

use async_trait::async_trait;

use crate::domain::entities::credential::Credential;
use crate::errors::StorageError;

/// Repository trait for Credential persistence
///
/// Implementations store the hash string exactly as given and never
/// interpret it.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Load the credential of a subject
    ///
    /// # Returns
    /// * `Ok(Some(Credential))` - Credential found
    /// * `Ok(None)` - Subject has no credential
    /// * `Err(StorageError)` - Storage could not be reached
    async fn load_credential(&self, subject_id: &str) -> Result<Option<Credential>, StorageError>;

    /// Store the credential of a subject that has none yet
    ///
    /// The existence check and the write are one atomic step, so of two
    /// concurrent inserts for the same subject exactly one succeeds.
    ///
    /// # Returns
    /// * `Ok(true)` - Credential stored
    /// * `Ok(false)` - The subject already has a credential; nothing changed
    /// * `Err(StorageError)` - Storage could not be reached
    async fn insert_credential(&self, credential: Credential) -> Result<bool, StorageError>;

    /// Insert or replace the credential of `credential.subject_id`
    async fn save_credential(&self, credential: Credential) -> Result<(), StorageError>;
}
