//! Signing key ring with copy-on-write rotation

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};
use warden_shared::{AuthConfig, KeyRingConfig, SigningAlgorithm};

use crate::domain::entities::signing_key::{SigningKey, MIN_KEY_MATERIAL_LEN};
use crate::errors::{CredentialError, DomainError, DomainResult};
use crate::services::clock::Clock;

/// Immutable snapshot of the ring
#[derive(Debug)]
struct KeySet {
    active: Arc<SigningKey>,
    /// Newest first
    retired: Vec<Arc<SigningKey>>,
}

impl KeySet {
    fn find(&self, key_id: &str) -> Option<Arc<SigningKey>> {
        if self.active.key_id() == key_id {
            return Some(Arc::clone(&self.active));
        }
        self.retired.iter().find(|k| k.key_id() == key_id).cloned()
    }

    fn key_ids(&self) -> HashSet<&str> {
        std::iter::once(self.active.key_id())
            .chain(self.retired.iter().map(|k| k.key_id()))
            .collect()
    }
}

/// Holds the active signing key and the recently retired ones
///
/// Readers take a cheap snapshot of the current key set, so a verification
/// never observes a half-applied rotation. Writers (rotation and purge) are
/// serialised and publish a whole new set at once.
pub struct KeyRing {
    keys: RwLock<Arc<KeySet>>,
    /// Serialises writers
    rotation: Mutex<()>,
    algorithm: SigningAlgorithm,
    /// Longest TTL any token can carry; bounds how long a retired key is needed
    max_token_ttl: i64,
    config: KeyRingConfig,
    clock: Arc<dyn Clock>,
}

impl KeyRing {
    /// Create a ring whose first active key uses the given material
    ///
    /// # Errors
    ///
    /// `CredentialError::InvalidInput` if the material is shorter than
    /// [`MIN_KEY_MATERIAL_LEN`] bytes.
    pub fn new(
        material: Vec<u8>,
        algorithm: SigningAlgorithm,
        max_token_ttl: i64,
        config: KeyRingConfig,
        clock: Arc<dyn Clock>,
    ) -> DomainResult<Self> {
        Self::check_material(&material)?;

        let key = SigningKey::new(Self::generate_key_id(), material, algorithm, clock.now());
        tracing::info!(key_id = key.key_id(), algorithm = algorithm.as_str(), "Signing key ring created");

        Ok(Self {
            keys: RwLock::new(Arc::new(KeySet {
                active: Arc::new(key),
                retired: Vec::new(),
            })),
            rotation: Mutex::new(()),
            algorithm,
            max_token_ttl,
            config,
            clock,
        })
    }

    /// Create a ring with freshly generated key material
    pub fn generate(
        algorithm: SigningAlgorithm,
        max_token_ttl: i64,
        config: KeyRingConfig,
        clock: Arc<dyn Clock>,
    ) -> DomainResult<Self> {
        Self::new(Self::generate_material(), algorithm, max_token_ttl, config, clock)
    }

    /// Create a ring with generated material from the auth configuration
    pub fn from_config(config: &AuthConfig, clock: Arc<dyn Clock>) -> DomainResult<Self> {
        Self::generate(
            config.token.algorithm,
            config.token.max_ttl_secs,
            config.keys.clone(),
            clock,
        )
    }

    /// Generate 256 bits of key material
    pub fn generate_material() -> Vec<u8> {
        let mut material = vec![0u8; MIN_KEY_MATERIAL_LEN];
        OsRng.fill_bytes(&mut material);
        material
    }

    fn generate_key_id() -> String {
        let mut bytes = [0u8; 8];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    fn check_material(material: &[u8]) -> DomainResult<()> {
        if material.len() < MIN_KEY_MATERIAL_LEN {
            return Err(CredentialError::InvalidInput {
                reason: format!("key material must be at least {} bytes", MIN_KEY_MATERIAL_LEN),
            }
            .into());
        }
        Ok(())
    }

    fn snapshot(&self) -> DomainResult<Arc<KeySet>> {
        self.keys
            .read()
            .map(|keys| Arc::clone(&*keys))
            .map_err(|e| DomainError::internal(format!("Failed to read key set: {}", e)))
    }

    fn publish(&self, keys: KeySet) -> DomainResult<()> {
        let mut current = self
            .keys
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to write key set: {}", e)))?;
        *current = Arc::new(keys);
        Ok(())
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Key used to sign new tokens
    pub fn active_key(&self) -> DomainResult<Arc<SigningKey>> {
        Ok(Arc::clone(&self.snapshot()?.active))
    }

    /// Find a key by id, active or retired
    pub fn resolve(&self, key_id: &str) -> DomainResult<Option<Arc<SigningKey>>> {
        Ok(self.snapshot()?.find(key_id))
    }

    /// Identifiers of every key still able to verify, active first
    pub fn key_ids(&self) -> DomainResult<Vec<String>> {
        let keys = self.snapshot()?;
        Ok(std::iter::once(&keys.active)
            .chain(keys.retired.iter())
            .map(|k| k.key_id().to_string())
            .collect())
    }

    /// Replace the active key with one built from `material`
    ///
    /// The previous active key is retired and keeps verifying the tokens it
    /// signed until purged. Concurrent readers see either the old or the new
    /// key set, never a mix.
    ///
    /// # Returns
    ///
    /// The id of the new active key
    pub fn rotate(&self, material: Vec<u8>) -> DomainResult<String> {
        Self::check_material(&material)?;

        let _guard = self
            .rotation
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to acquire rotation lock: {}", e)))?;
        let current = self.snapshot()?;
        let now = self.clock.now();

        let existing = current.key_ids();
        let key_id = loop {
            let candidate = Self::generate_key_id();
            if !existing.contains(candidate.as_str()) {
                break candidate;
            }
        };

        let mut retired = Vec::with_capacity(current.retired.len() + 1);
        retired.push(Arc::new(current.active.retired(now)));
        retired.extend(current.retired.iter().cloned());

        let evicted = retired.len().saturating_sub(self.config.max_retired_keys);
        if evicted > 0 {
            retired.truncate(self.config.max_retired_keys);
            tracing::warn!(evicted, "Retired signing keys evicted by the retention limit");
        }

        let previous = current.active.key_id().to_string();
        self.publish(KeySet {
            active: Arc::new(SigningKey::new(key_id.clone(), material, self.algorithm, now)),
            retired,
        })?;

        tracing::info!(key_id = %key_id, previous_key_id = %previous, "Signing key rotated");
        Ok(key_id)
    }

    /// Rotate to freshly generated material
    pub fn rotate_generated(&self) -> DomainResult<String> {
        self.rotate(Self::generate_material())
    }

    /// Drop retired keys that can no longer have unexpired tokens
    ///
    /// A key retired at `r` signed nothing after `r`, so every token it
    /// verifies has expired once `r + max_token_ttl < now`.
    ///
    /// # Returns
    ///
    /// Number of keys removed
    pub fn purge_expired(&self, now: i64) -> DomainResult<usize> {
        let _guard = self
            .rotation
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to acquire rotation lock: {}", e)))?;
        let current = self.snapshot()?;

        let retired: Vec<_> = current
            .retired
            .iter()
            .filter(|k| {
                k.retired_at()
                    .map_or(true, |retired_at| retired_at + self.max_token_ttl >= now)
            })
            .cloned()
            .collect();

        let purged = current.retired.len() - retired.len();
        if purged > 0 {
            self.publish(KeySet {
                active: Arc::clone(&current.active),
                retired,
            })?;
            tracing::info!(purged, "Expired signing keys purged");
        }

        Ok(purged)
    }

    /// Whether the active key is older than the rotation interval
    pub fn should_rotate(&self, now: i64) -> DomainResult<bool> {
        if self.config.rotation_interval_secs <= 0 {
            return Ok(false);
        }
        let active = self.active_key()?;
        Ok(now - active.created_at() >= self.config.rotation_interval_secs)
    }
}

impl std::fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRing")
            .field("algorithm", &self.algorithm)
            .field("max_token_ttl", &self.max_token_ttl)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
