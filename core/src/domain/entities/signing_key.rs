//! Token signing key entity.

use std::fmt;
use warden_shared::SigningAlgorithm;

/// Shortest accepted key material in bytes
pub const MIN_KEY_MATERIAL_LEN: usize = 32;

/// Lifecycle state of a signing key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Signs new tokens
    Active,
    /// Only verifies tokens signed before `retired_at`
    Retired { retired_at: i64 },
}

/// HMAC signing key
///
/// Immutable once created. Rotation produces a retired copy of the old
/// active key rather than mutating it.
#[derive(Clone)]
pub struct SigningKey {
    key_id: String,
    material: Vec<u8>,
    algorithm: SigningAlgorithm,
    created_at: i64,
    state: KeyState,
}

impl SigningKey {
    pub(crate) fn new(
        key_id: String,
        material: Vec<u8>,
        algorithm: SigningAlgorithm,
        created_at: i64,
    ) -> Self {
        Self {
            key_id,
            material,
            algorithm,
            created_at,
            state: KeyState::Active,
        }
    }

    /// Returns a retired copy of this key
    pub(crate) fn retired(&self, retired_at: i64) -> Self {
        Self {
            state: KeyState::Retired { retired_at },
            ..self.clone()
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn state(&self) -> KeyState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == KeyState::Active
    }

    pub fn retired_at(&self) -> Option<i64> {
        match self.state {
            KeyState::Active => None,
            KeyState::Retired { retired_at } => Some(retired_at),
        }
    }

    pub(crate) fn material(&self) -> &[u8] {
        &self.material
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_id", &self.key_id)
            .field("material", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("created_at", &self.created_at)
            .field("state", &self.state)
            .finish()
    }
}
