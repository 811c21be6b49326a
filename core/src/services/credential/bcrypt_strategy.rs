//! bcrypt strategy.

use warden_shared::HashAlgorithm;

use super::strategy::PasswordHashStrategy;
use crate::domain::entities::credential::HashParams;
use crate::errors::CredentialError;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;
/// bcrypt only reads this many bytes of a secret
pub const MAX_SECRET_LEN: usize = 72;

const PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];
const SALT_LEN: usize = 22;
const DIGEST_LEN: usize = 31;

/// bcrypt in its modular crypt format, e.g. `$2b$10$<salt><digest>`
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptStrategy;

impl BcryptStrategy {
    /// Parse the structure of a bcrypt hash and return its cost
    fn parse_cost(stored: &str) -> Result<u32, CredentialError> {
        let rest = PREFIXES
            .iter()
            .find_map(|prefix| stored.strip_prefix(prefix))
            .ok_or(CredentialError::MalformedHash)?;
        let (cost, tail) = rest.split_once('$').ok_or(CredentialError::MalformedHash)?;

        if cost.len() != 2 || !cost.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CredentialError::MalformedHash);
        }
        let cost: u32 = cost.parse().map_err(|_| CredentialError::MalformedHash)?;
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(CredentialError::MalformedHash);
        }

        let is_bcrypt_base64 = |b: u8| b.is_ascii_alphanumeric() || b == b'.' || b == b'/';
        if tail.len() != SALT_LEN + DIGEST_LEN || !tail.bytes().all(is_bcrypt_base64) {
            return Err(CredentialError::MalformedHash);
        }

        Ok(cost)
    }
}

impl PasswordHashStrategy for BcryptStrategy {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Bcrypt
    }

    fn is_valid_cost(&self, cost: u32) -> bool {
        (MIN_COST..=MAX_COST).contains(&cost)
    }

    fn hash(&self, secret: &[u8], cost: u32) -> Result<String, CredentialError> {
        if !self.is_valid_cost(cost) {
            return Err(CredentialError::InvalidInput {
                reason: format!("bcrypt cost must be between {} and {}", MIN_COST, MAX_COST),
            });
        }
        if secret.len() > MAX_SECRET_LEN {
            return Err(CredentialError::InvalidInput {
                reason: format!("bcrypt secrets are limited to {} bytes", MAX_SECRET_LEN),
            });
        }

        bcrypt::hash(secret, cost).map_err(|e| CredentialError::InvalidInput {
            reason: format!("bcrypt hashing failed: {}", e),
        })
    }

    fn verify(&self, secret: &[u8], stored: &str) -> Result<bool, CredentialError> {
        Self::parse_cost(stored)?;
        // Anything longer would be compared on its first 72 bytes only.
        if secret.len() > MAX_SECRET_LEN {
            return Ok(false);
        }
        bcrypt::verify(secret, stored).map_err(|_| CredentialError::MalformedHash)
    }

    fn params(&self, stored: &str) -> Result<HashParams, CredentialError> {
        Ok(HashParams {
            algorithm: HashAlgorithm::Bcrypt,
            cost: Self::parse_cost(stored)?,
        })
    }

    fn recognizes(&self, stored: &str) -> bool {
        stored.starts_with("$2")
    }
}
