//! Hash algorithm strategy trait.

use warden_shared::HashAlgorithm;

use crate::domain::entities::credential::HashParams;
use crate::errors::CredentialError;

/// One password hashing algorithm
///
/// Hashes are self-describing strings carrying the algorithm, cost and salt,
/// so a strategy can verify any hash it [`recognizes`](Self::recognizes)
/// regardless of the cost it is currently configured with.
pub trait PasswordHashStrategy: Send + Sync {
    fn algorithm(&self) -> HashAlgorithm;

    /// Whether `cost` is accepted by this algorithm
    fn is_valid_cost(&self, cost: u32) -> bool;

    /// Hash `secret` with a fresh random salt
    fn hash(&self, secret: &[u8], cost: u32) -> Result<String, CredentialError>;

    /// Check `secret` against `stored` in constant time
    ///
    /// # Errors
    ///
    /// `CredentialError::MalformedHash` if `stored` cannot be parsed.
    fn verify(&self, secret: &[u8], stored: &str) -> Result<bool, CredentialError>;

    /// Parameters encoded in `stored`
    fn params(&self, stored: &str) -> Result<HashParams, CredentialError>;

    /// Whether `stored` carries this algorithm's identifier
    fn recognizes(&self, stored: &str) -> bool;
}
