//! Credential hasher dispatching to the configured algorithm.

use std::sync::Arc;
use warden_shared::{HashAlgorithm, HashingConfig};

use super::argon2_strategy::Argon2Strategy;
use super::bcrypt_strategy::BcryptStrategy;
use super::strategy::PasswordHashStrategy;
use crate::domain::entities::credential::{Credential, HashParams};
use crate::errors::{CredentialError, DomainError, DomainResult};

const DUMMY_SECRET: &[u8] = b"warden-dummy-secret";

/// Hashes secrets and verifies them against stored hashes
///
/// New hashes use the configured algorithm and cost. Verification picks the
/// strategy from the stored hash's prefix, so credentials created under an
/// older configuration keep working and can be upgraded with
/// [`needs_rehash`](Self::needs_rehash).
pub struct CredentialHasher {
    strategies: Vec<Arc<dyn PasswordHashStrategy>>,
    algorithm: HashAlgorithm,
    cost: u32,
    max_secret_len: usize,
    dummy_hash: String,
}

impl CredentialHasher {
    /// Create a hasher with the bcrypt and argon2 strategies
    ///
    /// # Errors
    ///
    /// `CredentialError::InvalidInput` if the configured cost is not accepted
    /// by the configured algorithm, `DomainError::Internal` if no strategy
    /// implements it.
    pub fn new(config: &HashingConfig) -> DomainResult<Self> {
        Self::with_strategies(
            config,
            vec![Arc::new(BcryptStrategy), Arc::new(Argon2Strategy)],
        )
    }

    /// Create a hasher with an explicit set of strategies
    pub fn with_strategies(
        config: &HashingConfig,
        strategies: Vec<Arc<dyn PasswordHashStrategy>>,
    ) -> DomainResult<Self> {
        let mut hasher = Self {
            strategies,
            algorithm: config.algorithm,
            cost: config.cost,
            max_secret_len: config.max_secret_len,
            dummy_hash: String::new(),
        };

        let strategy = hasher.strategy_for(config.algorithm)?;
        if !strategy.is_valid_cost(config.cost) {
            return Err(CredentialError::InvalidInput {
                reason: format!("cost {} is not accepted by {}", config.cost, config.algorithm),
            }
            .into());
        }

        hasher.dummy_hash = hasher.hash_default(DUMMY_SECRET)?;
        Ok(hasher)
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `secret` with the configured algorithm at the given cost
    ///
    /// # Errors
    ///
    /// `CredentialError::InvalidInput` for an empty or oversized secret or a
    /// cost outside the algorithm's range.
    pub fn hash(&self, secret: &[u8], cost: u32) -> DomainResult<String> {
        self.check_secret(secret)?;
        if secret.is_empty() {
            return Err(invalid_input("secret must not be empty"));
        }

        let strategy = self.strategy_for(self.algorithm)?;
        Ok(strategy.hash(secret, cost)?)
    }

    /// Hash `secret` with the configured algorithm and cost
    pub fn hash_default(&self, secret: &[u8]) -> DomainResult<String> {
        self.hash(secret, self.cost)
    }

    /// Hash `secret` into a new credential for `subject_id`
    pub fn create_credential(&self, subject_id: &str, secret: &[u8]) -> DomainResult<Credential> {
        let hash = self.hash_default(secret)?;
        Ok(Credential::new(subject_id, hash, self.default_params()))
    }

    /// Check `secret` against a stored hash
    ///
    /// Runs in time independent of where the secret and hash first differ.
    ///
    /// # Errors
    ///
    /// * `CredentialError::MalformedHash` - `stored` is not a recognised hash
    /// * `CredentialError::InvalidInput` - `secret` exceeds the length limit
    pub fn verify(&self, secret: &[u8], stored: &str) -> DomainResult<bool> {
        self.check_secret(secret)?;
        let strategy = self.strategy_for_hash(stored)?;
        Ok(strategy.verify(secret, stored)?)
    }

    /// Spend the same work as a real verification without a stored hash
    ///
    /// Used when the subject is unknown so the response time does not reveal
    /// whether it exists.
    pub fn verify_dummy(&self, secret: &[u8]) {
        let secret = if secret.len() > self.max_secret_len {
            DUMMY_SECRET
        } else {
            secret
        };
        if let Err(e) = self.verify(secret, &self.dummy_hash) {
            tracing::warn!(error = %e, "dummy verification failed");
        }
    }

    /// Parameters encoded in a stored hash
    pub fn params(&self, stored: &str) -> DomainResult<HashParams> {
        let strategy = self.strategy_for_hash(stored)?;
        Ok(strategy.params(stored)?)
    }

    /// Whether a stored hash was produced with other than the current settings
    pub fn needs_rehash(&self, stored: &str) -> DomainResult<bool> {
        Ok(self.params(stored)? != self.default_params())
    }

    fn default_params(&self) -> HashParams {
        HashParams {
            algorithm: self.algorithm,
            cost: self.cost,
        }
    }

    /// Reject secrets longer than the configured limit
    pub fn check_secret(&self, secret: &[u8]) -> DomainResult<()> {
        if secret.len() > self.max_secret_len {
            return Err(invalid_input(format!(
                "secret exceeds {} bytes",
                self.max_secret_len
            )));
        }
        Ok(())
    }

    fn strategy_for(&self, algorithm: HashAlgorithm) -> DomainResult<&Arc<dyn PasswordHashStrategy>> {
        self.strategies
            .iter()
            .find(|s| s.algorithm() == algorithm)
            .ok_or_else(|| DomainError::internal(format!("no strategy registered for {}", algorithm)))
    }

    fn strategy_for_hash(&self, stored: &str) -> DomainResult<&Arc<dyn PasswordHashStrategy>> {
        self.strategies
            .iter()
            .find(|s| s.recognizes(stored))
            .ok_or_else(|| CredentialError::MalformedHash.into())
    }
}

fn invalid_input(reason: impl Into<String>) -> DomainError {
    CredentialError::InvalidInput {
        reason: reason.into(),
    }
    .into()
}
