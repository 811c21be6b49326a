//! Argon2id strategy.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use warden_shared::HashAlgorithm;

use super::strategy::PasswordHashStrategy;
use crate::domain::entities::credential::HashParams;
use crate::errors::CredentialError;

/// Argon2id in PHC string format, e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`
///
/// The configured cost is the time cost (iterations). Memory and parallelism
/// use the argon2 crate defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Strategy;

impl Argon2Strategy {
    fn parse(stored: &str) -> Result<PasswordHash<'_>, CredentialError> {
        let parsed = PasswordHash::new(stored).map_err(|_| CredentialError::MalformedHash)?;
        if Algorithm::try_from(parsed.algorithm).is_err()
            || parsed.salt.is_none()
            || parsed.hash.is_none()
        {
            return Err(CredentialError::MalformedHash);
        }
        Ok(parsed)
    }
}

impl PasswordHashStrategy for Argon2Strategy {
    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Argon2
    }

    fn is_valid_cost(&self, cost: u32) -> bool {
        cost >= Params::MIN_T_COST
    }

    fn hash(&self, secret: &[u8], cost: u32) -> Result<String, CredentialError> {
        let params = Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None)
            .map_err(|e| CredentialError::InvalidInput {
                reason: format!("invalid argon2 parameters: {}", e),
            })?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);

        argon2
            .hash_password(secret, &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::InvalidInput {
                reason: format!("argon2 hashing failed: {}", e),
            })
    }

    fn verify(&self, secret: &[u8], stored: &str) -> Result<bool, CredentialError> {
        let parsed = Self::parse(stored)?;

        // Parameters come from the stored hash, not from this instance.
        match Argon2::default().verify_password(secret, &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(_) => Err(CredentialError::MalformedHash),
        }
    }

    fn params(&self, stored: &str) -> Result<HashParams, CredentialError> {
        let parsed = Self::parse(stored)?;
        let params = Params::try_from(&parsed).map_err(|_| CredentialError::MalformedHash)?;
        Ok(HashParams {
            algorithm: HashAlgorithm::Argon2,
            cost: params.t_cost(),
        })
    }

    fn recognizes(&self, stored: &str) -> bool {
        stored.starts_with("$argon2")
    }
}
