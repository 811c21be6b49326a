//! HMAC token signing

use constant_time_eq::constant_time_eq;
use jsonwebtoken::{crypto, Algorithm, EncodingKey};
use warden_shared::SigningAlgorithm;

use crate::domain::entities::signing_key::SigningKey;
use crate::errors::{DomainError, DomainResult};

/// Produces and checks token signatures
///
/// Signatures are base64url strings without padding, ready to be used as
/// the third token segment.
pub trait TokenSigner: Send + Sync {
    fn sign(&self, key: &SigningKey, message: &[u8]) -> DomainResult<String>;

    /// Recompute the signature and compare in constant time
    fn verify(&self, key: &SigningKey, message: &[u8], signature: &str) -> DomainResult<bool> {
        let expected = self.sign(key, message)?;
        Ok(constant_time_eq(expected.as_bytes(), signature.as_bytes()))
    }
}

/// HMAC-SHA2 signer backed by jsonwebtoken's crypto primitives
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSigner;

impl HmacSigner {
    fn jwt_algorithm(algorithm: SigningAlgorithm) -> Algorithm {
        match algorithm {
            SigningAlgorithm::HS256 => Algorithm::HS256,
            SigningAlgorithm::HS384 => Algorithm::HS384,
            SigningAlgorithm::HS512 => Algorithm::HS512,
        }
    }
}

impl TokenSigner for HmacSigner {
    fn sign(&self, key: &SigningKey, message: &[u8]) -> DomainResult<String> {
        let encoding_key = EncodingKey::from_secret(key.material());
        crypto::sign(message, &encoding_key, Self::jwt_algorithm(key.algorithm()))
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }
}
