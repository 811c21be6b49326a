//! Session token verification

use std::sync::Arc;

use super::codec;
use super::signer::TokenSigner;
use crate::domain::entities::token::{TokenPayload, VerifiedToken};
use crate::errors::{DomainResult, TokenError};
use crate::services::clock::Clock;
use crate::services::keyring::KeyRing;
use crate::services::revocation::RevocationStore;

/// Checks presented tokens
///
/// Checks run in a fixed order and stop at the first failure:
/// 1. structure (`MalformedToken`)
/// 2. signing key lookup (`UnknownKey`)
/// 3. signature (`InvalidSignature`)
/// 4. expiry (`ExpiredToken`)
/// 5. revocation of the token or its subject (`RevokedToken`)
pub struct TokenVerifier {
    key_ring: Arc<KeyRing>,
    revocations: Arc<RevocationStore>,
    signer: Arc<dyn TokenSigner>,
    clock: Arc<dyn Clock>,
}

impl TokenVerifier {
    pub fn new(
        key_ring: Arc<KeyRing>,
        revocations: Arc<RevocationStore>,
        signer: Arc<dyn TokenSigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            key_ring,
            revocations,
            signer,
            clock,
        }
    }

    /// Verify `token` at the current time
    pub fn verify(&self, token: &str) -> DomainResult<VerifiedToken> {
        self.verify_at(token, self.clock.now())
    }

    /// Verify `token` as of `now`
    pub fn verify_at(&self, token: &str, now: i64) -> DomainResult<VerifiedToken> {
        let payload = self.authenticate_at(token, now)?;

        if self
            .revocations
            .is_token_revoked(&payload.jti, &payload.sub, payload.iat_us, now)?
        {
            return Err(TokenError::RevokedToken.into());
        }

        Ok(payload.into())
    }

    /// Run every check except revocation
    ///
    /// Used when revoking, so that revoking an already revoked token is a
    /// no-op rather than a failure.
    pub fn authenticate_at(&self, token: &str, now: i64) -> DomainResult<TokenPayload> {
        let decoded = codec::decode(token)?;

        let key = self
            .key_ring
            .resolve(&decoded.header.kid)?
            .ok_or_else(|| TokenError::UnknownKey {
                key_id: decoded.header.kid.clone(),
            })?;

        if key.algorithm() != decoded.algorithm
            || !self
                .signer
                .verify(&key, decoded.signing_input().as_bytes(), decoded.signature())?
        {
            return Err(TokenError::InvalidSignature.into());
        }

        if decoded.payload.is_expired_at(now) {
            return Err(TokenError::ExpiredToken.into());
        }

        Ok(decoded.payload)
    }
}
