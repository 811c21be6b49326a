//! Session token issuance

use std::sync::Arc;
use uuid::Uuid;
use warden_shared::TokenConfig;

use super::codec;
use super::signer::TokenSigner;
use crate::domain::entities::token::{Claims, IssuedToken, TokenHeader, TokenPayload, RESERVED_CLAIMS};
use crate::errors::{DomainResult, TokenError};
use crate::services::clock::Clock;
use crate::services::keyring::KeyRing;

/// Signs new session tokens with the key ring's active key
pub struct TokenIssuer {
    key_ring: Arc<KeyRing>,
    signer: Arc<dyn TokenSigner>,
    clock: Arc<dyn Clock>,
    default_ttl: i64,
    max_ttl: i64,
}

impl TokenIssuer {
    pub fn new(
        key_ring: Arc<KeyRing>,
        signer: Arc<dyn TokenSigner>,
        clock: Arc<dyn Clock>,
        config: &TokenConfig,
    ) -> Self {
        Self {
            key_ring,
            signer,
            clock,
            default_ttl: config.default_ttl_secs,
            max_ttl: config.max_ttl_secs,
        }
    }

    pub fn default_ttl(&self) -> i64 {
        self.default_ttl
    }

    pub fn max_ttl(&self) -> i64 {
        self.max_ttl
    }

    /// Issue a token for `subject_id` valid for `ttl_secs` from now
    ///
    /// # Arguments
    ///
    /// * `subject_id` - Subject the token identifies
    /// * `claims` - Application claims; may not use a payload field name
    /// * `ttl_secs` - Lifetime, between 1 and the configured maximum
    ///
    /// # Errors
    ///
    /// * `TokenError::InvalidTtl` - `ttl_secs` out of range
    /// * `TokenError::InvalidClaims` - empty subject or reserved claim name
    pub fn issue(&self, subject_id: &str, claims: Claims, ttl_secs: i64) -> DomainResult<IssuedToken> {
        if ttl_secs <= 0 || ttl_secs > self.max_ttl {
            return Err(TokenError::InvalidTtl {
                ttl: ttl_secs,
                max: self.max_ttl,
            }
            .into());
        }
        if subject_id.is_empty() {
            return Err(TokenError::InvalidClaims {
                reason: "subject must not be empty".to_string(),
            }
            .into());
        }
        if let Some(name) = claims.keys().find(|name| RESERVED_CLAIMS.contains(&name.as_str())) {
            return Err(TokenError::InvalidClaims {
                reason: format!("reserved claim name: {}", name),
            }
            .into());
        }

        // Time is read before the key so the key cannot retire earlier than `iat`.
        let now = self.clock.now();
        let stamp = self.clock.stamp();
        let key = self.key_ring.active_key()?;
        let payload = TokenPayload {
            sub: subject_id.to_string(),
            iat: now,
            iat_us: stamp,
            exp: now + ttl_secs,
            jti: Uuid::new_v4().to_string(),
            claims,
        };
        let header = TokenHeader::new(key.algorithm().as_str(), key.key_id());

        let signing_input = codec::signing_input(&header, &payload)?;
        let signature = self.signer.sign(&key, signing_input.as_bytes())?;

        tracing::debug!(
            subject_id = %payload.sub,
            token_id = %payload.jti,
            key_id = %header.kid,
            expires_at = payload.exp,
            "Session token issued"
        );

        Ok(IssuedToken {
            token: codec::assemble(&signing_input, &signature),
            token_id: payload.jti,
            subject_id: payload.sub,
            key_id: header.kid,
            issued_at: payload.iat,
            issued_at_us: payload.iat_us,
            expires_at: payload.exp,
        })
    }

    /// Issue a token with the configured default TTL
    pub fn issue_default(&self, subject_id: &str, claims: Claims) -> DomainResult<IssuedToken> {
        self.issue(subject_id, claims, self.default_ttl)
    }
}
