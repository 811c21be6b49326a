//! Session token entities.
//!
//! A session token is three base64url segments joined by `.`: a JSON header,
//! a JSON payload and the HMAC signature over the first two segments.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Resolution of issuance and revocation stamps
pub const MICROS_PER_SEC: i64 = 1_000_000;

/// Value of the `typ` header field
pub const TOKEN_TYPE: &str = "JWT";

/// Payload field names that caller claims may not shadow
pub const RESERVED_CLAIMS: [&str; 5] = ["sub", "iat", "iat_us", "exp", "jti"];

/// Caller-supplied claims carried in the token payload
///
/// Ordered so that encoding the same claims always yields the same bytes.
pub type Claims = BTreeMap<String, Value>;

/// Token header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenHeader {
    /// Signing algorithm name
    pub alg: String,

    /// Identifier of the signing key
    pub kid: String,

    /// Token type, always [`TOKEN_TYPE`]
    pub typ: String,
}

impl TokenHeader {
    pub fn new(alg: impl Into<String>, kid: impl Into<String>) -> Self {
        Self {
            alg: alg.into(),
            kid: kid.into(),
            typ: TOKEN_TYPE.to_string(),
        }
    }
}

/// Token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenPayload {
    /// Subject the token was issued to
    pub sub: String,

    /// Issued at, Unix seconds
    pub iat: i64,

    /// Issuance stamp, Unix microseconds, unique per issuing clock
    pub iat_us: i64,

    /// Expiration, Unix seconds
    pub exp: i64,

    /// Unique token identifier
    pub jti: String,

    /// Application claims
    pub claims: Claims,
}

impl TokenPayload {
    /// Whether the token has expired at `now`
    ///
    /// A token is still valid at exactly its expiration second.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.exp
    }
}

/// A freshly issued session token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuedToken {
    /// Encoded token handed to the client
    pub token: String,

    pub token_id: String,
    pub subject_id: String,
    pub key_id: String,
    pub issued_at: i64,
    pub issued_at_us: i64,
    pub expires_at: i64,
}

/// Identity extracted from a token that passed every check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedToken {
    pub subject_id: String,
    pub claims: Claims,
    pub token_id: String,
    pub issued_at: i64,
    pub issued_at_us: i64,
    pub expires_at: i64,
}

impl From<TokenPayload> for VerifiedToken {
    fn from(payload: TokenPayload) -> Self {
        Self {
            subject_id: payload.sub,
            claims: payload.claims,
            token_id: payload.jti,
            issued_at: payload.iat,
            issued_at_us: payload.iat_us,
            expires_at: payload.exp,
        }
    }
}
