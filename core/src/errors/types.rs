//! Error kinds for credential, token, boundary and storage failures
//!
//! The token and credential kinds are diagnostic detail. Callers outside the
//! core only ever see [`AuthError::NotAuthenticated`] for a failed check.

use thiserror::Error;

/// Credential hashing and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Malformed credential hash")]
    MalformedHash,
}

/// Token issuance and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("Unknown signing key: {key_id}")]
    UnknownKey { key_id: String },

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token revoked")]
    RevokedToken,

    #[error("Invalid claims: {reason}")]
    InvalidClaims { reason: String },

    #[error("Invalid TTL: {ttl}s (must be between 1 and {max}s)")]
    InvalidTtl { ttl: i64, max: i64 },
}

/// Errors reported to callers at the boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Credential already exists")]
    CredentialAlreadyExists,
}

/// Persistence collaborator failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl StorageError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StorageError::Unavailable {
            message: message.into(),
        }
    }
}
