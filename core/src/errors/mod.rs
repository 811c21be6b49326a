//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, CredentialError, StorageError, TokenError};

use thiserror::Error;
use warden_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Config(#[from] warden_shared::ConfigError),

    // Bridge to specific error types
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    StorageUnavailable(#[from] StorageError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether this error means a presented credential or token was rejected
    pub fn is_verification_failure(&self) -> bool {
        match self {
            DomainError::Credential(CredentialError::MalformedHash) => true,
            DomainError::Token(TokenError::InvalidTtl { .. })
            | DomainError::Token(TokenError::InvalidClaims { .. }) => false,
            DomainError::Token(_) => true,
            DomainError::Auth(AuthError::NotAuthenticated) => true,
            _ => false,
        }
    }

    /// Stable code safe to hand to external callers
    pub fn public_code(&self) -> &'static str {
        if self.is_verification_failure() {
            return error_codes::NOT_AUTHENTICATED;
        }
        match self {
            DomainError::Credential(CredentialError::InvalidInput { .. })
            | DomainError::Token(TokenError::InvalidTtl { .. })
            | DomainError::Token(TokenError::InvalidClaims { .. }) => error_codes::INVALID_REQUEST,
            DomainError::Auth(AuthError::CredentialAlreadyExists) => error_codes::CONFLICT,
            DomainError::StorageUnavailable(_) => error_codes::STORAGE_UNAVAILABLE,
            _ => error_codes::INTERNAL_ERROR,
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        let code = self.public_code();
        let message = match code {
            error_codes::NOT_AUTHENTICATED => "Not authenticated".to_string(),
            error_codes::INVALID_REQUEST | error_codes::CONFLICT => self.to_string(),
            error_codes::STORAGE_UNAVAILABLE => "Service temporarily unavailable".to_string(),
            _ => "Internal error".to_string(),
        };
        ErrorResponse::new(code, message)
    }
}

#[cfg(test)]
mod tests;
