//! # Warden Core
//!
//! Authentication domain for Warden: credential hashing, signing key
//! rotation, session token issuance and verification, and revocation.
//! Persistence is delegated to the repository traits; everything else is
//! synchronous, CPU-bound and safe to share across worker threads.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    Claims, Credential, HashParams, IssuedToken, KeyState, RevocationEntry, RevocationTarget,
    SigningKey, VerifiedToken,
};
pub use errors::{AuthError, CredentialError, DomainError, DomainResult, StorageError, TokenError};
pub use repositories::{
    CredentialRepository, InMemoryCredentialRepository, InMemoryRevocationRepository,
    RevocationRepository,
};
pub use services::{
    AuthService, Clock, CredentialHasher, KeyRing, MaintenanceService, ManualClock,
    RevocationStore, SystemClock, TokenIssuer, TokenVerifier,
};
