//! Authentication service module
//!
//! This module provides the caller-facing operations:
//! - Credential registration, change and verification
//! - Login and session token issuance
//! - Session token verification
//! - Revocation of single sessions and of every session of a subject

mod service;

#[cfg(test)]
mod tests;

pub use service::AuthService;
