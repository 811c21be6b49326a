//! Session token module
//!
//! This module handles all token-related operations including:
//! - Deterministic encoding and strict decoding of the token format
//! - HMAC signing with the key ring's keys
//! - Issuance with bounded TTLs
//! - Ordered verification including revocation checks

pub mod codec;
mod issuer;
mod signer;
mod verifier;

#[cfg(test)]
mod tests;

pub use codec::{DecodedToken, MAX_TOKEN_LEN};
pub use issuer::TokenIssuer;
pub use signer::{HmacSigner, TokenSigner};
pub use verifier::TokenVerifier;
