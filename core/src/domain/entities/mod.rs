//! Domain entities representing credentials, keys, tokens and revocations.

pub mod credential;
pub mod revocation;
pub mod signing_key;
pub mod token;

// Re-export commonly used types
pub use credential::{Credential, HashParams};
pub use revocation::{RevocationEntry, RevocationTarget};
pub use signing_key::{KeyState, SigningKey, MIN_KEY_MATERIAL_LEN};
pub use token::{
    Claims, IssuedToken, TokenHeader, TokenPayload, VerifiedToken, MICROS_PER_SEC, RESERVED_CLAIMS,
    TOKEN_TYPE,
};

#[cfg(test)]
mod tests;
