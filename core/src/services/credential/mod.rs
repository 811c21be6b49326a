//! Credential hashing.
//!
//! - `hasher` - Algorithm dispatch, length limits and rehash detection
//! - `bcrypt_strategy` - bcrypt, the default algorithm
//! - `argon2_strategy` - Argon2id

pub mod argon2_strategy;
pub mod bcrypt_strategy;
pub mod hasher;
pub mod strategy;

pub use argon2_strategy::Argon2Strategy;
pub use bcrypt_strategy::BcryptStrategy;
pub use hasher::CredentialHasher;
pub use strategy::PasswordHashStrategy;

#[cfg(test)]
mod tests;
