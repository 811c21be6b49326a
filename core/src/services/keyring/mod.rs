//! Signing key management.

pub mod key_ring;

pub use key_ring::KeyRing;
