pub mod credential;
pub mod revocation;

pub use credential::{CredentialRepository, InMemoryCredentialRepository};
pub use revocation::{InMemoryRevocationRepository, RevocationRepository};
