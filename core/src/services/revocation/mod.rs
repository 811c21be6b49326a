//! Token and subject revocation.

pub mod store;

pub use store::RevocationStore;

#[cfg(test)]
mod tests;
