//! Tests for the individual hash strategies

use warden_shared::HashAlgorithm;

use crate::errors::CredentialError;
use crate::services::credential::bcrypt_strategy::MAX_SECRET_LEN;
use crate::services::credential::{Argon2Strategy, BcryptStrategy, PasswordHashStrategy};

#[test]
fn test_bcrypt_params_from_hash() {
    let strategy = BcryptStrategy;
    let hash = strategy.hash(b"s3cret", 5).unwrap();

    let params = strategy.params(&hash).unwrap();
    assert_eq!(params.algorithm, HashAlgorithm::Bcrypt);
    assert_eq!(params.cost, 5);
}

#[test]
fn test_bcrypt_rejects_damaged_hash() {
    let strategy = BcryptStrategy;
    let hash = strategy.hash(b"s3cret", 4).unwrap();

    let truncated = &hash[..hash.len() - 1];
    assert_eq!(strategy.verify(b"s3cret", truncated), Err(CredentialError::MalformedHash));

    let bad_cost = hash.replacen("$04$", "$99$", 1);
    assert_eq!(strategy.verify(b"s3cret", &bad_cost), Err(CredentialError::MalformedHash));

    let bad_alphabet = format!("{}!", truncated);
    assert_eq!(strategy.verify(b"s3cret", &bad_alphabet), Err(CredentialError::MalformedHash));
}

#[test]
fn test_bcrypt_refuses_secrets_it_would_truncate() {
    let strategy = BcryptStrategy;
    assert_eq!(HashAlgorithm::Bcrypt.secret_limit(), Some(MAX_SECRET_LEN));

    let mut first = vec![b'x'; MAX_SECRET_LEN];
    first.extend_from_slice(b"first");
    let mut second = vec![b'x'; MAX_SECRET_LEN];
    second.extend_from_slice(b"second");

    assert!(matches!(
        strategy.hash(&first, 4),
        Err(CredentialError::InvalidInput { .. })
    ));

    let hash = strategy.hash(&first[..MAX_SECRET_LEN], 4).unwrap();
    assert_eq!(strategy.verify(&first[..MAX_SECRET_LEN], &hash), Ok(true));
    assert_eq!(strategy.verify(&first, &hash), Ok(false));
    assert_eq!(strategy.verify(&second, &hash), Ok(false));
    assert_eq!(strategy.verify(&first, "$2b$04$short"), Err(CredentialError::MalformedHash));
}

#[test]
fn test_argon2_params_from_hash() {
    let strategy = Argon2Strategy;
    let hash = strategy.hash(b"s3cret", 2).unwrap();

    assert!(hash.starts_with("$argon2id$"));
    let params = strategy.params(&hash).unwrap();
    assert_eq!(params.algorithm, HashAlgorithm::Argon2);
    assert_eq!(params.cost, 2);
}

#[test]
fn test_argon2_verify() {
    let strategy = Argon2Strategy;
    let hash = strategy.hash(b"s3cret", 1).unwrap();

    assert_eq!(strategy.verify(b"s3cret", &hash), Ok(true));
    assert_eq!(strategy.verify(b"wrong", &hash), Ok(false));
    assert_eq!(
        strategy.verify(b"s3cret", "$argon2id$v=19$m=19456,t=1,p=1"),
        Err(CredentialError::MalformedHash)
    );
}

#[test]
fn test_argon2_rejects_zero_cost() {
    let strategy = Argon2Strategy;

    assert!(!strategy.is_valid_cost(0));
    assert!(matches!(
        strategy.hash(b"s3cret", 0),
        Err(CredentialError::InvalidInput { .. })
    ));
}

#[test]
fn test_recognizes_prefixes() {
    assert!(BcryptStrategy.recognizes("$2b$10$abc"));
    assert!(!BcryptStrategy.recognizes("$argon2id$abc"));
    assert!(Argon2Strategy.recognizes("$argon2id$abc"));
    assert!(!Argon2Strategy.recognizes("$2y$10$abc"));
}
