//! Tests for TokenVerifier

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::json;

use super::fixture;
use crate::domain::entities::revocation::{RevocationEntry, RevocationTarget};
use crate::domain::entities::token::{Claims, TokenPayload};
use crate::errors::{DomainError, TokenError};
use crate::services::clock::Clock;

fn token_error(result: Result<impl std::fmt::Debug, DomainError>) -> TokenError {
    match result {
        Err(DomainError::Token(error)) => error,
        other => panic!("expected token error, got {:?}", other),
    }
}

#[test]
fn test_verify_returns_identity() {
    let fixture = fixture();
    let mut claims = Claims::new();
    claims.insert("role".to_string(), json!("admin"));
    let issued = fixture.issuer.issue("u1", claims, 3600).unwrap();

    let verified = fixture.verifier.verify(&issued.token).unwrap();

    assert_eq!(verified.subject_id, "u1");
    assert_eq!(verified.token_id, issued.token_id);
    assert_eq!(verified.issued_at, 1000);
    assert_eq!(verified.expires_at, 4600);
    assert_eq!(verified.claims["role"], json!("admin"));
}

#[test]
fn test_expiry_boundary() {
    let fixture = fixture();
    let issued = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();

    assert!(fixture.verifier.verify_at(&issued.token, 4599).is_ok());
    assert!(fixture.verifier.verify_at(&issued.token, 4600).is_ok());
    assert_eq!(
        token_error(fixture.verifier.verify_at(&issued.token, 4601)),
        TokenError::ExpiredToken
    );

    fixture.clock.set(5000);
    assert_eq!(token_error(fixture.verifier.verify(&issued.token)), TokenError::ExpiredToken);
}

#[test]
fn test_tampered_payload_fails_signature() {
    let fixture = fixture();
    let issued = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();
    let parts: Vec<&str> = issued.token.split('.').collect();

    let forged = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&TokenPayload {
            sub: "admin".to_string(),
            iat: 1000,
            iat_us: 1_000_000_000,
            exp: 4600,
            jti: issued.token_id.clone(),
            claims: Claims::new(),
        })
        .unwrap(),
    );
    let token = format!("{}.{}.{}", parts[0], forged, parts[2]);

    assert_eq!(token_error(fixture.verifier.verify(&token)), TokenError::InvalidSignature);
}

#[test]
fn test_tampered_signature() {
    let fixture = fixture();
    let issued = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();
    let (signed, signature) = issued.token.rsplit_once('.').unwrap();

    let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
    bytes[0] ^= 0x01;
    let token = format!("{}.{}", signed, URL_SAFE_NO_PAD.encode(bytes));

    assert_eq!(token_error(fixture.verifier.verify(&token)), TokenError::InvalidSignature);
}

#[test]
fn test_algorithm_mismatch_rejected() {
    let fixture = fixture();
    let issued = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();
    let parts: Vec<&str> = issued.token.split('.').collect();

    let header = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&json!({"alg": "HS512", "kid": issued.key_id, "typ": "JWT"})).unwrap(),
    );
    let token = format!("{}.{}.{}", header, parts[1], parts[2]);

    assert_eq!(token_error(fixture.verifier.verify(&token)), TokenError::InvalidSignature);
}

#[test]
fn test_unknown_key() {
    let fixture = fixture();
    let issued = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();
    let parts: Vec<&str> = issued.token.split('.').collect();

    let header = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&json!({"alg": "HS256", "kid": "nope", "typ": "JWT"})).unwrap(),
    );
    let token = format!("{}.{}.{}", header, parts[1], parts[2]);

    assert_eq!(
        token_error(fixture.verifier.verify(&token)),
        TokenError::UnknownKey {
            key_id: "nope".to_string()
        }
    );
}

#[test]
fn test_malformed_checked_before_key() {
    let fixture = fixture();
    assert_eq!(token_error(fixture.verifier.verify("abc.def")), TokenError::MalformedToken);
}

#[test]
fn test_rotation_keeps_old_tokens_valid() {
    let fixture = fixture();
    let old = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();

    fixture.key_ring.rotate_generated().unwrap();
    let new = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();

    assert_ne!(old.key_id, new.key_id);
    assert!(fixture.verifier.verify(&old.token).is_ok());
    assert!(fixture.verifier.verify(&new.token).is_ok());
}

#[test]
fn test_purged_key_makes_token_unknown() {
    let fixture = fixture();
    let old = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();

    fixture.key_ring.rotate_generated().unwrap();
    let max_ttl = fixture.issuer.max_ttl();
    fixture.key_ring.purge_expired(1000 + max_ttl + 1).unwrap();

    assert!(matches!(
        token_error(fixture.verifier.verify_at(&old.token, 2000)),
        TokenError::UnknownKey { .. }
    ));
}

#[test]
fn test_revoked_token() {
    let fixture = fixture();
    let issued = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();
    let other = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();

    fixture
        .revocations
        .revoke(
            RevocationEntry::new(
                RevocationTarget::Token(issued.token_id.clone()),
                fixture.clock.stamp(),
                issued.expires_at,
            ),
            1000,
        )
        .unwrap();

    assert_eq!(token_error(fixture.verifier.verify(&issued.token)), TokenError::RevokedToken);
    assert!(fixture.verifier.verify(&other.token).is_ok());
    assert!(fixture.verifier.authenticate_at(&issued.token, 1000).is_ok());
}

#[test]
fn test_subject_revocation() {
    let fixture = fixture();
    let before = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();

    fixture
        .revocations
        .revoke(
            RevocationEntry::new(
                RevocationTarget::Subject("u1".to_string()),
                fixture.clock.stamp(),
                1000 + 86400,
            ),
            1000,
        )
        .unwrap();

    // Same second as the revocation, but issued after it
    let after = fixture.issuer.issue("u1", Claims::new(), 3600).unwrap();

    assert_eq!(before.issued_at, after.issued_at);
    assert_eq!(token_error(fixture.verifier.verify(&before.token)), TokenError::RevokedToken);
    assert!(fixture.verifier.verify(&after.token).is_ok());
}

#[test]
fn test_expiry_checked_before_revocation() {
    let fixture = fixture();
    let issued = fixture.issuer.issue("u1", Claims::new(), 60).unwrap();
    fixture
        .revocations
        .revoke(
            RevocationEntry::new(
                RevocationTarget::Token(issued.token_id.clone()),
                fixture.clock.stamp(),
                5000,
            ),
            1000,
        )
        .unwrap();

    assert_eq!(
        token_error(fixture.verifier.verify_at(&issued.token, 2000)),
        TokenError::ExpiredToken
    );
}
