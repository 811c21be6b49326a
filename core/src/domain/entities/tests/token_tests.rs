//! Unit tests for token entities

use crate::domain::entities::token::{
    Claims, TokenHeader, TokenPayload, VerifiedToken, RESERVED_CLAIMS, TOKEN_TYPE,
};
use serde_json::json;

fn payload(iat: i64, exp: i64) -> TokenPayload {
    let mut claims = Claims::new();
    claims.insert("role".to_string(), json!("admin"));
    TokenPayload {
        sub: "u1".to_string(),
        iat,
        iat_us: iat * 1_000_000 + 7,
        exp,
        jti: "token-1".to_string(),
        claims,
    }
}

#[test]
fn test_header_field_order() {
    let header = TokenHeader::new("HS256", "k1");
    let json = serde_json::to_string(&header).unwrap();

    assert_eq!(json, r#"{"alg":"HS256","kid":"k1","typ":"JWT"}"#);
    assert_eq!(header.typ, TOKEN_TYPE);
}

#[test]
fn test_payload_serialization_is_stable() {
    let mut claims = Claims::new();
    claims.insert("zone".to_string(), json!("eu"));
    claims.insert("app".to_string(), json!(7));
    let payload = TokenPayload {
        claims,
        ..payload(1000, 4600)
    };

    let json = serde_json::to_string(&payload).unwrap();
    assert_eq!(
        json,
        r#"{"sub":"u1","iat":1000,"iat_us":1000000007,"exp":4600,"jti":"token-1","claims":{"app":7,"zone":"eu"}}"#
    );
}

#[test]
fn test_payload_rejects_unknown_fields() {
    let json = r#"{"sub":"u1","iat":1,"iat_us":1000000,"exp":2,"jti":"t","claims":{},"admin":true}"#;
    assert!(serde_json::from_str::<TokenPayload>(json).is_err());
}

#[test]
fn test_expiry_boundary() {
    let payload = payload(1000, 4600);

    assert!(!payload.is_expired_at(4599));
    assert!(!payload.is_expired_at(4600));
    assert!(payload.is_expired_at(4601));
}

#[test]
fn test_verified_token_from_payload() {
    let verified = VerifiedToken::from(payload(1000, 4600));

    assert_eq!(verified.subject_id, "u1");
    assert_eq!(verified.token_id, "token-1");
    assert_eq!(verified.issued_at, 1000);
    assert_eq!(verified.issued_at_us, 1_000_000_007);
    assert_eq!(verified.expires_at, 4600);
    assert_eq!(verified.claims["role"], json!("admin"));
}

#[test]
fn test_reserved_claims() {
    for name in ["sub", "iat", "iat_us", "exp", "jti"] {
        assert!(RESERVED_CLAIMS.contains(&name));
    }
    assert!(!RESERVED_CLAIMS.contains(&"role"));
}
