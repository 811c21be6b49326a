//! Unit tests for revocation entries

use crate::domain::entities::revocation::{RevocationEntry, RevocationTarget};
use crate::domain::entities::token::MICROS_PER_SEC;

const REVOKED_AT_US: i64 = 100 * MICROS_PER_SEC + 5;

#[test]
fn test_token_entry_covers_only_its_token() {
    let entry = RevocationEntry::new(RevocationTarget::Token("t1".to_string()), REVOKED_AT_US, 200);

    assert!(entry.covers("t1", "u1", 50));
    assert!(entry.covers("t1", "u1", REVOKED_AT_US + 1));
    assert!(!entry.covers("t2", "u1", 50));
}

#[test]
fn test_subject_entry_covers_tokens_stamped_before_revocation() {
    let entry = RevocationEntry::new(RevocationTarget::Subject("u1".to_string()), REVOKED_AT_US, 200);

    assert!(entry.covers("any", "u1", 99 * MICROS_PER_SEC));
    assert!(entry.covers("any", "u1", REVOKED_AT_US - 1));
    // Same second, issued after the revocation
    assert!(!entry.covers("any", "u1", REVOKED_AT_US + 1));
    assert!(!entry.covers("any", "u1", 101 * MICROS_PER_SEC));
    assert!(!entry.covers("any", "u2", 50));
}

#[test]
fn test_revoked_at_seconds() {
    let entry = RevocationEntry::new(RevocationTarget::Subject("u1".to_string()), REVOKED_AT_US, 200);
    assert_eq!(entry.revoked_at(), 100);
}

#[test]
fn test_entry_expiry() {
    let entry = RevocationEntry::new(RevocationTarget::Token("t1".to_string()), REVOKED_AT_US, 200);

    assert!(!entry.is_expired_at(199));
    assert!(entry.is_expired_at(200));
}

#[test]
fn test_target_serialization() {
    let target = RevocationTarget::Subject("u1".to_string());
    let json = serde_json::to_string(&target).unwrap();

    assert_eq!(json, r#"{"kind":"subject","id":"u1"}"#);
    assert_eq!(target.to_string(), "subject:u1");
}
