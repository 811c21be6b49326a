//! Tests for RevocationStore

use std::sync::Arc;
use std::thread;

use crate::domain::entities::revocation::{RevocationEntry, RevocationTarget};
use crate::domain::entities::token::MICROS_PER_SEC;
use crate::services::revocation::RevocationStore;

fn token(id: &str) -> RevocationTarget {
    RevocationTarget::Token(id.to_string())
}

fn subject(id: &str) -> RevocationTarget {
    RevocationTarget::Subject(id.to_string())
}

/// Stamp at the start of second `secs`
fn at(secs: i64) -> i64 {
    secs * MICROS_PER_SEC
}

#[test]
fn test_revoke_and_check() {
    let store = RevocationStore::new(10_000);

    assert!(store.revoke(RevocationEntry::new(token("t1"), at(100), 500), 100).unwrap());

    assert!(store.is_revoked(&token("t1"), 100).unwrap());
    assert!(store.is_revoked(&token("t1"), 499).unwrap());
    assert!(!store.is_revoked(&token("t1"), 500).unwrap());
    assert!(!store.is_revoked(&token("t2"), 100).unwrap());
}

#[test]
fn test_revoke_is_idempotent() {
    let store = RevocationStore::new(10_000);
    let entry = RevocationEntry::new(token("t1"), at(100), 500);

    assert!(store.revoke(entry.clone(), 100).unwrap());
    assert!(!store.revoke(entry, 150).unwrap());
    assert!(!store.revoke(RevocationEntry::new(token("t1"), at(200), 900), 200).unwrap());
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_later_subject_revocation_replaces_earlier() {
    let store = RevocationStore::new(10_000);

    store.revoke(RevocationEntry::new(subject("u1"), at(100), 500), 100).unwrap();
    assert!(!store.is_token_revoked("t-late", "u1", at(200), 200).unwrap());

    assert!(store.revoke(RevocationEntry::new(subject("u1"), at(200) + 1, 600), 200).unwrap());
    assert!(store.is_token_revoked("t-late", "u1", at(200), 200).unwrap());
    assert!(!store.revoke(RevocationEntry::new(subject("u1"), at(150), 600), 200).unwrap());
}

#[test]
fn test_subject_revocation_spares_newer_tokens() {
    let store = RevocationStore::new(10_000);
    store.revoke(RevocationEntry::new(subject("u1"), at(100), 500), 100).unwrap();

    assert!(store.is_token_revoked("t-old", "u1", at(90), 120).unwrap());
    assert!(store.is_token_revoked("t-just-before", "u1", at(100) - 1, 120).unwrap());
    assert!(!store.is_token_revoked("t-same-second", "u1", at(100) + 1, 120).unwrap());
    assert!(!store.is_token_revoked("t-new", "u1", at(101), 120).unwrap());
    assert!(!store.is_token_revoked("t-other", "u2", at(90), 120).unwrap());
}

#[test]
fn test_prune_expired() {
    let store = RevocationStore::new(10_000);
    store.revoke(RevocationEntry::new(token("t1"), at(100), 200), 100).unwrap();
    store.revoke(RevocationEntry::new(token("t2"), at(100), 300), 100).unwrap();

    assert_eq!(store.prune_expired(199).unwrap(), 0);
    assert_eq!(store.prune_expired(200).unwrap(), 1);
    assert!(!store.is_revoked(&token("t1"), 150).unwrap());
    assert!(store.is_revoked(&token("t2"), 250).unwrap());
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_retention_ceiling_clamps_expiry() {
    let store = RevocationStore::new(1000);
    store.revoke(RevocationEntry::new(token("t1"), at(100), i64::MAX), 100).unwrap();

    assert!(store.is_revoked(&token("t1"), 1099).unwrap());
    assert_eq!(store.prune_expired(1100).unwrap(), 1);
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_expired_entry_not_inserted() {
    let store = RevocationStore::new(10_000);

    assert!(!store.revoke(RevocationEntry::new(token("t1"), at(100), 200), 250).unwrap());
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_restore_skips_expired_and_duplicates() {
    let store = RevocationStore::new(10_000);
    let entries = vec![
        RevocationEntry::new(token("t1"), at(100), 500),
        RevocationEntry::new(token("t1"), at(100), 500),
        RevocationEntry::new(token("t2"), at(100), 150),
        RevocationEntry::new(subject("u1"), at(120), 600),
    ];

    assert_eq!(store.restore(entries, 200).unwrap(), 2);
    assert!(store.is_revoked(&token("t1"), 200).unwrap());
    assert!(!store.is_revoked(&token("t2"), 200).unwrap());
    assert!(store.is_token_revoked("t9", "u1", at(110), 200).unwrap());
}

#[test]
fn test_concurrent_revokes_are_all_visible() {
    let store = Arc::new(RevocationStore::new(10_000));

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    let target = token(&format!("t{}-{}", n, i));
                    store.revoke(RevocationEntry::new(target.clone(), at(100), 500), 100).unwrap();
                    assert!(store.is_revoked(&target, 100).unwrap());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.len().unwrap(), 400);
}
