//! Tests for InMemoryRevocationRepository

use crate::domain::entities::revocation::{RevocationEntry, RevocationTarget};
use crate::repositories::revocation::{InMemoryRevocationRepository, RevocationRepository};

#[tokio::test]
async fn test_append_and_load_in_order() {
    let repo = InMemoryRevocationRepository::new();
    let first = RevocationEntry::new(RevocationTarget::Token("t1".to_string()), 100, 200);
    let second = RevocationEntry::new(RevocationTarget::Subject("u1".to_string()), 150, 300);

    repo.append_revocation(first.clone()).await.unwrap();
    repo.append_revocation(second.clone()).await.unwrap();

    assert_eq!(repo.load_revocations().await.unwrap(), vec![first, second]);
}

#[tokio::test]
async fn test_unavailable_append_records_nothing() {
    let repo = InMemoryRevocationRepository::new();
    repo.set_unavailable(true);

    let entry = RevocationEntry::new(RevocationTarget::Token("t1".to_string()), 100, 200);
    assert!(repo.append_revocation(entry).await.is_err());
    assert!(repo.load_revocations().await.is_err());

    repo.set_unavailable(false);
    assert!(repo.is_empty().await);
}
