//! In-memory revocation set

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::domain::entities::revocation::{RevocationEntry, RevocationTarget};
use crate::errors::{DomainError, DomainResult};

type EntryMap = HashMap<RevocationTarget, RevocationEntry>;

/// Set of revoked tokens and subjects
///
/// Lookups read an immutable snapshot. Inserts and prunes are serialised
/// and publish a new map, so a check concurrent with a revoke sees the
/// entry either fully or not at all.
pub struct RevocationStore {
    entries: RwLock<Arc<EntryMap>>,
    writer: Mutex<()>,
    /// Upper bound on any entry's lifetime
    retention_ceiling: i64,
}

impl RevocationStore {
    pub fn new(retention_ceiling: i64) -> Self {
        Self {
            entries: RwLock::new(Arc::new(HashMap::new())),
            writer: Mutex::new(()),
            retention_ceiling,
        }
    }

    fn snapshot(&self) -> DomainResult<Arc<EntryMap>> {
        self.entries
            .read()
            .map(|entries| Arc::clone(&*entries))
            .map_err(|e| DomainError::internal(format!("Failed to read revocations: {}", e)))
    }

    /// Apply `change` to a copy of the current map and publish it
    fn update<T>(&self, change: impl FnOnce(&mut EntryMap) -> T) -> DomainResult<T> {
        let _guard = self
            .writer
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to acquire revocation lock: {}", e)))?;

        let mut next = (*self.snapshot()?).clone();
        let result = change(&mut next);

        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to write revocations: {}", e)))?;
        *entries = Arc::new(next);
        Ok(result)
    }

    fn clamp(&self, mut entry: RevocationEntry) -> RevocationEntry {
        entry.expires_at = entry
            .expires_at
            .min(entry.revoked_at().saturating_add(self.retention_ceiling));
        entry
    }

    /// Record a revocation
    ///
    /// Re-revoking is a no-op while a live entry already covers the target.
    /// A later subject revocation replaces an earlier one, since it covers
    /// every token the earlier one did and more.
    ///
    /// # Returns
    ///
    /// `true` if the store changed
    pub fn revoke(&self, entry: RevocationEntry, now: i64) -> DomainResult<bool> {
        let entry = self.clamp(entry);
        if entry.is_expired_at(now) {
            return Ok(false);
        }

        self.update(|entries| Self::insert(entries, entry, now))
    }

    fn insert(entries: &mut EntryMap, entry: RevocationEntry, now: i64) -> bool {
        if let Some(existing) = entries.get(&entry.target) {
            let covered = match entry.target {
                RevocationTarget::Token(_) => true,
                RevocationTarget::Subject(_) => existing.revoked_at_us >= entry.revoked_at_us,
            };
            if covered && !existing.is_expired_at(now) {
                return false;
            }
        }
        entries.insert(entry.target.clone(), entry);
        true
    }

    /// Whether `target` has a live revocation at `now`
    pub fn is_revoked(&self, target: &RevocationTarget, now: i64) -> DomainResult<bool> {
        let entries = self.snapshot()?;
        Ok(entries
            .get(target)
            .map_or(false, |entry| !entry.is_expired_at(now)))
    }

    /// Whether a token is revoked by its own id or by a subject revocation
    ///
    /// `issued_at_us` is the token's issuance stamp.
    pub fn is_token_revoked(
        &self,
        token_id: &str,
        subject_id: &str,
        issued_at_us: i64,
        now: i64,
    ) -> DomainResult<bool> {
        let entries = self.snapshot()?;
        let live = |target: RevocationTarget| {
            entries
                .get(&target)
                .filter(|entry| !entry.is_expired_at(now))
                .map_or(false, |entry| entry.covers(token_id, subject_id, issued_at_us))
        };

        Ok(live(RevocationTarget::Token(token_id.to_string()))
            || live(RevocationTarget::Subject(subject_id.to_string())))
    }

    /// Remove entries whose `expires_at` has passed
    ///
    /// # Returns
    ///
    /// Number of entries removed
    pub fn prune_expired(&self, now: i64) -> DomainResult<usize> {
        self.update(|entries| {
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            before - entries.len()
        })
    }

    /// Load persisted entries, skipping the ones already expired
    ///
    /// # Returns
    ///
    /// Number of entries that changed the store
    pub fn restore(&self, restored: Vec<RevocationEntry>, now: i64) -> DomainResult<usize> {
        let restored: Vec<_> = restored
            .into_iter()
            .map(|entry| self.clamp(entry))
            .filter(|entry| !entry.is_expired_at(now))
            .collect();

        self.update(|entries| {
            restored
                .into_iter()
                .filter(|entry| Self::insert(entries, entry.clone(), now))
                .count()
        })
    }

    pub fn len(&self) -> DomainResult<usize> {
        Ok(self.snapshot()?.len())
    }

    pub fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.snapshot()?.is_empty())
    }
}
