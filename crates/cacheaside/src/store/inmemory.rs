//! In-memory store backend with snapshot transactions.
//!
//! Rows live in a `HashMap` behind a synchronous lock so an unresolved
//! transaction can restore its snapshot from `Drop` without suspending.
//! Mutations are visible as soon as they return, matching a relational store
//! that flushes every write inside the ambient transaction; `begin` snapshots
//! the rows, `commit` discards the snapshot and `rollback` restores it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use cacheaside_core::store::{Entity, Predicate, Result, Store, StoreError, StoreTransaction};

type Rows<T> = Arc<RwLock<HashMap<<T as Entity>::Id, T>>>;

/// In-memory store for a single entity type.
///
/// One transaction may be open at a time per store instance; overlapping
/// transactions snapshot each other's uncommitted writes and are a caller
/// error.
pub struct MemoryStore<T: Entity> {
    rows: Rows<T>,
}

impl<T: Entity> MemoryStore<T> {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

#[async_trait]
impl<T: Entity> Store<T> for MemoryStore<T> {
    async fn fetch_all(&self) -> Result<Vec<T>> {
        Ok(self.rows.read().values().cloned().collect())
    }

    async fn fetch_matching(&self, predicate: &Predicate<T>) -> Result<Vec<T>> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|item| predicate.matches(item))
            .cloned()
            .collect())
    }

    async fn fetch_first(&self, predicate: &Predicate<T>) -> Result<Option<T>> {
        Ok(self
            .rows
            .read()
            .values()
            .find(|item| predicate.matches(item))
            .cloned())
    }

    async fn insert(&self, item: &T) -> Result<()> {
        let mut rows = self.rows.write();
        if rows.contains_key(&item.id()) {
            return Err(StoreError::AlreadyExists {
                entity_type: T::TYPE_TAG,
                id: format!("{:?}", item.id()),
            });
        }
        rows.insert(item.id(), item.clone());
        Ok(())
    }

    async fn update(&self, item: &T) -> Result<()> {
        let mut rows = self.rows.write();
        if !rows.contains_key(&item.id()) {
            return Err(StoreError::NotFound {
                entity_type: T::TYPE_TAG,
                id: format!("{:?}", item.id()),
            });
        }
        rows.insert(item.id(), item.clone());
        Ok(())
    }

    async fn remove(&self, item: &T) -> Result<()> {
        let mut rows = self.rows.write();
        if rows.remove(&item.id()).is_none() {
            return Err(StoreError::NotFound {
                entity_type: T::TYPE_TAG,
                id: format!("{:?}", item.id()),
            });
        }
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>> {
        let snapshot = self.rows.read().clone();
        Ok(Box::new(MemoryTransaction {
            rows: Arc::clone(&self.rows),
            snapshot: Some(snapshot),
            resolved: false,
        }))
    }
}

/// Snapshot transaction over a [`MemoryStore`].
struct MemoryTransaction<T: Entity> {
    rows: Rows<T>,
    snapshot: Option<HashMap<T::Id, T>>,
    resolved: bool,
}

impl<T: Entity> MemoryTransaction<T> {
    fn restore(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.rows.write() = snapshot;
        }
    }
}

#[async_trait]
impl<T: Entity> StoreTransaction for MemoryTransaction<T> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.resolved = true;
        self.snapshot = None;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.resolved = true;
        self.restore();
        Ok(())
    }
}

impl<T: Entity> Drop for MemoryTransaction<T> {
    fn drop(&mut self) {
        if !self.resolved {
            self.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{surname_is, Person};

    #[tokio::test]
    async fn test_insert_and_fetch_all() {
        let store = MemoryStore::new();
        let person = Person::new("A", "t1");

        store.insert(&person).await.unwrap();

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all, vec![person]);
    }

    #[tokio::test]
    async fn test_insert_duplicate_fails() {
        let store = MemoryStore::new();
        let person = Person::new("A", "t1");

        store.insert(&person).await.unwrap();
        let result = store.insert(&person).await;

        assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_matching_and_first() {
        let store = MemoryStore::new();
        store.insert(&Person::new("A", "t1")).await.unwrap();
        store.insert(&Person::new("B", "t2")).await.unwrap();

        let matching = store.fetch_matching(&surname_is("t1")).await.unwrap();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].name, "A");

        let first = store.fetch_first(&surname_is("t2")).await.unwrap();
        assert_eq!(first.map(|p| p.name), Some("B".to_string()));

        let none = store.fetch_first(&surname_is("t3")).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_row() {
        let store = MemoryStore::new();
        let mut person = Person::new("A", "t1");
        store.insert(&person).await.unwrap();

        person.name = "B".to_string();
        store.update(&person).await.unwrap();

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all[0].name, "B");
    }

    #[tokio::test]
    async fn test_update_missing_fails() {
        let store = MemoryStore::new();
        let result = store.update(&Person::new("A", "t1")).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryStore::new();
        let person = Person::new("A", "t1");
        store.insert(&person).await.unwrap();

        store.remove(&person).await.unwrap();
        assert!(store.is_empty());

        let result = store.remove(&person).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_commit_keeps_writes() {
        let store = MemoryStore::new();
        let person = Person::new("A", "t1");

        let txn = store.begin().await.unwrap();
        store.insert(&person).await.unwrap();
        txn.commit().await.unwrap();

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_rollback_restores_snapshot() {
        let store = MemoryStore::new();
        let kept = Person::new("A", "t1");
        store.insert(&kept).await.unwrap();

        let txn = store.begin().await.unwrap();
        store.insert(&Person::new("B", "t2")).await.unwrap();
        store.remove(&kept).await.unwrap();
        txn.rollback().await.unwrap();

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all, vec![kept]);
    }

    #[tokio::test]
    async fn test_drop_without_commit_rolls_back() {
        let store = MemoryStore::new();

        {
            let _txn = store.begin().await.unwrap();
            store.insert(&Person::new("A", "t1")).await.unwrap();
        }

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_committed_transaction_does_not_roll_back_on_drop() {
        let store = MemoryStore::new();

        let txn = store.begin().await.unwrap();
        store.insert(&Person::new("A", "t1")).await.unwrap();
        txn.commit().await.unwrap();
        // The handle was consumed by commit; its drop ran with the snapshot
        // already discarded.

        assert_eq!(store.len(), 1);
    }
}
