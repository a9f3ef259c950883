use std::fmt::Debug;
use std::hash::Hash;

use async_trait::async_trait;

use super::{Predicate, Result};

/// A record type that can live in a store and be cached.
///
/// The type tag is compile-time-associated so cache-key namespaces never
/// depend on runtime reflection; it must be unique per entity type within one
/// cache service.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Stable tag naming this entity type. Namespaces its cache keys.
    const TYPE_TAG: &'static str;

    /// Primary identity used by stores to address the record.
    type Id: Clone + Eq + Hash + Debug + Send + Sync;

    fn id(&self) -> Self::Id;
}

/// Persistent store access for one entity type.
///
/// Mutations outside an explicit transaction are durable when the call
/// returns.
#[async_trait]
pub trait Store<T: Entity>: Send + Sync {
    /// Returns all entities of type `T`.
    async fn fetch_all(&self) -> Result<Vec<T>>;

    /// Returns all entities matching the predicate.
    async fn fetch_matching(&self, predicate: &Predicate<T>) -> Result<Vec<T>>;

    /// Returns the first entity matching the predicate, if any.
    async fn fetch_first(&self, predicate: &Predicate<T>) -> Result<Option<T>>;

    /// Persists a new entity.
    async fn insert(&self, item: &T) -> Result<()>;

    /// Persists changes to an existing entity.
    async fn update(&self, item: &T) -> Result<()>;

    /// Removes an entity.
    async fn remove(&self, item: &T) -> Result<()>;

    /// Opens a store-level transaction scoping subsequent mutations.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>>;
}

/// Handle for an open store transaction.
///
/// Implementations must roll the transaction back when the handle is dropped
/// without `commit` having been called, so an abandoned handle can never
/// leave the store transaction open.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Commits all pending mutations.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discards all pending mutations.
    async fn rollback(self: Box<Self>) -> Result<()>;
}
