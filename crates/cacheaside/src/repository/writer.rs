//! Cached writer repository.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use cacheaside_core::cache::{invalidation_pattern, Cache};
use cacheaside_core::store::{Entity, Store};

use super::transaction::CommitHook;
use super::{Result, Transaction};

/// Write side of the cache-aside pattern.
///
/// Every mutation goes to the store first; only after the store accepts it
/// does the writer invalidate the entity type's whole cache namespace
/// (`"{tag}:*"`). Readers repopulate lazily on their next miss, so a failed
/// store write leaves the cache untouched and still valid.
///
/// While a [`Transaction`] opened through
/// [`begin_transaction`](Self::begin_transaction) is unresolved, mutations
/// still reach the store (they ride the store's ambient transaction) but the
/// invalidation is deferred: it runs once, on commit, or never if the
/// transaction rolls back. A rolled-back transaction's writes were undone by
/// the store, so the untouched cache is consistent with it.
pub struct CachedWriter<T, S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    current_txn: Mutex<Option<Arc<AtomicBool>>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S, C> CachedWriter<T, S, C>
where
    T: Entity,
    S: Store<T>,
    C: Cache + 'static,
{
    /// Creates a writer over a store and a cache.
    pub fn new(store: Arc<S>, cache: Arc<C>) -> Self {
        Self {
            store,
            cache,
            current_txn: Mutex::new(None),
            _entity: PhantomData,
        }
    }

    /// Inserts a new entity, then invalidates the type's cache namespace.
    pub async fn add(&self, item: &T) -> Result<()> {
        self.store.insert(item).await?;
        self.invalidate_unless_deferred().await
    }

    /// Updates an existing entity, then invalidates the type's cache
    /// namespace.
    pub async fn update(&self, item: &T) -> Result<()> {
        self.store.update(item).await?;
        self.invalidate_unless_deferred().await
    }

    /// Removes an entity, then invalidates the type's cache namespace.
    pub async fn remove(&self, item: &T) -> Result<()> {
        self.store.remove(item).await?;
        self.invalidate_unless_deferred().await
    }

    /// Opens a transaction on the underlying store.
    ///
    /// Cache invalidation for mutations made while the handle is open is
    /// deferred to its commit, where it runs once for the whole batch,
    /// followed by `on_committed` if one was given. The hook never runs on
    /// rollback or drop.
    ///
    /// The writer tracks a single current transaction. Opening another one
    /// while the previous handle is unresolved is a caller error: the writer
    /// forgets the old handle and defers to the new one.
    pub async fn begin_transaction(
        &self,
        on_committed: Option<Box<dyn FnOnce() + Send>>,
    ) -> Result<Transaction> {
        let inner = self.store.begin().await?;
        let resolved = Arc::new(AtomicBool::new(false));

        {
            let mut slot = self.current_txn.lock();
            if slot.as_ref().is_some_and(|prior| !prior.load(Ordering::Acquire)) {
                tracing::warn!(
                    entity_type = T::TYPE_TAG,
                    "transaction opened while another is unresolved"
                );
            }
            *slot = Some(Arc::clone(&resolved));
        }

        let cache = Arc::clone(&self.cache);
        let pattern = invalidation_pattern(T::TYPE_TAG);
        let hook: CommitHook = Box::new(move || {
            Box::pin(async move {
                tracing::debug!(pattern, "invalidating cache namespace");
                cache.delete_pattern(&pattern).await?;
                if let Some(callback) = on_committed {
                    callback();
                }
                Ok(())
            })
        });

        Ok(Transaction::new(inner, resolved, hook))
    }

    /// Whether a transaction opened through this writer is still unresolved.
    pub fn transaction_open(&self) -> bool {
        self.current_txn
            .lock()
            .as_ref()
            .is_some_and(|resolved| !resolved.load(Ordering::Acquire))
    }

    async fn invalidate_unless_deferred(&self) -> Result<()> {
        if self.transaction_open() {
            tracing::trace!(
                entity_type = T::TYPE_TAG,
                "invalidation deferred to open transaction"
            );
            return Ok(());
        }
        let pattern = invalidation_pattern(T::TYPE_TAG);
        tracing::debug!(pattern, "invalidating cache namespace");
        self.cache.delete_pattern(&pattern).await?;
        Ok(())
    }
}
