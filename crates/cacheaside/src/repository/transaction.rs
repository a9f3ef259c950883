//! Transaction handle with deferred cache invalidation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;

use cacheaside_core::store::StoreTransaction;

use super::Result;

/// Hook run exactly once, after a successful commit: cache invalidation
/// first, then the caller's callback.
pub(crate) type CommitHook = Box<dyn FnOnce() -> BoxFuture<'static, Result<()>> + Send>;

/// A store transaction that runs its commit hook exactly once, on commit
/// only.
///
/// The handle is open until [`commit`](Self::commit) or
/// [`rollback`](Self::rollback) resolves it; both states are terminal.
/// Dropping an open handle rolls the underlying store transaction back (via
/// the store handle's own drop contract) and discards the hook, so an
/// abandoned transaction neither leaks a store transaction nor invalidates
/// the cache.
pub struct Transaction {
    inner: Option<Box<dyn StoreTransaction>>,
    resolved: Arc<AtomicBool>,
    on_commit: Option<CommitHook>,
}

impl Transaction {
    pub(crate) fn new(
        inner: Box<dyn StoreTransaction>,
        resolved: Arc<AtomicBool>,
        on_commit: CommitHook,
    ) -> Self {
        Self {
            inner: Some(inner),
            resolved,
            on_commit: Some(on_commit),
        }
    }

    /// Commits the underlying store transaction, then runs the commit hook.
    ///
    /// If the store commit fails the hook never runs and the error
    /// propagates; the handle counts as resolved either way, and the
    /// consumed store handle has rolled back on its own drop path.
    pub async fn commit(&mut self) -> Result<()> {
        let Some(inner) = self.inner.take() else {
            tracing::warn!("commit on a resolved transaction ignored");
            return Ok(());
        };

        let outcome = inner.commit().await;
        self.resolved.store(true, Ordering::Release);
        outcome?;
        tracing::debug!("transaction committed");

        if let Some(hook) = self.on_commit.take() {
            hook().await?;
        }
        Ok(())
    }

    /// Rolls the underlying store transaction back. The commit hook is
    /// discarded, never run.
    pub async fn rollback(&mut self) -> Result<()> {
        let Some(inner) = self.inner.take() else {
            tracing::warn!("rollback on a resolved transaction ignored");
            return Ok(());
        };

        self.on_commit = None;
        let outcome = inner.rollback().await;
        self.resolved.store(true, Ordering::Release);
        outcome?;
        tracing::debug!("transaction rolled back");
        Ok(())
    }

    /// Whether the transaction has been committed or rolled back.
    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::Acquire)
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.inner.take().is_some() {
            // The dropped store handle rolls itself back per its contract.
            self.resolved.store(true, Ordering::Release);
            tracing::warn!("transaction dropped while open; rolled back");
        }
    }
}
