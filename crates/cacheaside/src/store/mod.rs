//! Store backend implementations.
//!
//! Concrete implementations of the [`cacheaside_core::store::Store`]
//! contract. Production deployments are expected to bring their own backend
//! (any ACID store with begin/commit/rollback fits the trait); the in-memory
//! backend here is the reference implementation and backs the test suite.

mod inmemory;

pub use inmemory::MemoryStore;
