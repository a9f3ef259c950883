//! Cache backend implementations.
//!
//! Concrete implementations of the [`cacheaside_core::cache::Cache`]
//! contract. The in-memory backend is always available and backs the test
//! suite; the Redis backend is enabled with the `redis` feature for
//! multi-instance deployments.

mod memory;

#[cfg(feature = "redis")]
mod redis_impl;

pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use redis_impl::{RedisCache, RedisConfig};
