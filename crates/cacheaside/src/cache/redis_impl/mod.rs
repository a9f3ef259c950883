//! Redis cache backend.
//!
//! Distributed cache for multi-instance deployments. Written keys are
//! tracked per type tag in a Redis Set so pattern deletion never needs SCAN.

mod cache;
mod config;

pub use cache::RedisCache;
pub use config::RedisConfig;
