mod error;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    cache_key, invalidation_pattern, ops, tracking_key, type_tag_of_key, type_tag_of_pattern,
};
pub use patterns::pattern_matches;
pub use serialization::{from_cache_bytes, to_cache_bytes};
pub use traits::Cache;
