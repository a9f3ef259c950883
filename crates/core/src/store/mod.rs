mod error;
mod predicate;
mod traits;

pub use error::{Result, StoreError};
pub use predicate::Predicate;
pub use traits::{Entity, Store, StoreTransaction};
