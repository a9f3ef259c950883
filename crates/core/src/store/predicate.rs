//! Caller-supplied filter conditions.

use std::fmt;
use std::sync::Arc;

/// A filter over entities of type `T`, paired with a stable discriminator
/// string identifying the filter in cache keys.
///
/// The caching layer treats two predicates with the same discriminator as the
/// same logical query, so callers must keep discriminators unique per
/// distinct filter and stable across runs. Passing the discriminator
/// explicitly avoids depending on any printable representation of the filter
/// itself.
///
/// # Examples
///
/// ```
/// use cacheaside_core::store::Predicate;
///
/// struct Person { surname: String }
///
/// let p = Predicate::new("surname=t1", |person: &Person| person.surname == "t1");
/// assert_eq!(p.discriminator(), "surname=t1");
/// assert!(p.matches(&Person { surname: "t1".into() }));
/// ```
pub struct Predicate<T> {
    discriminator: String,
    test: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Predicate<T> {
    /// Creates a predicate from a discriminator and a filter closure.
    pub fn new(
        discriminator: impl Into<String>,
        test: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            discriminator: discriminator.into(),
            test: Arc::new(test),
        }
    }

    /// The stable cache-key discriminator for this filter.
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Evaluates the filter against one entity.
    pub fn matches(&self, item: &T) -> bool {
        (self.test)(item)
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            discriminator: self.discriminator.clone(),
            test: Arc::clone(&self.test),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("discriminator", &self.discriminator)
            .finish_non_exhaustive()
    }
}
