//! Glob matching for cache keys.
//!
//! Supports `*` as a wildcard matching any sequence of characters, the same
//! semantics Redis applies to `KEYS`-style patterns restricted to `*`.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use cacheaside_core::cache::pattern_matches;
///
/// assert!(pattern_matches("person:get_all:", "person:get_all:"));
/// assert!(pattern_matches("person:*", "person:get_one:surname=t1"));
/// assert!(!pattern_matches("person:*", "invoice:get_all:"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pattern = pattern.as_bytes();
    let key = key.as_bytes();

    // Two-pointer walk with backtracking: remember the most recent `*` and
    // how much of the key it has swallowed so far, and on a mismatch widen
    // that wildcard by one byte and retry.
    let mut p = 0;
    let mut k = 0;
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            backtrack = Some((p, k));
            p += 1;
        } else if p < pattern.len() && pattern[p] == key[k] {
            p += 1;
            k += 1;
        } else if let Some((star, consumed)) = backtrack {
            p = star + 1;
            k = consumed + 1;
            backtrack = Some((star, consumed + 1));
        } else {
            return false;
        }
    }

    // Only trailing wildcards may remain unconsumed.
    while p < pattern.len() && pattern[p] == b'*' {
        p += 1;
    }
    p == pattern.len()
}
