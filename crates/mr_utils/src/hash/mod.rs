//! Provide hash containers, re-exports *hashbrown* and *foldhash*.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`] as the default hashing provider.
///
/// # Examples
///
/// ```
/// use mr_utils::hash::HashMap;
///
/// let mut ids: HashMap<&str, u32> = HashMap::default();
/// ids.insert("car", 1);
///
/// assert_eq!(ids.get("car"), Some(&1));
/// ```
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] as the default hashing provider.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{HashMap, HashSet};
    use alloc::string::{String, ToString};

    #[test]
    fn map_with_owned_keys() {
        let mut map: HashMap<String, usize> = HashMap::default();
        map.insert("a".to_string(), 1);
        map.insert("a".to_string(), 2);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some(&2));
    }

    #[test]
    fn set_dedup() {
        let mut set: HashSet<&str> = HashSet::default();
        assert!(set.insert("x"));
        assert!(!set.insert("x"));
    }
}
