//! Insertion-ordered resource sets.

use indexmap::IndexMap;

use crate::bundle::ResourceValue;

/// An ordered mapping from resource key to typed payload.
///
/// Keys are slash-delimited, URL-percent-escaped path-like strings, unique
/// within a set. Iteration order is insertion order, which the bundle writer
/// preserves so that repeated runs produce identical output. A set lives for
/// one command invocation: loaded, transformed into a fresh set, persisted,
/// dropped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResourceSet {
    entries: IndexMap<String, ResourceValue>,
}

impl ResourceSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry. An existing key keeps its position, only the
    /// payload is replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: ResourceValue) {
        self.entries.insert(key.into(), value);
    }

    /// Looks up a payload by exact key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ResourceValue> {
        self.entries.get(key)
    }

    /// Whether the set contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, ResourceValue)> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = (String, ResourceValue)>>(iter: I) -> Self {
        ResourceSet {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_preserved() {
        let mut set = ResourceSet::new();
        set.insert("z/last.png", ResourceValue::Stream(vec![1]));
        set.insert("a/first.png", ResourceValue::Stream(vec![2]));
        set.insert("m/middle.txt", ResourceValue::String("hi".into()));

        let keys: Vec<&str> = set.keys().collect();
        assert_eq!(keys, ["z/last.png", "a/first.png", "m/middle.txt"]);
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut set = ResourceSet::new();
        set.insert("one", ResourceValue::Int32(1));
        set.insert("two", ResourceValue::Int32(2));
        set.insert("one", ResourceValue::Int32(10));

        let keys: Vec<&str> = set.keys().collect();
        assert_eq!(keys, ["one", "two"]);
        assert_eq!(set.get("one"), Some(&ResourceValue::Int32(10)));
    }
}
