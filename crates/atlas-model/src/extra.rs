use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Optional sparse attribute map attached to a tree node.
///
/// Stored as a flat, key-sorted pair array rather than a map: most nodes
/// carry no extra attributes and the few that do carry very few, so the
/// compact array wins on per-node memory at scale. The no-attributes case
/// allocates nothing.
///
/// Reads hand out deep copies. Mutating a map returned by
/// [`ExtraAttributes::as_map`] never affects the owning node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraAttributes {
    entries: Box<[(String, Value)]>,
}

impl ExtraAttributes {
    /// The shared no-attributes instance.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a key-value map. An empty map yields the shared empty
    /// instance; the caller's map is consumed, never referenced.
    pub fn of(map: BTreeMap<String, Value>) -> Self {
        if map.is_empty() {
            return Self::empty();
        }
        // BTreeMap iteration is key-ordered, so the flat array stays sorted.
        Self {
            entries: map.into_iter().collect(),
        }
    }

    /// Look up a value by key, returning an independent copy.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|i| self.entries[i].1.clone())
    }

    /// A fresh map copy of all entries.
    pub fn as_map(&self) -> BTreeMap<String, Value> {
        self.entries.iter().cloned().collect()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no attributes are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
