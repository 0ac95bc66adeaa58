use indexmap::map::Entry;
use indexmap::IndexMap;
use std::hash::Hash;

/// Keyed running totals that remember first-seen key order.
///
/// The derived series are charted in the order rows arrive, so the ordering
/// contract is explicit here rather than an accident of map iteration.
pub struct Accumulator<K, V> {
    entries: IndexMap<K, V>,
}

impl<K: Hash + Eq, V: Default> Accumulator<K, V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Apply `f` to the running value for `key`, creating it lazily on
    /// first encounter.
    pub fn update(&mut self, key: K, f: impl FnOnce(&mut V)) {
        f(self.entries.entry(key).or_default());
    }

    /// Fold another accumulator in. Keys already present keep their
    /// position; unseen keys append in `other`'s order.
    pub fn merge(&mut self, other: Self, combine: impl Fn(&mut V, V)) {
        for (key, value) in other.entries {
            match self.entries.entry(key) {
                Entry::Occupied(mut slot) => combine(slot.get_mut(), value),
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Entries in first-seen order.
    pub fn into_entries(self) -> impl Iterator<Item = (K, V)> {
        self.entries.into_iter()
    }
}

impl<K: Hash + Eq, V: Default> Default for Accumulator<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
