//! Collection helpers

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::hash::Hash;

/// Insertion-ordered map from a key to one or more values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize + Hash + Eq, V: Serialize",
    deserialize = "K: Deserialize<'de> + Hash + Eq, V: Deserialize<'de>"
))]
pub struct MultiValueMap<K: Hash + Eq, V> {
    entries: IndexMap<K, Vec<V>>,
}

impl<K: Hash + Eq, V> Default for MultiValueMap<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, V> MultiValueMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value stored under `key`
    pub fn get_first<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).and_then(|values| values.first())
    }

    /// All values stored under `key`, in insertion order
    pub fn get<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Append `value` to the values stored under `key`
    pub fn add(&mut self, key: K, value: V) {
        self.entries.entry(key).or_default().push(value);
    }

    /// Replace whatever is stored under `key` with the single `value`
    pub fn set(&mut self, key: K, value: V) {
        match self.entries.entry(key) {
            Entry::Occupied(mut slot) => {
                let values = slot.get_mut();
                values.clear();
                values.push(value);
            }
            Entry::Vacant(slot) => {
                slot.insert(vec![value]);
            }
        }
    }

    /// [`set`](Self::set) every pair
    pub fn set_all<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in values {
            self.set(key, value);
        }
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<Vec<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.shift_remove(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.entries
            .iter()
            .map(|(key, values)| (key, values.as_slice()))
    }

    /// Keep only the first value of each key
    pub fn to_single_value_map(&self) -> IndexMap<K, V>
    where
        K: Clone,
        V: Clone,
    {
        self.entries
            .iter()
            .filter_map(|(key, values)| values.first().map(|first| (key.clone(), first.clone())))
            .collect()
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for MultiValueMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.add(key, value);
        }
        map
    }
}

/// Map every element of `from` through `f`
pub fn convert_list<T, U, F>(from: &[T], f: F) -> Vec<U>
where
    F: FnMut(&T) -> U,
{
    from.iter().map(f).collect()
}

/// True when `list` is absent or empty
pub fn list_is_empty<T>(list: Option<&[T]>) -> bool {
    list.map_or(true, <[T]>::is_empty)
}

pub fn list_is_not_empty<T>(list: Option<&[T]>) -> bool {
    !list_is_empty(list)
}
