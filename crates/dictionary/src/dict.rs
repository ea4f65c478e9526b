use crate::key::ToKey;
use crate::{List, Value};
use smol_str::SmolStr;
use std::collections::hash_map::{self, HashMap};
use tracing::trace;

/// String-keyed dictionary with default-value lookups.
///
/// A missing key is never an error: lookups fall back to a caller supplied
/// default and presence is reported as a boolean. Enumeration order of
/// [`keys`](Dict::keys), [`values`](Dict::values) and [`items`](Dict::items)
/// is arbitrary and may differ between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Dict<V = Value> {
    inner: HashMap<SmolStr, V>,
}

impl<V> Default for Dict<V> {
    fn default() -> Self {
        Self {
            inner: Default::default(),
        }
    }
}

impl<V> Dict<V> {
    pub fn new() -> Self {
        Self {
            inner: Default::default(),
        }
    }

    /// Build a dictionary whose keys are the canonical text of each element
    /// of `keys`, all mapped to `default`. Repeated keys collapse into one.
    pub fn from_keys<I>(keys: I, default: V) -> Self
    where
        I: IntoIterator,
        I::Item: ToKey,
        V: Clone,
    {
        let mut dict = Self::new();
        for key in keys {
            dict.inner.insert(key.to_key(), default.clone());
        }
        trace!(count = dict.len(), "dictionary built from keys");
        dict
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        let removed = self.inner.len();
        self.inner.clear();
        trace!(removed, "dictionary cleared");
    }

    /// Value stored for `key`, or `default` if the key is absent.
    /// The dictionary is left unchanged.
    pub fn get<'a>(&'a self, key: &str, default: &'a V) -> &'a V {
        self.inner.get(key).unwrap_or(default)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Like [`get`](Dict::get) but stores `default` under `key` when the key
    /// is absent. An existing value is never replaced.
    pub fn set_default(&mut self, key: impl ToKey, default: V) -> &mut V {
        self.inner.entry(key.to_key()).or_insert(default)
    }

    /// Copy every entry of `other` into this dictionary, replacing values of
    /// keys present in both.
    pub fn update(&mut self, other: &Dict<V>)
    where
        V: Clone,
    {
        for (key, value) in &other.inner {
            self.inner.insert(key.clone(), value.clone());
        }
        trace!(count = other.len(), "dictionary updated");
    }

    /// Direct key assignment. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl ToKey, value: V) -> Option<V> {
        self.inner.insert(key.to_key(), value)
    }

    pub fn keys(&self) -> List<SmolStr> {
        let mut list = Vec::with_capacity(self.inner.len());
        list.extend(self.inner.keys().cloned());
        list
    }

    pub fn values(&self) -> List<V>
    where
        V: Clone,
    {
        let mut list = Vec::with_capacity(self.inner.len());
        list.extend(self.inner.values().cloned());
        list
    }

    /// Unordered `(key, value)` pairs.
    pub fn items(&self) -> List<(SmolStr, V)>
    where
        V: Clone,
    {
        self.inner
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, SmolStr, V> {
        self.inner.iter()
    }
}

impl Dict<Value> {
    /// Items as two-element lists `[key, value]`.
    pub fn item_lists(&self) -> List<List<Value>> {
        self.inner
            .iter()
            .map(|(k, v)| vec![Value::Str(k.clone()), v.clone()])
            .collect()
    }
}

impl<K: ToKey, V> FromIterator<(K, V)> for Dict<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().map(|(k, v)| (k.to_key(), v)).collect(),
        }
    }
}

impl<K: ToKey, V> Extend<(K, V)> for Dict<V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.inner
            .extend(iter.into_iter().map(|(k, v)| (k.to_key(), v)));
    }
}

impl<V> IntoIterator for Dict<V> {
    type Item = (SmolStr, V);
    type IntoIter = hash_map::IntoIter<SmolStr, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Dict<V> {
    type Item = (&'a SmolStr, &'a V);
    type IntoIter = hash_map::Iter<'a, SmolStr, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
