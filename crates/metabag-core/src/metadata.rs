//! The string-keyed container of values.

use crate::value::Value;
use std::collections::{btree_map, BTreeMap, HashMap};

/// A bag of named [`Value`]s.
///
/// Keys are unique. A key bound to [`Value::Null`] is present with an
/// explicit null; a removed key is absent. Entries are kept sorted by key so
/// iteration and encoding are deterministic, but the order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    storage: BTreeMap<String, Value>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.storage.get(key)
    }

    /// Rebind `key`. `None` removes the key, `Some` replaces whatever was
    /// there. Returns the previous binding.
    pub fn set(&mut self, key: impl Into<String>, value: Option<Value>) -> Option<Value> {
        let key = key.into();
        match value {
            Some(value) => self.storage.insert(key, value),
            None => self.storage.remove(&key),
        }
    }

    /// Bind `key` to anything convertible into a [`Value`].
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.storage.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.storage.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.storage.contains_key(key)
    }

    pub fn keys(&self) -> Keys<'_> {
        Keys {
            inner: self.storage.keys(),
        }
    }

    pub fn values(&self) -> btree_map::Values<'_, String, Value> {
        self.storage.values()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.storage.iter()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

/// Iterator over the keys of a [`Metadata`], yielding `&str`.
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    inner: btree_map::Keys<'a, String, Value>,
}

impl<'a> Iterator for Keys<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Keys<'_> {}

impl From<BTreeMap<String, Value>> for Metadata {
    fn from(storage: BTreeMap<String, Value>) -> Self {
        Self { storage }
    }
}

impl From<HashMap<String, Value>> for Metadata {
    fn from(storage: HashMap<String, Value>) -> Self {
        Self {
            storage: storage.into_iter().collect(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            storage: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.storage.insert(key.into(), value.into());
        }
    }
}

impl IntoIterator for Metadata {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.into_iter()
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.iter()
    }
}
