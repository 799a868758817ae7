//! Dictionary: a `BucketHashMap<String, String>` whose `erase` reports a
//! missing key as an error instead of `false`.
//!
//! Everything else forwards to the underlying map unchanged. `update` is
//! additive: it never replaces the value of a key that is already present.

use crate::bucket_hash_map::BucketHashMap;
use crate::error::{Error, Result};
use crate::iter::{Cursor, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use core::ops::Index;
use log::trace;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dictionary {
    map: BucketHashMap<String, String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parallel key and value sequences; see
    /// [`BucketHashMap::from_keys_values`].
    pub fn from_keys_values<IK, IV, K, V>(keys: IK, values: IV) -> Result<Self>
    where
        IK: IntoIterator<Item = K>,
        IK::IntoIter: ExactSizeIterator,
        IV: IntoIterator<Item = V>,
        IV::IntoIter: ExactSizeIterator,
        K: Into<String>,
        V: Into<String>,
    {
        let keys = keys.into_iter().map(Into::<String>::into);
        let values = values.into_iter().map(Into::<String>::into);
        BucketHashMap::from_keys_values(keys, values).map(|map| Self { map })
    }

    /// Read-only view of the underlying table.
    pub fn as_map(&self) -> &BucketHashMap<String, String> {
        &self.map
    }

    pub fn into_inner(self) -> BucketHashMap<String, String> {
        self.map
    }

    /// Remove `key`. Fails with `Error::InvalidKey` if it is absent;
    /// otherwise returns `Ok(true)`.
    pub fn erase(&mut self, key: &str) -> Result<bool> {
        if !self.map.erase(key) {
            return Err(Error::InvalidKey);
        }
        Ok(true)
    }

    /// Insert every pair whose key is not yet present. Existing keys keep
    /// their current value.
    pub fn update<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let before = self.map.len();
        for (k, v) in pairs {
            self.map.insert(k.into(), v.into());
        }
        trace!("dictionary update added {} keys", self.map.len() - before);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        self.map.insert(key.into(), value.into())
    }

    /// Lenient removal with the base-table contract: `None` when absent.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.map.remove(key)
    }

    pub fn clear(&mut self) {
        self.map.clear()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn size(&self) -> usize {
        self.map.size()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
    pub fn empty(&self) -> bool {
        self.map.empty()
    }
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }
    pub fn load_factor(&self) -> f64 {
        self.map.load_factor()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }
    pub fn get(&self, key: &str) -> Option<&String> {
        self.map.get(key)
    }
    pub fn get_mut(&mut self, key: &str) -> Option<&mut String> {
        self.map.get_mut(key)
    }
    pub fn at(&self, key: &str) -> Result<&String> {
        self.map.at(key)
    }
    pub fn at_mut(&mut self, key: &str) -> Result<&mut String> {
        self.map.at_mut(key)
    }
    pub fn get_or_first(&self, key: &str) -> Option<&String> {
        self.map.get_or_first(key)
    }
    pub fn index_bucket(&self, key: &str) -> Result<usize> {
        self.map.index_bucket(key)
    }
    pub fn bucket_size(&self, key: &str) -> Result<usize> {
        self.map.bucket_size(key)
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.map.iter()
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, String, String> {
        self.map.iter_mut()
    }
    pub fn keys(&self) -> Keys<'_, String, String> {
        self.map.keys()
    }
    pub fn values(&self) -> Values<'_, String, String> {
        self.map.values()
    }
    pub fn values_mut(&mut self) -> ValuesMut<'_, String, String> {
        self.map.values_mut()
    }

    pub fn begin(&self) -> Cursor {
        self.map.begin()
    }
    pub fn end(&self) -> Cursor {
        self.map.end()
    }
    pub fn advance(&self, cursor: &mut Cursor) {
        self.map.advance(cursor)
    }
    pub fn entry_at(&self, cursor: Cursor) -> Option<(&String, &String)> {
        self.map.entry_at(cursor)
    }
}

impl From<BucketHashMap<String, String>> for Dictionary {
    fn from(map: BucketHashMap<String, String>) -> Self {
        Self { map }
    }
}

impl Index<&str> for Dictionary {
    type Output = String;

    fn index(&self, key: &str) -> &String {
        &self.map[key]
    }
}

impl<K, V> Extend<(K, V)> for Dictionary
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.update(iter)
    }
}

impl<K, V> FromIterator<(K, V)> for Dictionary
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        dict.update(iter);
        dict
    }
}

impl IntoIterator for Dictionary {
    type Item = (String, String);
    type IntoIter = IntoIter<String, String>;

    fn into_iter(self) -> IntoIter<String, String> {
        self.map.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Iter<'a, String, String> {
        self.map.iter()
    }
}
