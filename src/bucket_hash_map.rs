//! BucketHashMap: separately-chained table with load-factor driven rebuilds.

use crate::bucket::{Bucket, Entry};
use crate::error::{Error, Result};
use crate::iter::{Cursor, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::policy::ResizePolicy;
use crate::stamp::DebugStamp;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use hashbrown::hash_map::DefaultHashBuilder;
use log::{debug, trace};

pub struct BucketHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    // Always exactly `capacity` buckets; capacity is a power of two.
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    policy: ResizePolicy,
    stamp: DebugStamp,
}

fn alloc_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    debug_assert!(capacity.is_power_of_two());
    (0..capacity).map(|_| Bucket::new()).collect()
}

impl<K, V> BucketHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_policy(policy: ResizePolicy) -> Self {
        Self::with_policy_and_hasher(policy, Default::default())
    }

    /// Build a map from parallel key and value sequences.
    ///
    /// Pairs are loaded in input order; a key seen earlier wins over later
    /// duplicates. Fails with `Error::LengthMismatch` when the sequences
    /// differ in length.
    pub fn from_keys_values<IK, IV>(keys: IK, values: IV) -> Result<Self>
    where
        IK: IntoIterator<Item = K>,
        IK::IntoIter: ExactSizeIterator,
        IV: IntoIterator<Item = V>,
        IV::IntoIter: ExactSizeIterator,
    {
        Self::from_keys_values_with_hasher(keys, values, Default::default())
    }
}

impl<K, V> Default for BucketHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

// Operations that never hash a key.
impl<K, V, S> BucketHashMap<K, V, S> {
    pub fn len(&self) -> usize {
        self.len
    }
    /// Alias of [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    /// Alias of [`is_empty`](Self::is_empty).
    pub fn empty(&self) -> bool {
        self.is_empty()
    }

    /// Number of buckets. Always a power of two, never below the policy floor.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    pub fn policy(&self) -> &ResizePolicy {
        &self.policy
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Drop every entry and release per-bucket storage. Capacity is kept
    /// and no resize runs, so the map may sit under the lower load-factor
    /// bound until the next insert or erase.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
        self.stamp.bump();
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.buckets, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.buckets, self.len)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Cursor at the first entry, skipping leading empty buckets. Equals
    /// `end()` on an empty map.
    pub fn begin(&self) -> Cursor {
        Cursor {
            bucket: self.first_occupied_from(0),
            offset: 0,
            stamp: self.stamp.snapshot(),
        }
    }

    /// The position reached after advancing `len()` times from `begin()`.
    pub fn end(&self) -> Cursor {
        Cursor {
            bucket: self.capacity(),
            offset: 0,
            stamp: self.stamp.snapshot(),
        }
    }

    /// Step `cursor` to the next entry. A cursor at `end()` stays there.
    pub fn advance(&self, cursor: &mut Cursor) {
        self.stamp.check(cursor.stamp);
        let Some(bucket) = self.buckets.get(cursor.bucket) else {
            return;
        };
        cursor.offset += 1;
        if cursor.offset >= bucket.len() {
            cursor.bucket = self.first_occupied_from(cursor.bucket + 1);
            cursor.offset = 0;
        }
    }

    /// Entry under `cursor`, or `None` at `end()`.
    pub fn entry_at(&self, cursor: Cursor) -> Option<(&K, &V)> {
        self.stamp.check(cursor.stamp);
        self.buckets
            .get(cursor.bucket)?
            .entries()
            .get(cursor.offset)
            .map(|e| (&e.key, &e.value))
    }

    fn first_occupied_from(&self, start: usize) -> usize {
        (start..self.capacity())
            .find(|&i| !self.buckets[i].is_empty())
            .unwrap_or(self.capacity())
    }

    /// Apply the policy one step at a time until it reports a stable
    /// capacity.
    fn rehash(&mut self) {
        while let Some(next) = self.policy.next_capacity(self.len, self.capacity()) {
            self.rebuild(next);
        }
    }

    /// Move every entry, in iteration order, into fresh storage of
    /// `new_capacity` buckets. Uses the stored hashes; `K: Hash` is not
    /// called.
    fn rebuild(&mut self, new_capacity: usize) {
        debug!(
            "rebuilding bucket table: {} -> {} buckets ({} entries)",
            self.capacity(),
            new_capacity,
            self.len
        );
        let old = core::mem::replace(&mut self.buckets, alloc_buckets(new_capacity));
        let mask = new_capacity - 1;
        for entry in old.into_iter().flat_map(Bucket::into_entries) {
            self.buckets[entry.hash as usize & mask].push(entry);
        }
        self.stamp.bump();
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let cap = self.capacity();
        assert!(cap.is_power_of_two(), "capacity {cap} not a power of two");
        assert!(cap >= self.policy.min_capacity());
        let total: usize = self.buckets.iter().map(Bucket::len).sum();
        assert_eq!(total, self.len, "len disagrees with bucket contents");
        for (i, bucket) in self.buckets.iter().enumerate() {
            for e in bucket.entries() {
                assert_eq!(e.hash as usize & (cap - 1), i, "entry in wrong bucket");
            }
        }
    }

    /// Load-factor bounds hold after every insert or erase that changed
    /// the size; `clear` may leave the lower bound violated.
    #[cfg(test)]
    pub(crate) fn assert_load_bounds(&self) {
        let (lf, cap) = (self.load_factor(), self.capacity());
        assert!(lf <= self.policy.upper(), "load factor {lf} above bound");
        assert!(
            lf >= self.policy.lower() || cap == self.policy.min_capacity(),
            "load factor {lf} below bound at capacity {cap}"
        );
    }
}

impl<K, V, S> BucketHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_policy_and_hasher(ResizePolicy::default(), hasher)
    }

    pub fn with_policy_and_hasher(policy: ResizePolicy, hasher: S) -> Self {
        Self {
            hasher,
            buckets: alloc_buckets(policy.min_capacity()),
            len: 0,
            policy,
            stamp: DebugStamp::new(),
        }
    }

    pub fn from_keys_values_with_hasher<IK, IV>(keys: IK, values: IV, hasher: S) -> Result<Self>
    where
        IK: IntoIterator<Item = K>,
        IK::IntoIter: ExactSizeIterator,
        IV: IntoIterator<Item = V>,
        IV::IntoIter: ExactSizeIterator,
    {
        let (keys, values) = (keys.into_iter(), values.into_iter());
        if keys.len() != values.len() {
            return Err(Error::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        trace!("bulk loading {} key/value pairs", keys.len());
        let mut map = Self::with_hasher(hasher);
        for (key, value) in keys.zip(values) {
            map.push_unique(key, value);
        }
        map.rehash();
        Ok(map)
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Bucket a key maps to at the current capacity, whether or not it is
    /// present.
    pub fn hash_bucket_index<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.make_hash(q) as usize & (self.capacity() - 1)
    }

    fn find_entry<Q>(&self, q: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.buckets[self.hash_bucket_index(q)].get(q)
    }

    fn find_entry_mut<Q>(&mut self, q: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.hash_bucket_index(q);
        self.buckets[idx].get_mut(q)
    }

    /// Scans only the key's bucket.
    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_entry(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_entry(q).map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_entry_mut(q).map(|e| &mut e.value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_entry(q).map(|e| (&e.key, &e.value))
    }

    /// Like [`get`](Self::get) but fails with `Error::KeyNotFound`.
    pub fn at<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(Error::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, q: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(q).ok_or(Error::KeyNotFound)
    }

    /// Index of the bucket holding `q`.
    pub fn index_bucket<Q>(&self, q: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.hash_bucket_index(q);
        match self.buckets[idx].position(q) {
            Some(_) => Ok(idx),
            None => Err(Error::KeyNotFound),
        }
    }

    /// Number of entries sharing `q`'s bucket, `q` included.
    pub fn bucket_size<Q>(&self, q: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index_bucket(q).map(|idx| self.buckets[idx].len())
    }

    /// Value for `q`, falling back to the value of the first entry in
    /// iteration order when `q` is absent. `None` only on an empty map.
    ///
    /// Kept for callers that depend on the lenient lookup; prefer
    /// [`at`](Self::at) or indexing, which report a missing key.
    pub fn get_or_first<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).or_else(|| self.values().next())
    }

    /// Insert `key -> value` if `key` is absent. Returns `false` and leaves
    /// the map untouched when the key is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if !self.push_unique(key, value) {
            return false;
        }
        self.rehash();
        true
    }

    // Append without checking the load factor.
    fn push_unique(&mut self, key: K, value: V) -> bool {
        let hash = self.make_hash(&key);
        let idx = hash as usize & (self.capacity() - 1);
        if self.buckets[idx].position(&key).is_some() {
            return false;
        }
        self.buckets[idx].push(Entry { key, value, hash });
        self.len += 1;
        self.stamp.bump();
        true
    }

    /// Remove `q`, returning whether it was present.
    pub fn erase<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).is_some()
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.hash_bucket_index(q);
        let pos = self.buckets[idx].position(q)?;
        let entry = self.buckets[idx].remove(pos);
        self.len -= 1;
        self.stamp.bump();
        self.rehash();
        Some((entry.key, entry.value))
    }
}

impl<K, V, S> Clone for BucketHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            buckets: self.buckets.clone(),
            len: self.len,
            policy: self.policy,
            stamp: DebugStamp::new(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        // Release our own storage before copying the source's.
        self.buckets = Vec::new();
        self.buckets.extend(source.buckets.iter().cloned());
        self.hasher.clone_from(&source.hasher);
        self.len = source.len;
        self.policy = source.policy;
        self.stamp.bump();
    }
}

/// Content equality: same key set, equal values per key. Bucket layout and
/// capacity are ignored.
impl<K, V, S> PartialEq for BucketHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| v == ov))
    }
}

impl<K, V, S> Eq for BucketHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> fmt::Debug for BucketHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Panics with `Error::KeyNotFound`'s message when the key is absent.
impl<K, Q, V, S> Index<&Q> for BucketHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("{}", Error::KeyNotFound),
        }
    }
}

/// Additive: keys already present keep their value.
impl<K, V, S> Extend<(K, V)> for BucketHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for BucketHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> IntoIterator for BucketHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self.buckets, self.len)
    }
}

impl<'a, K, V, S> IntoIterator for &'a BucketHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut BucketHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}
