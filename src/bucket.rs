//! Bucket storage: an owned, insertion-ordered run of entries sharing one
//! masked hash index.

use core::borrow::Borrow;

#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // Full hash, computed once on insert and reused by every rebuild.
    pub(crate) hash: u64,
}

#[derive(Clone, Debug)]
pub(crate) struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Bucket<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub(crate) fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    #[inline]
    pub(crate) fn entries_mut(&mut self) -> &mut [Entry<K, V>] {
        &mut self.entries
    }

    pub(crate) fn position<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries.iter().position(|e| e.key.borrow() == q)
    }

    pub(crate) fn get<Q>(&self, q: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries.iter().find(|e| e.key.borrow() == q)
    }

    pub(crate) fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.entries.iter_mut().find(|e| e.key.borrow() == q)
    }

    /// Append without a duplicate check; callers must have probed first.
    #[inline]
    pub(crate) fn push(&mut self, entry: Entry<K, V>) {
        self.entries.push(entry);
    }

    /// Remove the entry at `pos`, keeping the remaining entries in order.
    pub(crate) fn remove(&mut self, pos: usize) -> Entry<K, V> {
        self.entries.remove(pos)
    }

    /// Drop every entry and give the allocation back.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.entries.shrink_to_fit();
    }

    pub(crate) fn into_entries(self) -> std::vec::IntoIter<Entry<K, V>> {
        self.entries.into_iter()
    }
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(k: &str, v: i32) -> Entry<String, i32> {
        Entry {
            key: k.to_string(),
            value: v,
            hash: 0,
        }
    }

    /// Invariant: removal keeps the surviving entries in insertion order.
    #[test]
    fn remove_preserves_order() {
        let mut b = Bucket::new();
        for (i, k) in ["a", "b", "c", "d"].iter().enumerate() {
            b.push(entry(k, i as i32));
        }
        let pos = b.position("b").unwrap();
        let removed = b.remove(pos);
        assert_eq!(removed.key, "b");
        let keys: Vec<&str> = b.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["a", "c", "d"]);
    }

    #[test]
    fn lookup_by_borrowed_key() {
        let mut b = Bucket::new();
        b.push(entry("x", 1));
        assert_eq!(b.get("x").map(|e| e.value), Some(1));
        assert!(b.get("y").is_none());
        b.get_mut("x").unwrap().value = 5;
        assert_eq!(b.get("x").map(|e| e.value), Some(5));
    }

    #[test]
    fn clear_releases_storage() {
        let mut b = Bucket::new();
        for i in 0..8 {
            b.push(entry(&i.to_string(), i));
        }
        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.entries.capacity(), 0);
    }
}
