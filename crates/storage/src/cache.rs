//! Copy-on-write overlay over another key-value store.
//!
//! A [`CacheStore`] buffers writes in memory. Reads see the buffered writes
//! first and fall through to the parent otherwise. Nothing reaches the
//! parent until the owner drains the overlay with
//! [`CacheStore::into_writes`] and hands the operations to the parent
//! (another cache via [`CacheStore::write`], or sled via
//! [`Storage::batch`](crate::db::Storage::batch)). Dropping the overlay
//! discards every write it holds.

use crate::db::{BatchOp, KvStore, Result};
use std::collections::BTreeMap;

pub struct CacheStore<'a> {
    parent: &'a dyn KvStore,
    /// `None` marks a deletion.
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> CacheStore<'a> {
    pub fn new(parent: &'a dyn KvStore) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Retrieve and deserialize a value.
    pub fn get<V>(&self, key: &[u8]) -> Result<Option<V>>
    where
        V: serde::de::DeserializeOwned,
    {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Serialize and buffer a value.
    pub fn put<V>(&mut self, key: Vec<u8>, value: &V) -> Result<()>
    where
        V: serde::Serialize,
    {
        let encoded = bincode::serialize(value)?;
        self.writes.insert(key, Some(encoded));
        Ok(())
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.writes.insert(key, None);
    }

    /// Number of buffered writes (deletions included).
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    /// Drain the overlay into batch operations in ascending key order.
    pub fn into_writes(self) -> Vec<BatchOp> {
        self.writes
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOp::Insert { key, value },
                None => BatchOp::Remove { key },
            })
            .collect()
    }

    /// Merge the drained writes of a child overlay into this one.
    pub fn write(&mut self, ops: Vec<BatchOp>) {
        for op in ops {
            match op {
                BatchOp::Insert { key, value } => self.writes.insert(key, Some(value)),
                BatchOp::Remove { key } => self.writes.insert(key, None),
            };
        }
    }
}

impl KvStore for CacheStore<'_> {
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.writes.get(key) {
            Some(value) => Ok(value.clone()),
            None => self.parent.get_raw(key),
        }
    }

    fn scan_prefix_raw(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.scan_prefix_raw(prefix)?.into_iter().collect();

        let buffered = self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix));
        for (key, value) in buffered {
            match value {
                Some(v) => merged.insert(key.clone(), v.clone()),
                None => merged.remove(key),
            };
        }

        Ok(merged.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Storage;

    #[test]
    fn test_reads_fall_through_to_parent() {
        let storage = Storage::open_temporary().unwrap();
        storage.put("a", &1u64).unwrap();

        let cache = CacheStore::new(&storage);
        assert_eq!(cache.get::<u64>(b"a").unwrap(), Some(1));
        assert_eq!(cache.get::<u64>(b"b").unwrap(), None);
    }

    #[test]
    fn test_writes_stay_in_overlay_until_committed() {
        let storage = Storage::open_temporary().unwrap();
        storage.put("a", &1u64).unwrap();

        let mut cache = CacheStore::new(&storage);
        cache.put(b"a".to_vec(), &2u64).unwrap();
        cache.put(b"b".to_vec(), &3u64).unwrap();
        assert_eq!(cache.get::<u64>(b"a").unwrap(), Some(2));
        assert_eq!(storage.get::<_, u64>("a").unwrap(), Some(1));
        assert_eq!(storage.get::<_, u64>("b").unwrap(), None);

        storage.batch(cache.into_writes()).unwrap();
        assert_eq!(storage.get::<_, u64>("a").unwrap(), Some(2));
        assert_eq!(storage.get::<_, u64>("b").unwrap(), Some(3));
    }

    #[test]
    fn test_dropping_discards_writes() {
        let storage = Storage::open_temporary().unwrap();
        {
            let mut cache = CacheStore::new(&storage);
            cache.put(b"a".to_vec(), &9u64).unwrap();
            assert_eq!(cache.pending(), 1);
        }
        assert!(storage.is_empty());
    }

    #[test]
    fn test_delete_hides_parent_value() {
        let storage = Storage::open_temporary().unwrap();
        storage.put("a", &1u64).unwrap();

        let mut cache = CacheStore::new(&storage);
        cache.delete(b"a".to_vec());
        assert_eq!(cache.get::<u64>(b"a").unwrap(), None);

        storage.batch(cache.into_writes()).unwrap();
        assert!(!storage.contains("a").unwrap());
    }

    #[test]
    fn test_nested_caches_merge_upwards() {
        let storage = Storage::open_temporary().unwrap();
        let mut outer = CacheStore::new(&storage);
        outer.put(b"a".to_vec(), &1u64).unwrap();

        let ops = {
            let mut inner = CacheStore::new(&outer);
            assert_eq!(inner.get::<u64>(b"a").unwrap(), Some(1));
            inner.put(b"a".to_vec(), &5u64).unwrap();
            inner.into_writes()
        };
        outer.write(ops);

        assert_eq!(outer.get::<u64>(b"a").unwrap(), Some(5));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_scan_prefix_merges_overlay() {
        let storage = Storage::open_temporary().unwrap();
        storage.put("p:a", &1u8).unwrap();
        storage.put("p:b", &2u8).unwrap();

        let mut cache = CacheStore::new(&storage);
        cache.delete(b"p:a".to_vec());
        cache.put(b"p:c".to_vec(), &3u8).unwrap();
        cache.put(b"q:a".to_vec(), &4u8).unwrap();

        let keys: Vec<Vec<u8>> = cache
            .scan_prefix_raw(b"p:")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"p:b".to_vec(), b"p:c".to_vec()]);
    }
}
