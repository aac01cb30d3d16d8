//! sled database wrapper with serialization helpers.

use houchain_core::{Address, EntryHasher, Hash, TxError};
use sled::Db;
use std::path::Path;
use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Key not found: {0}")]
    NotFound(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

// Anything the storage layer cannot read back is corruption from the point of
// view of a transaction.
impl From<StorageError> for TxError {
    fn from(err: StorageError) -> Self {
        TxError::Internal(err.to_string())
    }
}

/// Read access to a raw key-value store.
///
/// Implemented by the on-disk [`Storage`] and by every
/// [`CacheStore`](crate::cache::CacheStore) layered on top of it, so caches
/// can be stacked.
pub trait KvStore {
    /// Raw bytes stored under `key`.
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Every entry whose key starts with `prefix`, in ascending key order.
    fn scan_prefix_raw(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;
}

/// Wrapper around sled database with serialization helpers.
pub struct Storage {
    db: Db,
}

impl Storage {
    /// Open a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Open an in-memory database (for testing).
    pub fn open_temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    /// Store a serializable value.
    pub fn put<K, V>(&self, key: K, value: &V) -> Result<()>
    where
        K: AsRef<[u8]>,
        V: serde::Serialize,
    {
        let encoded = bincode::serialize(value)?;
        self.db.insert(key, encoded)?;
        Ok(())
    }

    /// Retrieve and deserialize a value.
    pub fn get<K, V>(&self, key: K) -> Result<Option<V>>
    where
        K: AsRef<[u8]>,
        V: serde::de::DeserializeOwned,
    {
        match self.db.get(key)? {
            Some(bytes) => {
                let value = bincode::deserialize(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Retrieve a value, returning error if not found.
    pub fn get_or_err<K, V>(&self, key: K) -> Result<V>
    where
        K: AsRef<[u8]> + std::fmt::Debug + Clone,
        V: serde::de::DeserializeOwned,
    {
        self.get(key.clone())?
            .ok_or_else(|| StorageError::NotFound(format!("{:?}", key)))
    }

    /// Check if a key exists.
    pub fn contains<K: AsRef<[u8]>>(&self, key: K) -> Result<bool> {
        Ok(self.db.contains_key(key)?)
    }

    /// Whether nothing has ever been written.
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Apply multiple operations atomically.
    ///
    /// Atomicity comes from sled's `apply_batch`: either every operation of
    /// the batch lands or none does.
    pub fn batch(&self, operations: Vec<BatchOp>) -> Result<()> {
        let mut batch = sled::Batch::default();
        for op in operations {
            match op {
                BatchOp::Insert { key, value } => batch.insert(key, value),
                BatchOp::Remove { key } => batch.remove(key),
            }
        }
        self.db.apply_batch(batch)?;
        Ok(())
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Commitment to the entire committed state.
    ///
    /// sled iterates in ascending key order, so two stores holding the same
    /// entries always produce the same root.
    pub fn state_root(&self) -> Result<Hash> {
        let mut hasher = EntryHasher::new();
        for entry in self.db.iter() {
            let (key, value) = entry?;
            hasher.update(&key, &value);
        }
        Ok(hasher.finalize())
    }

    // =========================================================================
    // Key Construction Helpers
    // =========================================================================

    /// Prefix shared by all account records.
    pub const ACCOUNT_PREFIX: &'static [u8] = b"account:";

    /// Create a prefixed key for accounts.
    /// Format: "account:" + address_bytes
    pub fn account_key(address: &Address) -> Vec<u8> {
        let mut key = Self::ACCOUNT_PREFIX.to_vec();
        key.extend_from_slice(&address.0);
        key
    }

    /// Key of the last committed block height.
    pub const META_HEIGHT_KEY: &'static [u8] = b"meta:height";

    /// Key of the last committed block time.
    pub const META_TIME_KEY: &'static [u8] = b"meta:time";
}

impl KvStore for Storage {
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    fn scan_prefix_raw(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.db
            .scan_prefix(prefix)
            .map(|entry| -> Result<(Vec<u8>, Vec<u8>)> {
                let (k, v) = entry?;
                Ok((k.to_vec(), v.to_vec()))
            })
            .collect()
    }
}

/// Batch operation for atomic updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    Insert { key: Vec<u8>, value: Vec<u8> },
    Remove { key: Vec<u8> },
}
