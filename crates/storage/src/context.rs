//! Execution context handed to every engine operation.
//!
//! A context bundles the transactional store, the gas meter and the header
//! of the block being executed. All reads and writes go through the
//! context's [`CacheStore`], so discarding the context discards every write
//! made with it.

use crate::cache::CacheStore;
use crate::db::{BatchOp, KvStore, StorageError};
use crate::gas::GasMeter;
use houchain_core::{BlockHeader, Result};

pub struct Context<'a> {
    store: CacheStore<'a>,
    gas_meter: GasMeter,
    header: BlockHeader,
}

impl<'a> Context<'a> {
    /// Open a context over `parent`. Writes stay local until
    /// [`Context::into_parts`] hands them back.
    pub fn new(parent: &'a dyn KvStore, header: BlockHeader, gas_meter: GasMeter) -> Self {
        Self {
            store: CacheStore::new(parent),
            gas_meter,
            header,
        }
    }

    pub fn header(&self) -> BlockHeader {
        self.header
    }

    pub fn block_height(&self) -> i64 {
        self.header.height
    }

    pub fn block_time(&self) -> i64 {
        self.header.time
    }

    pub fn gas_meter(&self) -> &GasMeter {
        &self.gas_meter
    }

    /// Charge gas for an operation. Exhaustion aborts the transaction.
    pub fn consume_gas(&mut self, amount: u64, descriptor: &str) -> Result<()> {
        self.gas_meter.consume(amount, descriptor)
    }

    pub fn get<V>(&self, key: &[u8]) -> Result<Option<V>>
    where
        V: serde::de::DeserializeOwned,
    {
        Ok(self.store.get(key)?)
    }

    pub fn put<V>(&mut self, key: Vec<u8>, value: &V) -> Result<()>
    where
        V: serde::Serialize,
    {
        Ok(self.store.put(key, value)?)
    }

    pub fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.store.get_raw(key)?.is_some())
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.store.delete(key);
    }

    /// Decode every value stored under `prefix`, in ascending key order.
    pub fn scan_prefix<V>(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, V)>>
    where
        V: serde::de::DeserializeOwned,
    {
        self.store
            .scan_prefix_raw(prefix)?
            .into_iter()
            .map(|(key, bytes)| -> Result<(Vec<u8>, V)> {
                let value = bincode::deserialize(&bytes).map_err(StorageError::from)?;
                Ok((key, value))
            })
            .collect()
    }

    /// Finish the context, returning its buffered writes and the meter.
    pub fn into_parts(self) -> (Vec<BatchOp>, GasMeter) {
        (self.store.into_writes(), self.gas_meter)
    }
}
