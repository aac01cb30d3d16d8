//! Block execution engine.
//!
//! Applies a block of transactions on top of the committed state:
//!
//! 1. A block-level [`CacheStore`] collects every surviving write.
//! 2. For each transaction an ante context charges the fee with the
//!    transaction's gas limit. If that fails the transaction leaves no trace.
//! 3. A message context, sharing the ante step's gas meter, runs the
//!    messages. Its writes are merged only if every message succeeds; the fee
//!    is kept either way.
//! 4. Governance closes expired proposals.
//! 5. All writes are committed to sled in one batch.
//!
//! A [`TxError::Internal`] anywhere aborts the block without committing.

use crate::app::App;
use crate::config::ChainConfig;
use crate::tx::{Block, Tx};
use houchain_core::{BlockHeader, Codespace, Hash, Tags, TxError};
use houchain_governance::GovParams;
use houchain_storage::{CacheStore, Context, GasMeter, Storage, StorageError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a whole block.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("state error: {0}")]
    State(#[from] TxError),

    #[error("fatal error in transaction {index}: {error}")]
    Fatal { index: usize, error: TxError },

    #[error("end block failed: {0}")]
    EndBlock(TxError),

    #[error("block has {size} transactions (max {max})")]
    BlockTooLarge { size: usize, max: usize },

    #[error("block height mismatch (expected {expected}, got {got})")]
    InvalidHeight { expected: i64, got: i64 },

    #[error("block time {got} is earlier than {last}")]
    InvalidTime { last: i64, got: i64 },
}

pub type Result<T> = std::result::Result<T, ExecutionError>;

/// Result of executing a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Transaction hash.
    pub tx_hash: Hash,
    /// Whether every message succeeded.
    pub success: bool,
    /// Error code, 0 on success.
    pub code: u32,
    /// Codespace of the error (root on success).
    pub codespace: Codespace,
    /// Error message, empty on success.
    pub log: String,
    /// Gas limit declared by the transaction.
    pub gas_wanted: u64,
    /// Gas used, capped at the limit.
    pub gas_used: u64,
    pub tags: Tags,
}

impl TransactionReceipt {
    fn ok(tx_hash: Hash, meter: &GasMeter, tags: Tags) -> Self {
        Self {
            tx_hash,
            success: true,
            code: 0,
            codespace: Codespace::Root,
            log: String::new(),
            gas_wanted: meter.limit(),
            gas_used: meter.consumed().min(meter.limit()),
            tags,
        }
    }

    fn failed(tx_hash: Hash, meter: &GasMeter, error: &TxError, tags: Tags) -> Self {
        Self {
            tx_hash,
            success: false,
            code: error.code(),
            codespace: error.codespace(),
            log: error.to_string(),
            gas_wanted: meter.limit(),
            gas_used: meter.consumed().min(meter.limit()),
            tags,
        }
    }
}

/// Result of executing a block.
#[derive(Debug, Clone)]
pub struct BlockExecutionResult {
    pub header: BlockHeader,
    /// Transaction receipts, in block order.
    pub receipts: Vec<TransactionReceipt>,
    /// Total gas used.
    pub total_gas_used: u64,
    /// Tags emitted by the end-of-block pass.
    pub end_block_tags: Tags,
    /// State root after commit.
    pub state_root: Hash,
}

/// Block executor.
pub struct Executor<'a> {
    storage: &'a Storage,
    app: App,
    config: ChainConfig,
}

impl<'a> Executor<'a> {
    /// Create an executor. Governance parameters recorded at genesis take
    /// precedence over the ones in `config`.
    pub fn new(storage: &'a Storage, config: ChainConfig) -> Result<Self> {
        let stored = {
            let ctx = Context::new(storage, BlockHeader::default(), GasMeter::infinite());
            GovParams::load(&ctx)?
        };
        let params = stored.unwrap_or_else(|| config.gov.clone());
        Ok(Self {
            storage,
            app: App::new(params),
            config,
        })
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Header of the last committed block (height 0 after genesis). A store
    /// that never went through genesis has none and yields
    /// [`StorageError::NotFound`].
    pub fn last_header(&self) -> Result<BlockHeader> {
        let height = self.storage.get_or_err(Storage::META_HEIGHT_KEY)?;
        let time = self.storage.get_or_err(Storage::META_TIME_KEY)?;
        Ok(BlockHeader::new(height, time))
    }

    /// Run a read-only closure against the committed state. Writes made by
    /// the closure are dropped.
    pub fn query<R>(
        &self,
        f: impl FnOnce(&App, &mut Context<'_>) -> houchain_core::Result<R>,
    ) -> houchain_core::Result<R> {
        let header = self.last_header().map_err(|e| TxError::Internal(e.to_string()))?;
        let mut ctx = Context::new(self.storage, header, GasMeter::infinite());
        f(&self.app, &mut ctx)
    }

    /// Execute and commit a block.
    pub fn execute_block(&self, block: &Block) -> Result<BlockExecutionResult> {
        let last = self.last_header()?;
        let header = block.header;
        if header.height != last.height + 1 {
            return Err(ExecutionError::InvalidHeight {
                expected: last.height + 1,
                got: header.height,
            });
        }
        if header.time < last.time {
            return Err(ExecutionError::InvalidTime {
                last: last.time,
                got: header.time,
            });
        }
        if block.txs.len() > self.config.max_block_size {
            return Err(ExecutionError::BlockTooLarge {
                size: block.txs.len(),
                max: self.config.max_block_size,
            });
        }

        let mut cache = CacheStore::new(self.storage);
        let mut receipts = Vec::with_capacity(block.txs.len());
        let mut total_gas_used = 0;

        for (index, tx) in block.txs.iter().enumerate() {
            let receipt = self
                .execute_transaction(&mut cache, header, tx)
                .map_err(|error| ExecutionError::Fatal { index, error })?;
            total_gas_used += receipt.gas_used;
            receipts.push(receipt);
        }

        let mut ctx = Context::new(&cache, header, GasMeter::infinite());
        let end_block_tags = self
            .app
            .end_block(&mut ctx)
            .map_err(ExecutionError::EndBlock)?;
        let (writes, _) = ctx.into_parts();
        cache.write(writes);

        cache.put(Storage::META_HEIGHT_KEY.to_vec(), &header.height)?;
        cache.put(Storage::META_TIME_KEY.to_vec(), &header.time)?;
        self.storage.batch(cache.into_writes())?;

        let state_root = self.storage.state_root()?;
        info!(
            height = header.height,
            txs = receipts.len(),
            gas = total_gas_used,
            %state_root,
            "block committed"
        );

        Ok(BlockExecutionResult {
            header,
            receipts,
            total_gas_used,
            end_block_tags,
            state_root,
        })
    }

    /// Execute one transaction against the block cache. Only fatal errors
    /// are returned as `Err`; every other failure becomes a receipt.
    fn execute_transaction(
        &self,
        cache: &mut CacheStore<'_>,
        header: BlockHeader,
        tx: &Tx,
    ) -> std::result::Result<TransactionReceipt, TxError> {
        let tx_hash = tx.hash();

        let mut ante_ctx = Context::new(&*cache, header, GasMeter::new(tx.fee.gas));
        let ante_result = self.app.ante(&mut ante_ctx, tx);
        let (ante_writes, gas_meter) = ante_ctx.into_parts();
        let mut tags = match ante_result {
            Ok(tags) => tags,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(%tx_hash, error = %e, "transaction rejected");
                return Ok(TransactionReceipt::failed(tx_hash, &gas_meter, &e, Tags::new()));
            }
        };
        cache.write(ante_writes);

        let mut msg_ctx = Context::new(&*cache, header, gas_meter);
        let msg_result = self.app.run_msgs(&mut msg_ctx, tx);
        let (msg_writes, gas_meter) = msg_ctx.into_parts();
        match msg_result {
            Ok(msg_tags) => {
                cache.write(msg_writes);
                tags.append(msg_tags);
                debug!(%tx_hash, gas = gas_meter.consumed(), "transaction applied");
                Ok(TransactionReceipt::ok(tx_hash, &gas_meter, tags))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(%tx_hash, error = %e, "transaction failed");
                Ok(TransactionReceipt::failed(tx_hash, &gas_meter, &e, tags))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::{init_genesis, GenesisAccount, GenesisState};
    use crate::tx::StdFee;
    use houchain_bank::{BankMsg, MsgSend, ViewKeeper};
    use houchain_core::{Address, Coins};

    fn setup() -> Storage {
        let storage = Storage::open_temporary().unwrap();
        let genesis = GenesisState {
            accounts: vec![GenesisAccount::new(
                Address::from_seed("alice"),
                "100mycoin,10fee".parse().unwrap(),
            )],
            ..GenesisState::default()
        };
        init_genesis(&storage, &genesis).unwrap();
        storage
    }

    fn send_tx(amount: u64, fee: u64) -> Tx {
        let msg = BankMsg::Send(MsgSend::simple(
            Address::from_seed("alice"),
            Address::from_seed("bob"),
            Coins::single("mycoin", amount),
        ));
        let fee = if fee == 0 {
            Coins::empty()
        } else {
            Coins::single("fee", fee)
        };
        Tx::new(vec![msg.into()], StdFee::new(fee, 100_000))
    }

    fn balance(executor: &Executor<'_>, seed: &str) -> Coins {
        executor
            .query(|app, ctx| app.bank().get_coins(ctx, &Address::from_seed(seed)))
            .unwrap()
    }

    #[test]
    fn test_execute_block() {
        let storage = setup();
        let executor = Executor::new(&storage, ChainConfig::default()).unwrap();

        let block = Block::new(BlockHeader::new(1, 10), vec![send_tx(60, 1)]);
        let result = executor.execute_block(&block).unwrap();

        assert_eq!(result.receipts.len(), 1);
        assert!(result.receipts[0].success);
        assert_eq!(result.receipts[0].code, 0);
        assert!(result.total_gas_used > 0);
        assert_eq!(result.state_root, storage.state_root().unwrap());
        assert_eq!(executor.last_header().unwrap(), BlockHeader::new(1, 10));
        let expected: Coins = "40mycoin,9fee".parse().unwrap();
        assert_eq!(balance(&executor, "alice"), expected);
        assert_eq!(balance(&executor, "bob"), Coins::single("mycoin", 60));
    }

    #[test]
    fn test_requires_genesis() {
        let storage = Storage::open_temporary().unwrap();
        let executor = Executor::new(&storage, ChainConfig::default()).unwrap();

        assert!(matches!(
            executor.last_header(),
            Err(ExecutionError::Storage(StorageError::NotFound(_)))
        ));
        let block = Block::new(BlockHeader::new(1, 10), vec![]);
        assert!(matches!(
            executor.execute_block(&block),
            Err(ExecutionError::Storage(StorageError::NotFound(_)))
        ));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_rejects_wrong_height() {
        let storage = setup();
        let executor = Executor::new(&storage, ChainConfig::default()).unwrap();
        let block = Block::new(BlockHeader::new(2, 10), vec![]);
        assert!(matches!(
            executor.execute_block(&block),
            Err(ExecutionError::InvalidHeight { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn test_rejects_oversized_block() {
        let storage = setup();
        let config = ChainConfig {
            max_block_size: 1,
            ..ChainConfig::default()
        };
        let executor = Executor::new(&storage, config).unwrap();
        let block = Block::new(BlockHeader::new(1, 10), vec![send_tx(1, 0), send_tx(1, 0)]);
        assert!(matches!(
            executor.execute_block(&block),
            Err(ExecutionError::BlockTooLarge { size: 2, max: 1 })
        ));
    }

    #[test]
    fn test_failed_receipt_carries_code() {
        let storage = setup();
        let executor = Executor::new(&storage, ChainConfig::default()).unwrap();
        let block = Block::new(BlockHeader::new(1, 10), vec![send_tx(500, 0)]);
        let result = executor.execute_block(&block).unwrap();

        let receipt = &result.receipts[0];
        assert!(!receipt.success);
        assert_eq!(receipt.code, 10);
        assert_eq!(receipt.codespace, Codespace::Root);
        assert!(receipt.log.contains("insufficient coins"));
    }
}
