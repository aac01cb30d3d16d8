//! Persistent and transactional storage layer for houchain.
//!
//! This crate provides everything an engine operation runs against:
//! - The on-disk store (sled) with bincode serialization helpers
//! - Copy-on-write caches that make a transaction's writes discardable
//! - Gas metering
//! - The execution [`Context`] tying store, gas and block header together
//! - Account records
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              Engines (bank, governance)                  │
//! └────────────────────────┬────────────────────────────────┘
//!                          │ &mut Context
//! ┌────────────────────────▼────────────────────────────────┐
//! │  Context: CacheStore (tx) + GasMeter + BlockHeader       │
//! └────────────────────────┬────────────────────────────────┘
//!                          │ into_parts() on success
//! ┌────────────────────────▼────────────────────────────────┐
//! │  CacheStore (block)                                      │
//! └────────────────────────┬────────────────────────────────┘
//!                          │ Storage::batch at block commit
//! ┌────────────────────────▼────────────────────────────────┐
//! │                    sled Database                         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use houchain_core::{Address, BlockHeader, Coins};
//! use houchain_storage::{AccountMapper, AccountStore, Context, GasMeter, Storage};
//!
//! let storage = Storage::open("./houchain_data").unwrap();
//! let mut ctx = Context::new(&storage, BlockHeader::default(), GasMeter::infinite());
//!
//! let mapper = AccountMapper::new();
//! let alice = Address::from_seed("alice");
//! let mut account = mapper.new_account_with_address(&ctx, &alice);
//! account.coins = Coins::single("mycoin", 1_000);
//! mapper.set_account(&mut ctx, &account).unwrap();
//!
//! let (writes, _gas) = ctx.into_parts();
//! storage.batch(writes).unwrap();
//! ```

pub mod accounts;
pub mod cache;
pub mod context;
pub mod db;
pub mod gas;

// Re-export commonly used types
pub use accounts::{AccountMapper, AccountStore};
pub use cache::CacheStore;
pub use context::Context;
pub use db::{BatchOp, KvStore, Result, Storage, StorageError};
pub use gas::GasMeter;
