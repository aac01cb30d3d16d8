//! Transaction processing for houchain.
//!
//! This crate drives the bank and governance modules:
//! - **App**: message routing, fee collection and block hooks
//! - **Tx**: transactions, fees and blocks
//! - **Executor**: block execution with discard-on-failure semantics
//! - **Genesis**: initial state loaded from JSON
//!
//! # Example
//!
//! ```rust,no_run
//! use houchain_bank::{BankMsg, MsgSend};
//! use houchain_chain::{init_genesis, Block, ChainConfig, Executor, GenesisAccount, GenesisState, StdFee, Tx};
//! use houchain_core::{Address, BlockHeader, Coins};
//! use houchain_storage::Storage;
//!
//! let storage = Storage::open("./houchain_data").unwrap();
//! let alice = Address::from_seed("alice");
//! let genesis = GenesisState {
//!     accounts: vec![GenesisAccount::new(alice, Coins::single("mycoin", 1_000))],
//!     ..GenesisState::default()
//! };
//! init_genesis(&storage, &genesis).unwrap();
//!
//! let executor = Executor::new(&storage, ChainConfig::default()).unwrap();
//! let send = BankMsg::Send(MsgSend::simple(alice, Address::from_seed("bob"), Coins::single("mycoin", 10)));
//! let tx = Tx::new(vec![send.into()], StdFee::new(Coins::empty(), 100_000));
//! let result = executor
//!     .execute_block(&Block::new(BlockHeader::new(1, 0), vec![tx]))
//!     .unwrap();
//! assert!(result.receipts[0].success);
//! ```

pub mod app;
pub mod config;
pub mod executor;
pub mod genesis;
pub mod tx;

// Re-export commonly used types
pub use app::{App, Msg};
pub use config::ChainConfig;
pub use executor::{BlockExecutionResult, ExecutionError, Executor, TransactionReceipt};
pub use genesis::{init_genesis, GenesisAccount, GenesisError, GenesisState};
pub use tx::{Block, StdFee, Tx};
