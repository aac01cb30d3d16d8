//! Core ledger primitives for houchain.
//!
//! This crate provides the value types shared by every module:
//! - Addresses and Blake3 digests
//! - Multi-denomination coin arithmetic
//! - Accounts and vesting schedules
//! - The transaction error taxonomy and result tags

pub mod account;
pub mod address;
pub mod block;
pub mod coin;
pub mod error;
pub mod hash;
pub mod tags;
pub mod vesting;

// Re-export commonly used types at the crate root
pub use account::Account;
pub use address::{Address, AddressError};
pub use block::BlockHeader;
pub use coin::{Coin, CoinParseError, Coins};
pub use error::{Codespace, Result, TxError};
pub use hash::{hash, EntryHasher, Hash};
pub use tags::{Tag, Tags};
pub use vesting::VestingSchedule;
