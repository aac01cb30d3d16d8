//! Account state representation.

use crate::address::Address;
use crate::coin::Coins;
use crate::vesting::VestingSchedule;
use serde::{Deserialize, Serialize};

/// An account in the ledger state.
///
/// Accounts are either plain (no schedule) or vesting. Code paths branch on
/// the presence of `vesting`, never on a separate account kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Owner address, also the storage key.
    pub address: Address,
    /// Current balance. Never negative once persisted.
    pub coins: Coins,
    /// Unlock schedule for vesting accounts.
    pub vesting: Option<VestingSchedule>,
}

impl Account {
    /// Create an empty account at `address`.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            coins: Coins::empty(),
            vesting: None,
        }
    }

    /// Create a plain account holding `coins`.
    pub fn with_coins(address: Address, coins: Coins) -> Self {
        Self {
            address,
            coins,
            vesting: None,
        }
    }

    /// Create a vesting account whose balance starts at the schedule's
    /// original vesting amount.
    pub fn new_vesting(address: Address, schedule: VestingSchedule) -> Self {
        Self {
            address,
            coins: schedule.original_vesting.clone(),
            vesting: Some(schedule),
        }
    }

    /// Whether the account still has locked coins at `now`.
    pub fn is_vesting(&self, now: i64) -> bool {
        self.vesting.as_ref().is_some_and(|v| v.is_vesting(now))
    }
}
