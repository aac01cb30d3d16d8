//! Vesting schedules and the spend-limit policy built on them.
//!
//! A schedule locks `original_vesting` and releases it linearly between
//! `start_time` and `end_time`, with nothing released before `cliff_time`.
//! Times are block times in unix seconds.

use crate::account::Account;
use crate::coin::{Coin, Coins};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    /// Coins locked at creation.
    pub original_vesting: Coins,
    pub start_time: i64,
    pub cliff_time: i64,
    pub end_time: i64,
    /// Signed running total of tracked transfers: outgoing negative,
    /// incoming positive.
    pub transferred: Coins,
}

impl VestingSchedule {
    /// Create a schedule. The cliff is clamped into `[start_time, end_time]`
    /// and `end_time` is never earlier than `start_time`.
    pub fn new(original_vesting: Coins, start_time: i64, cliff_time: i64, end_time: i64) -> Self {
        let end_time = end_time.max(start_time);
        Self {
            original_vesting,
            start_time,
            cliff_time: cliff_time.clamp(start_time, end_time),
            end_time,
            transferred: Coins::empty(),
        }
    }

    /// Coins released by the schedule at `now`.
    pub fn vested_coins(&self, now: i64) -> Coins {
        if now >= self.end_time {
            return self.original_vesting.clone();
        }
        if now < self.cliff_time || now <= self.start_time {
            return Coins::empty();
        }
        let elapsed = BigInt::from(now) - BigInt::from(self.start_time);
        let duration = BigInt::from(self.end_time) - BigInt::from(self.start_time);
        Coins::new(
            self.original_vesting
                .iter()
                .map(|c| Coin::new(c.denom.clone(), &c.amount * &elapsed / &duration))
                .collect(),
        )
    }

    /// Whether the schedule is one [`VestingSchedule::new`] could have built
    /// over a valid, non-empty coin set.
    pub fn is_well_formed(&self) -> bool {
        self.start_time <= self.cliff_time
            && self.cliff_time <= self.end_time
            && !self.original_vesting.is_empty()
            && self.original_vesting.is_valid()
    }

    /// Coins still locked at `now`.
    pub fn locked_coins(&self, now: i64) -> Coins {
        self.original_vesting.minus(&self.vested_coins(now))
    }

    /// Whether any coin is still locked at `now`.
    pub fn is_vesting(&self, now: i64) -> bool {
        now < self.end_time && !self.locked_coins(now).is_zero()
    }
}

/// Balance the account may move at `now`.
///
/// Without a schedule this is the full balance; otherwise the balance minus
/// whatever is still locked, floored at zero per denom.
pub fn spendable_coins(account: &Account, now: i64) -> Coins {
    match &account.vesting {
        None => account.coins.clone(),
        Some(schedule) => account
            .coins
            .minus(&schedule.locked_coins(now))
            .clamp_negative(),
    }
}

/// Record a transfer on a vesting account. `delta` is negative for
/// outgoing coins. Accounts without a schedule are left untouched.
pub fn track_transfer(account: &mut Account, delta: &Coins) {
    if let Some(schedule) = account.vesting.as_mut() {
        schedule.transferred = schedule.transferred.plus(delta);
    }
}
