//! The bank keeper: balance queries and coin movements.
//!
//! Access comes in three tiers with strict inclusion:
//!
//! - [`ViewKeeper`]: read balances.
//! - [`SendKeeper`]: move existing coins between accounts.
//! - [`Keeper`]: additionally set, mint (add) and burn (subtract) coins.
//!
//! [`BaseViewKeeper`] and [`BaseSendKeeper`] only implement the narrower
//! traits, so a module handed one of them cannot call a write method at all.
//!
//! Every operation charges its gas cost before touching the store. None of
//! them undo their own writes on failure: a transaction that fails halfway
//! (for example in the add step of a send) relies on its [`Context`] being
//! discarded by the executor.

use houchain_core::vesting::{spendable_coins, track_transfer};
use houchain_core::{Address, Coin, Coins, Result, Tags, TxError};
use houchain_storage::{AccountMapper, AccountStore, Context};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gas costs for bank operations.
pub struct GasCosts;

impl GasCosts {
    pub const GET_COINS: u64 = 10;
    pub const HAS_COINS: u64 = 10;
    pub const SET_COINS: u64 = 100;
    pub const SUBTRACT_COINS: u64 = 10;
    pub const ADD_COINS: u64 = 10;
}

/// One debit leg of a multi-transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub address: Address,
    pub coins: Coins,
}

/// One credit leg of a multi-transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub address: Address,
    pub coins: Coins,
}

impl Input {
    pub fn new(address: Address, coins: Coins) -> Self {
        Self { address, coins }
    }
}

impl Output {
    pub fn new(address: Address, coins: Coins) -> Self {
        Self { address, coins }
    }
}

/// Read-only access to balances.
pub trait ViewKeeper {
    /// Balance of `addr`, empty if the account does not exist.
    fn get_coins(&self, ctx: &mut Context<'_>, addr: &Address) -> Result<Coins>;

    /// Whether `addr` holds at least `amt` in every denom.
    fn has_coins(&self, ctx: &mut Context<'_>, addr: &Address, amt: &Coins) -> Result<bool>;
}

/// Transfers between accounts without creating or destroying coins.
pub trait SendKeeper: ViewKeeper {
    /// Move `amt` from `from` to `to`.
    fn send_coins(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        to: &Address,
        amt: &Coins,
    ) -> Result<Tags>;

    /// Debit every input, then credit every output.
    ///
    /// Inputs and outputs are not checked for equal totals here; that is the
    /// job of message validation ([`MsgSend::validate_basic`]).
    ///
    /// [`MsgSend::validate_basic`]: crate::msgs::MsgSend::validate_basic
    fn input_output_coins(
        &self,
        ctx: &mut Context<'_>,
        inputs: &[Input],
        outputs: &[Output],
    ) -> Result<Tags>;
}

/// Full access, including coin creation and destruction.
pub trait Keeper: SendKeeper {
    /// Replace the balance of `addr`, creating the account if needed.
    fn set_coins(&self, ctx: &mut Context<'_>, addr: &Address, amt: &Coins) -> Result<()>;

    /// Remove `amt` from `addr`, honoring vesting locks. Returns the new
    /// balance.
    fn subtract_coins(
        &self,
        ctx: &mut Context<'_>,
        addr: &Address,
        amt: &Coins,
    ) -> Result<(Coins, Tags)>;

    /// Add `amt` to `addr`. Returns the new balance.
    fn add_coins(
        &self,
        ctx: &mut Context<'_>,
        addr: &Address,
        amt: &Coins,
    ) -> Result<(Coins, Tags)>;
}

// =============================================================================
// Keeper implementations
// =============================================================================

/// The full-access keeper.
#[derive(Debug, Clone, Default)]
pub struct BaseKeeper<A: AccountStore = AccountMapper> {
    am: A,
}

impl<A: AccountStore> BaseKeeper<A> {
    pub fn new(am: A) -> Self {
        Self { am }
    }

    /// Debit without consulting vesting locks, for staking.
    pub fn delegate_coins(&self, ctx: &mut Context<'_>, addr: &Address, amt: &Coins) -> Result<Tags> {
        delegate_coins(ctx, &self.am, addr, amt)
    }

    /// Charge a transaction fee. See [`deduct_fees`] for how vesting
    /// accounts are handled.
    pub fn deduct_fees(&self, ctx: &mut Context<'_>, addr: &Address, fee: &Coins) -> Result<Tags> {
        deduct_fees(ctx, &self.am, addr, fee)
    }
}

impl<A: AccountStore> ViewKeeper for BaseKeeper<A> {
    fn get_coins(&self, ctx: &mut Context<'_>, addr: &Address) -> Result<Coins> {
        get_coins(ctx, &self.am, addr)
    }

    fn has_coins(&self, ctx: &mut Context<'_>, addr: &Address, amt: &Coins) -> Result<bool> {
        has_coins(ctx, &self.am, addr, amt)
    }
}

impl<A: AccountStore> SendKeeper for BaseKeeper<A> {
    fn send_coins(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        to: &Address,
        amt: &Coins,
    ) -> Result<Tags> {
        send_coins(ctx, &self.am, from, to, amt)
    }

    fn input_output_coins(
        &self,
        ctx: &mut Context<'_>,
        inputs: &[Input],
        outputs: &[Output],
    ) -> Result<Tags> {
        input_output_coins(ctx, &self.am, inputs, outputs)
    }
}

impl<A: AccountStore> Keeper for BaseKeeper<A> {
    fn set_coins(&self, ctx: &mut Context<'_>, addr: &Address, amt: &Coins) -> Result<()> {
        set_coins(ctx, &self.am, addr, amt)
    }

    fn subtract_coins(
        &self,
        ctx: &mut Context<'_>,
        addr: &Address,
        amt: &Coins,
    ) -> Result<(Coins, Tags)> {
        subtract_coins(ctx, &self.am, addr, amt)
    }

    fn add_coins(
        &self,
        ctx: &mut Context<'_>,
        addr: &Address,
        amt: &Coins,
    ) -> Result<(Coins, Tags)> {
        add_coins(ctx, &self.am, addr, amt)
    }
}

/// Transfer-only keeper: it cannot create or destroy coins.
#[derive(Debug, Clone, Default)]
pub struct BaseSendKeeper<A: AccountStore = AccountMapper> {
    am: A,
}

impl<A: AccountStore> BaseSendKeeper<A> {
    pub fn new(am: A) -> Self {
        Self { am }
    }
}

impl<A: AccountStore> ViewKeeper for BaseSendKeeper<A> {
    fn get_coins(&self, ctx: &mut Context<'_>, addr: &Address) -> Result<Coins> {
        get_coins(ctx, &self.am, addr)
    }

    fn has_coins(&self, ctx: &mut Context<'_>, addr: &Address, amt: &Coins) -> Result<bool> {
        has_coins(ctx, &self.am, addr, amt)
    }
}

impl<A: AccountStore> SendKeeper for BaseSendKeeper<A> {
    fn send_coins(
        &self,
        ctx: &mut Context<'_>,
        from: &Address,
        to: &Address,
        amt: &Coins,
    ) -> Result<Tags> {
        send_coins(ctx, &self.am, from, to, amt)
    }

    fn input_output_coins(
        &self,
        ctx: &mut Context<'_>,
        inputs: &[Input],
        outputs: &[Output],
    ) -> Result<Tags> {
        input_output_coins(ctx, &self.am, inputs, outputs)
    }
}

/// Read-only keeper.
#[derive(Debug, Clone, Default)]
pub struct BaseViewKeeper<A: AccountStore = AccountMapper> {
    am: A,
}

impl<A: AccountStore> BaseViewKeeper<A> {
    pub fn new(am: A) -> Self {
        Self { am }
    }
}

impl<A: AccountStore> ViewKeeper for BaseViewKeeper<A> {
    fn get_coins(&self, ctx: &mut Context<'_>, addr: &Address) -> Result<Coins> {
        get_coins(ctx, &self.am, addr)
    }

    fn has_coins(&self, ctx: &mut Context<'_>, addr: &Address, amt: &Coins) -> Result<bool> {
        has_coins(ctx, &self.am, addr, amt)
    }
}

// =============================================================================
// Shared operations
// =============================================================================

fn address_tag(key: &str, addr: &Address) -> Tags {
    Tags::single(key, addr.as_bytes().to_vec())
}

fn get_coins<A: AccountStore>(ctx: &mut Context<'_>, am: &A, addr: &Address) -> Result<Coins> {
    ctx.consume_gas(GasCosts::GET_COINS, "getCoins")?;

    Ok(am
        .get_account(ctx, addr)?
        .map(|account| account.coins)
        .unwrap_or_default())
}

fn set_coins<A: AccountStore>(
    ctx: &mut Context<'_>,
    am: &A,
    addr: &Address,
    amt: &Coins,
) -> Result<()> {
    ctx.consume_gas(GasCosts::SET_COINS, "setCoins")?;

    let mut account = match am.get_account(ctx, addr)? {
        Some(account) => account,
        None => am.new_account_with_address(ctx, addr),
    };
    account.coins = amt.clone();
    am.set_account(ctx, &account)
}

fn has_coins<A: AccountStore>(
    ctx: &mut Context<'_>,
    am: &A,
    addr: &Address,
    amt: &Coins,
) -> Result<bool> {
    ctx.consume_gas(GasCosts::HAS_COINS, "hasCoins")?;
    Ok(get_coins(ctx, am, addr)?.is_gte(amt))
}

fn subtract_coins<A: AccountStore>(
    ctx: &mut Context<'_>,
    am: &A,
    addr: &Address,
    amt: &Coins,
) -> Result<(Coins, Tags)> {
    ctx.consume_gas(GasCosts::SUBTRACT_COINS, "subtractCoins")?;

    let old_coins = get_coins(ctx, am, addr)?;
    let new_coins = old_coins.minus(amt);
    if !new_coins.is_not_negative() {
        debug!(%addr, have = %old_coins, want = %amt, "subtract rejected");
        return Err(TxError::InsufficientCoins(format!("{} < {}", old_coins, amt)));
    }

    let now = ctx.block_time();
    let vesting = am.get_account(ctx, addr)?.filter(|a| a.is_vesting(now));
    if let Some(mut account) = vesting {
        if !spendable_coins(&account, now).is_gte(amt) {
            debug!(%addr, want = %amt, "subtract rejected by vesting lock");
            return Err(TxError::InsufficientCoins(
                "not enough sendable coins in vesting account".to_string(),
            ));
        }
        track_transfer(&mut account, &amt.negative());
        am.set_account(ctx, &account)?;
    }

    set_coins(ctx, am, addr, &new_coins)?;
    Ok((new_coins, address_tag("sender", addr)))
}

fn add_coins<A: AccountStore>(
    ctx: &mut Context<'_>,
    am: &A,
    addr: &Address,
    amt: &Coins,
) -> Result<(Coins, Tags)> {
    ctx.consume_gas(GasCosts::ADD_COINS, "addCoins")?;

    let old_coins = get_coins(ctx, am, addr)?;
    let new_coins = old_coins.plus(amt);
    if !new_coins.is_not_negative() {
        return Err(TxError::InsufficientCoins(format!("{} < {}", old_coins, amt)));
    }

    let now = ctx.block_time();
    let vesting = am.get_account(ctx, addr)?.filter(|a| a.is_vesting(now));
    if let Some(mut account) = vesting {
        track_transfer(&mut account, amt);
        am.set_account(ctx, &account)?;
    }

    set_coins(ctx, am, addr, &new_coins)?;
    Ok((new_coins, address_tag("recipient", addr)))
}

fn send_coins<A: AccountStore>(
    ctx: &mut Context<'_>,
    am: &A,
    from: &Address,
    to: &Address,
    amt: &Coins,
) -> Result<Tags> {
    let (_, mut tags) = subtract_coins(ctx, am, from, amt)?;
    let (_, add_tags) = add_coins(ctx, am, to, amt)?;
    tags.append(add_tags);
    debug!(%from, %to, %amt, "coins sent");
    Ok(tags)
}

fn input_output_coins<A: AccountStore>(
    ctx: &mut Context<'_>,
    am: &A,
    inputs: &[Input],
    outputs: &[Output],
) -> Result<Tags> {
    let mut all_tags = Tags::new();

    for input in inputs {
        let (_, tags) = subtract_coins(ctx, am, &input.address, &input.coins)?;
        all_tags.append(tags);
    }

    for output in outputs {
        let (_, tags) = add_coins(ctx, am, &output.address, &output.coins)?;
        all_tags.append(tags);
    }

    Ok(all_tags)
}

fn delegate_coins<A: AccountStore>(
    ctx: &mut Context<'_>,
    am: &A,
    addr: &Address,
    amt: &Coins,
) -> Result<Tags> {
    ctx.consume_gas(GasCosts::SUBTRACT_COINS, "delegateCoins")?;

    let old_coins = get_coins(ctx, am, addr)?;
    let new_coins = old_coins.minus(amt);
    if !new_coins.is_not_negative() {
        return Err(TxError::InsufficientCoins(format!("{} < {}", old_coins, amt)));
    }

    set_coins(ctx, am, addr, &new_coins)?;
    Ok(address_tag("sender", addr))
}

/// Charge `fee` to `addr`.
///
/// For a vesting account each fee denom is tracked as an outgoing transfer,
/// capped at what is currently spendable; the remainder of the fee is taken
/// from locked coins. Fee denoms that drop to zero are removed from the
/// balance instead of being stored as zero entries. Denoms not named in the
/// fee are left as they are.
fn deduct_fees<A: AccountStore>(
    ctx: &mut Context<'_>,
    am: &A,
    addr: &Address,
    fee: &Coins,
) -> Result<Tags> {
    ctx.consume_gas(GasCosts::SUBTRACT_COINS, "deductFees")?;

    let old_coins = get_coins(ctx, am, addr)?;
    let now = ctx.block_time();

    for coin in fee {
        let vesting = am.get_account(ctx, addr)?.filter(|a| a.is_vesting(now));
        if let Some(mut account) = vesting {
            let spendable = spendable_coins(&account, now).amount_of(&coin.denom);
            let tracked = if spendable >= coin.amount {
                coin.amount.clone()
            } else {
                spendable
            };
            track_transfer(&mut account, &Coins::single(coin.denom.clone(), -tracked));
            am.set_account(ctx, &account)?;
        }

        if old_coins.amount_of(&coin.denom) < coin.amount {
            debug!(%addr, %fee, "fee rejected");
            return Err(TxError::InsufficientCoins(
                "not enough coins for fee".to_string(),
            ));
        }
    }

    let new_coins = Coins::new(
        old_coins
            .minus(fee)
            .iter()
            .filter(|c| !(c.is_zero() && fee.iter().any(|f| f.denom == c.denom)))
            .cloned()
            .collect::<Vec<Coin>>(),
    );

    set_coins(ctx, am, addr, &new_coins)?;
    Ok(address_tag("sender", addr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use houchain_core::{Account, BlockHeader, VestingSchedule};
    use houchain_storage::{GasMeter, Storage};

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    fn addr(seed: u8) -> Address {
        Address([seed; 20])
    }

    fn ctx_at(storage: &Storage, time: i64) -> Context<'_> {
        Context::new(storage, BlockHeader::new(1, time), GasMeter::infinite())
    }

    #[test]
    fn test_get_coins_of_missing_account_is_empty() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = ctx_at(&storage, 0);
        let keeper = BaseKeeper::<AccountMapper>::default();

        assert!(keeper.get_coins(&mut ctx, &addr(1)).unwrap().is_empty());
        assert!(keeper.has_coins(&mut ctx, &addr(1), &Coins::empty()).unwrap());
        assert!(!keeper.has_coins(&mut ctx, &addr(1), &coins("1mycoin")).unwrap());
    }

    #[test]
    fn test_views_are_idempotent() {
        let storage = Storage::open_temporary().unwrap();
        let keeper = BaseKeeper::<AccountMapper>::default();
        {
            let mut ctx = ctx_at(&storage, 0);
            keeper.set_coins(&mut ctx, &addr(1), &coins("10mycoin")).unwrap();
            storage.batch(ctx.into_parts().0).unwrap();
        }

        let mut ctx = ctx_at(&storage, 0);
        let first = keeper.get_coins(&mut ctx, &addr(1)).unwrap();
        let second = keeper.get_coins(&mut ctx, &addr(1)).unwrap();
        assert_eq!(first, second);
        assert!(keeper.has_coins(&mut ctx, &addr(1), &coins("10mycoin")).unwrap());
        assert!(keeper.get_coins(&mut ctx, &addr(2)).unwrap().is_empty());
        assert_eq!(keeper.get_coins(&mut ctx, &addr(1)).unwrap(), coins("10mycoin"));

        // Views leave no pending writes, absent accounts included.
        let (writes, _) = ctx.into_parts();
        assert!(writes.is_empty());
    }

    #[test]
    fn test_send_moves_coins() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = ctx_at(&storage, 0);
        let keeper = BaseKeeper::<AccountMapper>::default();
        keeper.set_coins(&mut ctx, &addr(1), &coins("100mycoin")).unwrap();

        let tags = keeper
            .send_coins(&mut ctx, &addr(1), &addr(2), &coins("60mycoin"))
            .unwrap();

        assert_eq!(keeper.get_coins(&mut ctx, &addr(1)).unwrap(), coins("40mycoin"));
        assert_eq!(keeper.get_coins(&mut ctx, &addr(2)).unwrap(), coins("60mycoin"));
        assert_eq!(tags.get("sender"), Some(addr(1).as_bytes().as_slice()));
        assert_eq!(tags.get("recipient"), Some(addr(2).as_bytes().as_slice()));
    }

    #[test]
    fn test_subtract_never_goes_negative() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = ctx_at(&storage, 0);
        let keeper = BaseKeeper::<AccountMapper>::default();
        keeper.set_coins(&mut ctx, &addr(1), &coins("5mycoin")).unwrap();

        let err = keeper
            .subtract_coins(&mut ctx, &addr(1), &coins("6mycoin"))
            .unwrap_err();
        assert_eq!(err, TxError::InsufficientCoins("5mycoin < 6mycoin".into()));
        assert_eq!(keeper.get_coins(&mut ctx, &addr(1)).unwrap(), coins("5mycoin"));
    }

    #[test]
    fn test_subtract_to_zero_keeps_zero_entry() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = ctx_at(&storage, 0);
        let keeper = BaseKeeper::<AccountMapper>::default();
        keeper.set_coins(&mut ctx, &addr(1), &coins("5mycoin")).unwrap();

        let (remaining, _) = keeper
            .subtract_coins(&mut ctx, &addr(1), &coins("5mycoin"))
            .unwrap();
        assert_eq!(remaining.amount_of("mycoin"), 0.into());
        assert!(remaining.is_zero());
    }

    #[test]
    fn test_add_creates_account() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = ctx_at(&storage, 0);
        let keeper = BaseKeeper::<AccountMapper>::default();

        let (balance, tags) = keeper.add_coins(&mut ctx, &addr(9), &coins("7mycoin")).unwrap();
        assert_eq!(balance, coins("7mycoin"));
        assert_eq!(tags.get("recipient"), Some(addr(9).as_bytes().as_slice()));
        assert!(AccountMapper.get_account(&ctx, &addr(9)).unwrap().is_some());
    }

    #[test]
    fn test_input_output_coins() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = ctx_at(&storage, 0);
        let keeper = BaseKeeper::<AccountMapper>::default();
        keeper.set_coins(&mut ctx, &addr(1), &coins("30mycoin")).unwrap();
        keeper.set_coins(&mut ctx, &addr(2), &coins("20mycoin")).unwrap();

        let inputs = vec![
            Input::new(addr(1), coins("10mycoin")),
            Input::new(addr(2), coins("20mycoin")),
        ];
        let outputs = vec![Output::new(addr(3), coins("30mycoin"))];
        let tags = keeper.input_output_coins(&mut ctx, &inputs, &outputs).unwrap();

        assert_eq!(keeper.get_coins(&mut ctx, &addr(1)).unwrap(), coins("20mycoin"));
        assert!(keeper.get_coins(&mut ctx, &addr(2)).unwrap().is_zero());
        assert_eq!(keeper.get_coins(&mut ctx, &addr(3)).unwrap(), coins("30mycoin"));
        assert_eq!(tags.get_all("sender").count(), 2);
        assert_eq!(tags.get_all("recipient").count(), 1);
    }

    #[test]
    fn test_input_output_coins_fails_in_output_phase() {
        let storage = Storage::open_temporary().unwrap();
        let keeper = BaseKeeper::<AccountMapper>::default();
        {
            let mut ctx = ctx_at(&storage, 0);
            keeper.set_coins(&mut ctx, &addr(1), &coins("10mycoin")).unwrap();
            storage.batch(ctx.into_parts().0).unwrap();
        }

        // One subtract and one add fit, the second add does not.
        let step = GasCosts::ADD_COINS + GasCosts::GET_COINS + GasCosts::SET_COINS;
        let limit = 3 * step - 1;
        let mut ctx = Context::new(&storage, BlockHeader::new(1, 0), GasMeter::new(limit));
        let inputs = vec![Input::new(addr(1), coins("10mycoin"))];
        let outputs = vec![
            Output::new(addr(2), coins("5mycoin")),
            Output::new(addr(3), coins("5mycoin")),
        ];
        let err = keeper
            .input_output_coins(&mut ctx, &inputs, &outputs)
            .unwrap_err();
        assert_eq!(err.code(), 12);

        // The partial writes exist only in the context; committed state is untouched.
        drop(ctx);
        let mut ctx = ctx_at(&storage, 0);
        assert_eq!(keeper.get_coins(&mut ctx, &addr(1)).unwrap(), coins("10mycoin"));
        assert!(keeper.get_coins(&mut ctx, &addr(2)).unwrap().is_empty());
        assert!(keeper.get_coins(&mut ctx, &addr(3)).unwrap().is_empty());
    }

    #[test]
    fn test_vesting_lock_blocks_then_releases() {
        let storage = Storage::open_temporary().unwrap();
        let keeper = BaseKeeper::<AccountMapper>::default();
        let vester = addr(1);

        {
            let mut ctx = ctx_at(&storage, 0);
            let schedule = VestingSchedule::new(coins("100stake"), 0, 0, 100);
            AccountMapper
                .set_account(&mut ctx, &Account::new_vesting(vester, schedule))
                .unwrap();
            let (writes, _) = ctx.into_parts();
            storage.batch(writes).unwrap();
        }

        // Half vested at t=50.
        let mut ctx = ctx_at(&storage, 50);
        let err = keeper
            .send_coins(&mut ctx, &vester, &addr(2), &coins("60stake"))
            .unwrap_err();
        assert_eq!(
            err,
            TxError::InsufficientCoins("not enough sendable coins in vesting account".into())
        );
        keeper
            .send_coins(&mut ctx, &vester, &addr(2), &coins("50stake"))
            .unwrap();
        let account = AccountMapper.get_account(&ctx, &vester).unwrap().unwrap();
        assert_eq!(account.vesting.unwrap().transferred, coins("50stake").negative());

        // Fully vested once the schedule ends.
        let mut ctx = ctx_at(&storage, 100);
        keeper
            .send_coins(&mut ctx, &vester, &addr(2), &coins("100stake"))
            .unwrap();
        assert!(keeper.get_coins(&mut ctx, &vester).unwrap().is_zero());
    }

    #[test]
    fn test_delegate_ignores_vesting_lock() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = ctx_at(&storage, 10);
        let keeper = BaseKeeper::<AccountMapper>::default();
        let schedule = VestingSchedule::new(coins("100stake"), 0, 0, 100);
        AccountMapper
            .set_account(&mut ctx, &Account::new_vesting(addr(1), schedule))
            .unwrap();

        keeper.delegate_coins(&mut ctx, &addr(1), &coins("90stake")).unwrap();
        assert_eq!(keeper.get_coins(&mut ctx, &addr(1)).unwrap(), coins("10stake"));

        let err = keeper
            .delegate_coins(&mut ctx, &addr(1), &coins("11stake"))
            .unwrap_err();
        assert!(matches!(err, TxError::InsufficientCoins(_)));
    }

    #[test]
    fn test_deduct_fees_keeps_other_denoms() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = ctx_at(&storage, 0);
        let keeper = BaseKeeper::<AccountMapper>::default();
        keeper
            .set_coins(&mut ctx, &addr(1), &coins("5fee,100mycoin"))
            .unwrap();

        keeper.deduct_fees(&mut ctx, &addr(1), &coins("5fee")).unwrap();
        // The exhausted fee denom disappears, the rest is untouched.
        assert_eq!(keeper.get_coins(&mut ctx, &addr(1)).unwrap(), coins("100mycoin"));
    }

    #[test]
    fn test_deduct_fees_insufficient() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = ctx_at(&storage, 0);
        let keeper = BaseKeeper::<AccountMapper>::default();
        keeper.set_coins(&mut ctx, &addr(1), &coins("4fee")).unwrap();

        let err = keeper
            .deduct_fees(&mut ctx, &addr(1), &coins("5fee"))
            .unwrap_err();
        assert_eq!(err, TxError::InsufficientCoins("not enough coins for fee".into()));
    }

    #[test]
    fn test_deduct_fees_may_use_locked_coins() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = ctx_at(&storage, 10);
        let keeper = BaseKeeper::<AccountMapper>::default();
        let schedule = VestingSchedule::new(coins("100stake"), 0, 0, 100);
        AccountMapper
            .set_account(&mut ctx, &Account::new_vesting(addr(1), schedule))
            .unwrap();

        // 10 spendable at t=10; the fee of 30 still goes through.
        keeper.deduct_fees(&mut ctx, &addr(1), &coins("30stake")).unwrap();
        let account = AccountMapper.get_account(&ctx, &addr(1)).unwrap().unwrap();
        assert_eq!(account.coins, coins("70stake"));
        assert_eq!(account.vesting.unwrap().transferred, coins("10stake").negative());
    }

    #[test]
    fn test_operations_charge_gas() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = Context::new(&storage, BlockHeader::default(), GasMeter::new(1_000));
        let keeper = BaseKeeper::<AccountMapper>::default();

        keeper.get_coins(&mut ctx, &addr(1)).unwrap();
        assert_eq!(ctx.gas_meter().consumed(), GasCosts::GET_COINS);

        keeper.has_coins(&mut ctx, &addr(1), &Coins::empty()).unwrap();
        assert_eq!(
            ctx.gas_meter().consumed(),
            2 * GasCosts::GET_COINS + GasCosts::HAS_COINS
        );
    }

    #[test]
    fn test_out_of_gas() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = Context::new(&storage, BlockHeader::default(), GasMeter::new(50));
        let keeper = BaseKeeper::<AccountMapper>::default();

        let err = keeper.set_coins(&mut ctx, &addr(1), &coins("1mycoin")).unwrap_err();
        assert!(matches!(err, TxError::OutOfGas { ref descriptor, .. } if descriptor == "setCoins"));
    }

    #[test]
    fn test_send_keeper_reads_and_sends() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = ctx_at(&storage, 0);
        BaseKeeper::<AccountMapper>::default()
            .set_coins(&mut ctx, &addr(1), &coins("3mycoin"))
            .unwrap();

        let sender = BaseSendKeeper::new(AccountMapper);
        sender.send_coins(&mut ctx, &addr(1), &addr(2), &coins("3mycoin")).unwrap();

        let viewer = BaseViewKeeper::new(AccountMapper);
        assert_eq!(viewer.get_coins(&mut ctx, &addr(2)).unwrap(), coins("3mycoin"));
    }
}
