//! Account records keyed by address.

use crate::context::Context;
use crate::db::Storage;
use houchain_core::{Account, Address, Result};

/// Repository for account records.
///
/// The bank keeper is the only caller; every other module moves coins
/// through the bank keeper instead of touching accounts directly.
pub trait AccountStore {
    /// Load an account, `None` if it has never been written.
    fn get_account(&self, ctx: &Context<'_>, address: &Address) -> Result<Option<Account>>;

    /// Create or overwrite an account.
    fn set_account(&self, ctx: &mut Context<'_>, account: &Account) -> Result<()>;

    /// A fresh zero-balance account at `address`. Not persisted until
    /// [`AccountStore::set_account`] is called with it.
    fn new_account_with_address(&self, ctx: &Context<'_>, address: &Address) -> Account;
}

/// [`AccountStore`] backed by the context's key-value store, using
/// `"account:" || address` keys and bincode values.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountMapper;

impl AccountMapper {
    pub fn new() -> Self {
        Self
    }

    /// Every stored account, ordered by address.
    pub fn iterate_accounts(&self, ctx: &Context<'_>) -> Result<Vec<Account>> {
        Ok(ctx
            .scan_prefix::<Account>(Storage::ACCOUNT_PREFIX)?
            .into_iter()
            .map(|(_, account)| account)
            .collect())
    }
}

impl AccountStore for AccountMapper {
    fn get_account(&self, ctx: &Context<'_>, address: &Address) -> Result<Option<Account>> {
        ctx.get(&Storage::account_key(address))
    }

    fn set_account(&self, ctx: &mut Context<'_>, account: &Account) -> Result<()> {
        tracing::trace!(address = %account.address, coins = %account.coins, "set account");
        ctx.put(Storage::account_key(&account.address), account)
    }

    fn new_account_with_address(&self, _ctx: &Context<'_>, address: &Address) -> Account {
        Account::new(*address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gas::GasMeter;
    use houchain_core::{BlockHeader, Coins, VestingSchedule};

    fn setup() -> Storage {
        Storage::open_temporary().unwrap()
    }

    #[test]
    fn test_account_crud() {
        let storage = setup();
        let mut ctx = Context::new(&storage, BlockHeader::default(), GasMeter::infinite());
        let mapper = AccountMapper::new();
        let address = Address([0xAA; 20]);

        // Initially doesn't exist
        assert!(mapper.get_account(&ctx, &address).unwrap().is_none());

        let mut account = mapper.new_account_with_address(&ctx, &address);
        assert!(account.coins.is_empty());
        // Creating a fresh account does not persist it.
        assert!(mapper.get_account(&ctx, &address).unwrap().is_none());

        account.coins = "1000mycoin".parse().unwrap();
        mapper.set_account(&mut ctx, &account).unwrap();

        let retrieved = mapper.get_account(&ctx, &address).unwrap().unwrap();
        assert_eq!(retrieved, account);
    }

    #[test]
    fn test_vesting_schedule_persists() {
        let storage = setup();
        let mut ctx = Context::new(&storage, BlockHeader::default(), GasMeter::infinite());
        let mapper = AccountMapper::new();
        let schedule = VestingSchedule::new("100stake".parse().unwrap(), 0, 10, 20);
        let account = Account::new_vesting(Address([0xBB; 20]), schedule.clone());

        mapper.set_account(&mut ctx, &account).unwrap();
        let retrieved = mapper.get_account(&ctx, &account.address).unwrap().unwrap();
        assert_eq!(retrieved.vesting, Some(schedule));
    }

    #[test]
    fn test_iterate_accounts_sees_committed_and_cached() {
        let storage = setup();
        let mapper = AccountMapper::new();

        {
            let mut ctx = Context::new(&storage, BlockHeader::default(), GasMeter::infinite());
            mapper
                .set_account(&mut ctx, &Account::with_coins(Address([2; 20]), Coins::single("mycoin", 2)))
                .unwrap();
            let (writes, _) = ctx.into_parts();
            storage.batch(writes).unwrap();
        }

        let mut ctx = Context::new(&storage, BlockHeader::default(), GasMeter::infinite());
        mapper
            .set_account(&mut ctx, &Account::with_coins(Address([1; 20]), Coins::single("mycoin", 1)))
            .unwrap();

        let addresses: Vec<Address> = mapper
            .iterate_accounts(&ctx)
            .unwrap()
            .into_iter()
            .map(|a| a.address)
            .collect();
        assert_eq!(addresses, vec![Address([1; 20]), Address([2; 20])]);
    }
}
