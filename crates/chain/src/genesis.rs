//! Genesis state and chain initialization.

use houchain_core::{Account, Address, BlockHeader, Coins, Hash, TxError, VestingSchedule};
use houchain_governance::{Delegation, GovParams, StoreDelegations};
use houchain_storage::{AccountMapper, AccountStore, Context, GasMeter, Storage, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("state error: {0}")]
    State(#[from] TxError),

    #[error("invalid genesis file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store is already initialized")]
    AlreadyInitialized,

    #[error("invalid genesis account {address}: {reason}")]
    InvalidAccount { address: Address, reason: String },

    #[error("invalid genesis delegation from {delegator}: {reason}")]
    InvalidDelegation { delegator: Address, reason: String },

    #[error("invalid governance parameters: {0}")]
    InvalidParams(String),
}

pub type Result<T> = std::result::Result<T, GenesisError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub address: Address,
    pub coins: Coins,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vesting: Option<VestingSchedule>,
}

impl GenesisAccount {
    pub fn new(address: Address, coins: Coins) -> Self {
        Self {
            address,
            coins,
            vesting: None,
        }
    }

    fn into_account(self) -> Account {
        Account {
            address: self.address,
            coins: self.coins,
            vesting: self.vesting,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenesisState {
    /// Block time of height 0, in unix seconds.
    #[serde(default)]
    pub genesis_time: i64,
    pub accounts: Vec<GenesisAccount>,
    #[serde(default)]
    pub delegations: Vec<Delegation>,
    #[serde(default)]
    pub gov: GovParams,
}

impl GenesisState {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for account in &self.accounts {
            let invalid = |reason: &str| GenesisError::InvalidAccount {
                address: account.address,
                reason: reason.to_string(),
            };
            if account.address.is_empty() {
                return Err(invalid("empty address"));
            }
            if !seen.insert(account.address) {
                return Err(invalid("duplicate account"));
            }
            if !account.coins.is_empty() && !account.coins.is_valid() {
                return Err(invalid("invalid coins"));
            }
            if let Some(schedule) = &account.vesting {
                if !schedule.is_well_formed() {
                    return Err(invalid("malformed vesting schedule"));
                }
            }
        }

        for delegation in &self.delegations {
            let invalid = |reason: &str| GenesisError::InvalidDelegation {
                delegator: delegation.delegator,
                reason: reason.to_string(),
            };
            if delegation.delegator.is_empty() || delegation.validator.is_empty() {
                return Err(invalid("empty address"));
            }
            if delegation.bond_shares <= 0 {
                return Err(invalid("bond shares must be positive"));
            }
        }

        let gov = &self.gov;
        if gov.voting_period < 0 {
            return Err(GenesisError::InvalidParams(format!(
                "negative voting period {}",
                gov.voting_period
            )));
        }
        if !gov.min_deposit.is_empty() && !gov.min_deposit.is_valid() {
            return Err(GenesisError::InvalidParams(format!(
                "invalid minimum deposit {}",
                gov.min_deposit
            )));
        }
        Ok(())
    }
}

/// Write the genesis state into an empty store and return the state root.
///
/// Height 0 is recorded as the last committed block, so the first executed
/// block must be height 1.
pub fn init_genesis(storage: &Storage, genesis: &GenesisState) -> Result<Hash> {
    if !storage.is_empty() {
        return Err(GenesisError::AlreadyInitialized);
    }
    genesis.validate()?;

    let header = BlockHeader::new(0, genesis.genesis_time);
    let mut ctx = Context::new(storage, header, GasMeter::infinite());

    for account in &genesis.accounts {
        AccountMapper.set_account(&mut ctx, &account.clone().into_account())?;
    }
    for delegation in &genesis.delegations {
        StoreDelegations.set_delegation(&mut ctx, delegation)?;
    }
    genesis.gov.save(&mut ctx)?;
    ctx.put(Storage::META_HEIGHT_KEY.to_vec(), &header.height)?;
    ctx.put(Storage::META_TIME_KEY.to_vec(), &header.time)?;

    let (writes, _) = ctx.into_parts();
    storage.batch(writes)?;
    storage.flush()?;

    let root = storage.state_root()?;
    info!(accounts = genesis.accounts.len(), %root, "genesis initialized");
    Ok(root)
}
