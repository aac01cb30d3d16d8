//! Stake delegations used as voting weight.

use crate::keys;
use houchain_core::{Address, Result};
use houchain_storage::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator: Address,
    pub validator: Address,
    /// Voting weight contributed by this delegation.
    pub bond_shares: i64,
}

impl Delegation {
    pub fn new(delegator: Address, validator: Address, bond_shares: i64) -> Self {
        Self {
            delegator,
            validator,
            bond_shares,
        }
    }
}

/// Source of a voter's current delegations.
pub trait DelegationOracle {
    /// At most `max` delegations of `delegator`, in validator order.
    fn get_delegations(
        &self,
        ctx: &Context<'_>,
        delegator: &Address,
        max: u16,
    ) -> Result<Vec<Delegation>>;
}

/// Delegations kept under the `delegations:` prefix of the shared store.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreDelegations;

impl StoreDelegations {
    pub fn new() -> Self {
        Self
    }

    pub fn set_delegation(&self, ctx: &mut Context<'_>, delegation: &Delegation) -> Result<()> {
        ctx.put(
            keys::delegation_key(&delegation.delegator, &delegation.validator),
            delegation,
        )
    }

    pub fn remove_delegation(&self, ctx: &mut Context<'_>, delegator: &Address, validator: &Address) {
        ctx.delete(keys::delegation_key(delegator, validator));
    }
}

impl DelegationOracle for StoreDelegations {
    fn get_delegations(
        &self,
        ctx: &Context<'_>,
        delegator: &Address,
        max: u16,
    ) -> Result<Vec<Delegation>> {
        Ok(ctx
            .scan_prefix::<Delegation>(&keys::delegator_key(delegator))?
            .into_iter()
            .take(max as usize)
            .map(|(_, delegation)| delegation)
            .collect())
    }
}
