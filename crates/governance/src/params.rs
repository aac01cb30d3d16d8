//! Governance parameters.

use crate::keys;
use houchain_core::{Coins, Result};
use houchain_storage::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovParams {
    /// Smallest deposit that opens a proposal, compared per denom.
    pub min_deposit: Coins,
    /// Number of blocks after submission during which votes are accepted.
    pub voting_period: i64,
    /// Upper bound on delegations counted for a single voter.
    pub max_delegations: u16,
}

impl Default for GovParams {
    fn default() -> Self {
        Self {
            min_deposit: Coins::single("mycoin", 100),
            voting_period: 100,
            max_delegations: 10,
        }
    }
}

impl GovParams {
    /// Parameters recorded at genesis, if any.
    pub fn load(ctx: &Context<'_>) -> Result<Option<Self>> {
        ctx.get(keys::PARAMS_KEY)
    }

    pub fn save(&self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.put(keys::PARAMS_KEY.to_vec(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use houchain_core::BlockHeader;
    use houchain_storage::{GasMeter, Storage};

    #[test]
    fn test_params_persist() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = Context::new(&storage, BlockHeader::default(), GasMeter::infinite());
        assert!(GovParams::load(&ctx).unwrap().is_none());

        let params = GovParams {
            voting_period: 5,
            ..GovParams::default()
        };
        params.save(&mut ctx).unwrap();
        assert_eq!(GovParams::load(&ctx).unwrap(), Some(params));
    }
}
