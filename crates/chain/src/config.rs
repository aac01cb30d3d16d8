//! Chain configuration.

use houchain_governance::GovParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Governance parameters used when the store holds none.
    #[serde(default)]
    pub gov: GovParams,
    /// Maximum transactions per block.
    pub max_block_size: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            gov: GovParams::default(),
            max_block_size: 1000,
        }
    }
}
