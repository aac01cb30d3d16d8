//! Gas metering.

use houchain_core::TxError;

/// Gas meter tracks consumption against a per-transaction limit.
///
/// Consumption is recorded before the limit check, so a meter that ran out
/// reports how much the failing operation would have needed in total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self { limit, consumed: 0 }
    }

    /// A meter that never runs out, for genesis and block hooks.
    pub fn infinite() -> Self {
        Self::new(u64::MAX)
    }

    /// Consume gas, returning error if the limit is exceeded.
    pub fn consume(&mut self, amount: u64, descriptor: &str) -> Result<(), TxError> {
        self.consumed = self.consumed.saturating_add(amount);
        if self.consumed > self.limit {
            return Err(TxError::OutOfGas {
                descriptor: descriptor.to_string(),
                limit: self.limit,
                used: self.consumed,
            });
        }
        Ok(())
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.consumed)
    }

    pub fn is_exhausted(&self) -> bool {
        self.consumed >= self.limit
    }
}
