//! Transactions and blocks.

use crate::app::Msg;
use houchain_core::{hash, Address, BlockHeader, Coins, Hash, Result, TxError};
use serde::{Deserialize, Serialize};

/// Fee offered by a transaction and the gas it may consume.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Coins,
    pub gas: u64,
}

impl StdFee {
    pub fn new(amount: Coins, gas: u64) -> Self {
        Self { amount, gas }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub msgs: Vec<Msg>,
    pub fee: StdFee,
    #[serde(default)]
    pub memo: String,
}

impl Tx {
    pub fn new(msgs: Vec<Msg>, fee: StdFee) -> Self {
        Self {
            msgs,
            fee,
            memo: String::new(),
        }
    }

    /// Builder-style memo.
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Decode a JSON-encoded transaction. Anything that does not parse,
    /// including an unknown message type, is an unknown request.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| TxError::UnknownRequest(e.to_string()))
    }

    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("transaction serialization should not fail")
    }

    pub fn hash(&self) -> Hash {
        hash(&self.encode())
    }

    /// Signers of all messages, first occurrence order, without duplicates.
    /// The first signer pays the fee.
    pub fn signers(&self) -> Vec<Address> {
        let mut signers = Vec::new();
        for signer in self.msgs.iter().flat_map(Msg::signers) {
            if !signers.contains(&signer) {
                signers.push(signer);
            }
        }
        signers
    }

    /// Stateless checks on the whole transaction.
    pub fn validate_basic(&self) -> Result<()> {
        if self.msgs.is_empty() {
            return Err(TxError::UnknownRequest("transaction has no messages".into()));
        }
        if !self.fee.amount.is_empty() && !self.fee.amount.is_valid() {
            return Err(TxError::InvalidCoins(format!("invalid fee {}", self.fee.amount)));
        }
        for msg in &self.msgs {
            msg.validate_basic()?;
        }
        Ok(())
    }
}

/// An ordered batch of transactions applied at one height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub txs: Vec<Tx>,
}

impl Block {
    pub fn new(header: BlockHeader, txs: Vec<Tx>) -> Self {
        Self { header, txs }
    }
}
