//! Transaction-level error taxonomy.
//!
//! Every engine operation fails with a [`TxError`]. Each variant belongs to a
//! codespace and carries a stable numeric code that ends up in transaction
//! receipts; the message is free-form and meant for humans.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Module-scoped namespace for error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Codespace {
    Root,
    Stake,
    Governance,
}

impl Codespace {
    pub fn id(self) -> u16 {
        match self {
            Codespace::Root => 1,
            Codespace::Stake => 4,
            Codespace::Governance => 7,
        }
    }
}

impl fmt::Display for Codespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Codespace::Root => "sdk",
            Codespace::Stake => "stake",
            Codespace::Governance => "governance",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// Persisted data could not be decoded or encoded. Fatal.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("unknown request: {0}")]
    UnknownRequest(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("insufficient coins: {0}")]
    InsufficientCoins(String),

    #[error("invalid coins: {0}")]
    InvalidCoins(String),

    #[error("out of gas in {descriptor}: limit {limit}, used {used}")]
    OutOfGas {
        descriptor: String,
        limit: u64,
        used: u64,
    },

    #[error("no delegation for address: {0}")]
    NoDelegation(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("invalid proposal id: {0}")]
    InvalidProposalId(String),

    #[error("voting period closed: {0}")]
    VotingPeriodClosed(String),

    #[error("proposal queue is empty")]
    EmptyProposalQueue,

    #[error("invalid proposal title: {0}")]
    InvalidTitle(String),

    #[error("invalid proposal description: {0}")]
    InvalidDescription(String),

    #[error("proposal with id {0} not found")]
    ProposalNotFound(i64),

    #[error("vote not found: {0}")]
    VoteNotFound(String),

    #[error("proposal queue not found")]
    ProposalQueueNotFound,

    #[error("invalid deposit: {0}")]
    InvalidDeposit(String),
}

impl TxError {
    pub fn codespace(&self) -> Codespace {
        match self {
            TxError::Internal(_)
            | TxError::Unauthorized(_)
            | TxError::UnknownRequest(_)
            | TxError::InvalidAddress(_)
            | TxError::InsufficientCoins(_)
            | TxError::InvalidCoins(_)
            | TxError::OutOfGas { .. } => Codespace::Root,
            TxError::NoDelegation(_) => Codespace::Stake,
            _ => Codespace::Governance,
        }
    }

    /// Numeric code within the codespace.
    pub fn code(&self) -> u32 {
        match self {
            TxError::Internal(_) => 1,
            TxError::Unauthorized(_) => 4,
            TxError::UnknownRequest(_) => 6,
            TxError::InvalidAddress(_) => 7,
            TxError::InsufficientCoins(_) => 10,
            TxError::InvalidCoins(_) => 11,
            TxError::OutOfGas { .. } => 12,
            TxError::NoDelegation(_) => 102,
            TxError::InvalidOption(_) => 701,
            TxError::InvalidProposalId(_) => 702,
            TxError::VotingPeriodClosed(_) => 703,
            TxError::EmptyProposalQueue => 704,
            TxError::InvalidTitle(_) => 705,
            TxError::InvalidDescription(_) => 706,
            TxError::ProposalNotFound(_) => 707,
            TxError::VoteNotFound(_) => 708,
            TxError::ProposalQueueNotFound => 709,
            TxError::InvalidDeposit(_) => 710,
        }
    }

    /// Only store corruption aborts block processing; everything else is a
    /// failed transaction.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TxError::Internal(_))
    }
}

pub type Result<T> = std::result::Result<T, TxError>;
