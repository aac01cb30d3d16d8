//! Governance messages.

use crate::types::VoteOption;
use houchain_core::{Address, Coins, Result, TxError};
use serde::{Deserialize, Serialize};

/// Messages routed to the governance module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum GovMsg {
    #[serde(rename = "gov/submit_proposal")]
    SubmitProposal(SubmitProposalMsg),
    #[serde(rename = "gov/vote")]
    Vote(VoteMsg),
}

impl GovMsg {
    pub fn route(&self) -> &'static str {
        "gov"
    }

    pub fn msg_type(&self) -> &'static str {
        match self {
            GovMsg::SubmitProposal(_) => "submit_proposal",
            GovMsg::Vote(_) => "vote",
        }
    }

    pub fn validate_basic(&self) -> Result<()> {
        match self {
            GovMsg::SubmitProposal(msg) => msg.validate_basic(),
            GovMsg::Vote(msg) => msg.validate_basic(),
        }
    }

    pub fn signers(&self) -> Vec<Address> {
        match self {
            GovMsg::SubmitProposal(msg) => vec![msg.submitter],
            GovMsg::Vote(msg) => vec![msg.voter],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitProposalMsg {
    pub title: String,
    pub description: String,
    /// Escrowed on submission; must reach the configured minimum.
    pub deposit: Coins,
    pub submitter: Address,
}

impl SubmitProposalMsg {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        deposit: Coins,
        submitter: Address,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            deposit,
            submitter,
        }
    }

    pub fn validate_basic(&self) -> Result<()> {
        if self.submitter.is_empty() {
            return Err(TxError::InvalidAddress(format!(
                "Invalid address: {}",
                self.submitter
            )));
        }
        if self.title.trim().is_empty() {
            return Err(TxError::InvalidTitle(
                "Cannot submit a proposal with empty title".into(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(TxError::InvalidDescription(
                "Cannot submit a proposal with empty description".into(),
            ));
        }
        if !self.deposit.is_valid() {
            return Err(TxError::InvalidCoins("Deposit is not valid".into()));
        }
        if !self.deposit.is_positive() {
            return Err(TxError::InvalidCoins("Deposit cannot be negative".into()));
        }
        Ok(())
    }

    pub fn sign_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("message serialization should not fail")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteMsg {
    pub proposal_id: i64,
    pub option: String,
    pub voter: Address,
}

impl VoteMsg {
    /// An empty option is an abstention.
    pub fn new(proposal_id: i64, option: impl Into<String>, voter: Address) -> Self {
        let mut option = option.into();
        if option.is_empty() {
            option = VoteOption::Abstain.to_string();
        }
        Self {
            proposal_id,
            option,
            voter,
        }
    }

    pub fn validate_basic(&self) -> Result<()> {
        if self.voter.is_empty() {
            return Err(TxError::InvalidAddress(format!(
                "Invalid address: {}",
                self.voter
            )));
        }
        if self.proposal_id <= 0 {
            return Err(TxError::InvalidProposalId(
                "ProposalID cannot be negative".into(),
            ));
        }
        self.vote_option().map(|_| ())
    }

    pub fn vote_option(&self) -> Result<VoteOption> {
        self.option.parse()
    }

    pub fn sign_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("message serialization should not fail")
    }
}
