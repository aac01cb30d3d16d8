//! Proposals and vote options.

use houchain_core::{Address, Coins, TxError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    Open,
    Accepted,
    Rejected,
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProposalState::Open => "Open",
            ProposalState::Accepted => "Accepted",
            ProposalState::Rejected => "Rejected",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOption {
    Yes,
    No,
    Abstain,
}

impl VoteOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteOption::Yes => "Yes",
            VoteOption::No => "No",
            VoteOption::Abstain => "Abstain",
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteOption {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" => Ok(VoteOption::Yes),
            "No" => Ok(VoteOption::No),
            "Abstain" => Ok(VoteOption::Abstain),
            "" => Err(TxError::InvalidOption("Option can't be blank".into())),
            other => Err(TxError::InvalidOption(format!(
                "Invalid voting option: {}",
                other
            ))),
        }
    }
}

/// A governance proposal and its running tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub submitter: Address,
    /// Height from which the proposal is open for votes.
    pub submit_block: i64,
    pub state: ProposalState,
    /// Coins held in escrow until the proposal closes.
    pub deposit: Coins,
    pub yes_votes: i64,
    pub no_votes: i64,
    pub abstain_votes: i64,
}

impl Proposal {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        submitter: Address,
        submit_block: i64,
        deposit: Coins,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            submitter,
            submit_block,
            state: ProposalState::Open,
            deposit,
            yes_votes: 0,
            no_votes: 0,
            abstain_votes: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == ProposalState::Open
    }

    /// Last height at which votes are accepted.
    pub fn voting_end(&self, voting_period: i64) -> i64 {
        self.submit_block.saturating_add(voting_period)
    }

    /// Add `amount` (negative to withdraw) to the bucket of `option`.
    pub fn update_tally(&mut self, option: VoteOption, amount: i64) {
        let bucket = match option {
            VoteOption::Yes => &mut self.yes_votes,
            VoteOption::No => &mut self.no_votes,
            VoteOption::Abstain => &mut self.abstain_votes,
        };
        *bucket = bucket.saturating_add(amount);
    }

    pub fn total_votes(&self) -> i64 {
        self.yes_votes
            .saturating_add(self.no_votes)
            .saturating_add(self.abstain_votes)
    }

    /// Outcome if the proposal closed now: yes must strictly outweigh no.
    pub fn outcome(&self) -> ProposalState {
        if self.yes_votes > self.no_votes {
            ProposalState::Accepted
        } else {
            ProposalState::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        Proposal::new(1, "T", "D", Address([1; 20]), 0, Coins::single("mycoin", 100))
    }

    #[test]
    fn test_vote_option_parsing() {
        assert_eq!("Yes".parse::<VoteOption>().unwrap(), VoteOption::Yes);
        assert_eq!("Abstain".parse::<VoteOption>().unwrap().to_string(), "Abstain");
        assert!(matches!("yes".parse::<VoteOption>(), Err(TxError::InvalidOption(_))));
        assert!(matches!("".parse::<VoteOption>(), Err(TxError::InvalidOption(_))));
    }

    #[test]
    fn test_update_tally() {
        let mut p = proposal();
        p.update_tally(VoteOption::Yes, 10);
        p.update_tally(VoteOption::Yes, -10);
        p.update_tally(VoteOption::No, 10);
        p.update_tally(VoteOption::Abstain, 3);
        assert_eq!((p.yes_votes, p.no_votes, p.abstain_votes), (0, 10, 3));
        assert_eq!(p.total_votes(), 13);
    }

    #[test]
    fn test_outcome_requires_strict_majority() {
        let mut p = proposal();
        assert_eq!(p.outcome(), ProposalState::Rejected);
        p.update_tally(VoteOption::Yes, 5);
        p.update_tally(VoteOption::No, 5);
        p.update_tally(VoteOption::Abstain, 100);
        assert_eq!(p.outcome(), ProposalState::Rejected);
        p.update_tally(VoteOption::Yes, 1);
        assert_eq!(p.outcome(), ProposalState::Accepted);
    }

    #[test]
    fn test_voting_end_saturates() {
        let mut p = proposal();
        p.submit_block = i64::MAX - 1;
        assert_eq!(p.voting_end(10), i64::MAX);
    }
}
