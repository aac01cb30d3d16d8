//! The governance module: deposit-gated proposals with delegation-weighted
//! voting.
//!
//! - [`types`]: proposals, states and vote options
//! - [`msgs`]: `SubmitProposalMsg` and `VoteMsg` with their stateless checks
//! - [`keeper`]: proposal storage, voting and the end-of-block closing pass
//! - [`delegation`]: the voting-weight oracle
//! - [`params`]: minimum deposit, voting period and delegation bound

pub mod delegation;
pub mod handler;
pub mod keeper;
pub mod keys;
pub mod msgs;
pub mod params;
pub mod types;

pub use delegation::{Delegation, DelegationOracle, StoreDelegations};
pub use handler::handle_msg;
pub use keeper::{Keeper, KeeperRead, ProposalStore};
pub use msgs::{GovMsg, SubmitProposalMsg, VoteMsg};
pub use params::GovParams;
pub use types::{Proposal, ProposalState, VoteOption};
