//! Store key layout for the governance module.
//!
//! ```text
//! proposals || le(id)                        -> Proposal
//! proposals || le(id) || votes || voter      -> VoteOption
//! newProposalID                              -> i64
//! activeProposalQueue                        -> Vec<i64>
//! govParams                                  -> GovParams
//! delegations: || delegator || validator     -> Delegation
//! ```

use houchain_core::Address;

pub const PROPOSALS_PREFIX: &[u8] = b"proposals";
pub const VOTES_INFIX: &[u8] = b"votes";
pub const NEXT_PROPOSAL_ID_KEY: &[u8] = b"newProposalID";
pub const ACTIVE_PROPOSAL_QUEUE_KEY: &[u8] = b"activeProposalQueue";
pub const PARAMS_KEY: &[u8] = b"govParams";
pub const DELEGATIONS_PREFIX: &[u8] = b"delegations:";

pub fn proposal_key(proposal_id: i64) -> Vec<u8> {
    let mut key = PROPOSALS_PREFIX.to_vec();
    key.extend_from_slice(&(proposal_id as u64).to_le_bytes());
    key
}

pub fn proposal_votes_key(proposal_id: i64) -> Vec<u8> {
    let mut key = proposal_key(proposal_id);
    key.extend_from_slice(VOTES_INFIX);
    key
}

pub fn proposal_vote_key(proposal_id: i64, voter: &Address) -> Vec<u8> {
    let mut key = proposal_votes_key(proposal_id);
    key.extend_from_slice(voter.as_bytes());
    key
}

/// Prefix covering every delegation made by `delegator`.
pub fn delegator_key(delegator: &Address) -> Vec<u8> {
    let mut key = DELEGATIONS_PREFIX.to_vec();
    key.extend_from_slice(delegator.as_bytes());
    key
}

pub fn delegation_key(delegator: &Address, validator: &Address) -> Vec<u8> {
    let mut key = delegator_key(delegator);
    key.extend_from_slice(validator.as_bytes());
    key
}

/// Little-endian encoding of a proposal id, as carried in tags.
pub fn id_bytes(proposal_id: i64) -> Vec<u8> {
    (proposal_id as u64).to_le_bytes().to_vec()
}
