//! Proposal storage and the governance state machine.
//!
//! Proposals move `Open -> Accepted | Rejected`. A proposal stays open for
//! `voting_period` blocks after its submission height; [`Keeper::end_block`]
//! closes expired proposals in submission order and refunds their deposits.

use crate::delegation::{DelegationOracle, StoreDelegations};
use crate::keys;
use crate::params::GovParams;
use crate::types::{Proposal, VoteOption};
use houchain_bank::{BaseKeeper, Keeper as BankKeeper};
use houchain_core::{Address, Coins, Result, Tags, TxError};
use houchain_storage::Context;
use tracing::{debug, info};

/// Access to proposals and vote records.
pub trait ProposalStore {
    fn get_proposal(&self, ctx: &Context<'_>, proposal_id: i64) -> Result<Proposal>;

    fn set_proposal(&self, ctx: &mut Context<'_>, proposal: &Proposal) -> Result<()>;

    /// The option `voter` last chose on `proposal_id`.
    fn get_vote(&self, ctx: &Context<'_>, proposal_id: i64, voter: &Address) -> Result<VoteOption>;

    fn set_vote(
        &self,
        ctx: &mut Context<'_>,
        proposal_id: i64,
        voter: &Address,
        option: VoteOption,
    ) -> Result<()>;
}

fn load_proposal(ctx: &Context<'_>, proposal_id: i64) -> Result<Proposal> {
    ctx.get(&keys::proposal_key(proposal_id))?
        .ok_or(TxError::ProposalNotFound(proposal_id))
}

fn load_vote(ctx: &Context<'_>, proposal_id: i64, voter: &Address) -> Result<VoteOption> {
    ctx.get(&keys::proposal_vote_key(proposal_id, voter))?
        .ok_or_else(|| TxError::VoteNotFound(String::new()))
}

/// Every proposal ever submitted, by ascending id.
fn load_proposals(ctx: &Context<'_>) -> Result<Vec<Proposal>> {
    let next_id: i64 = ctx.get(keys::NEXT_PROPOSAL_ID_KEY)?.unwrap_or(1);
    (1..next_id).map(|id| load_proposal(ctx, id)).collect()
}

fn load_queue(ctx: &Context<'_>) -> Result<Vec<i64>> {
    ctx.get(keys::ACTIVE_PROPOSAL_QUEUE_KEY)?
        .ok_or(TxError::ProposalQueueNotFound)
}

/// The governance keeper with write access.
///
/// Deposits move only through the bank keeper `B`; voting weight comes from
/// the delegation oracle `D`.
#[derive(Debug, Clone)]
pub struct Keeper<B: BankKeeper = BaseKeeper, D: DelegationOracle = StoreDelegations> {
    bank: B,
    delegations: D,
    params: GovParams,
}

impl<B: BankKeeper, D: DelegationOracle> Keeper<B, D> {
    pub fn new(bank: B, delegations: D, params: GovParams) -> Self {
        Self {
            bank,
            delegations,
            params,
        }
    }

    pub fn params(&self) -> &GovParams {
        &self.params
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Open a new proposal, escrowing `deposit` from `submitter`.
    ///
    /// The minimum deposit is checked before any coin moves, so a rejected
    /// proposal leaves the submitter's balance untouched.
    pub fn submit_proposal(
        &self,
        ctx: &mut Context<'_>,
        title: &str,
        description: &str,
        deposit: &Coins,
        submitter: &Address,
    ) -> Result<(i64, Tags)> {
        if !deposit.is_gte(&self.params.min_deposit) {
            debug!(%submitter, %deposit, min = %self.params.min_deposit, "deposit below minimum");
            return Err(TxError::InvalidDeposit(
                "Deposit is lower than the minimum".into(),
            ));
        }

        self.bank.subtract_coins(ctx, submitter, deposit)?;

        let proposal_id = self.new_proposal_id(ctx)?;
        let proposal = Proposal::new(
            proposal_id,
            title,
            description,
            *submitter,
            ctx.block_height(),
            deposit.clone(),
        );
        self.set_proposal(ctx, &proposal)?;
        self.proposal_queue_push(ctx, proposal_id)?;

        info!(proposal_id, %submitter, height = proposal.submit_block, "proposal submitted");

        let tags = Tags::single("action", "propose")
            .with("proposal", keys::id_bytes(proposal_id))
            .with("submitter", submitter.as_bytes().to_vec());
        Ok((proposal_id, tags))
    }

    /// Record `voter`'s choice, weighted by their delegations.
    ///
    /// A repeated vote moves the voter's weight from the previous option to
    /// the new one instead of adding to the tally again.
    pub fn vote(
        &self,
        ctx: &mut Context<'_>,
        proposal_id: i64,
        option: VoteOption,
        voter: &Address,
    ) -> Result<Tags> {
        let mut proposal = self.get_proposal(ctx, proposal_id)?;

        if !proposal.is_open() || ctx.block_height() > proposal.voting_end(self.params.voting_period) {
            return Err(TxError::VotingPeriodClosed(format!(
                "proposal {} is no longer accepting votes",
                proposal_id
            )));
        }

        let delegations =
            self.delegations
                .get_delegations(ctx, voter, self.params.max_delegations)?;
        if delegations.is_empty() {
            return Err(TxError::NoDelegation(voter.to_hex()));
        }

        match self.get_vote(ctx, proposal_id, voter) {
            Ok(previous) => {
                for delegation in &delegations {
                    proposal.update_tally(previous, -delegation.bond_shares);
                    proposal.update_tally(option, delegation.bond_shares);
                }
            }
            Err(TxError::VoteNotFound(_)) => {
                for delegation in &delegations {
                    proposal.update_tally(option, delegation.bond_shares);
                }
            }
            Err(e) => return Err(e),
        }

        self.set_vote(ctx, proposal_id, voter, option)?;
        self.set_proposal(ctx, &proposal)?;

        debug!(proposal_id, %voter, %option, "vote recorded");

        Ok(Tags::single("action", "vote")
            .with("proposal", keys::id_bytes(proposal_id))
            .with("voter", voter.as_bytes().to_vec())
            .with("option", option.as_str()))
    }

    /// Close every proposal whose voting period ended before the current
    /// height, refunding deposits to their submitters.
    pub fn end_block(&self, ctx: &mut Context<'_>) -> Result<Tags> {
        let mut tags = Tags::new();

        loop {
            let mut proposal = match self.proposal_queue_head(ctx) {
                Ok(proposal) => proposal,
                Err(TxError::EmptyProposalQueue) | Err(TxError::ProposalQueueNotFound) => break,
                Err(e) => return Err(e),
            };
            if ctx.block_height() <= proposal.voting_end(self.params.voting_period) {
                break;
            }
            self.proposal_queue_pop(ctx)?;

            proposal.state = proposal.outcome();
            self.bank
                .add_coins(ctx, &proposal.submitter, &proposal.deposit)?;
            self.set_proposal(ctx, &proposal)?;

            info!(
                proposal_id = proposal.id,
                state = %proposal.state,
                yes = proposal.yes_votes,
                no = proposal.no_votes,
                "proposal closed"
            );

            tags.push("proposal", keys::id_bytes(proposal.id));
            tags.push("proposal-result", proposal.state.to_string());
        }

        Ok(tags)
    }

    /// Allocate the next proposal id. Ids start at 1.
    pub fn new_proposal_id(&self, ctx: &mut Context<'_>) -> Result<i64> {
        let id: i64 = ctx.get(keys::NEXT_PROPOSAL_ID_KEY)?.unwrap_or(1);
        ctx.put(keys::NEXT_PROPOSAL_ID_KEY.to_vec(), &(id + 1))?;
        Ok(id)
    }

    pub fn proposals(&self, ctx: &Context<'_>) -> Result<Vec<Proposal>> {
        load_proposals(ctx)
    }

    /// Ids of open proposals in submission order.
    pub fn get_proposal_queue(&self, ctx: &Context<'_>) -> Result<Vec<i64>> {
        load_queue(ctx)
    }

    pub fn set_proposal_queue(&self, ctx: &mut Context<'_>, queue: &[i64]) -> Result<()> {
        ctx.put(keys::ACTIVE_PROPOSAL_QUEUE_KEY.to_vec(), &queue.to_vec())
    }

    /// The oldest open proposal.
    pub fn proposal_queue_head(&self, ctx: &Context<'_>) -> Result<Proposal> {
        let queue = self.get_proposal_queue(ctx)?;
        match queue.first() {
            Some(&id) => self.get_proposal(ctx, id),
            None => Err(TxError::EmptyProposalQueue),
        }
    }

    /// Remove and return the oldest open proposal.
    pub fn proposal_queue_pop(&self, ctx: &mut Context<'_>) -> Result<Proposal> {
        let mut queue = self.get_proposal_queue(ctx)?;
        if queue.is_empty() {
            return Err(TxError::EmptyProposalQueue);
        }
        let id = queue.remove(0);
        self.set_proposal_queue(ctx, &queue)?;
        self.get_proposal(ctx, id)
    }

    /// Append `proposal_id`, creating the queue on first use.
    pub fn proposal_queue_push(&self, ctx: &mut Context<'_>, proposal_id: i64) -> Result<()> {
        let mut queue = match self.get_proposal_queue(ctx) {
            Ok(queue) => queue,
            Err(TxError::ProposalQueueNotFound) => Vec::new(),
            Err(e) => return Err(e),
        };
        queue.push(proposal_id);
        self.set_proposal_queue(ctx, &queue)
    }
}

impl<B: BankKeeper, D: DelegationOracle> ProposalStore for Keeper<B, D> {
    fn get_proposal(&self, ctx: &Context<'_>, proposal_id: i64) -> Result<Proposal> {
        load_proposal(ctx, proposal_id)
    }

    fn set_proposal(&self, ctx: &mut Context<'_>, proposal: &Proposal) -> Result<()> {
        ctx.put(keys::proposal_key(proposal.id), proposal)
    }

    fn get_vote(&self, ctx: &Context<'_>, proposal_id: i64, voter: &Address) -> Result<VoteOption> {
        load_vote(ctx, proposal_id, voter)
    }

    fn set_vote(
        &self,
        ctx: &mut Context<'_>,
        proposal_id: i64,
        voter: &Address,
        option: VoteOption,
    ) -> Result<()> {
        ctx.put(keys::proposal_vote_key(proposal_id, voter), &option)
    }
}

/// A governance keeper that can only read. Writes fail with
/// [`TxError::Unauthorized`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeeperRead;

impl KeeperRead {
    pub fn new() -> Self {
        Self
    }

    pub fn proposals(&self, ctx: &Context<'_>) -> Result<Vec<Proposal>> {
        load_proposals(ctx)
    }

    pub fn get_proposal_queue(&self, ctx: &Context<'_>) -> Result<Vec<i64>> {
        load_queue(ctx)
    }
}

impl ProposalStore for KeeperRead {
    fn get_proposal(&self, ctx: &Context<'_>, proposal_id: i64) -> Result<Proposal> {
        load_proposal(ctx, proposal_id)
    }

    fn set_proposal(&self, _ctx: &mut Context<'_>, _proposal: &Proposal) -> Result<()> {
        Err(TxError::Unauthorized(
            "This keeper does not have write access for the governance store".into(),
        ))
    }

    fn get_vote(&self, ctx: &Context<'_>, proposal_id: i64, voter: &Address) -> Result<VoteOption> {
        load_vote(ctx, proposal_id, voter)
    }

    fn set_vote(
        &self,
        _ctx: &mut Context<'_>,
        _proposal_id: i64,
        _voter: &Address,
        _option: VoteOption,
    ) -> Result<()> {
        Err(TxError::Unauthorized(
            "This keeper does not have write access for the governance store".into(),
        ))
    }
}
