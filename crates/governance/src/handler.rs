//! Routes governance messages to the keeper.

use crate::delegation::DelegationOracle;
use crate::keeper::Keeper;
use crate::msgs::{GovMsg, SubmitProposalMsg, VoteMsg};
use houchain_bank::Keeper as BankKeeper;
use houchain_core::{Result, Tags};
use houchain_storage::Context;

pub fn handle_msg<B: BankKeeper, D: DelegationOracle>(
    ctx: &mut Context<'_>,
    keeper: &Keeper<B, D>,
    msg: &GovMsg,
) -> Result<Tags> {
    match msg {
        GovMsg::SubmitProposal(msg) => handle_submit_proposal(ctx, keeper, msg),
        GovMsg::Vote(msg) => handle_vote(ctx, keeper, msg),
    }
}

fn handle_submit_proposal<B: BankKeeper, D: DelegationOracle>(
    ctx: &mut Context<'_>,
    keeper: &Keeper<B, D>,
    msg: &SubmitProposalMsg,
) -> Result<Tags> {
    msg.validate_basic()?;
    let (_, tags) = keeper.submit_proposal(
        ctx,
        &msg.title,
        &msg.description,
        &msg.deposit,
        &msg.submitter,
    )?;
    Ok(tags)
}

fn handle_vote<B: BankKeeper, D: DelegationOracle>(
    ctx: &mut Context<'_>,
    keeper: &Keeper<B, D>,
    msg: &VoteMsg,
) -> Result<Tags> {
    msg.validate_basic()?;
    keeper.vote(ctx, msg.proposal_id, msg.vote_option()?, &msg.voter)
}
