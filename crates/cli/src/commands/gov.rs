//! Governance query command.

use super::{load_config, open_storage};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use houchain_chain::Executor;
use houchain_core::TxError;
use houchain_governance::{KeeperRead, Proposal, ProposalState, ProposalStore};
use std::path::PathBuf;

#[derive(Args)]
pub struct GovArgs {
    #[command(subcommand)]
    command: GovCommand,
}

#[derive(Subcommand)]
enum GovCommand {
    /// Show a proposal and its tally
    Show {
        /// Directory to store chain data
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,

        /// Proposal ID
        id: i64,
    },
    /// List every proposal
    List {
        /// Directory to store chain data
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,
    },
    /// Show governance parameters
    Params {
        /// Directory to store chain data
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,
    },
}

pub fn run(args: GovArgs) -> Result<()> {
    match args.command {
        GovCommand::Show { data_dir, id } => show_proposal(data_dir, id),
        GovCommand::List { data_dir } => list_proposals(data_dir),
        GovCommand::Params { data_dir } => show_params(data_dir),
    }
}

fn show_proposal(data_dir: PathBuf, id: i64) -> Result<()> {
    let storage = open_storage(&data_dir)?;
    let executor = Executor::new(&storage, load_config(&data_dir)?)?;

    let proposal = executor
        .query(|_, ctx| KeeperRead::new().get_proposal(ctx, id))
        .with_context(|| format!("Failed to load proposal {}", id))?;
    let voting_end = proposal.voting_end(executor.app().gov().params().voting_period);

    println!("{}", format!("Proposal #{}", proposal.id).bold().cyan());
    println!();
    println!("  Title:       {}", proposal.title.bold());
    if !proposal.description.is_empty() {
        println!("  Description: {}", proposal.description);
    }
    println!("  Submitter:   {}", proposal.submitter.to_hex().bright_yellow());
    println!("  State:       {}", colored_state(proposal.state));
    println!("  Deposit:     {}", proposal.deposit.to_string().bright_green());
    println!(
        "  Voting:      blocks {} to {}",
        proposal.submit_block, voting_end
    );
    println!();
    println!("  Yes:         {}", proposal.yes_votes.to_string().green());
    println!("  No:          {}", proposal.no_votes.to_string().red());
    println!("  Abstain:     {}", proposal.abstain_votes.to_string().bright_black());

    Ok(())
}

fn list_proposals(data_dir: PathBuf) -> Result<()> {
    let storage = open_storage(&data_dir)?;
    let executor = Executor::new(&storage, load_config(&data_dir)?)?;

    let (proposals, queue) = load_proposals(&executor).context("Failed to list proposals")?;

    if proposals.is_empty() {
        println!("{}", "No proposals found.".yellow());
        return Ok(());
    }

    println!("{}", "Proposals:".bold().cyan());
    println!();
    for proposal in &proposals {
        print_summary(proposal);
    }
    println!();
    println!("  Active queue: {:?}", queue);

    Ok(())
}

/// Every proposal plus the ids still waiting to be closed.
fn load_proposals(executor: &Executor<'_>) -> houchain_core::Result<(Vec<Proposal>, Vec<i64>)> {
    executor.query(|_, ctx| {
        let keeper = KeeperRead::new();
        let queue = match keeper.get_proposal_queue(ctx) {
            Ok(queue) => queue,
            // No proposal submitted yet.
            Err(TxError::ProposalQueueNotFound) => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok((keeper.proposals(ctx)?, queue))
    })
}

fn show_params(data_dir: PathBuf) -> Result<()> {
    let storage = open_storage(&data_dir)?;
    let executor = Executor::new(&storage, load_config(&data_dir)?)?;
    let params = executor.app().gov().params();

    println!("{}", "Governance Parameters:".bold().cyan());
    println!();
    println!("  Minimum deposit:  {}", params.min_deposit.to_string().bright_green());
    println!("  Voting period:    {} blocks", params.voting_period);
    println!("  Max delegations:  {}", params.max_delegations);

    Ok(())
}

fn print_summary(proposal: &Proposal) {
    println!(
        "  {:>4}  {:<10} {}  (yes {} / no {} / abstain {})",
        format!("#{}", proposal.id).bright_yellow(),
        colored_state(proposal.state),
        proposal.title,
        proposal.yes_votes,
        proposal.no_votes,
        proposal.abstain_votes
    );
}

fn colored_state(state: ProposalState) -> colored::ColoredString {
    let label = state.to_string();
    match state {
        ProposalState::Open => label.bright_cyan(),
        ProposalState::Accepted => label.green().bold(),
        ProposalState::Rejected => label.red(),
    }
}
