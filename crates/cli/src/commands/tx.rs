//! Transaction commands.
//!
//! Each command wraps its transaction in a single-transaction block, executes
//! it against the local store and prints the receipt.

use super::{load_config, open_storage, parse_address, print_receipt};
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use houchain_bank::{BankMsg, MsgSend};
use houchain_chain::{Block, Executor, Msg, StdFee, Tx};
use houchain_core::Coins;
use houchain_governance::{GovMsg, SubmitProposalMsg, VoteMsg};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct TxArgs {
    #[command(subcommand)]
    command: TxCommand,
}

#[derive(Args)]
struct FeeArgs {
    /// Directory to store chain data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Fee paid by the first signer (e.g. "5fee")
    #[arg(long, default_value = "")]
    fee: String,

    /// Gas limit
    #[arg(long, default_value = "200000")]
    gas: u64,

    /// Optional memo
    #[arg(long, default_value = "")]
    memo: String,
}

#[derive(Subcommand)]
enum TxCommand {
    /// Send coins from one account to another
    Send {
        #[command(flatten)]
        common: FeeArgs,

        /// Sender address (hex format or seed name)
        #[arg(short, long)]
        from: String,

        /// Recipient address (hex format or seed name)
        #[arg(short, long)]
        to: String,

        /// Amount (e.g. "10mycoin,5fee")
        #[arg(short, long)]
        amount: String,
    },
    /// Submit a governance proposal with a deposit
    Propose {
        #[command(flatten)]
        common: FeeArgs,

        /// Submitter address (hex format or seed name)
        #[arg(short, long)]
        from: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Deposit (e.g. "100mycoin")
        #[arg(long)]
        deposit: String,
    },
    /// Vote on an open proposal
    Vote {
        #[command(flatten)]
        common: FeeArgs,

        /// Voter address (hex format or seed name)
        #[arg(short, long)]
        from: String,

        /// Proposal ID
        #[arg(long)]
        proposal: i64,

        /// Yes, No or Abstain
        #[arg(long, default_value = "Abstain")]
        option: String,
    },
    /// Execute a JSON-encoded transaction from a file
    Submit {
        /// Directory to store chain data
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,

        /// Transaction file (JSON)
        #[arg(long)]
        file: PathBuf,
    },
}

pub fn run(args: TxArgs) -> Result<()> {
    match args.command {
        TxCommand::Send {
            common,
            from,
            to,
            amount,
        } => {
            let coins = parse_coins(&amount)?;
            let msg = BankMsg::Send(MsgSend::simple(
                parse_address(&from)?,
                parse_address(&to)?,
                coins,
            ));
            submit_msg(&common, msg.into())
        }
        TxCommand::Propose {
            common,
            from,
            title,
            description,
            deposit,
        } => {
            let msg = GovMsg::SubmitProposal(SubmitProposalMsg::new(
                title,
                description,
                parse_coins(&deposit)?,
                parse_address(&from)?,
            ));
            submit_msg(&common, msg.into())
        }
        TxCommand::Vote {
            common,
            from,
            proposal,
            option,
        } => {
            let msg = GovMsg::Vote(VoteMsg::new(proposal, option, parse_address(&from)?));
            submit_msg(&common, msg.into())
        }
        TxCommand::Submit { data_dir, file } => {
            let bytes = fs::read(&file)
                .with_context(|| format!("Failed to read transaction file: {}", file.display()))?;
            let tx = Tx::decode(&bytes).context("Invalid transaction")?;
            execute(&data_dir, tx)
        }
    }
}

fn parse_coins(s: &str) -> Result<Coins> {
    s.parse()
        .with_context(|| format!("Invalid coins: {:?}", s))
}

fn submit_msg(common: &FeeArgs, msg: Msg) -> Result<()> {
    let fee = StdFee::new(parse_coins(&common.fee)?, common.gas);
    let tx = Tx::new(vec![msg], fee).with_memo(common.memo.clone());
    execute(&common.data_dir, tx)
}

fn execute(data_dir: &Path, tx: Tx) -> Result<()> {
    let storage = open_storage(data_dir)?;
    let executor = Executor::new(&storage, load_config(data_dir)?)?;

    let header = executor
        .last_header()?
        .next(chrono::Utc::now().timestamp());
    tracing::debug!(
        height = header.height,
        time = header.time,
        tx = %tx.hash().to_hex(),
        "submitting block"
    );

    println!(
        "{}",
        format!("Executing block #{}...", header.height).bold().cyan()
    );

    let result = executor
        .execute_block(&Block::new(header, vec![tx]))
        .context("Block execution failed")?;

    let Some(receipt) = result.receipts.first() else {
        bail!("Block produced no receipt");
    };
    print_receipt(receipt);

    for tag in result.end_block_tags.iter() {
        if tag.key == "proposal-result" {
            println!(
                "{}  Proposal closed: {}",
                "•".bright_magenta(),
                String::from_utf8_lossy(&tag.value).bright_magenta()
            );
        }
    }
    println!("    State root: {}", result.state_root.to_hex().bright_black());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coins() {
        assert!(parse_coins("").unwrap().is_empty());
        assert_eq!(parse_coins("10mycoin").unwrap(), Coins::single("mycoin", 10));
        assert!(parse_coins("ten coins").is_err());
    }
}
