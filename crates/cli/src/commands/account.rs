//! Account query command.

use super::{load_config, open_storage, parse_address};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use houchain_bank::ViewKeeper;
use houchain_chain::Executor;
use houchain_core::vesting::spendable_coins;
use houchain_core::Account;
use houchain_storage::{AccountMapper, AccountStore};
use std::path::PathBuf;

#[derive(Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand)]
enum AccountCommand {
    /// Check account balance
    Balance {
        /// Directory to store chain data
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,

        /// Account address (hex format or seed name)
        address: String,
    },
    /// Show account information, including any vesting schedule
    Info {
        /// Directory to store chain data
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,

        /// Account address (hex format or seed name)
        address: String,
    },
    /// List all accounts
    List {
        /// Directory to store chain data
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,
    },
}

pub fn run(args: AccountArgs) -> Result<()> {
    match args.command {
        AccountCommand::Balance { data_dir, address } => check_balance(data_dir, address),
        AccountCommand::Info { data_dir, address } => show_info(data_dir, address),
        AccountCommand::List { data_dir } => list_accounts(data_dir),
    }
}

fn check_balance(data_dir: PathBuf, address: String) -> Result<()> {
    let addr = parse_address(&address)?;
    let storage = open_storage(&data_dir)?;
    let executor = Executor::new(&storage, load_config(&data_dir)?)?;

    let coins = executor
        .query(|app, ctx| app.bank().get_coins(ctx, &addr))
        .context("Failed to read balance")?;

    println!("{}", "Account Balance:".bold().cyan());
    println!();
    println!("  Address: {}", addr.to_hex().bright_yellow());
    if coins.is_empty() {
        println!("  Balance: {}", "none".bright_black());
    } else {
        println!("  Balance: {}", coins.to_string().bright_green().bold());
    }

    Ok(())
}

fn show_info(data_dir: PathBuf, address: String) -> Result<()> {
    let addr = parse_address(&address)?;
    let storage = open_storage(&data_dir)?;
    let executor = Executor::new(&storage, load_config(&data_dir)?)?;
    let last = executor.last_header()?;

    let account = executor
        .query(|_, ctx| AccountMapper::new().get_account(ctx, &addr))
        .context("Failed to read account")?;

    println!("{}", "Account Information:".bold().cyan());
    println!();
    println!("  Address:   {}", addr.to_hex().bright_yellow());

    let Some(account) = account else {
        println!("  Status:    {}", "not found".bright_black());
        return Ok(());
    };

    print_account(&account, last.time);
    Ok(())
}

fn print_account(account: &Account, now: i64) {
    println!("  Balance:   {}", account.coins.to_string().bright_green());

    let Some(schedule) = &account.vesting else {
        println!("  Type:      {}", "plain".bright_black());
        return;
    };

    println!("  Type:      {}", "vesting".bright_magenta());
    println!("  Original:  {}", schedule.original_vesting);
    println!("  Start:     {}", format_time(schedule.start_time));
    println!("  Cliff:     {}", format_time(schedule.cliff_time));
    println!("  End:       {}", format_time(schedule.end_time));
    println!("  Locked:    {}", schedule.locked_coins(now).to_string().yellow());
    println!(
        "  Spendable: {}",
        spendable_coins(account, now).to_string().bright_green()
    );
    println!(
        "  (as of block time {})",
        format_time(now).bright_black()
    );
}

fn list_accounts(data_dir: PathBuf) -> Result<()> {
    let storage = open_storage(&data_dir)?;
    let executor = Executor::new(&storage, load_config(&data_dir)?)?;
    let accounts = executor
        .query(|_, ctx| AccountMapper::new().iterate_accounts(ctx))
        .context("Failed to list accounts")?;

    if accounts.is_empty() {
        println!("{}", "No accounts found.".yellow());
        return Ok(());
    }

    println!("{}", "Accounts:".bold().cyan());
    println!();
    for account in &accounts {
        let kind = if account.vesting.is_some() { " (vesting)" } else { "" };
        println!(
            "  {}  {}{}",
            account.address.to_hex().bright_yellow(),
            account.coins.to_string().bright_green(),
            kind.bright_magenta()
        );
    }

    Ok(())
}

fn format_time(unix: i64) -> String {
    chrono::DateTime::from_timestamp(unix, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| unix.to_string())
}
