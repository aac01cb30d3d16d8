//! Initialize chain command.

use super::save_config;
use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use houchain_chain::{init_genesis, ChainConfig, GenesisAccount, GenesisState};
use houchain_core::{Address, Coins};
use houchain_governance::Delegation;
use houchain_storage::Storage;
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to store chain data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Genesis file (JSON). A demo genesis is generated when omitted.
    #[arg(short, long)]
    genesis: Option<PathBuf>,

    /// Maximum transactions per block
    #[arg(long, default_value = "1000")]
    max_block_size: usize,
}

/// Two funded accounts, `alice` delegating to `validator`.
fn demo_genesis() -> Result<GenesisState> {
    let funds: Coins = "100fee,1000mycoin"
        .parse()
        .context("Invalid demo balance")?;
    Ok(GenesisState {
        genesis_time: chrono::Utc::now().timestamp(),
        accounts: vec![
            GenesisAccount::new(Address::from_seed("alice"), funds.clone()),
            GenesisAccount::new(Address::from_seed("bob"), funds),
        ],
        delegations: vec![Delegation::new(
            Address::from_seed("alice"),
            Address::from_seed("validator"),
            10,
        )],
        gov: Default::default(),
    })
}

pub fn run(args: InitArgs) -> Result<()> {
    println!("{}", "Initializing houchain...".bold().cyan());
    println!();

    let genesis = match &args.genesis {
        Some(path) => GenesisState::load(path)
            .with_context(|| format!("Failed to load genesis file: {}", path.display()))?,
        None => demo_genesis()?,
    };

    fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", args.data_dir))?;
    if args.data_dir.join("config.json").exists() {
        bail!("A chain already exists in {}", args.data_dir.display());
    }

    let storage = Storage::open(args.data_dir.join("db")).context("Failed to open storage")?;
    println!("{}  Created data directory", "✓".green().bold());

    let root = init_genesis(&storage, &genesis).context("Failed to initialize genesis state")?;

    println!();
    println!("{}  Wrote genesis state", "✓".green().bold());
    println!("    Accounts:    {}", genesis.accounts.len().to_string().bright_cyan());
    println!("    Delegations: {}", genesis.delegations.len().to_string().bright_cyan());
    println!("    State root:  {}", root.to_hex().bright_yellow());

    for account in &genesis.accounts {
        println!(
            "    {} {}",
            account.address.to_hex().bright_yellow(),
            account.coins.to_string().bright_cyan()
        );
    }

    let genesis_file = args.data_dir.join("genesis.json");
    genesis.save(&genesis_file)?;
    println!(
        "{}  Saved genesis to: {}",
        "✓".green().bold(),
        genesis_file.display().to_string().bright_black()
    );

    let config = ChainConfig {
        gov: genesis.gov.clone(),
        max_block_size: args.max_block_size,
    };
    save_config(&args.data_dir, &config)?;
    println!(
        "{}  Saved config to: {}",
        "✓".green().bold(),
        args.data_dir.join("config.json").display().to_string().bright_black()
    );

    println!();
    println!("{}", "Chain initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  • Use {} to check balances",
        "houchain account balance alice".bright_cyan()
    );
    println!(
        "  • Use {} to send coins",
        "houchain tx send --from alice --to bob --amount 10mycoin".bright_cyan()
    );
    println!(
        "  • Use {} to open a proposal",
        "houchain tx propose".bright_cyan()
    );

    Ok(())
}
