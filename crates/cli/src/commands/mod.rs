//! CLI commands module.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use houchain_chain::{ChainConfig, TransactionReceipt};
use houchain_core::Address;
use houchain_storage::Storage;
use std::fs;
use std::path::Path;

mod account;
mod gov;
mod init;
mod status;
mod tx;

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new chain from a genesis file
    Init(init::InitArgs),
    /// Account queries
    Account(account::AccountArgs),
    /// Build and execute transactions
    Tx(tx::TxArgs),
    /// Governance queries
    Gov(gov::GovArgs),
    /// Show the last committed block
    Status(status::StatusArgs),
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init(args) => init::run(args),
        Commands::Account(args) => account::run(args),
        Commands::Tx(args) => tx::run(args),
        Commands::Gov(args) => gov::run(args),
        Commands::Status(args) => status::run(args),
    }
}

const CONFIG_FILE: &str = "config.json";

pub(crate) fn open_storage(data_dir: &Path) -> Result<Storage> {
    if !data_dir.join(CONFIG_FILE).exists() {
        bail!(
            "No chain found in {}. Did you run 'houchain init'?",
            data_dir.display()
        );
    }
    Storage::open(data_dir.join("db"))
        .with_context(|| format!("Failed to open storage in {}", data_dir.display()))
}

pub(crate) fn load_config(data_dir: &Path) -> Result<ChainConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let contents =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
}

pub(crate) fn save_config(data_dir: &Path, config: &ChainConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    fs::write(&path, serde_json::to_string_pretty(config)?)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Accept either a `0x` hex address or a seed name such as `alice`.
pub(crate) fn parse_address(s: &str) -> Result<Address> {
    if s.starts_with("0x") {
        Address::from_hex(s).with_context(|| format!("Invalid address format: {}", s))
    } else if s.is_empty() {
        bail!("Address cannot be empty")
    } else {
        Ok(Address::from_seed(s))
    }
}

pub(crate) fn print_receipt(receipt: &TransactionReceipt) {
    println!();
    if receipt.success {
        println!("{}  Transaction succeeded", "✓".green().bold());
    } else {
        println!("{}  Transaction failed", "✗".red().bold());
        println!(
            "    Error:     {} {}",
            format!("[{}:{}]", receipt.codespace, receipt.code).bright_black(),
            receipt.log.red()
        );
    }
    println!("    Hash:      {}", receipt.tx_hash.to_hex().bright_yellow());
    println!(
        "    Gas:       {} / {}",
        receipt.gas_used.to_string().bright_cyan(),
        receipt.gas_wanted
    );
    for tag in receipt.tags.iter() {
        println!(
            "    {:<10} {}",
            format!("{}:", tag.key),
            format_tag_value(&tag.value).bright_black()
        );
    }
    println!();
}

/// Printable tag values are shown as text, everything else as `0x` hex.
fn format_tag_value(value: &[u8]) -> String {
    match std::str::from_utf8(value) {
        Ok(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_graphic()) => s.to_string(),
        _ => format!("0x{}", hex::encode(value)),
    }
}
