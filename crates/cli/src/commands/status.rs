//! Chain status command.

use super::{load_config, open_storage};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use houchain_chain::Executor;
use std::path::PathBuf;

#[derive(Args)]
pub struct StatusArgs {
    /// Directory to store chain data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,
}

pub fn run(args: StatusArgs) -> Result<()> {
    let storage = open_storage(&args.data_dir)?;
    let config = load_config(&args.data_dir)?;
    let max_block_size = config.max_block_size;
    let executor = Executor::new(&storage, config)?;
    let last = executor.last_header()?;
    let root = storage.state_root()?;

    println!("{}", "Chain Status:".bold().cyan());
    println!();
    println!("  Height:         {}", last.height.to_string().bright_cyan());
    println!(
        "  Block time:     {}",
        chrono::DateTime::from_timestamp(last.time, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| last.time.to_string())
    );
    println!("  State root:     {}", root.to_hex().bright_yellow());
    println!("  Max block size: {}", max_block_size);

    Ok(())
}
