//! houchain CLI entry point.

use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(name = "houchain")]
#[command(about = "A ledger with vesting accounts and stake-weighted governance", long_about = None)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<commands::Commands>,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(cmd) => {
            if let Err(e) = commands::run(cmd) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("houchain - a ledger with stake-weighted governance");
            println!("Run 'houchain --help' for usage information.");
        }
    }
}
