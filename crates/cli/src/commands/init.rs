//! Initialize store command.

use super::config_path;
use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use txstore_core::Coin;
use txstore_storage::{OpenMode, StoreConfig, TransactionStore};

#[derive(Args)]
pub struct InitArgs {
    /// Directory to store transaction data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Coin to create a bucket for (repeatable)
    #[arg(short, long = "coin")]
    coins: Vec<Coin>,

    /// Favor write throughput over disk space
    #[arg(long)]
    high_throughput: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    println!("{}", "Initializing txstore...".bold().cyan());
    println!();

    let config_file = config_path(&args.data_dir);
    if config_file.exists() {
        bail!(
            "Store already initialized at {}. Use 'txstore configure' to add coins.",
            args.data_dir.display()
        );
    }

    let mode = if args.high_throughput {
        OpenMode::HighThroughput
    } else {
        OpenMode::LowSpace
    };
    let mut config = StoreConfig::new(&args.data_dir).with_mode(mode);
    for coin in args.coins {
        config.add_coin(coin);
    }

    let mut store = TransactionStore::new(config.clone());
    if store.is_created() {
        println!(
            "{}  Found existing database, keeping its contents",
            "!".yellow().bold()
        );
    }

    store
        .create_schema(&config.coins)
        .with_context(|| "Failed to create schema")?;
    println!(
        "{}  Created database: {}",
        "✓".green().bold(),
        store.path().display().to_string().bright_black()
    );

    for coin in &config.coins {
        println!("    Bucket: {}", coin.as_str().bright_yellow());
    }

    store.close()?;

    config
        .save(&config_file)
        .with_context(|| format!("Failed to save config: {:?}", config_file))?;
    println!(
        "{}  Saved config to: {}",
        "✓".green().bold(),
        config_file.display().to_string().bright_black()
    );

    println!();
    println!("{}", "Store initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  • Use {} to add coins",
        "txstore configure -c <COIN>".bright_cyan()
    );
    println!(
        "  • Use {} to record transactions",
        "txstore tx create".bright_cyan()
    );

    Ok(())
}
