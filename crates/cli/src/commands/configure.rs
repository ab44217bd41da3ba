//! Add coins to an existing store.

use super::{config_path, load_config};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use txstore_core::Coin;
use txstore_storage::TransactionStore;

#[derive(Args)]
pub struct ConfigureArgs {
    /// Directory to store transaction data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Coin to add (repeatable)
    #[arg(short, long = "coin")]
    coins: Vec<Coin>,
}

pub fn run(args: ConfigureArgs) -> Result<()> {
    let mut config = load_config(&args.data_dir)?;

    let added: Vec<Coin> = args
        .coins
        .into_iter()
        .filter(|coin| config.add_coin(coin.clone()))
        .collect();

    let mut store = TransactionStore::new(config.clone());
    store
        .configure(&config.coins)
        .with_context(|| "Failed to configure buckets")?;
    store.close()?;

    // Only persist the new coin list once its buckets exist
    config.save(config_path(&args.data_dir))?;

    println!();
    if added.is_empty() {
        println!("{}  Buckets up to date", "✓".green().bold());
    } else {
        for coin in &added {
            println!(
                "{}  Added bucket: {}",
                "✓".green().bold(),
                coin.as_str().bright_yellow()
            );
        }
    }
    println!();

    Ok(())
}
