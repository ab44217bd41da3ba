//! Store status command.

use super::{load_config, open_store};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use txstore_storage::TransactionStore;

#[derive(Args)]
pub struct StatusArgs {
    /// Directory to store transaction data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,
}

pub fn run(args: StatusArgs) -> Result<()> {
    let config = load_config(&args.data_dir)?;

    println!();
    println!("{}", "Store Status:".bold().cyan());
    println!();

    let probe = TransactionStore::new(config);
    println!(
        "  Database:  {}",
        probe.path().display().to_string().bright_black()
    );
    if !probe.is_created() {
        println!("  Created:   {}", "No".red());
        println!();
        return Ok(());
    }
    println!("  Created:   {}", "Yes".green());
    drop(probe);

    let mut store = open_store(&args.data_dir)?;
    let storage = store.storage()?;
    let buckets = store.buckets()?;

    println!();
    println!("{}", "Buckets:".bold());
    if buckets.is_empty() {
        println!("  {}", "(none)".bright_black());
    }
    for coin in &buckets {
        let count = store.bucket(coin)?.count();
        let since = storage
            .bucket_created_at(coin)?
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_default();
        println!(
            "  {:<8} {} {}",
            coin.as_str().bright_yellow(),
            format!("{} txs", count).bright_cyan(),
            format!("(since {})", since).bright_black()
        );
    }
    println!();

    store.close()?;
    Ok(())
}
