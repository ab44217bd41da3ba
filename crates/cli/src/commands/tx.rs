//! Transaction record commands.

use super::open_store;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use txstore_core::{
    Coin, CreateTransactionRequest, DeleteTransactionRequest, ListTransactionsRequest,
    Transaction, TxHash, TxStatus, UpdateTransactionRequest,
};

#[derive(Args)]
pub struct TxArgs {
    /// Directory to store transaction data
    #[arg(short, long, global = true, default_value = "./data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: TxCommand,
}

#[derive(Subcommand)]
enum TxCommand {
    /// List transactions in a coin's bucket
    List {
        coin: Coin,

        /// Only transactions sent from or to this address
        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        status: Option<TxStatus>,

        /// Inclusive lower block height
        #[arg(long)]
        min_height: Option<u64>,

        /// Inclusive upper block height
        #[arg(long)]
        max_height: Option<u64>,

        #[arg(long, default_value = "0")]
        offset: usize,

        #[arg(short, long)]
        limit: Option<usize>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one transaction
    Get { coin: Coin, hash: TxHash },
    /// Record a new transaction
    Create {
        coin: Coin,
        hash: String,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long, default_value = "0")]
        amount: u64,

        #[arg(long, default_value = "0")]
        fee: u64,

        #[arg(long)]
        block_hash: Option<String>,

        #[arg(long)]
        height: Option<u64>,

        #[arg(long, default_value = "pending")]
        status: TxStatus,

        /// Chain timestamp (RFC 3339)
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Record a JSON array of transactions atomically
    Import { coin: Coin, file: PathBuf },
    /// Patch an existing transaction
    Update {
        coin: Coin,
        hash: String,

        #[arg(long)]
        block_hash: Option<String>,

        #[arg(long)]
        height: Option<u64>,

        #[arg(long)]
        confirmations: Option<u64>,

        #[arg(long)]
        status: Option<TxStatus>,

        /// Chain timestamp (RFC 3339)
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Remove a transaction
    Delete { coin: Coin, hash: String },
}

pub fn run(args: TxArgs) -> Result<()> {
    let mut store = open_store(&args.data_dir)?;

    match args.command {
        TxCommand::List {
            coin,
            address,
            status,
            min_height,
            max_height,
            offset,
            limit,
            json,
        } => {
            let query = ListTransactionsRequest {
                address,
                status,
                min_height,
                max_height,
                offset,
                limit,
            };
            let txs = store.list(&coin, &query)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&txs)?);
            } else {
                print_list(&coin, &txs);
            }
        }
        TxCommand::Get { coin, hash } => {
            let tx = store
                .bucket(&coin)?
                .get(&hash)?
                .with_context(|| format!("Transaction not found: {}", hash))?;
            print_details(&tx);
        }
        TxCommand::Create {
            coin,
            hash,
            from,
            to,
            amount,
            fee,
            block_hash,
            height,
            status,
            timestamp,
        } => {
            let request = CreateTransactionRequest {
                hash,
                block_hash,
                block_height: height,
                from,
                to,
                amount,
                fee,
                confirmations: 0,
                status,
                timestamp,
            };
            let tx = store.create(&coin, &request)?;
            println!(
                "{}  Created {} {}",
                "✓".green().bold(),
                coin.as_str().bright_yellow(),
                tx.hash.to_string().bright_cyan()
            );
        }
        TxCommand::Import { coin, file } => {
            let contents = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;
            let requests: Vec<CreateTransactionRequest> = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {:?}", file))?;
            let txs = store.create_bulk(&coin, &requests)?;
            println!(
                "{}  Imported {} transactions into {}",
                "✓".green().bold(),
                txs.len().to_string().bright_cyan(),
                coin.as_str().bright_yellow()
            );
        }
        TxCommand::Update {
            coin,
            hash,
            block_hash,
            height,
            confirmations,
            status,
            timestamp,
        } => {
            let request = UpdateTransactionRequest {
                hash,
                block_hash,
                block_height: height,
                confirmations,
                status,
                timestamp,
            };
            let tx = store.update(&coin, &request)?;
            println!(
                "{}  Updated {} {}",
                "✓".green().bold(),
                coin.as_str().bright_yellow(),
                tx.hash.to_string().bright_cyan()
            );
        }
        TxCommand::Delete { coin, hash } => {
            store.delete(&coin, &DeleteTransactionRequest::new(hash.clone()))?;
            println!(
                "{}  Deleted {} {}",
                "✓".green().bold(),
                coin.as_str().bright_yellow(),
                hash.bright_cyan()
            );
        }
    }

    store.close()?;
    Ok(())
}

fn print_list(coin: &Coin, txs: &[Transaction]) {
    println!();
    println!(
        "{}",
        format!("{} Transactions:", coin.as_str()).bold().cyan()
    );
    println!();

    if txs.is_empty() {
        println!("  {}", "(none)".bright_black());
    }
    for tx in txs {
        let height = tx
            .block_height
            .map(|h| format!("#{}", h))
            .unwrap_or_else(|| "-".to_string());
        let short = &tx.hash.as_str()[..tx.hash.as_str().len().min(16)];
        println!(
            "  {:<10} {} {} {}",
            height.bright_black(),
            short.bright_yellow(),
            tx.amount.to_string().bright_cyan(),
            format!("({})", tx.status).bright_black()
        );
    }
    println!();
}

fn print_details(tx: &Transaction) {
    let none = || "-".to_string();

    println!();
    println!("{}", "Transaction Information:".bold().cyan());
    println!();
    println!("  Coin:          {}", tx.coin.as_str().bright_yellow());
    println!("  Hash:          {}", tx.hash.to_string().bright_yellow());
    println!("  Status:        {}", tx.status.to_string().bright_cyan());
    println!(
        "  Block Height:  {}",
        tx.block_height.map(|h| h.to_string()).unwrap_or_else(none)
    );
    println!(
        "  Block Hash:    {}",
        tx.block_hash.clone().unwrap_or_else(none).bright_black()
    );
    println!("  From:          {}", tx.from.clone().unwrap_or_else(none));
    println!("  To:            {}", tx.to.clone().unwrap_or_else(none));
    println!("  Amount:        {}", tx.amount.to_string().bright_cyan());
    println!("  Fee:           {}", tx.fee);
    println!("  Confirmations: {}", tx.confirmations);
    if let Some(ts) = tx.timestamp {
        println!("  Timestamp:     {}", ts.to_rfc3339());
    }
    println!(
        "  Updated:       {}",
        tx.updated_at.to_rfc3339().bright_black()
    );
    println!();
}
