//! CLI commands module.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use txstore_storage::{StoreConfig, TransactionStore};

mod configure;
mod init;
mod status;
mod tx;

/// Name of the store config file inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new store with a bucket per coin
    Init(init::InitArgs),
    /// Add coins to an existing store
    Configure(configure::ConfigureArgs),
    /// Show store location and buckets
    Status(status::StatusArgs),
    /// Transaction record operations
    Tx(tx::TxArgs),
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init(args) => init::run(args),
        Commands::Configure(args) => configure::run(args),
        Commands::Status(args) => status::run(args),
        Commands::Tx(args) => tx::run(args),
    }
}

/// Path of the config file for a data directory.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Load the config written by `txstore init`.
pub fn load_config(data_dir: &Path) -> Result<StoreConfig> {
    let path = config_path(data_dir);
    let mut config = StoreConfig::load(&path)
        .with_context(|| "Failed to load config. Did you run 'txstore init'?")?;
    // The directory given on the command line wins over the stored one
    config.data_dir = data_dir.to_path_buf();
    Ok(config)
}

/// Load the config and open the store, ensuring every configured bucket exists.
pub fn open_store(data_dir: &Path) -> Result<TransactionStore> {
    let config = load_config(data_dir)?;
    let mut store = TransactionStore::new(config);
    store
        .configure_from_config()
        .with_context(|| format!("Failed to open store at {}", store.path().display()))?;
    Ok(store)
}
