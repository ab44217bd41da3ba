//! Store configuration: data directory, supported coins and sled open options.

use crate::db::{Result, StorageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use txstore_core::Coin;

/// Well-known name of the transactions database inside the data directory.
pub const TRANSACTIONS_DB: &str = "transactions.db";

/// Resolve the database path for a data directory.
pub fn resolve_path(data_dir: &Path) -> PathBuf {
    data_dir.join(TRANSACTIONS_DB)
}

/// sled's space/throughput trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    #[default]
    LowSpace,
    HighThroughput,
}

impl From<OpenMode> for sled::Mode {
    fn from(mode: OpenMode) -> Self {
        match mode {
            OpenMode::LowSpace => sled::Mode::LowSpace,
            OpenMode::HighThroughput => sled::Mode::HighThroughput,
        }
    }
}

/// Configuration for a [`TransactionStore`](crate::TransactionStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the database.
    pub data_dir: PathBuf,
    /// Coins that get a bucket on startup.
    pub coins: Vec<Coin>,
    /// Page cache size in bytes.
    pub cache_capacity: u64,
    /// Background flush interval (None disables periodic flushing).
    pub flush_every_ms: Option<u64>,
    pub mode: OpenMode,
    /// Remove the database when the handle is dropped (for tests).
    pub temporary: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            coins: Vec::new(),
            cache_capacity: 1024 * 1024 * 1024,
            flush_every_ms: Some(500),
            mode: OpenMode::default(),
            temporary: false,
        }
    }
}

impl StoreConfig {
    /// Create a config for the given data directory with default options.
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_coins(mut self, coins: Vec<Coin>) -> Self {
        self.coins = coins;
        self
    }

    pub fn with_cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    pub fn with_flush_every_ms(mut self, every: Option<u64>) -> Self {
        self.flush_every_ms = every;
        self
    }

    pub fn with_mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_temporary(mut self, temporary: bool) -> Self {
        self.temporary = temporary;
        self
    }

    /// Path of the transactions database.
    pub fn db_path(&self) -> PathBuf {
        resolve_path(&self.data_dir)
    }

    /// Add a coin unless it is already listed. Returns whether it was added.
    pub fn add_coin(&mut self, coin: Coin) -> bool {
        if self.coins.contains(&coin) {
            return false;
        }
        self.coins.push(coin);
        true
    }

    /// Build the sled open options.
    pub fn to_sled_config(&self) -> sled::Config {
        sled::Config::new()
            .path(self.db_path())
            .cache_capacity(self.cache_capacity)
            .flush_every_ms(self.flush_every_ms)
            .mode(self.mode.into())
            .temporary(self.temporary)
    }

    /// Load a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| StorageError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| StorageError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Save the config as pretty-printed JSON, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StorageError::Config(format!("failed to encode config: {}", e)))?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_path() {
        let path = resolve_path(Path::new("/var/lib/txstore"));
        assert_eq!(path, PathBuf::from("/var/lib/txstore/transactions.db"));

        let config = StoreConfig::new("/var/lib/txstore");
        assert_eq!(config.db_path(), path);
    }

    #[test]
    fn test_add_coin_dedupes() {
        let mut config = StoreConfig::default();
        assert!(config.add_coin(Coin::new("BTC").unwrap()));
        assert!(!config.add_coin(Coin::new("BTC").unwrap()));
        assert_eq!(config.coins.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("nested").join("config.json");

        let config = StoreConfig::new(dir.path())
            .with_coins(Coin::parse_all(["BTC", "ETH"]).unwrap())
            .with_mode(OpenMode::HighThroughput)
            .with_flush_every_ms(None);
        config.save(&file).unwrap();

        let loaded = StoreConfig::load(&file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"data_dir": "/tmp/x", "coins": ["BTC"]}"#).unwrap();
        assert_eq!(config.coins, vec![Coin::new("BTC").unwrap()]);
        assert_eq!(config.mode, OpenMode::LowSpace);
        assert_eq!(config.flush_every_ms, Some(500));
    }

    #[test]
    fn test_invalid_coin_in_json_rejected() {
        let result = serde_json::from_str::<StoreConfig>(r#"{"coins": [""]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = StoreConfig::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(StorageError::Config(_))));
    }
}
