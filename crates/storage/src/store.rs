//! Store lifecycle: opening the database, ensuring per-coin buckets, closing.

use crate::config::StoreConfig;
use crate::db::{Result, Storage, StorageError};
use crate::transactions::TransactionBucket;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use txstore_core::{
    Coin, CreateTransactionRequest, DeleteTransactionRequest, ListTransactionsRequest,
    Transaction, UpdateTransactionRequest,
};

/// Owns the database handle for one transactions database.
///
/// States: unopened → (`create_schema` | `configure`) → opened → `close` → closed.
/// `configure` may be called any number of times while opened; after `close`
/// it opens a fresh handle.
pub struct TransactionStore {
    config: StoreConfig,
    /// Resolved once at construction; never changes.
    path: PathBuf,
    storage: Option<Storage>,
    opens: usize,
}

impl TransactionStore {
    /// Create an unopened store. The database path is resolved here.
    pub fn new(config: StoreConfig) -> Self {
        let path = config.db_path();
        Self {
            config,
            path,
            storage: None,
            opens: 0,
        }
    }

    /// Path of the transactions database.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Check if the database handle is open.
    pub fn is_open(&self) -> bool {
        self.storage.is_some()
    }

    /// Get the open storage handle.
    pub fn storage(&self) -> Result<&Storage> {
        self.storage.as_ref().ok_or(StorageError::NotOpen)
    }

    /// Number of times this instance has opened the database file.
    pub fn open_count(&self) -> usize {
        self.opens
    }

    fn open_if_needed(&mut self) -> Result<&Storage> {
        if self.storage.is_none() {
            let storage = Storage::open_with(self.config.to_sled_config(), &self.path)?;
            self.opens += 1;
            self.storage = Some(storage);
        } else {
            debug!(path = %self.path.display(), "database already open");
        }
        self.storage()
    }

    // =========================================================================
    // Schema
    // =========================================================================

    /// First-time setup: open the database and create a bucket per coin.
    ///
    /// Each bucket is created in its own transaction. A failure stops
    /// processing but keeps the buckets created before it.
    pub fn create_schema(&mut self, coins: &[Coin]) -> Result<()> {
        let storage = self.open_if_needed()?;

        for coin in coins {
            storage
                .ensure_buckets(std::slice::from_ref(coin))
                .map_err(|e| StorageError::CreateBucket {
                    coin: coin.clone(),
                    source: Box::new(e),
                })?;
        }

        info!(coins = coins.len(), "schema created");
        Ok(())
    }

    /// Repeatable startup setup: open the database if needed and create any
    /// missing buckets.
    ///
    /// All buckets of the list are committed in one transaction, so a failure
    /// adds none of them. Existing buckets and their contents are untouched.
    pub fn configure(&mut self, coins: &[Coin]) -> Result<()> {
        let storage = self.open_if_needed()?;

        let added = storage
            .ensure_buckets(coins)
            .map_err(|e| StorageError::CreateBuckets {
                source: Box::new(e),
            })?;

        debug!(requested = coins.len(), added = added.len(), "store configured");
        Ok(())
    }

    /// [`configure`](Self::configure) with the coins from the store's config.
    pub fn configure_from_config(&mut self) -> Result<()> {
        let coins = self.config.coins.clone();
        self.configure(&coins)
    }

    /// Check whether the database exists on disk.
    ///
    /// File-system errors are logged and reported as "not created" so that
    /// startup probing never fails.
    pub fn is_created(&self) -> bool {
        match self.path.try_exists() {
            Ok(exists) => exists,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "error checking for database");
                false
            }
        }
    }

    /// Like [`is_created`](Self::is_created), but also requires a bucket for
    /// every coin when the database is open.
    pub fn is_created_for(&self, coins: &[Coin]) -> bool {
        if !self.is_created() {
            return false;
        }
        let Some(storage) = &self.storage else {
            return true;
        };
        coins.iter().all(|coin| match storage.has_bucket(coin) {
            Ok(found) => found,
            Err(e) => {
                warn!(coin = %coin, error = %e, "error checking for bucket");
                false
            }
        })
    }

    /// Flush and release the database handle.
    ///
    /// Fails with [`StorageError::NotOpen`] if there is no open handle.
    pub fn close(&mut self) -> Result<()> {
        let storage = self.storage.take().ok_or(StorageError::NotOpen)?;
        storage.flush()?;
        drop(storage);
        info!(path = %self.path.display(), "closed database");
        Ok(())
    }

    // =========================================================================
    // Buckets and records
    // =========================================================================

    /// All buckets, ordered by coin name.
    pub fn buckets(&self) -> Result<Vec<Coin>> {
        self.storage()?.buckets()
    }

    /// Record operations scoped to one coin's bucket.
    pub fn bucket(&self, coin: &Coin) -> Result<TransactionBucket<'_>> {
        TransactionBucket::new(self.storage()?, coin)
    }

    /// List the transactions in a bucket that match the query.
    pub fn list(&self, coin: &Coin, query: &ListTransactionsRequest) -> Result<Vec<Transaction>> {
        self.bucket(coin)?.list(query)
    }

    /// Create a transaction record.
    pub fn create(&self, coin: &Coin, request: &CreateTransactionRequest) -> Result<Transaction> {
        self.bucket(coin)?.create(request)
    }

    /// Create several transaction records atomically.
    pub fn create_bulk(
        &self,
        coin: &Coin,
        requests: &[CreateTransactionRequest],
    ) -> Result<Vec<Transaction>> {
        self.bucket(coin)?.create_bulk(requests)
    }

    /// Patch a transaction record.
    pub fn update(&self, coin: &Coin, request: &UpdateTransactionRequest) -> Result<Transaction> {
        self.bucket(coin)?.update(request)
    }

    /// Remove a transaction record.
    pub fn delete(&self, coin: &Coin, request: &DeleteTransactionRequest) -> Result<()> {
        self.bucket(coin)?.delete(request)
    }
}
