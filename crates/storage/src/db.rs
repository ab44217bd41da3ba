//! sled database wrapper: bucket catalog and serialization helpers.

use chrono::{DateTime, Utc};
use sled::transaction::{ConflictableTransactionResult, TransactionError as SledTxError};
use sled::{Db, Tree};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use txstore_core::{Coin, CoinError, TransactionError, TxHash};

/// Name of the internal tree recording which buckets exist.
pub const CATALOG_TREE: &[u8] = b"__buckets";

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("create bucket: {source}")]
    CreateBucket {
        coin: Coin,
        #[source]
        source: Box<StorageError>,
    },

    #[error("error creating bucket: {source}")]
    CreateBuckets {
        #[source]
        source: Box<StorageError>,
    },

    #[error("Invalid coin: {0}")]
    InvalidCoin(#[from] CoinError),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] TransactionError),

    #[error("Database is not open")]
    NotOpen,

    #[error("Bucket not found: {0}")]
    BucketNotFound(Coin),

    #[error("Transaction not found: {coin}/{hash}")]
    NotFound { coin: Coin, hash: TxHash },

    #[error("Transaction already exists: {coin}/{hash}")]
    AlreadyExists { coin: Coin, hash: TxHash },

    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Fold a sled transaction failure back into a storage error.
pub(crate) fn from_tx_error(e: SledTxError<StorageError>) -> StorageError {
    match e {
        SledTxError::Abort(e) => e,
        SledTxError::Storage(e) => StorageError::Database(e),
    }
}

/// Wrapper around a sled database: one tree per coin plus the bucket catalog.
pub struct Storage {
    db: Db,
    catalog: Tree,
    path: PathBuf,
}

impl Storage {
    /// Open a database at the given path with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = sled::Config::new().path(path.as_ref());
        Self::open_with(config, path.as_ref())
    }

    /// Open a database from a prepared sled config.
    pub fn open_with(config: sled::Config, path: &Path) -> Result<Self> {
        let db = config.open()?;
        let catalog = db.open_tree(CATALOG_TREE)?;
        info!(path = %path.display(), recovered = db.was_recovered(), "opened database");
        Ok(Self {
            db,
            catalog,
            path: path.to_path_buf(),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        let catalog = db.open_tree(CATALOG_TREE)?;
        Ok(Self {
            db,
            catalog,
            path: PathBuf::new(),
        })
    }

    /// Path the database was opened at (empty for temporary databases).
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Buckets
    // =========================================================================

    /// Create every missing bucket in `coins`.
    ///
    /// Trees are opened first; the catalog entries for the whole list are then
    /// committed in a single transaction, so either all new buckets of the list
    /// become visible or none do. Returns the buckets that were newly added.
    pub fn ensure_buckets(&self, coins: &[Coin]) -> Result<Vec<Coin>> {
        for coin in coins {
            self.db.open_tree(coin.as_bytes())?;
        }

        let created_at = Self::encode(&Utc::now())?;
        let added = self
            .catalog
            .transaction(|tx| -> ConflictableTransactionResult<Vec<Coin>, StorageError> {
                let mut added = Vec::new();
                for coin in coins {
                    if tx.get(coin.as_bytes())?.is_none() {
                        tx.insert(coin.as_bytes(), created_at.as_slice())?;
                        added.push(coin.clone());
                    }
                }
                Ok(added)
            })
            .map_err(from_tx_error)?;

        for coin in &added {
            info!(coin = %coin, "created bucket");
        }
        if added.len() < coins.len() {
            debug!(
                requested = coins.len(),
                added = added.len(),
                "some buckets already existed"
            );
        }
        Ok(added)
    }

    /// Check if a bucket exists for the coin.
    pub fn has_bucket(&self, coin: &Coin) -> Result<bool> {
        Ok(self.catalog.contains_key(coin.as_bytes())?)
    }

    /// All buckets, ordered by coin name.
    pub fn buckets(&self) -> Result<Vec<Coin>> {
        let mut coins = Vec::new();
        for key in self.catalog.iter().keys() {
            let key = key?;
            let name = String::from_utf8_lossy(&key).into_owned();
            coins.push(Coin::new(name)?);
        }
        Ok(coins)
    }

    /// When the bucket was created, if it exists.
    pub fn bucket_created_at(&self, coin: &Coin) -> Result<Option<DateTime<Utc>>> {
        match self.catalog.get(coin.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get the tree backing a coin's bucket.
    pub fn bucket_tree(&self, coin: &Coin) -> Result<Tree> {
        if !self.has_bucket(coin)? {
            return Err(StorageError::BucketNotFound(coin.clone()));
        }
        Ok(self.db.open_tree(coin.as_bytes())?)
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Encode a value for storage.
    pub fn encode<V: serde::Serialize>(value: &V) -> Result<Vec<u8>> {
        Ok(bincode::serialize(value)?)
    }

    /// Decode a stored value.
    pub fn decode<V: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<V> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Flush all pending writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Get the underlying sled database.
    pub fn inner(&self) -> &Db {
        &self.db
    }
}
