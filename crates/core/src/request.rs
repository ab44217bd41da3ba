//! Request objects for the coin-scoped record operations.

use crate::hash::TxHash;
use crate::transaction::{TransactionError, TxStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Filters for listing transactions in one bucket.
///
/// Unset filters match everything. Results are ordered by transaction hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListTransactionsRequest {
    /// Match records whose sender or recipient equals this address.
    pub address: Option<String>,
    pub status: Option<TxStatus>,
    /// Inclusive lower bound on block height.
    pub min_height: Option<u64>,
    /// Inclusive upper bound on block height.
    pub max_height: Option<u64>,
    /// Number of matching records to skip.
    pub offset: usize,
    /// Maximum number of records to return (None = unbounded).
    pub limit: Option<usize>,
}

impl ListTransactionsRequest {
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_status(mut self, status: TxStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_heights(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }

    pub fn with_page(mut self, offset: usize, limit: Option<usize>) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// Reject an empty height range.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if let (Some(min), Some(max)) = (self.min_height, self.max_height) {
            if min > max {
                return Err(TransactionError::InvalidHeightRange { min, max });
            }
        }
        Ok(())
    }
}

/// Fields for a new transaction record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// Hex transaction id (0x prefix optional).
    pub hash: String,
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub confirmations: u64,
    #[serde(default)]
    pub status: TxStatus,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A patch for an existing record. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Hex id of the record to update.
    pub hash: String,
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub status: Option<TxStatus>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl UpdateTransactionRequest {
    pub fn tx_hash(&self) -> Result<TxHash, TransactionError> {
        TxHash::from_hex(&self.hash)
    }
}

/// Identifies the record to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTransactionRequest {
    pub hash: String,
}

impl DeleteTransactionRequest {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn tx_hash(&self) -> Result<TxHash, TransactionError> {
        TxHash::from_hex(&self.hash)
    }
}
