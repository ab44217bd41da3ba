//! Transaction records.

use crate::coin::Coin;
use crate::hash::TxHash;
use crate::request::{CreateTransactionRequest, ListTransactionsRequest, UpdateTransactionRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when building or parsing transaction data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("transaction hash must not be empty")]
    EmptyHash,
    #[error("invalid transaction hash: {0:?}")]
    InvalidHash(String),
    #[error("unknown transaction status: {0:?}")]
    UnknownStatus(String),
    #[error("invalid height range: min {min} > max {max}")]
    InvalidHeightRange { min: u64, max: u64 },
}

/// Lifecycle status of a transaction on its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Seen but not yet included in a block.
    #[default]
    Pending,
    /// Included in a block.
    Confirmed,
    /// Rejected or reverted.
    Failed,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Confirmed => "confirmed",
            TxStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxStatus {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(TxStatus::Pending),
            "confirmed" => Ok(TxStatus::Confirmed),
            "failed" => Ok(TxStatus::Failed),
            _ => Err(TransactionError::UnknownStatus(s.to_string())),
        }
    }
}

/// A blockchain transaction as persisted in a coin bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction id (bucket key).
    pub hash: TxHash,
    /// Coin whose bucket holds this record.
    pub coin: Coin,
    /// Hash of the including block (None while unconfirmed).
    pub block_hash: Option<String>,
    /// Height of the including block (None while unconfirmed).
    pub block_height: Option<u64>,
    /// Sender address, if the chain has one.
    pub from: Option<String>,
    /// Recipient address, if the chain has one.
    pub to: Option<String>,
    /// Transferred amount in the coin's smallest unit.
    pub amount: u64,
    /// Fee paid in the coin's smallest unit.
    pub fee: u64,
    /// Number of confirmations last observed.
    pub confirmations: u64,
    pub status: TxStatus,
    /// Chain timestamp, if known.
    pub timestamp: Option<DateTime<Utc>>,
    /// When the record was first written.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Build a new record from a create request.
    ///
    /// Fails if the request's hash is not valid hex.
    pub fn from_request(
        coin: Coin,
        request: &CreateTransactionRequest,
        now: DateTime<Utc>,
    ) -> Result<Self, TransactionError> {
        let hash = TxHash::from_hex(&request.hash)?;
        Ok(Self {
            hash,
            coin,
            block_hash: request.block_hash.clone(),
            block_height: request.block_height,
            from: request.from.clone(),
            to: request.to.clone(),
            amount: request.amount,
            fee: request.fee,
            confirmations: request.confirmations,
            status: request.status,
            timestamp: request.timestamp,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a patch: every `Some` field in the request replaces the stored value.
    pub fn apply(&mut self, update: &UpdateTransactionRequest, now: DateTime<Utc>) {
        if let Some(block_hash) = &update.block_hash {
            self.block_hash = Some(block_hash.clone());
        }
        if let Some(height) = update.block_height {
            self.block_height = Some(height);
        }
        if let Some(confirmations) = update.confirmations {
            self.confirmations = confirmations;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(timestamp) = update.timestamp {
            self.timestamp = Some(timestamp);
        }
        self.updated_at = now;
    }

    /// Check whether this record passes every filter set on a list request.
    ///
    /// Height filters exclude records without a block height.
    pub fn matches(&self, query: &ListTransactionsRequest) -> bool {
        if let Some(address) = &query.address {
            let involved = self.from.as_deref() == Some(address.as_str())
                || self.to.as_deref() == Some(address.as_str());
            if !involved {
                return false;
            }
        }

        if let Some(status) = query.status {
            if self.status != status {
                return false;
            }
        }

        if query.min_height.is_some() || query.max_height.is_some() {
            let Some(height) = self.block_height else {
                return false;
            };
            if query.min_height.is_some_and(|min| height < min) {
                return false;
            }
            if query.max_height.is_some_and(|max| height > max) {
                return false;
            }
        }

        true
    }

    /// Check if the transaction has been included in a block.
    pub fn is_confirmed(&self) -> bool {
        self.status == TxStatus::Confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(hash: &str) -> CreateTransactionRequest {
        CreateTransactionRequest {
            hash: hash.to_string(),
            from: Some("alice".into()),
            to: Some("bob".into()),
            amount: 5_000,
            fee: 10,
            ..Default::default()
        }
    }

    fn record(height: Option<u64>) -> Transaction {
        let mut req = request("0xaa01");
        req.block_height = height;
        Transaction::from_request(Coin::new("BTC").unwrap(), &req, Utc::now()).unwrap()
    }

    #[test]
    fn test_from_request() {
        let now = Utc::now();
        let tx = Transaction::from_request(Coin::new("BTC").unwrap(), &request("0xAA01"), now)
            .unwrap();

        assert_eq!(tx.hash.as_str(), "aa01");
        assert_eq!(tx.coin.as_str(), "BTC");
        assert_eq!(tx.amount, 5_000);
        assert_eq!(tx.status, TxStatus::Pending);
        assert_eq!(tx.created_at, now);
        assert_eq!(tx.updated_at, now);
        assert!(!tx.is_confirmed());
    }

    #[test]
    fn test_from_request_invalid_hash() {
        let result = Transaction::from_request(Coin::new("BTC").unwrap(), &request("zz"), Utc::now());
        assert!(matches!(result, Err(TransactionError::InvalidHash(_))));
    }

    #[test]
    fn test_apply_patch_only_touches_set_fields() {
        let mut tx = record(None);
        let created = tx.created_at;
        let later = created + chrono::Duration::seconds(30);

        let update = UpdateTransactionRequest {
            hash: tx.hash.to_string(),
            block_height: Some(100),
            status: Some(TxStatus::Confirmed),
            ..Default::default()
        };
        tx.apply(&update, later);

        assert_eq!(tx.block_height, Some(100));
        assert_eq!(tx.status, TxStatus::Confirmed);
        assert_eq!(tx.block_hash, None);
        assert_eq!(tx.confirmations, 0);
        assert_eq!(tx.amount, 5_000);
        assert_eq!(tx.created_at, created);
        assert_eq!(tx.updated_at, later);
    }

    #[test]
    fn test_matches_address() {
        let tx = record(None);

        let by_sender = ListTransactionsRequest::default().with_address("alice");
        let by_recipient = ListTransactionsRequest::default().with_address("bob");
        let other = ListTransactionsRequest::default().with_address("carol");

        assert!(tx.matches(&by_sender));
        assert!(tx.matches(&by_recipient));
        assert!(!tx.matches(&other));
    }

    #[test]
    fn test_matches_height_range() {
        let tx = record(Some(50));
        let unconfirmed = record(None);

        let range = ListTransactionsRequest::default().with_heights(Some(10), Some(50));
        assert!(tx.matches(&range));
        assert!(!unconfirmed.matches(&range));

        let above = ListTransactionsRequest::default().with_heights(Some(51), None);
        assert!(!tx.matches(&above));

        let below = ListTransactionsRequest::default().with_heights(None, Some(49));
        assert!(!tx.matches(&below));
    }

    #[test]
    fn test_matches_status() {
        let tx = record(None);
        let pending = ListTransactionsRequest::default().with_status(TxStatus::Pending);
        let failed = ListTransactionsRequest::default().with_status(TxStatus::Failed);
        assert!(tx.matches(&pending));
        assert!(!tx.matches(&failed));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Confirmed".parse::<TxStatus>().unwrap(), TxStatus::Confirmed);
        assert!(matches!(
            "lost".parse::<TxStatus>(),
            Err(TransactionError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_bincode_encoding() {
        let tx = record(Some(7));
        let encoded = bincode::serialize(&tx).unwrap();
        let decoded: Transaction = bincode::deserialize(&encoded).unwrap();
        assert_eq!(tx, decoded);
    }
}
