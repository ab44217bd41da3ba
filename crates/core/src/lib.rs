//! Core types for txstore.
//!
//! This crate provides the domain types shared by the storage layer and the CLI:
//! - Coin identifiers (one storage bucket per coin)
//! - Transaction hashes
//! - Transaction records and their status
//! - Request objects for listing, creating, updating and deleting records

pub mod coin;
pub mod hash;
pub mod request;
pub mod transaction;

// Re-export commonly used types at the crate root
pub use coin::{Coin, CoinError};
pub use hash::TxHash;
pub use request::{
    CreateTransactionRequest, DeleteTransactionRequest, ListTransactionsRequest,
    UpdateTransactionRequest,
};
pub use transaction::{Transaction, TransactionError, TxStatus};
