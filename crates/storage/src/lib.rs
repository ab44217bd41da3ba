//! Persistent transaction datastore for txstore.
//!
//! This crate stores blockchain transaction records in a sled database,
//! one bucket (sled tree) per supported coin:
//! - Store lifecycle (create schema, configure, existence probe, close)
//! - Bucket catalog (which coins have a bucket)
//! - Record operations (list, create, bulk create, update, delete)
//! - Store configuration (data directory, coins, open options)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Application Layer                     │
//! │                (CLI, indexers, services)                 │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │                   Storage Layer                          │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────┐  │
//! │  │ TransactionStore │ │TransactionBucket │ │ Storage  │  │
//! │  │  - schema        │ │  - list          │ │ - sled   │  │
//! │  │  - configure     │ │  - create(_bulk) │ │ - catalog│  │
//! │  │  - close         │ │  - update/delete │ │ - codec  │  │
//! │  └──────────────────┘ └──────────────────┘ └──────────┘  │
//! └────────────────────────┬────────────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────────────┐
//! │              sled Database (transactions.db)             │
//! │        __buckets catalog + one tree per coin             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use txstore_core::{Coin, CreateTransactionRequest, ListTransactionsRequest};
//! use txstore_storage::{StoreConfig, TransactionStore};
//!
//! let coins = Coin::parse_all(["BTC", "ETH"]).unwrap();
//! let mut store = TransactionStore::new(StoreConfig::new("./data"));
//!
//! if store.is_created() {
//!     store.configure(&coins).unwrap();
//! } else {
//!     store.create_schema(&coins).unwrap();
//! }
//!
//! let request = CreateTransactionRequest {
//!     hash: "0xdeadbeef".into(),
//!     amount: 50_000,
//!     ..Default::default()
//! };
//! store.create(&coins[0], &request).unwrap();
//!
//! let txs = store.list(&coins[0], &ListTransactionsRequest::default()).unwrap();
//! assert_eq!(txs.len(), 1);
//!
//! store.close().unwrap();
//! ```

pub mod config;
pub mod db;
pub mod store;
pub mod transactions;

// Re-export commonly used types
pub use config::{resolve_path, OpenMode, StoreConfig, TRANSACTIONS_DB};
pub use db::{Result, Storage, StorageError};
pub use store::TransactionStore;
pub use transactions::TransactionBucket;
