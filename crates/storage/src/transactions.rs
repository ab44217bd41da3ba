//! Transaction record operations within one coin's bucket.

use crate::db::{from_tx_error, Result, Storage, StorageError};
use chrono::Utc;
use sled::transaction::{ConflictableTransactionError, ConflictableTransactionResult};
use sled::Tree;
use tracing::debug;
use txstore_core::{
    Coin, CreateTransactionRequest, DeleteTransactionRequest, ListTransactionsRequest,
    Transaction, TxHash, UpdateTransactionRequest,
};

/// Record operations scoped to a single bucket.
///
/// Records are keyed by their canonical hex hash, so scans come back in hash order.
pub struct TransactionBucket<'a> {
    storage: &'a Storage,
    coin: Coin,
    tree: Tree,
}

impl<'a> TransactionBucket<'a> {
    /// Open the bucket for `coin`. Fails if the bucket was never created.
    pub fn new(storage: &'a Storage, coin: &Coin) -> Result<Self> {
        let tree = storage.bucket_tree(coin)?;
        Ok(Self {
            storage,
            coin: coin.clone(),
            tree,
        })
    }

    pub fn coin(&self) -> &Coin {
        &self.coin
    }

    /// Number of records in the bucket.
    pub fn count(&self) -> usize {
        self.tree.len()
    }

    /// Get a record by hash.
    pub fn get(&self, hash: &TxHash) -> Result<Option<Transaction>> {
        match self.tree.get(hash.as_bytes())? {
            Some(bytes) => Ok(Some(Storage::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// List the records matching every filter set on `query`.
    ///
    /// `offset` counts matching records only.
    pub fn list(&self, query: &ListTransactionsRequest) -> Result<Vec<Transaction>> {
        query.validate()?;

        let mut transactions = Vec::new();
        let mut skipped = 0;
        for item in self.tree.iter() {
            if query.limit.is_some_and(|limit| transactions.len() >= limit) {
                break;
            }

            let (_, bytes) = item?;
            let tx: Transaction = Storage::decode(&bytes)?;
            if !tx.matches(query) {
                continue;
            }
            if skipped < query.offset {
                skipped += 1;
                continue;
            }
            transactions.push(tx);
        }
        Ok(transactions)
    }

    /// Insert a new record. Fails if one with the same hash exists.
    pub fn create(&self, request: &CreateTransactionRequest) -> Result<Transaction> {
        let tx = Transaction::from_request(self.coin.clone(), request, Utc::now())?;
        let bytes = Storage::encode(&tx)?;

        // Insert only if absent
        let swapped = self
            .tree
            .compare_and_swap(tx.hash.as_bytes(), None as Option<&[u8]>, Some(bytes))?;
        if swapped.is_err() {
            return Err(StorageError::AlreadyExists {
                coin: self.coin.clone(),
                hash: tx.hash,
            });
        }

        debug!(coin = %self.coin, hash = %tx.hash, "created transaction");
        Ok(tx)
    }

    /// Insert several records in one transaction.
    ///
    /// A hash that already exists, or repeats within the batch, aborts the
    /// whole batch. Records are returned in input order.
    pub fn create_bulk(&self, requests: &[CreateTransactionRequest]) -> Result<Vec<Transaction>> {
        let now = Utc::now();
        let transactions = requests
            .iter()
            .map(|request| Transaction::from_request(self.coin.clone(), request, now))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if transactions.is_empty() {
            return Ok(transactions);
        }

        let encoded = transactions
            .iter()
            .map(|tx| -> Result<_> { Ok((&tx.hash, Storage::encode(tx)?)) })
            .collect::<Result<Vec<_>>>()?;

        self.tree
            .transaction(|batch| -> ConflictableTransactionResult<(), StorageError> {
                for (hash, bytes) in &encoded {
                    if batch.get(hash.as_bytes())?.is_some() {
                        return Err(ConflictableTransactionError::Abort(
                            StorageError::AlreadyExists {
                                coin: self.coin.clone(),
                                hash: (*hash).clone(),
                            },
                        ));
                    }
                    batch.insert(hash.as_bytes(), bytes.as_slice())?;
                }
                Ok(())
            })
            .map_err(from_tx_error)?;

        debug!(coin = %self.coin, count = transactions.len(), "created transactions");
        Ok(transactions)
    }

    /// Apply a patch to an existing record and return the result.
    pub fn update(&self, request: &UpdateTransactionRequest) -> Result<Transaction> {
        let hash = request.tx_hash()?;
        let now = Utc::now();

        let tx = self
            .tree
            .transaction(|t| -> ConflictableTransactionResult<Transaction, StorageError> {
                let Some(bytes) = t.get(hash.as_bytes())? else {
                    return Err(ConflictableTransactionError::Abort(StorageError::NotFound {
                        coin: self.coin.clone(),
                        hash: hash.clone(),
                    }));
                };
                let mut tx: Transaction =
                    Storage::decode(&bytes).map_err(ConflictableTransactionError::Abort)?;
                tx.apply(request, now);
                let encoded = Storage::encode(&tx).map_err(ConflictableTransactionError::Abort)?;
                t.insert(hash.as_bytes(), encoded)?;
                Ok(tx)
            })
            .map_err(from_tx_error)?;

        debug!(coin = %self.coin, hash = %hash, status = %tx.status, "updated transaction");
        Ok(tx)
    }

    /// Remove a record. Fails if it does not exist.
    pub fn delete(&self, request: &DeleteTransactionRequest) -> Result<()> {
        let hash = request.tx_hash()?;
        if self.tree.remove(hash.as_bytes())?.is_none() {
            return Err(StorageError::NotFound {
                coin: self.coin.clone(),
                hash,
            });
        }
        debug!(coin = %self.coin, hash = %hash, "deleted transaction");
        Ok(())
    }

    /// Flush the bucket's pending writes through the owning database.
    pub fn flush(&self) -> Result<()> {
        self.storage.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txstore_core::TxStatus;

    fn setup() -> (Storage, Coin) {
        let storage = Storage::open_temporary().unwrap();
        let coin = Coin::new("BTC").unwrap();
        storage.ensure_buckets(std::slice::from_ref(&coin)).unwrap();
        (storage, coin)
    }

    fn request(hash: &str, height: Option<u64>) -> CreateTransactionRequest {
        CreateTransactionRequest {
            hash: hash.to_string(),
            block_height: height,
            from: Some("alice".into()),
            to: Some("bob".into()),
            amount: 1_000,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_bucket() {
        let storage = Storage::open_temporary().unwrap();
        let result = TransactionBucket::new(&storage, &Coin::new("ETH").unwrap());
        assert!(matches!(result, Err(StorageError::BucketNotFound(_))));
    }

    #[test]
    fn test_create_and_get() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();

        let tx = bucket.create(&request("0xAA", Some(1))).unwrap();
        assert_eq!(tx.hash.as_str(), "aa");
        assert_eq!(tx.coin, coin);

        let fetched = bucket.get(&tx.hash).unwrap().unwrap();
        assert_eq!(fetched, tx);
        assert_eq!(bucket.count(), 1);
    }

    #[test]
    fn test_create_duplicate_fails() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();

        bucket.create(&request("aa", None)).unwrap();
        // Same hash in a different spelling
        let result = bucket.create(&request("0xAA", None));
        assert!(matches!(result, Err(StorageError::AlreadyExists { .. })));
    }

    #[test]
    fn test_create_invalid_hash() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();

        let result = bucket.create(&request("not-hex", None));
        assert!(matches!(result, Err(StorageError::InvalidRequest(_))));
        assert_eq!(bucket.count(), 0);
    }

    #[test]
    fn test_create_bulk() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();

        let created = bucket
            .create_bulk(&[request("03", None), request("01", None), request("02", None)])
            .unwrap();

        // Input order preserved
        let hashes: Vec<_> = created.iter().map(|tx| tx.hash.as_str()).collect();
        assert_eq!(hashes, vec!["03", "01", "02"]);
        assert_eq!(bucket.count(), 3);
    }

    #[test]
    fn test_create_bulk_empty() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();
        assert!(bucket.create_bulk(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_create_bulk_is_atomic() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();
        bucket.create(&request("02", None)).unwrap();

        let result = bucket.create_bulk(&[request("01", None), request("02", None)]);
        assert!(matches!(result, Err(StorageError::AlreadyExists { .. })));

        // Nothing from the failed batch was written
        assert_eq!(bucket.count(), 1);
        assert!(bucket.get(&TxHash::from_hex("01").unwrap()).unwrap().is_none());
    }

    #[test]
    fn test_create_bulk_duplicate_within_batch() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();

        let result = bucket.create_bulk(&[request("01", None), request("0x01", None)]);
        assert!(matches!(result, Err(StorageError::AlreadyExists { .. })));
        assert_eq!(bucket.count(), 0);
    }

    #[test]
    fn test_create_bulk_invalid_request_writes_nothing() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();

        let result = bucket.create_bulk(&[request("01", None), request("", None)]);
        assert!(matches!(result, Err(StorageError::InvalidRequest(_))));
        assert_eq!(bucket.count(), 0);
    }

    #[test]
    fn test_update() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();
        let created = bucket.create(&request("aa", None)).unwrap();

        let updated = bucket
            .update(&UpdateTransactionRequest {
                hash: "0xaa".into(),
                block_hash: Some("ff00".into()),
                block_height: Some(12),
                confirmations: Some(3),
                status: Some(TxStatus::Confirmed),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.block_height, Some(12));
        assert_eq!(updated.block_hash.as_deref(), Some("ff00"));
        assert_eq!(updated.confirmations, 3);
        assert_eq!(updated.status, TxStatus::Confirmed);
        assert_eq!(updated.amount, created.amount);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let stored = bucket.get(&created.hash).unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn test_update_missing() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();

        let result = bucket.update(&UpdateTransactionRequest {
            hash: "bb".into(),
            ..Default::default()
        });
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[test]
    fn test_delete() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();
        bucket.create(&request("aa", None)).unwrap();

        bucket.delete(&DeleteTransactionRequest::new("AA")).unwrap();
        assert_eq!(bucket.count(), 0);

        let again = bucket.delete(&DeleteTransactionRequest::new("aa"));
        assert!(matches!(again, Err(StorageError::NotFound { .. })));
    }

    #[test]
    fn test_list_filters_and_paging() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();

        bucket.create(&request("01", Some(10))).unwrap();
        bucket.create(&request("02", Some(20))).unwrap();
        bucket.create(&request("03", None)).unwrap();
        let mut other = request("04", Some(30));
        other.from = Some("carol".into());
        other.to = Some("dave".into());
        bucket.create(&other).unwrap();

        let all = bucket.list(&ListTransactionsRequest::default()).unwrap();
        let hashes: Vec<_> = all.iter().map(|tx| tx.hash.to_string()).collect();
        assert_eq!(hashes, vec!["01", "02", "03", "04"]);

        let alice = bucket
            .list(&ListTransactionsRequest::default().with_address("alice"))
            .unwrap();
        assert_eq!(alice.len(), 3);

        let ranged = bucket
            .list(&ListTransactionsRequest::default().with_heights(Some(15), Some(30)))
            .unwrap();
        let hashes: Vec<_> = ranged.iter().map(|tx| tx.hash.to_string()).collect();
        assert_eq!(hashes, vec!["02", "04"]);

        let page = bucket
            .list(&ListTransactionsRequest::default().with_page(1, Some(2)))
            .unwrap();
        let hashes: Vec<_> = page.iter().map(|tx| tx.hash.to_string()).collect();
        assert_eq!(hashes, vec!["02", "03"]);

        let none = bucket
            .list(&ListTransactionsRequest::default().with_page(0, Some(0)))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_list_rejects_inverted_range() {
        let (storage, coin) = setup();
        let bucket = TransactionBucket::new(&storage, &coin).unwrap();

        let result = bucket.list(&ListTransactionsRequest::default().with_heights(Some(9), Some(1)));
        assert!(matches!(result, Err(StorageError::InvalidRequest(_))));
    }

    #[test]
    fn test_buckets_are_isolated() {
        let storage = Storage::open_temporary().unwrap();
        let coins = Coin::parse_all(["BTC", "ETH"]).unwrap();
        storage.ensure_buckets(&coins).unwrap();

        let btc = TransactionBucket::new(&storage, &coins[0]).unwrap();
        let eth = TransactionBucket::new(&storage, &coins[1]).unwrap();

        btc.create(&request("aa", None)).unwrap();
        assert_eq!(btc.count(), 1);
        assert_eq!(eth.count(), 0);

        // Same hash may exist in another coin's bucket
        eth.create(&request("aa", None)).unwrap();
        assert_eq!(eth.count(), 1);
    }
}
