//! Coin identifiers.
//!
//! A coin names an asset/ledger (usually its ticker symbol) and doubles as the
//! name of the storage bucket holding that coin's transactions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix reserved for internal trees (sled's default tree, the bucket catalog).
pub const RESERVED_PREFIX: &str = "__";

/// Errors that can occur when parsing a coin identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinError {
    #[error("coin identifier must not be empty")]
    Empty,
    #[error("coin identifier {0:?} uses the reserved prefix \"__\"")]
    Reserved(String),
}

/// A validated coin identifier, e.g. `BTC`.
///
/// Identifiers are stored verbatim: `BTC` and `btc` name different buckets.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coin(String);

impl Coin {
    /// Create a coin identifier, rejecting empty and reserved names.
    pub fn new(name: impl Into<String>) -> Result<Self, CoinError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoinError::Empty);
        }
        if name.starts_with(RESERVED_PREFIX) {
            return Err(CoinError::Reserved(name));
        }
        Ok(Self(name))
    }

    /// Parse a list of identifiers, failing on the first invalid one.
    pub fn parse_all<I, S>(names: I) -> Result<Vec<Self>, CoinError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(Self::new).collect()
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bucket key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coin({})", self.0)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Coin {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Coin {
    type Error = CoinError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Coin {
    type Error = CoinError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Coin> for String {
    fn from(coin: Coin) -> Self {
        coin.0
    }
}

impl AsRef<[u8]> for Coin {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}
