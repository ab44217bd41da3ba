//! Transaction hash identifiers.

use crate::transaction::TransactionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A transaction id in canonical form: lowercase hex, no `0x` prefix.
///
/// Chains disagree on hash length, so only hex validity is checked.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(String);

impl TxHash {
    /// Parse from a hex string (with or without 0x prefix, any case).
    pub fn from_hex(s: &str) -> Result<Self, TransactionError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(TransactionError::EmptyHash);
        }
        let bytes = hex::decode(digits).map_err(|_| TransactionError::InvalidHash(s.to_string()))?;
        Ok(Self(hex::encode(bytes)))
    }

    /// Get the canonical hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key bytes inside a bucket.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Decode the raw hash bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        // Canonical form is always valid hex
        hex::decode(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = &self.0[..self.0.len().min(8)];
        write!(f, "TxHash({})", short)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TxHash {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for TxHash {
    type Error = TransactionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<TxHash> for String {
    fn from(hash: TxHash) -> Self {
        hash.0
    }
}

impl AsRef<[u8]> for TxHash {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}
