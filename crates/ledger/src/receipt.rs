//! Transaction receipts returned by the destination ledger.

use serde::{Deserialize, Serialize};

/// Hash identifying a destination-chain transaction, `0x`-prefixed hex.
pub type LedgerTxHash = String;

/// The outcome of a destination-chain transaction once it has been included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    /// The hash of the transaction this receipt belongs to.
    pub tx_hash: LedgerTxHash,

    /// Whether the transaction executed successfully.
    pub success: bool,

    /// The revert reason, when the transaction failed and one could be extracted.
    pub revert_reason: Option<String>,

    /// The destination-chain block the transaction was included in.
    pub block_number: u64,
}

impl LedgerReceipt {
    /// A successful receipt for the given transaction hash.
    pub fn success(tx_hash: LedgerTxHash, block_number: u64) -> Self {
        Self {
            tx_hash,
            success: true,
            revert_reason: None,
            block_number,
        }
    }

    /// A failed receipt carrying a revert reason.
    pub fn reverted(tx_hash: LedgerTxHash, block_number: u64, reason: impl Into<String>) -> Self {
        Self {
            tx_hash,
            success: false,
            revert_reason: Some(reason.into()),
            block_number,
        }
    }
}
