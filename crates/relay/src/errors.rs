//! Error taxonomy of the relay pipeline.

use stake_bridge_ledger::{errors::LedgerError, receipt::LedgerTxHash};
use thiserror::Error;

/// Everything that can go wrong while relaying one deposit.
///
/// The taxonomy decides the terminal state: validation and authorization failures reject the
/// deposit without any chain call or retry, deterministic ledger reverts fail it immediately,
/// and transport failures, receipt timeouts and on-chain reverts consume retry attempts.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The candidate is malformed or ineligible. Terminal, no chain call is made.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The chosen finality provider (or the caller) is not authorized. Terminal.
    #[error("authorization failed: {0}")]
    Authorization(String),

    /// A destination-ledger call failed.
    #[error("ledger call failed: {0}")]
    Ledger(#[from] LedgerError),

    /// No receipt was observed for a submitted transaction within the configured window.
    #[error("timed out waiting for receipt of {tx_hash}")]
    ReceiptTimeout {
        /// The transaction whose receipt never appeared.
        tx_hash: LedgerTxHash,
    },

    /// A submitted transaction was included but reverted.
    #[error("transaction {tx_hash} reverted: {reason}")]
    Reverted {
        /// The reverted transaction.
        tx_hash: LedgerTxHash,

        /// The revert reason, when one could be extracted.
        reason: String,
    },
}

impl RelayError {
    /// Whether another register+mint attempt can possibly succeed.
    pub fn is_retriable(&self) -> bool {
        match self {
            RelayError::Validation(_) | RelayError::Authorization(_) => false,
            RelayError::Ledger(e) => e.is_retriable(),
            RelayError::ReceiptTimeout { .. } | RelayError::Reverted { .. } => true,
        }
    }
}
