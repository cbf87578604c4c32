//! Error types for destination-ledger calls.

use stake_bridge_primitives::types::{DepositTxId, EvmAddress, ProviderId};
use thiserror::Error;

/// Everything a destination-ledger call can fail with.
///
/// The first three variants mirror the ledger contract's revert conditions and are terminal on
/// the relay side; [`LedgerError::Rpc`] covers transport failures and is the retriable class.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A deposit with this transaction id has already been registered.
    #[error("deposit already registered: {0}")]
    AlreadyRegistered(DepositTxId),

    /// No deposit with this transaction id has been registered.
    #[error("deposit not registered: {0}")]
    NotRegistered(DepositTxId),

    /// The deposit with this transaction id has already been processed.
    #[error("deposit already processed: {0}")]
    AlreadyProcessed(DepositTxId),

    /// The caller is not the configured relay identity.
    #[error("caller is not the relay identity: {0}")]
    UnauthorizedCaller(EvmAddress),

    /// The ledger contract is paused.
    #[error("ledger is paused")]
    Paused,

    /// The finality provider is not registered on the ledger.
    #[error("unknown finality provider: {0}")]
    UnknownProvider(ProviderId),

    /// Transport-level failure talking to the ledger.
    #[error("ledger rpc call failed: {0}")]
    Rpc(String),
}

impl LedgerError {
    /// Whether retrying the call can possibly succeed.
    ///
    /// Contract reverts are deterministic; only transport failures are worth retrying.
    pub fn is_retriable(&self) -> bool {
        matches!(self, LedgerError::Rpc(_))
    }
}
