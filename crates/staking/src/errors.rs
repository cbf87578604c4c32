//! Error types for the staking ledger engine.

use stake_bridge_primitives::types::{DepositTxId, ProviderId};
use thiserror::Error;

/// Everything a staking ledger mutation can fail with.
#[derive(Debug, Error)]
pub enum StakingError {
    /// The referenced finality provider does not exist.
    #[error("unknown finality provider: {0}")]
    UnknownProvider(ProviderId),

    /// The referenced finality provider is deactivated.
    #[error("finality provider is not active: {0}")]
    InactiveProvider(ProviderId),

    /// A position with this transaction id already exists.
    #[error("delegation already exists for transaction: {0}")]
    DuplicatePosition(DepositTxId),

    /// The delegation's unlock time does not lie after its creation time.
    #[error("unlock time must be after creation time for transaction: {0}")]
    InvalidUnlockTime(DepositTxId),
}
