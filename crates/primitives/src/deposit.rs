//! Records describing a deposit as it moves from detection on the source chain to a minted
//! balance on the destination ledger.

use serde::{Deserialize, Serialize};

use crate::types::{DepositTxId, EvmAddress, ProviderId, Sats};

/// A staking output detected on the source chain, not yet validated or relayed.
///
/// Produced by the scanner and consumed by the relay controller, which decides whether the
/// candidate becomes a registered [`Deposit`] or is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositCandidate {
    /// The source-chain transaction id holding the staking output.
    pub txid: DepositTxId,

    /// The output index within the transaction.
    pub vout: u32,

    /// The deposited amount in sats.
    pub amount: Sats,

    /// The unix time at which the stake unlocks.
    pub unlock_time: u64,

    /// The finality provider the stake is delegated to.
    pub provider_id: ProviderId,

    /// The destination-chain account credited when the deposit is minted.
    pub recipient: EvmAddress,

    /// The source-chain block height the output was observed at.
    pub block_height: u64,

    /// Confirmations the output had when it was observed.
    pub confirmations: u64,
}

/// A deposit as registered on the destination ledger, mirrored on the relay side.
///
/// At most one deposit exists per transaction id; a duplicate registration is rejected by the
/// ledger and treated as terminal by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    /// The source-chain transaction id the deposit is keyed by.
    pub txid: DepositTxId,

    /// The destination-chain account the minted amount is credited to.
    pub recipient: EvmAddress,

    /// The deposited amount in sats.
    pub amount: Sats,

    /// The unix time at which the stake unlocks.
    pub unlock_time: u64,

    /// The finality provider the stake is delegated to.
    pub provider_id: ProviderId,

    /// The unix time at which the deposit was registered.
    pub registered_at: u64,

    /// Set once the equivalent value has been minted. Never unset.
    pub processed: bool,
}
