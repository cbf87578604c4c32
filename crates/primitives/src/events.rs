//! Lifecycle events emitted by the scanner, the relay controller and the staking engine.
//!
//! Events are the only cross-component link: the relay never touches the staking engine's
//! collections directly, it hands over a [`NewDelegation`] and broadcasts a [`BridgeEvent`] for
//! observability.

use serde::{Deserialize, Serialize};

use crate::{
    slashing::SlashingSeverity,
    types::{DepositTxId, EvmAddress, ProviderId, Sats},
};

/// The message the relay sends to the staking engine when a deposit has been minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDelegation {
    /// The source-chain transaction id the resulting position is keyed by.
    pub txid: DepositTxId,

    /// The destination-chain address of the staker.
    pub staker: EvmAddress,

    /// The staked amount in sats.
    pub amount: Sats,

    /// The finality provider the stake is delegated to.
    pub provider_id: ProviderId,

    /// Unix time the stake unlocks at.
    pub unlock_time: u64,

    /// Unix time the delegation was created at.
    pub created_at: u64,
}

/// Unified lifecycle event type, broadcast to observability consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BridgeEvent {
    /// The scanner picked up a new staking output on the source chain.
    DepositDetected {
        /// The detected transaction id.
        txid: DepositTxId,

        /// The detected amount in sats.
        amount: Sats,
    },

    /// The relay registered a deposit on the destination ledger.
    DepositRegistered {
        /// The registered transaction id.
        txid: DepositTxId,

        /// The registered amount in sats.
        amount: Sats,
    },

    /// The relay minted the equivalent value on the destination ledger.
    DepositMinted {
        /// The minted transaction id.
        txid: DepositTxId,

        /// The source amount in sats.
        amount: Sats,

        /// The minted quantity in the destination ledger's 18-decimal representation.
        minted: u128,
    },

    /// The relay gave up on a deposit after exhausting its retry budget, or rejected it.
    DepositFailed {
        /// The failed transaction id.
        txid: DepositTxId,

        /// The amount that failed to relay, in sats.
        amount: Sats,

        /// How many attempts were made before giving up.
        attempts: u32,

        /// The last error observed.
        reason: String,
    },

    /// The staking engine created a delegation position for a minted deposit.
    DelegationCreated {
        /// The transaction id the position is keyed by.
        txid: DepositTxId,

        /// The provider the stake was delegated to.
        provider_id: ProviderId,

        /// The delegated amount in sats.
        amount: Sats,
    },

    /// A periodic reward distribution completed.
    RewardsDistributed {
        /// The total distributed this round, in sats.
        total: Sats,

        /// The number of positions that accrued rewards.
        positions: u64,
    },

    /// A slashing incident was executed against a provider.
    SlashingExecuted {
        /// The slashed provider.
        provider_id: ProviderId,

        /// The judged severity.
        severity: SlashingSeverity,

        /// The total amount slashed across positions, in sats.
        total_slashed: Sats,

        /// The number of positions touched.
        affected: u64,
    },

    /// An epoch boundary was processed.
    EpochUpdated {
        /// The new epoch counter.
        epoch: u64,
    },
}
