//! Delegation positions: a single deposit's stake tracked against one finality provider.

use serde::{Deserialize, Serialize};

use crate::{
    slashing::SlashingEvent,
    types::{DepositTxId, EvmAddress, ProviderId, Sats},
};

/// Lifecycle status of a delegation position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionStatus {
    /// The position is staked and accrues rewards.
    Active,

    /// The position is winding down and no longer accrues rewards.
    Unbonding,

    /// The position has been fully withdrawn.
    Closed,
}

/// Reward accrual sub-record of a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardInfo {
    /// Rewards accumulated so far, in sats.
    pub accumulated: Sats,

    /// Unix time of the last reward distribution applied to this position.
    pub last_distribution: u64,

    /// The annual reward rate this position accrues at, in `[0, 1]`.
    pub annual_rate: f64,
}

/// Slashing sub-record of a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SlashingInfo {
    /// Total penalty subtracted from this position's amount, in sats.
    pub total_penalty: Sats,

    /// Ordered history of slashing incidents that touched this position.
    pub events: Vec<SlashingEvent>,
}

/// One deposit's stake, keyed by its source-chain transaction id.
///
/// The amount is only ever decremented by slashing and never drops below zero; reward accrual
/// is tracked in [`RewardInfo`] and leaves the amount untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakingPosition {
    /// The source-chain transaction id the position is keyed by.
    pub txid: DepositTxId,

    /// The destination-chain address of the staker.
    pub staker: EvmAddress,

    /// The staked amount in sats.
    pub amount: Sats,

    /// The finality provider this stake is delegated to. Exactly one per position.
    pub provider_id: ProviderId,

    /// Unix time the position was created at.
    pub created_at: u64,

    /// Unix time the stake unlocks at. Always after `created_at`.
    pub unlock_time: u64,

    /// Lifecycle status.
    pub status: PositionStatus,

    /// Derived voting power, computed at creation and on recompute.
    pub voting_power: u64,

    /// Reward accrual state.
    pub rewards: RewardInfo,

    /// Slashing state.
    pub slashing: SlashingInfo,
}

impl StakingPosition {
    /// Whether this position participates in reward accrual and slashing.
    pub fn is_active(&self) -> bool {
        matches!(self.status, PositionStatus::Active)
    }
}
