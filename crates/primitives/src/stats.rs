//! Network-wide aggregate statistics.

use serde::{Deserialize, Serialize};

use crate::types::Sats;

/// Aggregate view over all active positions and providers.
///
/// Fully derived: recomputed from the live collections after every mutation batch rather than
/// incrementally patched, so it is consistent after any interleaving of engine steps. The two
/// cumulative counters survive recomputation and are only ever incremented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NetworkStats {
    /// Sum of all active positions' amounts, in sats.
    pub total_staked: Sats,

    /// Number of active delegation positions.
    pub total_delegators: u64,

    /// Number of active finality providers.
    pub active_providers: u64,

    /// Mean commission rate across active providers.
    pub average_commission: f64,

    /// Cumulative rewards distributed since startup, in sats. Non-decreasing.
    pub total_rewards_distributed: Sats,

    /// Cumulative amount slashed since startup, in sats. Non-decreasing.
    pub total_slashed: Sats,

    /// Mean uptime across active providers.
    pub network_uptime: f64,
}
