//! Finality provider state and the voting power derivation.

use serde::{Deserialize, Serialize};

use crate::{
    constants::SATS_PER_BTC,
    slashing::SlashingEvent,
    types::{ProviderId, Sats},
};

/// Floor that a provider's reputation can never drop below, no matter how often it is slashed.
pub const REPUTATION_FLOOR: f64 = 10.0;

/// Ceiling for a provider's reputation.
pub const REPUTATION_CAP: f64 = 100.0;

/// Floor for a provider's simulated uptime.
pub const UPTIME_FLOOR: f64 = 90.0;

/// Ceiling for a provider's simulated uptime.
pub const UPTIME_CAP: f64 = 100.0;

/// Scale factor applied to the voting power score.
pub const VOTING_POWER_SCALE: f64 = 1000.0;

/// A validator-like identity that stake is delegated to.
///
/// Providers are seeded at engine construction and never deleted, only deactivated. Reputation
/// and uptime are mutated exclusively through the clamping setters so the documented bounds hold
/// after any sequence of updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalityProvider {
    /// Unique provider id, e.g. `fp1`.
    pub id: ProviderId,

    /// Human-readable display name.
    pub name: String,

    /// The provider's public key, hex encoded.
    pub public_key: String,

    /// Commission rate on distributed rewards, in `[0, 1]`.
    pub commission_rate: f64,

    /// Performance reputation in `[REPUTATION_FLOOR, REPUTATION_CAP]`.
    reputation: f64,

    /// Simulated uptime in `[UPTIME_FLOOR, UPTIME_CAP]`.
    uptime: f64,

    /// Total amount currently delegated to this provider, in sats.
    pub total_delegated: Sats,

    /// Number of delegation positions pointing at this provider.
    pub delegator_count: u64,

    /// Derived voting power score, recomputed on delegation and epoch updates.
    pub voting_power: u64,

    /// Cumulative commission earned from reward distributions, in sats.
    pub commission_earned: Sats,

    /// Ordered history of slashing incidents against this provider.
    pub slashing_history: Vec<SlashingEvent>,

    /// Whether the provider currently accepts delegations.
    pub active: bool,

    /// The epoch the provider joined the network at.
    pub joined_epoch: u64,

    /// Maximum total delegation the provider accepts, in sats.
    pub delegation_cap: Sats,

    /// The provider's own stake, in sats.
    pub self_stake: Sats,
}

impl FinalityProvider {
    /// Creates an active provider with nominal starting performance.
    pub fn new(
        id: impl Into<ProviderId>,
        name: impl Into<String>,
        public_key: impl Into<String>,
        commission_rate: f64,
        delegation_cap: Sats,
        self_stake: Sats,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            public_key: public_key.into(),
            commission_rate,
            reputation: REPUTATION_CAP,
            uptime: UPTIME_CAP,
            total_delegated: 0,
            delegator_count: 0,
            voting_power: 0,
            commission_earned: 0,
            slashing_history: Vec::new(),
            active: true,
            joined_epoch: 0,
            delegation_cap,
            self_stake,
        }
    }

    /// Current reputation.
    pub fn reputation(&self) -> f64 {
        self.reputation
    }

    /// Current uptime.
    pub fn uptime(&self) -> f64 {
        self.uptime
    }

    /// Sets reputation, clamped to `[REPUTATION_FLOOR, REPUTATION_CAP]`.
    pub fn set_reputation(&mut self, value: f64) {
        self.reputation = value.clamp(REPUTATION_FLOOR, REPUTATION_CAP);
    }

    /// Sets uptime, clamped to `[UPTIME_FLOOR, UPTIME_CAP]`.
    pub fn set_uptime(&mut self, value: f64) {
        self.uptime = value.clamp(UPTIME_FLOOR, UPTIME_CAP);
    }

    /// Recomputes this provider's voting power from its current delegation and performance.
    pub fn recompute_voting_power(&mut self) {
        self.voting_power = voting_power(self.total_delegated, self.reputation, self.uptime);
    }
}

/// Derives a voting power score from a stake amount and provider performance.
///
/// The score is `floor((amount / 1 BTC) * (reputation / 100) * (uptime / 100) * 1000)`, so one
/// whole coin delegated to a perfect provider scores exactly 1000.
pub fn voting_power(amount: Sats, reputation: f64, uptime: f64) -> u64 {
    let coins = amount as f64 / SATS_PER_BTC as f64;
    (coins * (reputation / 100.0) * (uptime / 100.0) * VOTING_POWER_SCALE) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voting_power_formula_example() {
        // 1 BTC with reputation 95 and uptime 99 scores floor(1 * 0.95 * 0.99 * 1000) = 940.
        assert_eq!(voting_power(100_000_000, 95.0, 99.0), 940);
    }

    #[test]
    fn voting_power_is_zero_for_empty_stake() {
        assert_eq!(voting_power(0, 100.0, 100.0), 0);
    }

    #[test]
    fn reputation_and_uptime_are_clamped() {
        let mut fp = FinalityProvider::new("fp1", "One", "02aa", 0.05, u64::MAX, 0);

        fp.set_reputation(-50.0);
        assert_eq!(fp.reputation(), REPUTATION_FLOOR);

        fp.set_reputation(250.0);
        assert_eq!(fp.reputation(), REPUTATION_CAP);

        fp.set_uptime(0.0);
        assert_eq!(fp.uptime(), UPTIME_FLOOR);

        fp.set_uptime(101.0);
        assert_eq!(fp.uptime(), UPTIME_CAP);
    }
}
