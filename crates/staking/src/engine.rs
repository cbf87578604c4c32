//! Core state transitions of the staking ledger: delegation intake, reward distribution,
//! slashing and epoch updates, with network statistics recomputed from the live collections
//! after every mutation batch.

use std::collections::BTreeMap;

use stake_bridge_params::staking::StakingParams;
use stake_bridge_primitives::{
    events::NewDelegation,
    position::{PositionStatus, RewardInfo, SlashingInfo, StakingPosition},
    provider::{voting_power, FinalityProvider},
    slashing::{SlashingEvent, SlashingReason, SlashingSeverity},
    stats::NetworkStats,
    types::{DepositTxId, ProviderId, Sats},
};
use tracing::{debug, info, warn};

use crate::{drift::DriftSource, errors::StakingError};

/// Seconds in one (non-leap) year, used to convert elapsed time into a reward year fraction.
const SECS_PER_YEAR: f64 = 31_536_000.0;

/// Probability that a slashing check tick produces a simulated incident.
const SIMULATED_INCIDENT_PROBABILITY: f64 = 0.1;

/// Reputation gained per epoch while uptime stays above this bar.
const UPTIME_REWARD_BAR: f64 = 98.0;

/// Reputation lost per epoch while uptime sits below this bar.
const UPTIME_PENALTY_BAR: f64 = 95.0;

/// Result of one reward distribution round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardRound {
    /// Total rewards distributed this round, in sats.
    pub total: Sats,

    /// Number of positions that accrued rewards.
    pub positions: u64,
}

/// Result of one executed slashing incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashingOutcome {
    /// The slashed provider.
    pub provider_id: ProviderId,

    /// The judged severity.
    pub severity: SlashingSeverity,

    /// Total amount slashed across positions, in sats.
    pub total_slashed: Sats,

    /// Number of positions touched.
    pub affected: u64,
}

/// Exclusive owner of all finality-provider and staking-position state.
///
/// The engine is purely synchronous; every operation takes explicit timestamps so tests can
/// drive it deterministically. The timer wiring lives in [`crate::runner`].
pub struct StakingLedgerEngine {
    params: StakingParams,
    providers: BTreeMap<ProviderId, FinalityProvider>,
    positions: BTreeMap<DepositTxId, StakingPosition>,
    stats: NetworkStats,
    epoch: u64,
    drift: Box<dyn DriftSource>,
}

impl std::fmt::Debug for StakingLedgerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StakingLedgerEngine")
            .field("providers", &self.providers.len())
            .field("positions", &self.positions.len())
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl StakingLedgerEngine {
    /// Creates an engine with the fixed seed set of finality providers.
    pub fn new(params: StakingParams, drift: Box<dyn DriftSource>) -> Self {
        let providers = seed_providers()
            .into_iter()
            .map(|fp| (fp.id.clone(), fp))
            .collect();

        let mut engine = Self {
            params,
            providers,
            positions: BTreeMap::new(),
            stats: NetworkStats::default(),
            epoch: 0,
            drift,
        };
        engine.recompute_stats();
        engine
    }

    /// The current epoch counter.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The latest derived network statistics.
    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }

    /// A provider by id.
    pub fn provider(&self, id: &ProviderId) -> Option<&FinalityProvider> {
        self.providers.get(id)
    }

    /// All providers, keyed by id.
    pub fn providers(&self) -> &BTreeMap<ProviderId, FinalityProvider> {
        &self.providers
    }

    /// A position by its transaction id.
    pub fn position(&self, txid: &DepositTxId) -> Option<&StakingPosition> {
        self.positions.get(txid)
    }

    /// All positions, keyed by transaction id.
    pub fn positions(&self) -> &BTreeMap<DepositTxId, StakingPosition> {
        &self.positions
    }

    /// Creates a staking position for a minted deposit and credits its provider.
    pub fn create_delegation(&mut self, delegation: NewDelegation) -> Result<(), StakingError> {
        if delegation.unlock_time <= delegation.created_at {
            return Err(StakingError::InvalidUnlockTime(delegation.txid));
        }
        if self.positions.contains_key(&delegation.txid) {
            return Err(StakingError::DuplicatePosition(delegation.txid));
        }

        let provider = self
            .providers
            .get_mut(&delegation.provider_id)
            .ok_or_else(|| StakingError::UnknownProvider(delegation.provider_id.clone()))?;
        if !provider.active {
            return Err(StakingError::InactiveProvider(delegation.provider_id));
        }

        let position = StakingPosition {
            txid: delegation.txid.clone(),
            staker: delegation.staker,
            amount: delegation.amount,
            provider_id: delegation.provider_id,
            created_at: delegation.created_at,
            unlock_time: delegation.unlock_time,
            status: PositionStatus::Active,
            voting_power: voting_power(
                delegation.amount,
                provider.reputation(),
                provider.uptime(),
            ),
            rewards: RewardInfo {
                accumulated: 0,
                last_distribution: delegation.created_at,
                annual_rate: self.params.base_annual_rate,
            },
            slashing: SlashingInfo::default(),
        };

        provider.total_delegated += delegation.amount;
        provider.delegator_count += 1;
        provider.recompute_voting_power();

        info!(
            txid = %position.txid,
            provider = %position.provider_id,
            amount = position.amount,
            "delegation created"
        );
        self.positions.insert(delegation.txid, position);
        self.recompute_stats();

        Ok(())
    }

    /// Accrues rewards on every active position since its last distribution.
    ///
    /// Only the reward sub-record is touched; position amounts never change here. Providers
    /// earn their commission cut on every reward.
    pub fn distribute_rewards(&mut self, now: u64) -> RewardRound {
        let mut total: Sats = 0;
        let mut rewarded: u64 = 0;

        for position in self.positions.values_mut() {
            if !position.is_active() {
                continue;
            }
            let Some(provider) = self.providers.get_mut(&position.provider_id) else {
                continue;
            };

            let elapsed = now.saturating_sub(position.rewards.last_distribution);
            let year_fraction = elapsed as f64 / SECS_PER_YEAR;
            let base = position.amount as f64 * position.rewards.annual_rate * year_fraction;
            let performance =
                (provider.reputation() / 100.0) * (provider.uptime() / 100.0).max(0.8);
            let reward = (base * performance) as Sats;

            position.rewards.accumulated += reward;
            position.rewards.last_distribution = now;
            provider.commission_earned += (reward as f64 * provider.commission_rate) as Sats;

            total += reward;
            rewarded += 1;
        }

        self.stats.total_rewards_distributed += total;
        self.recompute_stats();

        debug!(total, positions = rewarded, "distributed rewards");
        RewardRound {
            total,
            positions: rewarded,
        }
    }

    /// Executes a slashing incident against one provider.
    ///
    /// Severity is drawn from the drift source: a draw above the configured threshold makes the
    /// incident major, otherwise it is minor and slashed at half rate. Every active position
    /// delegated to the provider loses `floor(amount * rate)`, so amounts never go negative.
    pub fn execute_slashing(
        &mut self,
        provider_id: &ProviderId,
        reason: SlashingReason,
        now: u64,
    ) -> Result<SlashingOutcome, StakingError> {
        let provider = self
            .providers
            .get(provider_id)
            .ok_or_else(|| StakingError::UnknownProvider(provider_id.clone()))?;
        if !provider.active {
            return Err(StakingError::InactiveProvider(provider_id.clone()));
        }

        let draw = self.drift.unit();
        let (rate, major) = self.params.slashing_rate_for_draw(draw);
        let severity = if major {
            SlashingSeverity::Major
        } else {
            SlashingSeverity::Minor
        };

        let mut total_slashed: Sats = 0;
        let mut affected: Vec<DepositTxId> = Vec::new();
        for position in self.positions.values_mut() {
            if !position.is_active() || &position.provider_id != provider_id {
                continue;
            }
            let penalty = (position.amount as f64 * rate) as Sats;
            position.amount -= penalty;
            position.slashing.total_penalty += penalty;
            total_slashed += penalty;
            affected.push(position.txid.clone());
        }

        let event = SlashingEvent {
            amount: total_slashed,
            reason,
            severity,
            timestamp: now,
            affected_delegators: affected.len() as u64,
        };
        for txid in &affected {
            if let Some(position) = self.positions.get_mut(txid) {
                position.slashing.events.push(event.clone());
            }
        }

        let penalty_points = self.params.reputation_slash_penalty;
        let provider = self
            .providers
            .get_mut(provider_id)
            .expect("provider existence was checked above");
        provider.total_delegated = provider.total_delegated.saturating_sub(total_slashed);
        provider.set_reputation(provider.reputation() - penalty_points);
        provider.recompute_voting_power();
        provider.slashing_history.push(event);

        self.stats.total_slashed += total_slashed;
        self.recompute_stats();

        warn!(
            provider = %provider_id,
            %severity,
            %reason,
            total_slashed,
            affected = affected.len(),
            "executed slashing"
        );

        Ok(SlashingOutcome {
            provider_id: provider_id.clone(),
            severity,
            total_slashed,
            affected: affected.len() as u64,
        })
    }

    /// Decides whether this slashing-check tick produces a simulated incident, and against whom.
    pub fn simulate_incident(&mut self) -> Option<(ProviderId, SlashingReason)> {
        if self.drift.unit() >= SIMULATED_INCIDENT_PROBABILITY {
            return None;
        }

        let active: Vec<&ProviderId> = self
            .providers
            .values()
            .filter(|fp| fp.active)
            .map(|fp| &fp.id)
            .collect();
        if active.is_empty() {
            return None;
        }

        let provider_id = active[(self.drift.unit() * active.len() as f64) as usize % active.len()]
            .clone();
        let reason = match (self.drift.unit() * 3.0) as u32 {
            0 => SlashingReason::Downtime,
            1 => SlashingReason::DoubleSigning,
            _ => SlashingReason::InvalidVote,
        };

        Some((provider_id, reason))
    }

    /// Advances the epoch counter and drifts every provider's performance.
    ///
    /// Uptime moves by at most one point per epoch and stays clamped; sustained high uptime
    /// slowly repairs reputation while poor uptime erodes it.
    pub fn advance_epoch(&mut self) -> u64 {
        self.epoch += 1;

        for provider in self.providers.values_mut() {
            let drift = self.drift.unit() * 2.0 - 1.0;
            provider.set_uptime(provider.uptime() + drift);

            if provider.uptime() > UPTIME_REWARD_BAR {
                provider.set_reputation(provider.reputation() + 0.1);
            } else if provider.uptime() < UPTIME_PENALTY_BAR {
                provider.set_reputation(provider.reputation() - 0.5);
            }

            provider.recompute_voting_power();
        }

        self.recompute_stats();
        info!(epoch = self.epoch, "epoch updated");
        self.epoch
    }

    /// Rebuilds the derived statistics from the live collections.
    ///
    /// The cumulative reward and slash counters are carried over; everything else is derived
    /// from scratch so the stats are consistent after any sequence of mutations.
    fn recompute_stats(&mut self) {
        let active_positions: Vec<&StakingPosition> =
            self.positions.values().filter(|p| p.is_active()).collect();
        let active_providers: Vec<&FinalityProvider> =
            self.providers.values().filter(|fp| fp.active).collect();

        self.stats.total_staked = active_positions.iter().map(|p| p.amount).sum();
        self.stats.total_delegators = active_positions.len() as u64;
        self.stats.active_providers = active_providers.len() as u64;
        self.stats.average_commission = mean(active_providers.iter().map(|fp| fp.commission_rate));
        self.stats.network_uptime = mean(active_providers.iter().map(|fp| fp.uptime()));
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u64), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// The fixed provider set registered at engine initialization.
fn seed_providers() -> Vec<FinalityProvider> {
    vec![
        FinalityProvider::new(
            "fp1",
            "Aurora Staking",
            "02a1633cafcc01ebfb6d78e39f687a1f0995c62fc95f51ead10a02ee0be551b5dc",
            0.05,
            500 * 100_000_000,
            10 * 100_000_000,
        ),
        FinalityProvider::new(
            "fp2",
            "Borealis Validation",
            "03b2744dbdd102fcfc7e89f4a0b8602b1aa6d73fd06f62fbe21b13ff1c662c66ed",
            0.03,
            300 * 100_000_000,
            5 * 100_000_000,
        ),
        FinalityProvider::new(
            "fp3",
            "Cinder Finality",
            "02c3855ecee203fdfd8f9aa5b1c9713c2bb7e84fe17f73fcf32c24aa2d773d77fe",
            0.07,
            1_000 * 100_000_000,
            20 * 100_000_000,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use stake_bridge_primitives::{provider::REPUTATION_FLOOR, types::EvmAddress};

    use super::*;

    /// Replays a fixed sequence of draws, then repeats the last one forever.
    #[derive(Debug)]
    struct ScriptedDrift(Vec<f64>, usize);

    impl ScriptedDrift {
        fn new(draws: impl Into<Vec<f64>>) -> Box<Self> {
            Box::new(Self(draws.into(), 0))
        }
    }

    impl DriftSource for ScriptedDrift {
        fn unit(&mut self) -> f64 {
            let draw = self.0[self.1.min(self.0.len() - 1)];
            self.1 += 1;
            draw
        }
    }

    fn engine_with_draws(draws: impl Into<Vec<f64>>) -> StakingLedgerEngine {
        StakingLedgerEngine::new(StakingParams::default(), ScriptedDrift::new(draws))
    }

    fn delegation(txid: &str, amount: Sats, provider: &str) -> NewDelegation {
        NewDelegation {
            txid: DepositTxId::new(txid),
            staker: EvmAddress::new(format!("0x{}", "11".repeat(20))),
            amount,
            provider_id: provider.to_string(),
            unlock_time: 1_700_086_400,
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn delegation_credits_provider_and_derives_voting_power() {
        let mut engine = engine_with_draws([0.5]);

        engine
            .create_delegation(delegation("test-d1", 100_000_000, "fp1"))
            .unwrap();

        let fp1 = engine.provider(&"fp1".to_string()).unwrap();
        assert_eq!(fp1.total_delegated, 100_000_000);
        assert_eq!(fp1.delegator_count, 1);
        // Fresh provider: reputation 100, uptime 100 -> 1 BTC scores the full 1000.
        assert_eq!(fp1.voting_power, 1_000);

        let position = engine.position(&DepositTxId::new("test-d1")).unwrap();
        assert_eq!(position.voting_power, 1_000);
        assert_eq!(engine.stats().total_staked, 100_000_000);
        assert_eq!(engine.stats().total_delegators, 1);
    }

    #[test]
    fn duplicate_and_invalid_delegations_are_rejected() {
        let mut engine = engine_with_draws([0.5]);

        engine
            .create_delegation(delegation("test-d1", 1_000, "fp1"))
            .unwrap();
        assert!(matches!(
            engine.create_delegation(delegation("test-d1", 1_000, "fp1")),
            Err(StakingError::DuplicatePosition(_))
        ));
        assert!(matches!(
            engine.create_delegation(delegation("test-d2", 1_000, "fp9")),
            Err(StakingError::UnknownProvider(_))
        ));

        let mut backwards = delegation("test-d3", 1_000, "fp1");
        backwards.unlock_time = backwards.created_at;
        assert!(matches!(
            engine.create_delegation(backwards),
            Err(StakingError::InvalidUnlockTime(_))
        ));
    }

    #[test]
    fn rewards_accrue_without_touching_amounts() {
        let mut engine = engine_with_draws([0.5]);
        engine
            .create_delegation(delegation("test-d1", 100_000_000, "fp1"))
            .unwrap();

        // One year at 5% on a perfect provider: 5_000_000 sats.
        let round = engine.distribute_rewards(1_700_000_000 + 31_536_000);
        assert_eq!(round.positions, 1);
        assert_eq!(round.total, 5_000_000);

        let position = engine.position(&DepositTxId::new("test-d1")).unwrap();
        assert_eq!(position.amount, 100_000_000);
        assert_eq!(position.rewards.accumulated, 5_000_000);

        let fp1 = engine.provider(&"fp1".to_string()).unwrap();
        assert_eq!(fp1.commission_earned, 250_000);
    }

    #[test]
    fn rewards_distributed_is_monotone() {
        let mut engine = engine_with_draws([0.5]);
        engine
            .create_delegation(delegation("test-d1", 100_000_000, "fp1"))
            .unwrap();

        let mut last = 0;
        for i in 1..=5 {
            engine.distribute_rewards(1_700_000_000 + i * 3_600);
            let cumulative = engine.stats().total_rewards_distributed;
            assert!(cumulative >= last);
            last = cumulative;
        }
    }

    #[test]
    fn minor_slash_takes_half_rate_and_ten_reputation_points() {
        // First draw (severity) is 0.5: below the 0.7 threshold, so minor at 2.5%.
        let mut engine = engine_with_draws([0.5]);
        engine
            .create_delegation(delegation("test-d1", 100_000_000, "fp1"))
            .unwrap();

        let outcome = engine
            .execute_slashing(&"fp1".to_string(), SlashingReason::Downtime, 1_700_000_600)
            .unwrap();
        assert_eq!(outcome.severity, SlashingSeverity::Minor);
        assert_eq!(outcome.total_slashed, 2_500_000);
        assert_eq!(outcome.affected, 1);

        let position = engine.position(&DepositTxId::new("test-d1")).unwrap();
        assert_eq!(position.amount, 97_500_000);
        assert_eq!(position.slashing.total_penalty, 2_500_000);
        assert_eq!(position.slashing.events.len(), 1);

        let fp1 = engine.provider(&"fp1".to_string()).unwrap();
        assert_eq!(fp1.reputation(), 90.0);
        assert_eq!(fp1.total_delegated, 97_500_000);
        assert_eq!(fp1.slashing_history.len(), 1);
        assert_eq!(engine.stats().total_slashed, 2_500_000);
    }

    #[test]
    fn repeated_slashing_never_drives_amounts_negative() {
        // Every draw is 0.9: major severity at the full base rate.
        let mut engine = engine_with_draws([0.9]);
        engine
            .create_delegation(delegation("test-d1", 1_000, "fp1"))
            .unwrap();

        for i in 0..200 {
            engine
                .execute_slashing(
                    &"fp1".to_string(),
                    SlashingReason::DoubleSigning,
                    1_700_000_600 + i,
                )
                .unwrap();
        }

        let position = engine.position(&DepositTxId::new("test-d1")).unwrap();
        // floor(amount * rate) hits zero before the amount itself can.
        assert!(position.amount <= 1_000);

        let fp1 = engine.provider(&"fp1".to_string()).unwrap();
        assert_eq!(fp1.reputation(), REPUTATION_FLOOR);
    }

    #[test]
    fn epoch_updates_keep_provider_bounds() {
        // Alternate extreme drifts; bounds must hold regardless.
        let mut engine = engine_with_draws([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);

        for _ in 0..50 {
            engine.advance_epoch();
        }
        assert_eq!(engine.epoch(), 50);

        for provider in engine.providers().values() {
            let reputation = provider.reputation();
            let uptime = provider.uptime();
            assert!((10.0..=100.0).contains(&reputation));
            assert!((90.0..=100.0).contains(&uptime));
        }
    }

    #[test]
    fn simulate_incident_honors_the_probability_gate() {
        // Draw 0.95 is above the incident probability: no incident.
        let mut quiet = engine_with_draws([0.95]);
        assert!(quiet.simulate_incident().is_none());

        // Draw 0.05 triggers; the next draws pick provider and reason.
        let mut noisy = engine_with_draws([0.05, 0.0, 0.0]);
        let (provider_id, reason) = noisy.simulate_incident().unwrap();
        assert_eq!(provider_id, "fp1");
        assert_eq!(reason, SlashingReason::Downtime);
    }

    #[test]
    fn stats_are_recomputed_from_scratch() {
        let mut engine = engine_with_draws([0.5]);
        engine
            .create_delegation(delegation("test-d1", 50_000_000, "fp1"))
            .unwrap();
        engine
            .create_delegation(delegation("test-d2", 30_000_000, "fp2"))
            .unwrap();

        let stats = engine.stats();
        assert_eq!(stats.total_staked, 80_000_000);
        assert_eq!(stats.total_delegators, 2);
        assert_eq!(stats.active_providers, 3);
        assert!((stats.average_commission - 0.05).abs() < 1e-9);
        assert!((stats.network_uptime - 100.0).abs() < 1e-9);
    }
}
