//! Timer wiring for the staking ledger engine.
//!
//! The engine itself is synchronous; this module owns it behind a lock and advances it from a
//! single task: delegation intake plus the reward, slashing and epoch timers, all multiplexed
//! through one `select!` loop so mutations never interleave mid-operation.

use std::sync::Arc;

use parking_lot::RwLock;
use stake_bridge_params::staking::StakingParams;
use stake_bridge_primitives::{
    events::{BridgeEvent, NewDelegation},
    types::now_secs,
};
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::{info, warn};

use crate::engine::StakingLedgerEngine;

/// Owns the engine and the task advancing it.
///
/// Dropping the runner aborts the task; there is no state to persist.
#[derive(Debug)]
pub struct StakingRunner {
    engine: Arc<RwLock<StakingLedgerEngine>>,
    handle: JoinHandle<()>,
}

impl StakingRunner {
    /// Spawns the engine task, wired to the delegation queue and the event bus.
    pub fn spawn(
        params: StakingParams,
        engine: StakingLedgerEngine,
        mut delegations: mpsc::Receiver<NewDelegation>,
        events: broadcast::Sender<BridgeEvent>,
    ) -> Self {
        let engine = Arc::new(RwLock::new(engine));
        let task_engine = engine.clone();

        let handle = tokio::task::spawn(async move {
            let start = Instant::now();
            let mut rewards = interval_at(start + params.reward_interval(), params.reward_interval());
            let mut slashing =
                interval_at(start + params.slashing_interval(), params.slashing_interval());
            let mut epochs = interval_at(start + params.epoch_duration(), params.epoch_duration());

            loop {
                tokio::select! {
                    maybe_delegation = delegations.recv() => {
                        let Some(delegation) = maybe_delegation else {
                            info!("delegation queue closed, stopping staking engine");
                            return;
                        };

                        let txid = delegation.txid.clone();
                        let provider_id = delegation.provider_id.clone();
                        let amount = delegation.amount;
                        match task_engine.write().create_delegation(delegation) {
                            Ok(()) => {
                                let _ = events.send(BridgeEvent::DelegationCreated {
                                    txid,
                                    provider_id,
                                    amount,
                                });
                            }
                            Err(e) => warn!(%txid, err = %e, "could not create delegation"),
                        }
                    }

                    _ = rewards.tick() => {
                        let round = task_engine.write().distribute_rewards(now_secs());
                        let _ = events.send(BridgeEvent::RewardsDistributed {
                            total: round.total,
                            positions: round.positions,
                        });
                    }

                    _ = slashing.tick() => {
                        let mut engine = task_engine.write();
                        let Some((provider_id, reason)) = engine.simulate_incident() else {
                            continue;
                        };
                        match engine.execute_slashing(&provider_id, reason, now_secs()) {
                            Ok(outcome) => {
                                let _ = events.send(BridgeEvent::SlashingExecuted {
                                    provider_id: outcome.provider_id,
                                    severity: outcome.severity,
                                    total_slashed: outcome.total_slashed,
                                    affected: outcome.affected,
                                });
                            }
                            Err(e) => warn!(%provider_id, err = %e, "slashing check failed"),
                        }
                    }

                    _ = epochs.tick() => {
                        let epoch = task_engine.write().advance_epoch();
                        let _ = events.send(BridgeEvent::EpochUpdated { epoch });
                    }
                }
            }
        });

        Self { engine, handle }
    }

    /// Shared read access to the engine, for status queries.
    pub fn engine(&self) -> Arc<RwLock<StakingLedgerEngine>> {
        self.engine.clone()
    }
}

impl Drop for StakingRunner {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use stake_bridge_primitives::types::{DepositTxId, EvmAddress};

    use super::*;
    use crate::drift::SeededDrift;

    #[tokio::test]
    async fn delegations_flow_into_the_engine() {
        let params = StakingParams::default();
        let engine = StakingLedgerEngine::new(params, Box::new(SeededDrift::from_seed(1)));
        let (delegation_tx, delegation_rx) = mpsc::channel(4);
        let (event_tx, mut event_rx) = broadcast::channel(4);

        let runner = StakingRunner::spawn(params, engine, delegation_rx, event_tx);

        delegation_tx
            .send(NewDelegation {
                txid: DepositTxId::new("test-run"),
                staker: EvmAddress::new(format!("0x{}", "11".repeat(20))),
                amount: 100_000_000,
                provider_id: "fp1".to_string(),
                unlock_time: now_secs() + 86_400,
                created_at: now_secs(),
            })
            .await
            .unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), event_rx.recv())
            .await
            .expect("delegation event must arrive")
            .unwrap();
        assert!(matches!(event, BridgeEvent::DelegationCreated { .. }));

        let engine = runner.engine();
        let engine = engine.read();
        assert_eq!(engine.positions().len(), 1);
        assert_eq!(
            engine.provider(&"fp1".to_string()).unwrap().total_delegated,
            100_000_000
        );
    }

    #[tokio::test]
    async fn reward_rounds_are_reported_even_when_empty() {
        let params = StakingParams {
            reward_interval_secs: 1,
            ..Default::default()
        };
        let engine = StakingLedgerEngine::new(params, Box::new(SeededDrift::from_seed(2)));
        let (_delegation_tx, delegation_rx) = mpsc::channel(4);
        let (event_tx, mut event_rx) = broadcast::channel(4);

        let _runner = StakingRunner::spawn(params, engine, delegation_rx, event_tx);

        let event = tokio::time::timeout(Duration::from_secs(5), event_rx.recv())
            .await
            .expect("reward event must arrive")
            .unwrap();
        assert!(matches!(
            event,
            BridgeEvent::RewardsDistributed {
                total: 0,
                positions: 0
            }
        ));
    }
}
