//! The stake-bridge node: watches a source-chain address for staking deposits, relays them onto
//! the destination staking ledger and runs the staking simulation over the resulting positions.

use std::{fs, path::Path, sync::Arc};

use anyhow::Context;
use clap::Parser;
use config::Config;
use constants::{
    CANDIDATE_QUEUE_SIZE, DEFAULT_THREAD_COUNT, DEFAULT_THREAD_STACK_SIZE, DELEGATION_QUEUE_SIZE,
    EVENT_BUS_SIZE,
};
use params::Params;
use serde::de::DeserializeOwned;
use stake_bridge_ledger::memory::InMemoryLedger;
use stake_bridge_primitives::events::BridgeEvent;
use stake_bridge_relay::{controller::DepositRelayController, oracle::StaticOracle};
use stake_bridge_scanner::{explorer::HttpExplorerClient, scanner::SourceScanner};
use stake_bridge_staking::{drift::SeededDrift, engine::StakingLedgerEngine, runner::StakingRunner};
use tokio::{runtime, sync::{broadcast, mpsc}};
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::EnvFilter;

mod args;
mod config;
mod constants;
mod params;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = args::Cli::parse();
    info!("starting stake-bridge node");

    let params = parse_toml::<Params>(cli.params);
    let config = parse_toml::<Config>(cli.config);

    let runtime = runtime::Builder::new_multi_thread()
        .worker_threads(config.num_threads.unwrap_or(DEFAULT_THREAD_COUNT).into())
        .thread_stack_size(
            config
                .thread_stack_size
                .unwrap_or(DEFAULT_THREAD_STACK_SIZE),
        )
        .enable_all()
        .build()
        .expect("must be able to create runtime");

    if let Err(e) = runtime.block_on(bootstrap(params, config)) {
        panic!("stake-bridge node crashed: {e:?}");
    }

    info!("stake-bridge node shutdown complete");
}

/// Wires up the pipeline and runs until interrupted.
///
/// Data flows one way: the scanner feeds candidates to the relay controller, the controller
/// feeds minted delegations to the staking engine, and everyone reports onto the broadcast
/// event bus.
async fn bootstrap(params: Params, config: Config) -> anyhow::Result<()> {
    let (candidate_tx, candidate_rx) = mpsc::channel(CANDIDATE_QUEUE_SIZE);
    let (delegation_tx, delegation_rx) = mpsc::channel(DELEGATION_QUEUE_SIZE);
    let (event_tx, event_rx) = broadcast::channel(EVENT_BUS_SIZE);

    // The staking engine comes up first so the ledger can authorize exactly its providers.
    let engine = StakingLedgerEngine::new(params.staking, Box::new(SeededDrift::from_entropy()));
    let provider_ids: Vec<_> = engine.providers().keys().cloned().collect();
    info!(providers = ?provider_ids, "seeded finality providers");

    let ledger = Arc::new(InMemoryLedger::new(
        config.relay_address.clone(),
        provider_ids,
    ));

    let scanner = SourceScanner::new(
        params.scanner.clone(),
        HttpExplorerClient::new(config.explorer.base_url.clone()),
        candidate_tx,
        event_tx.clone(),
    );
    let scanner_task = tokio::task::spawn(scanner.run());

    let controller = DepositRelayController::new(
        params.relay,
        ledger,
        Arc::new(StaticOracle::default()),
        delegation_tx,
        event_tx.clone(),
    );
    let relay_task = tokio::task::spawn(controller.run(candidate_rx));

    let staking = StakingRunner::spawn(params.staking, engine, delegation_rx, event_tx);

    let event_task = tokio::task::spawn(log_events(event_rx));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for interrupt")?;
    info!("interrupt received, shutting down");

    scanner_task.abort();
    relay_task.abort();
    event_task.abort();
    drop(staking);

    Ok(())
}

/// Logs every lifecycle event from the bus.
async fn log_events(mut events: broadcast::Receiver<BridgeEvent>) {
    loop {
        match events.recv().await {
            Ok(BridgeEvent::DepositDetected { txid, amount }) => {
                info!(%txid, amount, "deposit detected");
            }
            Ok(BridgeEvent::DepositRegistered { txid, amount }) => {
                info!(%txid, amount, "deposit registered");
            }
            Ok(BridgeEvent::DepositMinted { txid, amount, minted }) => {
                info!(%txid, amount, minted, "deposit minted");
            }
            Ok(BridgeEvent::DepositFailed { txid, amount, attempts, reason }) => {
                error!(%txid, amount, attempts, %reason, "deposit failed");
            }
            Ok(BridgeEvent::DelegationCreated { txid, provider_id, amount }) => {
                info!(%txid, %provider_id, amount, "delegation created");
            }
            Ok(BridgeEvent::RewardsDistributed { total, positions }) => {
                info!(total, positions, "rewards distributed");
            }
            Ok(BridgeEvent::SlashingExecuted { provider_id, severity, total_slashed, affected }) => {
                warn!(%provider_id, ?severity, total_slashed, affected, "slashing executed");
            }
            Ok(BridgeEvent::EpochUpdated { epoch }) => {
                info!(epoch, "epoch updated");
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "event logger lagged behind the bus");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("event bus closed, stopping logger");
                return;
            }
        }
    }
}

/// Reads and parses a TOML file from the given path into the given type `T`.
///
/// # Panics
///
/// 1. If the file is not readable.
/// 2. If the contents of the file cannot be deserialized into the given type `T`.
fn parse_toml<T>(path: impl AsRef<Path>) -> T
where
    T: std::fmt::Debug + DeserializeOwned,
{
    fs::read_to_string(path)
        .map(|p| {
            trace!(?p, "read file");

            let parsed = toml::from_str::<T>(&p).unwrap_or_else(|e| {
                panic!("failed to parse TOML file: {e:?}");
            });
            debug!(?parsed, "parsed TOML file");

            parsed
        })
        .unwrap_or_else(|_| {
            panic!("failed to read TOML file");
        })
}
