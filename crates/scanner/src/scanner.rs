//! The scanner proper: deduplicates outputs, classifies staking candidates and feeds the relay.

use std::collections::HashSet;

use stake_bridge_params::scanner::ScannerParams;
use stake_bridge_primitives::{
    deposit::DepositCandidate,
    events::BridgeEvent,
    types::{now_secs, DepositTxId, OutputRef},
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use crate::{
    errors::ScanError,
    explorer::{UtxoEntry, UtxoSource},
};

/// Watches one source-chain address and emits a [`DepositCandidate`] for every new staking
/// output found there.
///
/// An output is marked seen *before* its candidate is emitted, so a candidate that later fails
/// in the relay pipeline is not re-detected on the next poll. Recovering such a deposit requires
/// operator action; the relay logs enough to do so.
#[derive(Debug)]
pub struct SourceScanner<S> {
    params: ScannerParams,
    source: S,
    seen: HashSet<OutputRef>,
    candidates: mpsc::Sender<DepositCandidate>,
    events: broadcast::Sender<BridgeEvent>,
}

impl<S: UtxoSource> SourceScanner<S> {
    /// Creates a scanner feeding the given candidate queue and event bus.
    pub fn new(
        params: ScannerParams,
        source: S,
        candidates: mpsc::Sender<DepositCandidate>,
        events: broadcast::Sender<BridgeEvent>,
    ) -> Self {
        Self {
            params,
            source,
            seen: HashSet::new(),
            candidates,
            events,
        }
    }

    /// Runs one scan of the watched address and forwards every fresh candidate to the relay.
    ///
    /// Nothing is mutated until the explorer query has succeeded, so a failed scan leaves the
    /// seen-output set untouched and the next tick retries cleanly.
    pub async fn scan(&mut self) -> Result<usize, ScanError> {
        let utxos = self.source.get_utxos(&self.params.watched_address).await?;
        debug!(
            address = %self.params.watched_address,
            count = utxos.len(),
            "fetched unspent outputs"
        );

        let mut emitted = 0;
        for utxo in utxos {
            let Some(candidate) = self.classify(&utxo) else {
                continue;
            };

            // Mark before emitting so the output is never double-fed into the pipeline.
            self.seen.insert(OutputRef {
                txid: candidate.txid.clone(),
                vout: candidate.vout,
            });

            info!(txid = %candidate.txid, amount = candidate.amount, "detected staking deposit");
            let _ = self.events.send(BridgeEvent::DepositDetected {
                txid: candidate.txid.clone(),
                amount: candidate.amount,
            });

            self.candidates
                .send(candidate)
                .await
                .map_err(|_| ScanError::QueueClosed)?;
            emitted += 1;
        }

        Ok(emitted)
    }

    /// Decides whether an output is a fresh staking candidate and builds its record.
    fn classify(&self, utxo: &UtxoEntry) -> Option<DepositCandidate> {
        if utxo.confirmations < self.params.min_confirmations {
            return None;
        }

        // Staking outputs are segwit script-hash outputs; everything else at the watched
        // address is change or dust.
        if !utxo.script_pubkey.is_p2wsh() {
            return None;
        }

        let txid = DepositTxId::new(utxo.txid.to_string());
        let key = OutputRef {
            txid: txid.clone(),
            vout: utxo.vout,
        };
        if self.seen.contains(&key) {
            return None;
        }

        Some(DepositCandidate {
            txid,
            vout: utxo.vout,
            amount: utxo.amount.to_sat(),
            unlock_time: now_secs() + self.params.lock_duration_secs,
            provider_id: self.params.provider_id.clone(),
            recipient: self.params.recipient.clone(),
            block_height: utxo.block_height,
            confirmations: utxo.confirmations,
        })
    }

    /// Polls the watched address forever, logging and skipping failed scans.
    ///
    /// Returns once the candidate queue is closed, which is the shutdown signal.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.params.scan_interval());
        loop {
            ticker.tick().await;
            match self.scan().await {
                Ok(0) => {}
                Ok(emitted) => info!(emitted, "scan emitted new deposit candidates"),
                Err(ScanError::QueueClosed) => {
                    info!("candidate queue closed, stopping scanner");
                    return;
                }
                Err(e) => warn!(err = %e, "scan failed, retrying on next tick"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use bitcoin::{Amount, ScriptBuf, Txid};
    use stake_bridge_primitives::types::EvmAddress;

    use super::*;

    /// Serves a fixed set of outputs on every query.
    #[derive(Debug)]
    struct FixedSource(Vec<UtxoEntry>);

    #[async_trait]
    impl UtxoSource for FixedSource {
        async fn get_utxos(&self, _address: &str) -> Result<Vec<UtxoEntry>, ScanError> {
            Ok(self.0.clone())
        }
    }

    fn p2wsh_utxo(vout: u32, sats: u64) -> UtxoEntry {
        UtxoEntry {
            txid: "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
                .parse::<Txid>()
                .unwrap(),
            vout,
            amount: Amount::from_sat(sats),
            script_pubkey: ScriptBuf::from_hex(
                "0020000102030405060708090a0b0c0d0e0f000102030405060708090a0b0c0d0e0f",
            )
            .unwrap(),
            block_height: 840_000,
            confirmations: 6,
        }
    }

    fn scanner(
        source: FixedSource,
    ) -> (
        SourceScanner<FixedSource>,
        mpsc::Receiver<DepositCandidate>,
    ) {
        let (candidate_tx, candidate_rx) = mpsc::channel(16);
        let (event_tx, _) = broadcast::channel(16);
        let params = ScannerParams::new(
            "bc1qwatched",
            EvmAddress::new(format!("0x{}", "11".repeat(20))),
            "fp1",
        );
        (
            SourceScanner::new(params, source, candidate_tx, event_tx),
            candidate_rx,
        )
    }

    #[tokio::test]
    async fn scan_emits_each_output_once() {
        let (mut scanner, mut rx) = scanner(FixedSource(vec![p2wsh_utxo(0, 250_000_000)]));

        assert_eq!(scanner.scan().await.unwrap(), 1);
        let candidate = rx.recv().await.unwrap();
        assert_eq!(candidate.amount, 250_000_000);
        assert_eq!(candidate.provider_id, "fp1");
        assert!(candidate.unlock_time > now_secs());
        assert!(candidate.txid.is_wellformed());

        // The same outputs come back on the next poll but are already marked seen.
        assert_eq!(scanner.scan().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn scan_skips_non_staking_and_unconfirmed_outputs() {
        let mut plain = p2wsh_utxo(1, 50_000);
        plain.script_pubkey = ScriptBuf::from_hex("76a914000000000000000000000000000000000000000088ac").unwrap();

        let mut unconfirmed = p2wsh_utxo(2, 75_000);
        unconfirmed.confirmations = 0;

        let (mut scanner, _rx) = scanner(FixedSource(vec![plain, unconfirmed]));
        assert_eq!(scanner.scan().await.unwrap(), 0);
    }
}
