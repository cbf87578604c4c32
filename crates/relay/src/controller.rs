//! The per-deposit relay pipeline and the controller task driving it.
//!
//! Every candidate walks `Detected → OracleValidated → Authorized → Registered → Minted`, or
//! branches into `Rejected` (ineligible, no retry) or `Failed` (chain trouble, retries
//! exhausted) at one of the gates. A transaction id enters the pipeline at most once.

use std::{collections::HashMap, sync::Arc};

use stake_bridge_ledger::{
    boundary::DestinationLedger,
    receipt::{LedgerReceipt, LedgerTxHash},
};
use stake_bridge_params::relay::RelayParams;
use stake_bridge_primitives::{
    constants::{MAX_DEPOSIT_SATS, SATS_TO_WEI_MULTIPLIER},
    deposit::{Deposit, DepositCandidate},
    events::{BridgeEvent, NewDelegation},
    types::{now_secs, DepositTxId},
};
use tokio::{
    sync::{broadcast, mpsc},
    time::Instant,
};
use tracing::{debug, error, info, warn};

use crate::{errors::RelayError, oracle::OracleValidator};

/// Pipeline state of one deposit, keyed by its source-chain transaction id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositState {
    /// The candidate has entered the pipeline.
    Detected,

    /// The oracle accepted the deposit with sufficient confidence.
    OracleValidated,

    /// The chosen finality provider is authorized on the destination ledger.
    Authorized,

    /// The deposit is registered on the destination ledger.
    Registered,

    /// The equivalent value has been minted. Terminal success.
    Minted,

    /// The deposit is ineligible and was dropped without retries. Terminal.
    Rejected {
        /// Why the deposit was rejected.
        reason: String,
    },

    /// Chain calls kept failing until the retry budget ran out. Terminal.
    Failed {
        /// How many register+mint attempts were made.
        attempts: u32,

        /// The last error observed.
        reason: String,
    },
}

impl DepositState {
    /// Whether the pipeline is done with this deposit.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DepositState::Minted | DepositState::Rejected { .. } | DepositState::Failed { .. }
        )
    }
}

/// Drives detected deposits through validation, registration and minting.
///
/// Owns the relay-side [`Deposit`] mirror and the idempotency set; the staking engine's
/// collections are only reached through the [`NewDelegation`] queue.
pub struct DepositRelayController {
    params: RelayParams,
    ledger: Arc<dyn DestinationLedger>,
    oracle: Arc<dyn OracleValidator>,
    deposits: HashMap<DepositTxId, Deposit>,
    states: HashMap<DepositTxId, DepositState>,
    delegations: mpsc::Sender<NewDelegation>,
    events: broadcast::Sender<BridgeEvent>,
}

impl std::fmt::Debug for DepositRelayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepositRelayController")
            .field("params", &self.params)
            .field("deposits", &self.deposits.len())
            .field("states", &self.states.len())
            .finish_non_exhaustive()
    }
}

impl DepositRelayController {
    /// Creates a controller against the given ledger and oracle.
    pub fn new(
        params: RelayParams,
        ledger: Arc<dyn DestinationLedger>,
        oracle: Arc<dyn OracleValidator>,
        delegations: mpsc::Sender<NewDelegation>,
        events: broadcast::Sender<BridgeEvent>,
    ) -> Self {
        Self {
            params,
            ledger,
            oracle,
            deposits: HashMap::new(),
            states: HashMap::new(),
            delegations,
            events,
        }
    }

    /// The pipeline state of a deposit, if it has entered the pipeline.
    pub fn state_of(&self, txid: &DepositTxId) -> Option<&DepositState> {
        self.states.get(txid)
    }

    /// The relay-side mirror of a registered deposit.
    pub fn deposit(&self, txid: &DepositTxId) -> Option<&Deposit> {
        self.deposits.get(txid)
    }

    /// Runs one candidate through the full pipeline and returns its terminal state.
    ///
    /// A transaction id that has already been dispatched is not reprocessed; its recorded state
    /// is returned as-is.
    pub async fn process(&mut self, candidate: DepositCandidate) -> DepositState {
        let txid = candidate.txid.clone();

        if let Some(state) = self.states.get(&txid) {
            debug!(%txid, ?state, "skipping already dispatched deposit");
            return state.clone();
        }
        self.states.insert(txid.clone(), DepositState::Detected);

        let state = self.drive(&candidate).await;
        self.states.insert(txid, state.clone());
        state
    }

    async fn drive(&mut self, candidate: &DepositCandidate) -> DepositState {
        let txid = &candidate.txid;

        // Gate 1: local validation. No chain call is made for a malformed candidate.
        if let Err(e) = validate_candidate(candidate, now_secs()) {
            return self.reject(candidate, e.to_string());
        }

        // Gate 2: oracle validation.
        let outcome = self.oracle.validate(candidate).await;
        if !outcome.valid {
            return self.reject(candidate, "oracle rejected deposit".to_string());
        }
        if outcome.confidence < self.params.confidence_threshold {
            return self.reject(
                candidate,
                format!(
                    "oracle confidence {} below threshold {}",
                    outcome.confidence, self.params.confidence_threshold
                ),
            );
        }
        self.states
            .insert(txid.clone(), DepositState::OracleValidated);

        // Gate 3: the chosen provider must be authorized on the destination ledger.
        match self.ledger.is_provider_authorized(&candidate.provider_id).await {
            Ok(true) => {
                self.states.insert(txid.clone(), DepositState::Authorized);
            }
            Ok(false) => {
                return self.reject(
                    candidate,
                    format!(
                        "finality provider {} is not authorized",
                        candidate.provider_id
                    ),
                );
            }
            Err(e) => {
                let reason = RelayError::from(e).to_string();
                return self.fail(candidate, 0, reason);
            }
        }

        // Registration and minting, retried as one unit with exponential backoff.
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.register_and_mint(candidate).await {
                Ok(minted) => {
                    info!(%txid, amount = candidate.amount, minted, "deposit minted");
                    let _ = self.events.send(BridgeEvent::DepositMinted {
                        txid: txid.clone(),
                        amount: candidate.amount,
                        minted,
                    });

                    let delegation = NewDelegation {
                        txid: txid.clone(),
                        staker: candidate.recipient.clone(),
                        amount: candidate.amount,
                        provider_id: candidate.provider_id.clone(),
                        unlock_time: candidate.unlock_time,
                        created_at: now_secs(),
                    };
                    if self.delegations.send(delegation).await.is_err() {
                        warn!(%txid, "staking engine is gone, delegation not created");
                    }

                    return DepositState::Minted;
                }
                Err(e) if e.is_retriable() && attempt < self.params.max_attempts => {
                    let backoff = self.params.backoff_for_attempt(attempt);
                    warn!(
                        %txid,
                        attempt,
                        err = %e,
                        backoff_ms = backoff.as_millis() as u64,
                        "relay attempt failed, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    return self.fail(candidate, attempt, e.to_string());
                }
            }
        }
    }

    /// One register+mint attempt.
    ///
    /// Registration is skipped when an earlier attempt already got the deposit registered, so a
    /// retry after a failed mint does not trip the ledger's duplicate-registration gate.
    async fn register_and_mint(
        &mut self,
        candidate: &DepositCandidate,
    ) -> Result<u128, RelayError> {
        let txid = &candidate.txid;

        if !self.deposits.contains_key(txid) {
            let tx_hash = self
                .ledger
                .register_deposit(
                    txid,
                    &candidate.recipient,
                    candidate.amount,
                    candidate.unlock_time,
                    &candidate.provider_id,
                )
                .await?;
            self.wait_for_receipt(&tx_hash).await?;

            self.deposits.insert(
                txid.clone(),
                Deposit {
                    txid: txid.clone(),
                    recipient: candidate.recipient.clone(),
                    amount: candidate.amount,
                    unlock_time: candidate.unlock_time,
                    provider_id: candidate.provider_id.clone(),
                    registered_at: now_secs(),
                    processed: false,
                },
            );
            self.states.insert(txid.clone(), DepositState::Registered);

            info!(%txid, amount = candidate.amount, "deposit registered");
            let _ = self.events.send(BridgeEvent::DepositRegistered {
                txid: txid.clone(),
                amount: candidate.amount,
            });
        }

        let tx_hash = self.ledger.mint(txid).await?;
        self.wait_for_receipt(&tx_hash).await?;

        if let Some(deposit) = self.deposits.get_mut(txid) {
            deposit.processed = true;
        }

        Ok(candidate.amount as u128 * SATS_TO_WEI_MULTIPLIER)
    }

    /// Polls the ledger until the submitted transaction confirms or the window elapses.
    async fn wait_for_receipt(&self, tx_hash: &LedgerTxHash) -> Result<LedgerReceipt, RelayError> {
        let deadline = Instant::now() + self.params.receipt_timeout();

        loop {
            if let Some(receipt) = self.ledger.get_receipt(tx_hash).await? {
                if receipt.success {
                    return Ok(receipt);
                }
                return Err(RelayError::Reverted {
                    tx_hash: tx_hash.clone(),
                    reason: receipt
                        .revert_reason
                        .unwrap_or_else(|| "no revert reason".to_string()),
                });
            }

            if Instant::now() >= deadline {
                return Err(RelayError::ReceiptTimeout {
                    tx_hash: tx_hash.clone(),
                });
            }
            tokio::time::sleep(self.params.receipt_poll_interval()).await;
        }
    }

    fn reject(&mut self, candidate: &DepositCandidate, reason: String) -> DepositState {
        warn!(txid = %candidate.txid, amount = candidate.amount, %reason, "deposit rejected");
        let _ = self.events.send(BridgeEvent::DepositFailed {
            txid: candidate.txid.clone(),
            amount: candidate.amount,
            attempts: 0,
            reason: reason.clone(),
        });
        DepositState::Rejected { reason }
    }

    fn fail(&mut self, candidate: &DepositCandidate, attempts: u32, reason: String) -> DepositState {
        error!(
            txid = %candidate.txid,
            amount = candidate.amount,
            attempts,
            %reason,
            "deposit failed, no further automatic action is taken"
        );
        let _ = self.events.send(BridgeEvent::DepositFailed {
            txid: candidate.txid.clone(),
            amount: candidate.amount,
            attempts,
            reason: reason.clone(),
        });
        DepositState::Failed { attempts, reason }
    }

    /// Consumes candidates until the queue closes, running each one to a terminal state.
    ///
    /// A candidate's pipeline (including its awaited chain calls) finishes before the next
    /// candidate is picked up, so processing order follows detection order.
    pub async fn run(mut self, mut candidates: mpsc::Receiver<DepositCandidate>) {
        while let Some(candidate) = candidates.recv().await {
            let txid = candidate.txid.clone();
            let state = self.process(candidate).await;
            debug!(%txid, ?state, "deposit pipeline finished");
        }
        info!("candidate queue closed, relay controller stopping");
    }
}

/// Local pre-registration checks. Any violation rejects the deposit before any chain call.
fn validate_candidate(candidate: &DepositCandidate, now: u64) -> Result<(), RelayError> {
    if !candidate.txid.is_wellformed() {
        return Err(RelayError::Validation(format!(
            "malformed transaction id: {}",
            candidate.txid
        )));
    }
    if !candidate.recipient.is_wellformed() {
        return Err(RelayError::Validation(format!(
            "malformed destination address: {}",
            candidate.recipient
        )));
    }
    if candidate.amount == 0 {
        return Err(RelayError::Validation("amount must be positive".to_string()));
    }
    if candidate.amount >= MAX_DEPOSIT_SATS {
        return Err(RelayError::Validation(format!(
            "amount {} exceeds sanity ceiling",
            candidate.amount
        )));
    }
    if candidate.unlock_time <= now {
        return Err(RelayError::Validation(
            "unlock time must be in future".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use stake_bridge_primitives::types::EvmAddress;

    use super::*;

    fn candidate() -> DepositCandidate {
        DepositCandidate {
            txid: DepositTxId::new("a".repeat(64)),
            vout: 0,
            amount: 250_000_000,
            unlock_time: now_secs() + 86_400,
            provider_id: "fp1".to_string(),
            recipient: EvmAddress::new(format!("0x{}", "11".repeat(20))),
            block_height: 840_000,
            confirmations: 6,
        }
    }

    #[test]
    fn wellformed_candidate_passes_validation() {
        assert!(validate_candidate(&candidate(), now_secs()).is_ok());
    }

    #[test]
    fn past_unlock_time_is_rejected_with_exact_reason() {
        let mut c = candidate();
        c.unlock_time = now_secs() - 1;

        let err = validate_candidate(&c, now_secs()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "validation failed: unlock time must be in future"
        );
        assert!(!err.is_retriable());
    }

    #[test]
    fn zero_and_oversized_amounts_are_rejected() {
        let mut zero = candidate();
        zero.amount = 0;
        assert!(validate_candidate(&zero, now_secs()).is_err());

        let mut huge = candidate();
        huge.amount = MAX_DEPOSIT_SATS;
        assert!(validate_candidate(&huge, now_secs()).is_err());
    }

    #[test]
    fn malformed_ids_and_addresses_are_rejected() {
        let mut bad_txid = candidate();
        bad_txid.txid = DepositTxId::new("XYZ");
        assert!(validate_candidate(&bad_txid, now_secs()).is_err());

        let mut bad_addr = candidate();
        bad_addr.recipient = EvmAddress::new("not-an-address");
        assert!(validate_candidate(&bad_addr, now_secs()).is_err());
    }
}
