//! An in-memory destination ledger reproducing the bridge contract's semantics.
//!
//! Used by the dev binary and by tests. State is a single mutex-guarded map set so every call
//! observes and produces a consistent snapshot, the same way the contract's storage would.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use stake_bridge_primitives::{
    constants::SATS_TO_WEI_MULTIPLIER,
    deposit::Deposit,
    types::{now_secs, DepositTxId, EvmAddress, ProviderId, Sats},
};
use tracing::debug;

use crate::{
    boundary::DestinationLedger,
    errors::LedgerError,
    receipt::{LedgerReceipt, LedgerTxHash},
};

#[derive(Debug, Default)]
struct LedgerState {
    deposits: BTreeMap<DepositTxId, Deposit>,
    balances: HashMap<EvmAddress, u128>,
    receipts: HashMap<LedgerTxHash, LedgerReceipt>,
    paused: bool,
    next_nonce: u64,
    block_number: u64,
}

/// In-memory stand-in for the destination ledger's bridge contract.
///
/// Enforces the contract's gates: only the configured relay identity may register or mint, a
/// paused ledger rejects all mutating calls, registration is unique per transaction id and a
/// deposit can only be minted once. Receipts become available as soon as a mutating call
/// returns.
#[derive(Debug)]
pub struct InMemoryLedger {
    relay_identity: EvmAddress,
    caller: EvmAddress,
    authorized_providers: HashSet<ProviderId>,
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// Creates a ledger whose calls are made as the configured relay identity.
    pub fn new(
        relay_identity: EvmAddress,
        authorized_providers: impl IntoIterator<Item = ProviderId>,
    ) -> Self {
        Self {
            caller: relay_identity.clone(),
            relay_identity,
            authorized_providers: authorized_providers.into_iter().collect(),
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Rebinds the calling identity, used to exercise the unauthorized-caller gate in tests.
    pub fn with_caller(mut self, caller: EvmAddress) -> Self {
        self.caller = caller;
        self
    }

    /// Pauses or unpauses the ledger.
    pub fn set_paused(&self, paused: bool) {
        self.state.lock().paused = paused;
    }

    fn check_mutation_allowed(&self, state: &LedgerState) -> Result<(), LedgerError> {
        if state.paused {
            return Err(LedgerError::Paused);
        }
        if self.caller != self.relay_identity {
            return Err(LedgerError::UnauthorizedCaller(self.caller.clone()));
        }
        Ok(())
    }

    /// Records a successful receipt for a freshly submitted transaction and returns its hash.
    fn record_receipt(state: &mut LedgerState) -> LedgerTxHash {
        state.next_nonce += 1;
        state.block_number += 1;
        let tx_hash = format!("0x{:064x}", state.next_nonce);
        let receipt = LedgerReceipt::success(tx_hash.clone(), state.block_number);
        state.receipts.insert(tx_hash.clone(), receipt);
        tx_hash
    }
}

#[async_trait]
impl DestinationLedger for InMemoryLedger {
    async fn register_deposit(
        &self,
        txid: &DepositTxId,
        recipient: &EvmAddress,
        amount: Sats,
        unlock_time: u64,
        provider_id: &ProviderId,
    ) -> Result<LedgerTxHash, LedgerError> {
        let mut state = self.state.lock();
        self.check_mutation_allowed(&state)?;

        if !self.authorized_providers.contains(provider_id) {
            return Err(LedgerError::UnknownProvider(provider_id.clone()));
        }
        if state.deposits.contains_key(txid) {
            return Err(LedgerError::AlreadyRegistered(txid.clone()));
        }

        state.deposits.insert(
            txid.clone(),
            Deposit {
                txid: txid.clone(),
                recipient: recipient.clone(),
                amount,
                unlock_time,
                provider_id: provider_id.clone(),
                registered_at: now_secs(),
                processed: false,
            },
        );

        let tx_hash = Self::record_receipt(&mut state);
        debug!(%txid, %amount, %tx_hash, "registered deposit");

        Ok(tx_hash)
    }

    async fn mint(&self, txid: &DepositTxId) -> Result<LedgerTxHash, LedgerError> {
        let mut state = self.state.lock();
        self.check_mutation_allowed(&state)?;

        let deposit = state
            .deposits
            .get_mut(txid)
            .ok_or_else(|| LedgerError::NotRegistered(txid.clone()))?;
        if deposit.processed {
            return Err(LedgerError::AlreadyProcessed(txid.clone()));
        }

        deposit.processed = true;
        let minted = deposit.amount as u128 * SATS_TO_WEI_MULTIPLIER;
        let recipient = deposit.recipient.clone();
        *state.balances.entry(recipient).or_default() += minted;

        let tx_hash = Self::record_receipt(&mut state);
        debug!(%txid, %minted, %tx_hash, "minted deposit");

        Ok(tx_hash)
    }

    async fn get_deposit(&self, txid: &DepositTxId) -> Result<Option<Deposit>, LedgerError> {
        Ok(self.state.lock().deposits.get(txid).cloned())
    }

    async fn is_provider_authorized(&self, provider_id: &ProviderId) -> Result<bool, LedgerError> {
        Ok(self.authorized_providers.contains(provider_id))
    }

    async fn get_balance(&self, account: &EvmAddress) -> Result<u128, LedgerError> {
        Ok(self
            .state
            .lock()
            .balances
            .get(account)
            .copied()
            .unwrap_or_default())
    }

    async fn get_receipt(
        &self,
        tx_hash: &LedgerTxHash,
    ) -> Result<Option<LedgerReceipt>, LedgerError> {
        Ok(self.state.lock().receipts.get(tx_hash).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay_addr() -> EvmAddress {
        EvmAddress::new(format!("0x{}", "11".repeat(20)))
    }

    fn ledger() -> InMemoryLedger {
        InMemoryLedger::new(relay_addr(), ["fp1".to_string()])
    }

    #[tokio::test]
    async fn register_is_unique_per_txid() {
        let ledger = ledger();
        let txid = DepositTxId::new("test-dup");

        ledger
            .register_deposit(&txid, &relay_addr(), 1_000, now_secs() + 60, &"fp1".into())
            .await
            .expect("first registration must succeed");

        let err = ledger
            .register_deposit(&txid, &relay_addr(), 1_000, now_secs() + 60, &"fp1".into())
            .await
            .expect_err("second registration must fail");
        assert!(matches!(err, LedgerError::AlreadyRegistered(_)));
    }

    #[tokio::test]
    async fn mint_converts_to_18_decimals_and_is_one_shot() {
        let ledger = ledger();
        let txid = DepositTxId::new("test-mint");
        let recipient = relay_addr();

        ledger
            .register_deposit(
                &txid,
                &recipient,
                250_000_000,
                now_secs() + 86_400,
                &"fp1".into(),
            )
            .await
            .unwrap();
        ledger.mint(&txid).await.unwrap();

        let deposit = ledger.get_deposit(&txid).await.unwrap().unwrap();
        assert!(deposit.processed);

        let balance = ledger.get_balance(&recipient).await.unwrap();
        assert_eq!(balance, 2_500_000_000_000_000_000);

        let err = ledger.mint(&txid).await.expect_err("second mint must fail");
        assert!(matches!(err, LedgerError::AlreadyProcessed(_)));
    }

    #[tokio::test]
    async fn mint_of_unknown_deposit_fails() {
        let ledger = ledger();
        let err = ledger
            .mint(&DepositTxId::new("test-unknown"))
            .await
            .expect_err("mint of unregistered deposit must fail");
        assert!(matches!(err, LedgerError::NotRegistered(_)));
    }

    #[tokio::test]
    async fn paused_ledger_rejects_mutations() {
        let ledger = ledger();
        ledger.set_paused(true);

        let err = ledger
            .register_deposit(
                &DepositTxId::new("test-paused"),
                &relay_addr(),
                1_000,
                now_secs() + 60,
                &"fp1".into(),
            )
            .await
            .expect_err("paused ledger must reject registration");
        assert!(matches!(err, LedgerError::Paused));
    }

    #[tokio::test]
    async fn wrong_caller_is_rejected() {
        let other = EvmAddress::new(format!("0x{}", "22".repeat(20)));
        let ledger = ledger().with_caller(other);

        let err = ledger
            .register_deposit(
                &DepositTxId::new("test-caller"),
                &relay_addr(),
                1_000,
                now_secs() + 60,
                &"fp1".into(),
            )
            .await
            .expect_err("foreign caller must be rejected");
        assert!(matches!(err, LedgerError::UnauthorizedCaller(_)));
    }

    #[tokio::test]
    async fn receipts_are_queryable_after_submission() {
        let ledger = ledger();
        let tx_hash = ledger
            .register_deposit(
                &DepositTxId::new("test-receipt"),
                &relay_addr(),
                1_000,
                now_secs() + 60,
                &"fp1".into(),
            )
            .await
            .unwrap();

        let receipt = ledger.get_receipt(&tx_hash).await.unwrap().unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.tx_hash, tx_hash);

        let missing = ledger.get_receipt(&"0xdeadbeef".to_string()).await.unwrap();
        assert!(missing.is_none());
    }
}
