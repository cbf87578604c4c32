//! A ledger wrapper that injects transport failures into mutating calls.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use stake_bridge_ledger::{
    boundary::DestinationLedger,
    errors::LedgerError,
    receipt::{LedgerReceipt, LedgerTxHash},
};
use stake_bridge_primitives::{
    deposit::Deposit,
    types::{DepositTxId, EvmAddress, ProviderId, Sats},
};

/// Fails the first `n` mutating calls with a transport error, then delegates to the wrapped
/// ledger. Query calls always pass through.
pub struct FlakyLedger {
    inner: Arc<dyn DestinationLedger>,
    failures_left: Mutex<u32>,
}

impl std::fmt::Debug for FlakyLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlakyLedger")
            .field("failures_left", &*self.failures_left.lock())
            .finish_non_exhaustive()
    }
}

impl FlakyLedger {
    /// Wraps `inner`, failing its next `failures` mutating calls.
    pub fn failing_next(inner: Arc<dyn DestinationLedger>, failures: u32) -> Self {
        Self {
            inner,
            failures_left: Mutex::new(failures),
        }
    }

    fn maybe_fail(&self) -> Result<(), LedgerError> {
        let mut left = self.failures_left.lock();
        if *left > 0 {
            *left -= 1;
            return Err(LedgerError::Rpc("injected transport failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DestinationLedger for FlakyLedger {
    async fn register_deposit(
        &self,
        txid: &DepositTxId,
        recipient: &EvmAddress,
        amount: Sats,
        unlock_time: u64,
        provider_id: &ProviderId,
    ) -> Result<LedgerTxHash, LedgerError> {
        self.maybe_fail()?;
        self.inner
            .register_deposit(txid, recipient, amount, unlock_time, provider_id)
            .await
    }

    async fn mint(&self, txid: &DepositTxId) -> Result<LedgerTxHash, LedgerError> {
        self.maybe_fail()?;
        self.inner.mint(txid).await
    }

    async fn get_deposit(&self, txid: &DepositTxId) -> Result<Option<Deposit>, LedgerError> {
        self.inner.get_deposit(txid).await
    }

    async fn is_provider_authorized(&self, provider_id: &ProviderId) -> Result<bool, LedgerError> {
        self.inner.is_provider_authorized(provider_id).await
    }

    async fn get_balance(&self, account: &EvmAddress) -> Result<u128, LedgerError> {
        self.inner.get_balance(account).await
    }

    async fn get_receipt(
        &self,
        tx_hash: &LedgerTxHash,
    ) -> Result<Option<LedgerReceipt>, LedgerError> {
        self.inner.get_receipt(tx_hash).await
    }
}
