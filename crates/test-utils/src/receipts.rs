//! Ledger stubs with degenerate receipt behavior, for exercising the relay's receipt polling.

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

/// Accepts every mutating call but reports every submitted transaction as reverted.
///
/// Query calls behave like an empty, fully authorizing ledger, so a candidate sails through the
/// relay's gates and hits the revert on its first receipt poll.
#[derive(Debug)]
pub struct RevertingLedger {
    reason: String,
    next_nonce: Mutex<u64>,
}

impl RevertingLedger {
    /// Creates a ledger whose receipts all carry the given revert reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            next_nonce: Mutex::new(0),
        }
    }

    fn submit(&self) -> LedgerTxHash {
        let mut nonce = self.next_nonce.lock();
        *nonce += 1;
        format!("0x{:064x}", *nonce)
    }
}

#[async_trait]
impl DestinationLedger for RevertingLedger {
    async fn register_deposit(
        &self,
        _txid: &DepositTxId,
        _recipient: &EvmAddress,
        _amount: Sats,
        _unlock_time: u64,
        _provider_id: &ProviderId,
    ) -> Result<LedgerTxHash, LedgerError> {
        Ok(self.submit())
    }

    async fn mint(&self, _txid: &DepositTxId) -> Result<LedgerTxHash, LedgerError> {
        Ok(self.submit())
    }

    async fn get_deposit(&self, _txid: &DepositTxId) -> Result<Option<Deposit>, LedgerError> {
        Ok(None)
    }

    async fn is_provider_authorized(
        &self,
        _provider_id: &ProviderId,
    ) -> Result<bool, LedgerError> {
        Ok(true)
    }

    async fn get_balance(&self, _account: &EvmAddress) -> Result<u128, LedgerError> {
        Ok(0)
    }

    async fn get_receipt(
        &self,
        tx_hash: &LedgerTxHash,
    ) -> Result<Option<LedgerReceipt>, LedgerError> {
        Ok(Some(LedgerReceipt::reverted(
            tx_hash.clone(),
            1,
            self.reason.clone(),
        )))
    }
}

/// Accepts every mutating call but never produces a receipt, so every submission stalls until
/// the relay's receipt window elapses.
#[derive(Debug)]
pub struct SilentLedger {
    next_nonce: Mutex<u64>,
}

impl SilentLedger {
    /// Creates a ledger that swallows every submitted transaction.
    pub fn new() -> Self {
        Self {
            next_nonce: Mutex::new(0),
        }
    }

    fn submit(&self) -> LedgerTxHash {
        let mut nonce = self.next_nonce.lock();
        *nonce += 1;
        format!("0x{:064x}", *nonce)
    }
}

impl Default for SilentLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DestinationLedger for SilentLedger {
    async fn register_deposit(
        &self,
        _txid: &DepositTxId,
        _recipient: &EvmAddress,
        _amount: Sats,
        _unlock_time: u64,
        _provider_id: &ProviderId,
    ) -> Result<LedgerTxHash, LedgerError> {
        Ok(self.submit())
    }

    async fn mint(&self, _txid: &DepositTxId) -> Result<LedgerTxHash, LedgerError> {
        Ok(self.submit())
    }

    async fn get_deposit(&self, _txid: &DepositTxId) -> Result<Option<Deposit>, LedgerError> {
        Ok(None)
    }

    async fn is_provider_authorized(
        &self,
        _provider_id: &ProviderId,
    ) -> Result<bool, LedgerError> {
        Ok(true)
    }

    async fn get_balance(&self, _account: &EvmAddress) -> Result<u128, LedgerError> {
        Ok(0)
    }

    async fn get_receipt(
        &self,
        _tx_hash: &LedgerTxHash,
    ) -> Result<Option<LedgerReceipt>, LedgerError> {
        Ok(None)
    }
}
