//! The interface the relay drives against the destination ledger.

use async_trait::async_trait;
use stake_bridge_primitives::{
    deposit::Deposit,
    types::{DepositTxId, EvmAddress, ProviderId, Sats},
};

use crate::{errors::LedgerError, receipt::LedgerReceipt, receipt::LedgerTxHash};

/// Calls exposed by the destination ledger's bridge contract.
///
/// Mutating calls return the hash of the submitted transaction; the caller is expected to poll
/// [`DestinationLedger::get_receipt`] until the transaction confirms. Query calls return their
/// result directly and a missing record is an empty result, not an error.
#[async_trait]
pub trait DestinationLedger: Send + Sync {
    /// Registers a deposit under its source-chain transaction id.
    ///
    /// Fails with [`LedgerError::AlreadyRegistered`] when called twice for the same id.
    async fn register_deposit(
        &self,
        txid: &DepositTxId,
        recipient: &EvmAddress,
        amount: Sats,
        unlock_time: u64,
        provider_id: &ProviderId,
    ) -> Result<LedgerTxHash, LedgerError>;

    /// Mints the equivalent value for a registered deposit.
    ///
    /// Fails with [`LedgerError::NotRegistered`] for an unknown id and
    /// [`LedgerError::AlreadyProcessed`] when the deposit has already been minted.
    async fn mint(&self, txid: &DepositTxId) -> Result<LedgerTxHash, LedgerError>;

    /// Looks up a registered deposit by its transaction id.
    async fn get_deposit(&self, txid: &DepositTxId) -> Result<Option<Deposit>, LedgerError>;

    /// Whether the given finality provider is currently authorized.
    async fn is_provider_authorized(&self, provider_id: &ProviderId) -> Result<bool, LedgerError>;

    /// The minted balance of a destination-chain account, in 18-decimal units.
    async fn get_balance(&self, account: &EvmAddress) -> Result<u128, LedgerError>;

    /// The receipt for a submitted transaction, or `None` while it is still pending.
    async fn get_receipt(
        &self,
        tx_hash: &LedgerTxHash,
    ) -> Result<Option<LedgerReceipt>, LedgerError>;
}
