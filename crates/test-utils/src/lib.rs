//! Shared helpers for stake-bridge tests: deposit fixtures, a fault-injecting ledger wrapper
//! and receipt-misbehaving ledger stubs for exercising the relay's retry and receipt-polling
//! machinery.

pub mod fixtures;
pub mod flaky;
pub mod receipts;

pub use fixtures::{candidate, relay_identity, staker_address};
pub use flaky::FlakyLedger;
pub use receipts::{RevertingLedger, SilentLedger};
