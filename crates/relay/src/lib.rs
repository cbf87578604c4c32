//! The deposit relay controller: consumes detected deposits, validates them, and drives the
//! destination ledger through register and mint with receipt monitoring and bounded retries.

pub mod controller;
pub mod errors;
pub mod oracle;

pub use controller::{DepositRelayController, DepositState};
pub use errors::RelayError;
pub use oracle::{OracleOutcome, OracleValidator, StaticOracle};

#[cfg(test)]
use stake_bridge_test_utils as _;
