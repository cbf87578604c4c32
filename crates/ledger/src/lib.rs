//! The destination-ledger boundary: the typed interface the relay drives to register and mint
//! deposits, plus an in-memory implementation reproducing the ledger contract's semantics for
//! development and tests.

pub mod boundary;
pub mod errors;
pub mod memory;
pub mod receipt;

pub use boundary::DestinationLedger;
pub use errors::LedgerError;
pub use memory::InMemoryLedger;
pub use receipt::{LedgerReceipt, LedgerTxHash};
