//! The staking ledger engine: finality providers, delegation positions, reward accrual,
//! slashing and epoch bookkeeping, advanced by timers independent of the deposit flow.

pub mod drift;
pub mod engine;
pub mod errors;
pub mod runner;

pub use drift::{DriftSource, SeededDrift};
pub use engine::StakingLedgerEngine;
pub use errors::StakingError;
pub use runner::StakingRunner;
