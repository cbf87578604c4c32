//! Re-exports of all parameter types.

pub use crate::{relay::RelayParams, scanner::ScannerParams, staking::StakingParams};
