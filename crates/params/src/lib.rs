//! Tunable parameters that dictate the behavior of the stake bridge: relay retry and receipt
//! policy, scanner polling, and the staking simulation's rates and intervals.

pub mod default;
pub mod prelude;
pub mod relay;
pub mod scanner;
pub mod staking;
