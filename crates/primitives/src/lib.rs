//! Shared domain types for the stake bridge: transaction and address newtypes, deposit and
//! delegation records, finality provider state, slashing events, network statistics and the
//! unified lifecycle event type that the relay and the staking engine exchange.

pub mod constants;
pub mod deposit;
pub mod events;
pub mod position;
pub mod provider;
pub mod slashing;
pub mod stats;
pub mod types;
