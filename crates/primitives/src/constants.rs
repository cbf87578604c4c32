//! Protocol-wide constants shared by the relay and the staking engine.

/// The number of smallest source-chain units (sats) in one whole coin.
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Sanity ceiling for a single deposit: the total issuance of the source chain in sats.
///
/// A deposit at or above this value can only be the result of a malformed or adversarial
/// candidate and is rejected locally without ever reaching the destination ledger.
pub const MAX_DEPOSIT_SATS: u64 = 21_000_000 * SATS_PER_BTC;

/// Multiplier converting an 8-decimal source-chain amount into the 18-decimal representation
/// minted on the destination ledger.
pub const SATS_TO_WEI_MULTIPLIER: u128 = 10_u128.pow(10);
