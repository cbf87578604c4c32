//! Ready-made domain fixtures.

use stake_bridge_primitives::{
    deposit::DepositCandidate,
    types::{now_secs, DepositTxId, EvmAddress},
};

/// The relay identity used across tests.
pub fn relay_identity() -> EvmAddress {
    EvmAddress::new(format!("0x{}", "11".repeat(20)))
}

/// A staker address distinct from the relay identity.
pub fn staker_address() -> EvmAddress {
    EvmAddress::new(format!("0x{}", "22".repeat(20)))
}

/// A wellformed deposit candidate for the given txid and amount, unlocked a day from now,
/// delegated to `fp1` and credited to the test staker.
pub fn candidate(txid: &str, amount: u64) -> DepositCandidate {
    DepositCandidate {
        txid: DepositTxId::new(txid),
        vout: 0,
        amount,
        unlock_time: now_secs() + 86_400,
        provider_id: "fp1".to_string(),
        recipient: staker_address(),
        block_height: 840_000,
        confirmations: 6,
    }
}
