//! Parameters governing the source-chain scanner.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stake_bridge_primitives::types::{EvmAddress, ProviderId};

use crate::default::{LOCK_DURATION_SECS, MIN_CONFIRMATIONS, SCAN_INTERVAL_SECS};

/// What the scanner watches and how it turns detected outputs into deposit candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerParams {
    /// The source-chain address watched for staking outputs.
    pub watched_address: String,

    /// The destination-chain account credited for detected deposits.
    ///
    /// Statically derived from the relay's credentials; every deposit relayed by this node is
    /// minted to this address.
    pub recipient: EvmAddress,

    /// The finality provider assigned to detected deposits.
    pub provider_id: ProviderId,

    /// Interval between scans, in seconds.
    pub scan_interval_secs: u64,

    /// The lock duration applied to detected deposits, in seconds.
    pub lock_duration_secs: u64,

    /// Minimum confirmations for an output to be considered.
    pub min_confirmations: u64,
}

impl ScannerParams {
    /// Convenience constructor applying the default intervals.
    pub fn new(
        watched_address: impl Into<String>,
        recipient: EvmAddress,
        provider_id: impl Into<ProviderId>,
    ) -> Self {
        Self {
            watched_address: watched_address.into(),
            recipient,
            provider_id: provider_id.into(),
            scan_interval_secs: SCAN_INTERVAL_SECS,
            lock_duration_secs: LOCK_DURATION_SECS,
            min_confirmations: MIN_CONFIRMATIONS,
        }
    }

    /// The interval between scans.
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_params_serde() {
        let params_toml = r#"
            watched_address = "bc1qwatched"
            recipient = "0x00112233445566778899aabbccddeeff00112233"
            provider_id = "fp1"
            scan_interval_secs = 30
            lock_duration_secs = 86400
            min_confirmations = 1
        "#;

        let params = toml::from_str::<ScannerParams>(params_toml)
            .expect("must be able to deserialize ScannerParams from a toml");

        let serialized = toml::to_string(&params).unwrap();
        let deserialized: ScannerParams = toml::from_str(&serialized).unwrap();
        assert_eq!(params, deserialized);
    }
}
