//! The node's tunable parameters, read from a TOML file at startup.

use serde::{Deserialize, Serialize};
use stake_bridge_params::prelude::*;

/// One file bundling every component's parameters.
///
/// Changing these only affects this node's behavior; none of them are consensus-critical on the
/// destination ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Params {
    /// Retry and receipt policy for the deposit relay.
    pub relay: RelayParams,

    /// What the scanner watches and how candidates are shaped.
    pub scanner: ScannerParams,

    /// Rates and intervals for the staking ledger simulation.
    pub staking: StakingParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_serde_toml() {
        let params = r#"
            [relay]
            confidence_threshold = 0.8
            max_attempts = 3
            backoff_base_ms = 1000
            backoff_cap_ms = 10000
            receipt_timeout_secs = 120
            receipt_poll_interval_ms = 500

            [scanner]
            watched_address = "bc1qstakingaddress"
            recipient = "0x00112233445566778899aabbccddeeff00112233"
            provider_id = "fp1"
            scan_interval_secs = 30
            lock_duration_secs = 86400
            min_confirmations = 1

            [staking]
            base_annual_rate = 0.05
            base_slashing_rate = 0.05
            major_severity_threshold = 0.7
            reputation_slash_penalty = 10.0
            reward_interval_secs = 3600
            slashing_interval_secs = 1800
            epoch_duration_secs = 3600
        "#;

        let params = toml::from_str::<Params>(params);
        assert!(
            params.is_ok(),
            "must be able to deserialize params from toml but got: {}",
            params.unwrap_err()
        );

        let params = params.unwrap();
        let serialized = toml::to_string(&params).unwrap();
        let deserialized = toml::from_str::<Params>(&serialized).unwrap();
        assert_eq!(
            deserialized, params,
            "must be able to serialize and deserialize params to toml"
        );
    }
}
