//! Operational configuration for the stake-bridge node.

use serde::{Deserialize, Serialize};
use stake_bridge_primitives::types::EvmAddress;

/// Settings that wire the node to its environment.
///
/// Unlike [`Params`](crate::params::Params), these carry no protocol meaning; they only say
/// where to reach the explorer and how to size the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// The destination-chain identity the relay submits transactions as.
    ///
    /// The destination ledger only accepts mutations from this address.
    pub relay_address: EvmAddress,

    /// The configuration for the source-chain explorer client.
    pub explorer: ExplorerConfig,

    /// The number of tokio worker threads.
    ///
    /// Defaults to [`DEFAULT_THREAD_COUNT`](crate::constants::DEFAULT_THREAD_COUNT).
    pub num_threads: Option<u8>,

    /// The stack size per worker thread, in bytes.
    ///
    /// Defaults to [`DEFAULT_THREAD_STACK_SIZE`](crate::constants::DEFAULT_THREAD_STACK_SIZE).
    pub thread_stack_size: Option<usize>,
}

/// Where to reach the source-chain explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ExplorerConfig {
    /// Base URL of the explorer's REST API.
    pub base_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_toml() {
        let config = r#"
            relay_address = "0x1111111111111111111111111111111111111111"
            num_threads = 4
            thread_stack_size = 8388608

            [explorer]
            base_url = "https://mempool.space/api"
        "#;

        let config = toml::from_str::<Config>(config);
        assert!(
            config.is_ok(),
            "must be able to deserialize config from toml but got: {}",
            config.unwrap_err()
        );

        let config = config.unwrap();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized = toml::from_str::<Config>(&serialized).unwrap();
        assert_eq!(
            deserialized, config,
            "must be able to serialize and deserialize config to toml"
        );
    }

    #[test]
    fn optional_runtime_settings_can_be_omitted() {
        let config = r#"
            relay_address = "0x1111111111111111111111111111111111111111"

            [explorer]
            base_url = "https://mempool.space/api"
        "#;

        let config = toml::from_str::<Config>(config).unwrap();
        assert!(config.num_threads.is_none());
        assert!(config.thread_stack_size.is_none());
    }
}
