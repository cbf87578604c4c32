//! Parameters governing the deposit relay controller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::default::{
    BACKOFF_BASE_MS, BACKOFF_CAP_MS, CONFIDENCE_THRESHOLD, MAX_RELAY_ATTEMPTS,
    RECEIPT_POLL_INTERVAL_MS, RECEIPT_TIMEOUT_SECS,
};

/// Retry, backoff and receipt policy for the relay pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelayParams {
    /// Minimum oracle confidence for a deposit to pass validation, in `[0, 1]`.
    pub confidence_threshold: f64,

    /// Maximum register+mint attempts before a deposit is marked failed.
    pub max_attempts: u32,

    /// Base delay of the exponential backoff between attempts, in milliseconds.
    pub backoff_base_ms: u64,

    /// Ceiling of the exponential backoff between attempts, in milliseconds.
    pub backoff_cap_ms: u64,

    /// How long to wait for a transaction receipt before treating the call as failed, in
    /// seconds.
    pub receipt_timeout_secs: u64,

    /// Interval between receipt polls, in milliseconds.
    pub receipt_poll_interval_ms: u64,
}

impl RelayParams {
    /// The backoff to apply before the given 1-based attempt: `min(base * 2^(attempt-1), cap)`.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(63);
        let delay = self
            .backoff_base_ms
            .saturating_mul(1_u64 << exp)
            .min(self.backoff_cap_ms);
        Duration::from_millis(delay)
    }

    /// The receipt polling deadline.
    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    /// The interval between receipt polls.
    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}

impl Default for RelayParams {
    fn default() -> Self {
        Self {
            confidence_threshold: CONFIDENCE_THRESHOLD,
            max_attempts: MAX_RELAY_ATTEMPTS,
            backoff_base_ms: BACKOFF_BASE_MS,
            backoff_cap_ms: BACKOFF_CAP_MS,
            receipt_timeout_secs: RECEIPT_TIMEOUT_SECS,
            receipt_poll_interval_ms: RECEIPT_POLL_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_params_serde() {
        let params = RelayParams::default();
        let serialized = toml::to_string(&params).unwrap();

        let deserialized: RelayParams = toml::from_str(&serialized).unwrap();

        assert_eq!(params, deserialized);
    }

    #[test]
    fn backoff_doubles_then_saturates_at_cap() {
        let params = RelayParams::default();

        assert_eq!(params.backoff_for_attempt(1), Duration::from_secs(1));
        assert_eq!(params.backoff_for_attempt(2), Duration::from_secs(2));
        assert_eq!(params.backoff_for_attempt(3), Duration::from_secs(4));
        assert_eq!(params.backoff_for_attempt(4), Duration::from_secs(8));
        assert_eq!(params.backoff_for_attempt(5), Duration::from_secs(10));
        assert_eq!(params.backoff_for_attempt(60), Duration::from_secs(10));
    }
}
