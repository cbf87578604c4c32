//! Parameters governing the staking ledger engine's timers and rates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::default::{
    BASE_ANNUAL_RATE, BASE_SLASHING_RATE, EPOCH_DURATION_SECS, MAJOR_SEVERITY_THRESHOLD,
    REPUTATION_SLASH_PENALTY, REWARD_INTERVAL_SECS, SLASHING_INTERVAL_SECS,
};

/// Rates and intervals of the staking simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StakingParams {
    /// Base annual reward rate applied to active positions, in `[0, 1]`.
    pub base_annual_rate: f64,

    /// Base slashing rate; halved for minor-severity incidents, in `[0, 1]`.
    pub base_slashing_rate: f64,

    /// A severity draw above this threshold makes a slashing incident major.
    pub major_severity_threshold: f64,

    /// Reputation points subtracted from a provider on every slashing incident.
    pub reputation_slash_penalty: f64,

    /// Interval between reward distributions, in seconds.
    pub reward_interval_secs: u64,

    /// Interval between slashing checks, in seconds.
    pub slashing_interval_secs: u64,

    /// Duration of one epoch, in seconds.
    pub epoch_duration_secs: u64,
}

impl StakingParams {
    /// The interval between reward distributions.
    pub fn reward_interval(&self) -> Duration {
        Duration::from_secs(self.reward_interval_secs)
    }

    /// The interval between slashing checks.
    pub fn slashing_interval(&self) -> Duration {
        Duration::from_secs(self.slashing_interval_secs)
    }

    /// The duration of one epoch.
    pub fn epoch_duration(&self) -> Duration {
        Duration::from_secs(self.epoch_duration_secs)
    }

    /// The effective slashing rate for a given severity draw.
    ///
    /// Returns the rate together with whether the incident is judged major. Minor incidents are
    /// slashed at half the base rate.
    pub fn slashing_rate_for_draw(&self, draw: f64) -> (f64, bool) {
        let major = draw > self.major_severity_threshold;
        let rate = if major {
            self.base_slashing_rate
        } else {
            self.base_slashing_rate / 2.0
        };
        (rate, major)
    }
}

impl Default for StakingParams {
    fn default() -> Self {
        Self {
            base_annual_rate: BASE_ANNUAL_RATE,
            base_slashing_rate: BASE_SLASHING_RATE,
            major_severity_threshold: MAJOR_SEVERITY_THRESHOLD,
            reputation_slash_penalty: REPUTATION_SLASH_PENALTY,
            reward_interval_secs: REWARD_INTERVAL_SECS,
            slashing_interval_secs: SLASHING_INTERVAL_SECS,
            epoch_duration_secs: EPOCH_DURATION_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staking_params_serde() {
        let params = StakingParams::default();
        let serialized = toml::to_string(&params).unwrap();

        let deserialized: StakingParams = toml::from_str(&serialized).unwrap();

        assert_eq!(params, deserialized);
    }

    #[test]
    fn minor_severity_halves_the_rate() {
        let params = StakingParams::default();

        let (minor_rate, major) = params.slashing_rate_for_draw(0.5);
        assert!(!major);
        assert_eq!(minor_rate, params.base_slashing_rate / 2.0);

        let (major_rate, major) = params.slashing_rate_for_draw(0.9);
        assert!(major);
        assert_eq!(major_rate, params.base_slashing_rate);
    }
}
