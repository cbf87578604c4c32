//! The deposit-validation oracle boundary.

use async_trait::async_trait;
use stake_bridge_primitives::deposit::DepositCandidate;

/// The oracle's judgement on a deposit candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OracleOutcome {
    /// Whether the oracle considers the deposit genuine.
    pub valid: bool,

    /// The oracle's confidence in its judgement, in `[0, 1]`.
    pub confidence: f64,
}

/// External validator consulted before a deposit is relayed.
///
/// The controller only depends on this contract, so a real inclusion-proof verifier can be
/// substituted for the static stub without touching the pipeline.
#[async_trait]
pub trait OracleValidator: Send + Sync {
    /// Judges one deposit candidate.
    async fn validate(&self, candidate: &DepositCandidate) -> OracleOutcome;
}

/// Stub oracle returning a fixed judgement for every candidate.
#[derive(Debug, Clone, Copy)]
pub struct StaticOracle {
    outcome: OracleOutcome,
}

impl StaticOracle {
    /// An oracle that accepts everything with the given confidence.
    pub fn accepting(confidence: f64) -> Self {
        Self {
            outcome: OracleOutcome {
                valid: true,
                confidence,
            },
        }
    }

    /// An oracle that rejects everything.
    pub fn rejecting() -> Self {
        Self {
            outcome: OracleOutcome {
                valid: false,
                confidence: 0.0,
            },
        }
    }
}

impl Default for StaticOracle {
    fn default() -> Self {
        Self::accepting(1.0)
    }
}

#[async_trait]
impl OracleValidator for StaticOracle {
    async fn validate(&self, _candidate: &DepositCandidate) -> OracleOutcome {
        self.outcome
    }
}
