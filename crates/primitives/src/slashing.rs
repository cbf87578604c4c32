//! Slashing records appended to provider and position histories.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::types::Sats;

/// How severe a slashing incident is. Severity halves or keeps the configured slashing rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlashingSeverity {
    /// A lesser offense, slashed at half the configured base rate.
    Minor,

    /// A serious offense, slashed at the full configured base rate.
    Major,
}

impl Display for SlashingSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlashingSeverity::Minor => write!(f, "minor"),
            SlashingSeverity::Major => write!(f, "major"),
        }
    }
}

/// The misbehavior condition that triggered a slashing incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlashingReason {
    /// The provider was offline past the tolerated window.
    Downtime,

    /// The provider signed two conflicting blocks at the same height.
    DoubleSigning,

    /// The provider voted for an invalid state transition.
    InvalidVote,
}

impl Display for SlashingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlashingReason::Downtime => write!(f, "downtime"),
            SlashingReason::DoubleSigning => write!(f, "double signing"),
            SlashingReason::InvalidVote => write!(f, "invalid vote"),
        }
    }
}

/// An immutable record of one slashing incident.
///
/// Appended to the affected provider's history and to each affected position's history; never
/// mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashingEvent {
    /// The total amount slashed, in sats.
    pub amount: Sats,

    /// The misbehavior that triggered the slash.
    pub reason: SlashingReason,

    /// The severity the incident was judged at.
    pub severity: SlashingSeverity,

    /// The unix time the slash was executed.
    pub timestamp: u64,

    /// The number of delegation positions the slash touched.
    pub affected_delegators: u64,
}
